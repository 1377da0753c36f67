//! Human-friendly output implementation using console styling.

use console::style;
use tracing::{debug, instrument, trace};

use crate::error::MdlError;

use super::{CheckReport, DocumentSummary, Output};

/// Styled terminal output implementation for human users.
pub struct HumanOutput;

impl HumanOutput {
    #[instrument]
    pub fn new() -> Self {
        debug!("Creating HumanOutput");
        Self
    }

    fn field(name: &str, value: &str) {
        println!("  {} {value}", style(&format!("{name:<12}")).dim());
    }
}

impl Default for HumanOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Output for HumanOutput {
    #[instrument(skip(self))]
    fn success(&self, message: &str) {
        debug!(message, "Outputting success");
        println!("{} {message}", style("[OK]").green().bold());
    }

    #[instrument(skip(self))]
    fn error(&self, error: &MdlError) {
        debug!(
            error = %error,
            recoverable = error.is_user_recoverable(),
            "Outputting error"
        );
        eprintln!("{} {error}", style("[ERR]").red().bold());
        if let Some(suggestion) = error.suggestion() {
            trace!(suggestion, "Adding suggestion");
            eprintln!("\n  {}\n  {suggestion}", style("Suggestion:").dim());
        }
    }

    #[instrument(skip(self))]
    fn warning(&self, message: &str) {
        debug!(message, "Outputting warning");
        eprintln!("{} {message}", style("[WARN]").yellow().bold());
    }

    #[instrument(skip(self, report), fields(valid = report.valid))]
    fn check_report(&self, report: &CheckReport) {
        debug!("Outputting check report");
        if report.valid {
            let lines = report.lines.unwrap_or(0);
            self.success(&format!("{}: {lines} lines parsed", report.path));
            return;
        }

        eprintln!(
            "{} {}: invalid document",
            style("[ERR]").red().bold(),
            report.path
        );
        if let Some(issue) = &report.error {
            eprintln!("  {}", issue.message);
            if let Some(suggestion) = issue.suggestion {
                eprintln!("\n  {}\n  {suggestion}", style("Suggestion:").dim());
            }
        }
    }

    #[instrument(skip(self, summary), fields(path = %summary.path))]
    fn document_summary(&self, summary: &DocumentSummary) {
        debug!("Outputting document summary");
        let or_dash = |id: Option<uuid::Uuid>| {
            id.map_or_else(|| "-".to_string(), |v| v.to_string())
        };

        println!("{}", style(&summary.path).bold().underlined());
        Self::field("Moment ID", &or_dash(summary.moment_id));
        Self::field("Snapshot ID", &or_dash(summary.snapshot_id));
        Self::field("Previous", &or_dash(summary.previous_snapshot_id));
        Self::field("Timestamp", summary.timestamp.as_deref().unwrap_or("-"));
        Self::field(
            "Annotations",
            if summary.has_annotations { "yes" } else { "no" },
        );
        Self::field(
            "Lines",
            &format!("{} total, {} moment", summary.lines, summary.moment_lines),
        );
    }

    #[instrument(skip(self, value))]
    fn annotations(&self, value: &serde_yaml::Value) {
        debug!("Outputting annotations");
        match serde_yaml::to_string(value) {
            Ok(yaml) => print!("{yaml}"),
            Err(e) => self.warning(&format!("annotations do not reserialize: {e}")),
        }
    }

    #[instrument(skip(self))]
    fn version_info(&self, version: &str) {
        debug!(version, "Outputting version info");
        println!("mdl {version}");
    }
}
