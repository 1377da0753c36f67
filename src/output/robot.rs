//! Robot mode JSON output implementation.

use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::error::MdlError;

use super::{CheckReport, DocumentSummary, Output, RobotFormat};

/// JSON output implementation for AI agents and scripting.
///
/// Every command emits a single JSON document on stdout, errors go to
/// stderr, so pipelines never have to scrape styled text.
pub struct RobotOutput {
    format: RobotFormat,
}

impl RobotOutput {
    #[instrument]
    pub fn new(format: RobotFormat) -> Self {
        debug!(?format, "Creating RobotOutput");
        Self { format }
    }

    /// Output any serializable data as JSON to stdout.
    #[instrument(skip(self, data), fields(format = ?self.format))]
    fn output_json<T: Serialize + ?Sized>(&self, data: &T) {
        let json = match self.format {
            RobotFormat::Json => {
                trace!("Serializing as pretty JSON");
                serde_json::to_string_pretty(data).expect("serialization failed")
            }
            RobotFormat::JsonCompact => {
                trace!("Serializing as compact JSON");
                serde_json::to_string(data).expect("serialization failed")
            }
        };
        trace!(json_len = json.len(), "JSON serialized");
        println!("{json}");
    }

    /// Output pretty JSON to stderr (errors stay off stdout).
    #[instrument(skip(self, data))]
    fn output_json_pretty_stderr<T: Serialize>(&self, data: &T) {
        let json = serde_json::to_string_pretty(data).expect("serialization failed");
        trace!(json_len = json.len(), "JSON error serialized");
        eprintln!("{json}");
    }
}

impl Output for RobotOutput {
    #[instrument(skip(self))]
    fn success(&self, message: &str) {
        debug!(message, "Robot: success");
        self.output_json(&serde_json::json!({
            "success": true,
            "message": message
        }));
    }

    #[instrument(skip(self))]
    fn error(&self, error: &MdlError) {
        debug!(error = %error, "Robot: error");
        self.output_json_pretty_stderr(&serde_json::json!({
            "error": true,
            "message": error.to_string(),
            "line": error.line(),
            "suggestion": error.suggestion(),
            "recoverable": error.is_user_recoverable(),
        }));
    }

    #[instrument(skip(self))]
    fn warning(&self, message: &str) {
        debug!(message, "Robot: warning");
        self.output_json(&serde_json::json!({
            "warning": true,
            "message": message
        }));
    }

    #[instrument(skip(self, report), fields(valid = report.valid))]
    fn check_report(&self, report: &CheckReport) {
        debug!("Robot: check_report");
        self.output_json(report);
    }

    #[instrument(skip(self, summary), fields(path = %summary.path))]
    fn document_summary(&self, summary: &DocumentSummary) {
        debug!("Robot: document_summary");
        self.output_json(summary);
    }

    #[instrument(skip(self, value))]
    fn annotations(&self, value: &serde_yaml::Value) {
        debug!("Robot: annotations");
        self.output_json(value);
    }

    #[instrument(skip(self))]
    fn version_info(&self, version: &str) {
        debug!(version, "Robot: version_info");
        self.output_json(&serde_json::json!({
            "version": version
        }));
    }
}
