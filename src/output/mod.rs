//! Output mode abstraction for robot and human output.

use std::path::Path;

use serde::Serialize;
use uuid::Uuid;

use crate::cli::Cli;
use crate::error::MdlError;
use crate::snapshot::Snapshot;

pub mod human;
pub mod robot;

pub use human::HumanOutput;
pub use robot::RobotOutput;

// === Check Report Types ===

/// Outcome of validating one snapshot document.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// Whether the document parsed (and, when asked, assembled) cleanly
    pub valid: bool,
    /// Path of the document, "-" for stdin
    pub path: String,
    /// Parsed line count, present when parsing succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<usize>,
    /// The issue that failed validation, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<IssueReport>,
}

impl CheckReport {
    /// Report for a document that passed.
    #[must_use]
    pub fn passed(path: &Path, snapshot: &Snapshot) -> Self {
        Self {
            valid: true,
            path: path.display().to_string(),
            lines: Some(snapshot.len()),
            error: None,
        }
    }

    /// Report for a document that failed.
    #[must_use]
    pub fn failed(path: &Path, error: &MdlError) -> Self {
        Self {
            valid: false,
            path: path.display().to_string(),
            lines: None,
            error: Some(IssueReport::from_error(error)),
        }
    }
}

/// One validation issue, with enough context to fix the document.
#[derive(Debug, Clone, Serialize)]
pub struct IssueReport {
    /// Human-readable message describing the issue
    pub message: String,
    /// 1-based line number in the source document, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Optional suggestion for fixing the issue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<&'static str>,
}

impl IssueReport {
    #[must_use]
    pub fn from_error(error: &MdlError) -> Self {
        Self {
            message: error.to_string(),
            line: error.line(),
            suggestion: error.suggestion(),
        }
    }
}

// === Document Summary ===

/// Field summary of a parsed document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    /// Path of the document, "-" for stdin
    pub path: String,
    /// Total parsed lines (an annotation block counts once)
    pub lines: usize,
    /// Lines belonging to the moment body
    pub moment_lines: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moment_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_snapshot_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub has_annotations: bool,
}

impl DocumentSummary {
    /// Summarize a parsed document. Repeated headers resolve the same way
    /// the accessors do: the last occurrence wins.
    #[must_use]
    pub fn from_snapshot(path: &Path, snapshot: &Snapshot) -> Self {
        Self {
            path: path.display().to_string(),
            lines: snapshot.len(),
            moment_lines: snapshot.moment_lines().count(),
            moment_id: snapshot.moment_id(),
            snapshot_id: snapshot.snapshot_id(),
            previous_snapshot_id: snapshot.previous_snapshot_id(),
            timestamp: snapshot.timestamp().map(|ts| ts.as_str().to_string()),
            has_annotations: snapshot.annotations().is_some(),
        }
    }
}

/// JSON formatting options for robot mode.
#[derive(Debug, Clone, Copy)]
pub enum RobotFormat {
    /// Pretty-printed JSON (default for --robot).
    Json,
    /// Single-line JSON (--format=json-compact).
    JsonCompact,
}

/// Determines how command output is rendered.
#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    /// JSON output for AI agents and scripting.
    Robot(RobotFormat),
    /// Styled terminal output for human users.
    Human,
}

impl OutputMode {
    /// Create OutputMode from CLI arguments.
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.use_json() {
            let format = if cli.use_compact_json() {
                RobotFormat::JsonCompact
            } else {
                RobotFormat::Json
            };
            Self::Robot(format)
        } else {
            Self::Human
        }
    }

    /// Convert into the appropriate Output implementation.
    #[must_use]
    pub fn into_output(self) -> Box<dyn Output> {
        match self {
            Self::Robot(format) => Box::new(RobotOutput::new(format)),
            Self::Human => Box::new(HumanOutput::new()),
        }
    }
}

/// Trait for all output operations.
///
/// Commands call these methods without knowing the output mode.
pub trait Output {
    // Basic messages
    fn success(&self, message: &str);
    fn error(&self, error: &MdlError);
    fn warning(&self, message: &str);

    // Document reports
    fn check_report(&self, report: &CheckReport);
    fn document_summary(&self, summary: &DocumentSummary);
    fn annotations(&self, value: &serde_yaml::Value);

    // Metadata
    fn version_info(&self, version: &str);
}
