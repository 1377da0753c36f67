//! Error types for MDL snapshot operations.

use thiserror::Error;

use crate::snapshot::HeaderKind;

/// Primary error type for snapshot parsing and assembly.
#[derive(Error, Debug)]
pub enum MdlError {
    // Parse errors
    #[error("line {line}: malformed {header} header: {expected}")]
    MalformedHeader {
        line: usize,
        header: HeaderKind,
        expected: String,
    },

    #[error("line {line}: annotation block opened with ``` is never closed")]
    UnterminatedAnnotations { line: usize },

    // Assembly errors
    #[error("document has no {header} header")]
    MissingHeader { header: HeaderKind },

    #[error("annotations are not valid YAML: {0}")]
    AnnotationsYaml(#[from] serde_yaml::Error),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl MdlError {
    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MalformedHeader { .. }
                | Self::UnterminatedAnnotations { .. }
                | Self::MissingHeader { .. }
                | Self::AnnotationsYaml(_)
        )
    }

    /// Line number (1-based) in the source document, for errors that carry one.
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedHeader { line, .. } | Self::UnterminatedAnnotations { line } => {
                Some(*line)
            }
            _ => None,
        }
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::MalformedHeader { header, .. } => match header {
                HeaderKind::MomentId | HeaderKind::SnapshotId | HeaderKind::PreviousSnapshotId => {
                    Some("UUID payloads are lowercase 8-4-4-4-12 hex, e.g. 77e39706-d044-4345-afdf-61f7c729f1e3")
                }
                HeaderKind::Timestamp => {
                    Some("Timestamps are ISO-8601, e.g. 2023-02-05T14:23:50.983374+00:00")
                }
                HeaderKind::Annotations => {
                    Some("Open the block with ``` right after the colon and close it with a matching ```")
                }
            },
            Self::UnterminatedAnnotations { .. } => {
                Some("Add a closing ``` fence before the end of the document")
            }
            Self::MissingHeader { .. } => {
                Some("A snapshot needs # Moment ID:, # Snapshot ID: and # Timestamp: headers")
            }
            _ => None,
        }
    }
}

/// Convenience type alias for Results using MdlError.
pub type Result<T> = std::result::Result<T, MdlError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: std::error::Error> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| MdlError::Other(format!("{}: {e}", f().into())))
    }
}
