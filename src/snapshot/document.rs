//! The parsed snapshot document and its field view.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::error::{MdlError, Result};
use crate::snapshot::line::{SnapshotLine, Timestamp};
use crate::snapshot::parser;
use crate::snapshot::record::SnapshotRecord;

/// One parsed MDL snapshot document.
///
/// A snapshot is a view over lines, not a struct of fields: parsing keeps
/// every line in document order and the accessors walk that sequence on
/// demand. When a header occurs more than once the last occurrence wins,
/// matching an append-oriented reading of the document.
///
/// `Display` renders the canonical form: every line in original order,
/// each closed with `\n`. For documents that already use `\n` terminators
/// and a single space after each header colon, `parse` and `Display` are
/// byte-for-byte inverses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    lines: Vec<SnapshotLine>,
}

impl Snapshot {
    /// Parse a snapshot document.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed header payload or unterminated
    /// annotation block; see [`MdlError`].
    pub fn parse(text: &str) -> Result<Self> {
        Ok(Self {
            lines: parser::parse_lines(text)?,
        })
    }

    pub(crate) fn from_lines(lines: Vec<SnapshotLine>) -> Self {
        Self { lines }
    }

    /// The parsed lines, in document order.
    #[must_use]
    pub fn lines(&self) -> &[SnapshotLine] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The moment this snapshot belongs to, if declared.
    #[must_use]
    pub fn moment_id(&self) -> Option<Uuid> {
        self.lines.iter().rev().find_map(|line| match line {
            SnapshotLine::MomentId(id) => Some(*id),
            _ => None,
        })
    }

    /// This snapshot's own identifier, if declared.
    #[must_use]
    pub fn snapshot_id(&self) -> Option<Uuid> {
        self.lines.iter().rev().find_map(|line| match line {
            SnapshotLine::SnapshotId(id) => Some(*id),
            _ => None,
        })
    }

    /// The identifier of the snapshot this one supersedes, if declared.
    #[must_use]
    pub fn previous_snapshot_id(&self) -> Option<Uuid> {
        self.lines.iter().rev().find_map(|line| match line {
            SnapshotLine::PreviousSnapshotId(id) => Some(*id),
            _ => None,
        })
    }

    /// The declared timestamp, if any.
    #[must_use]
    pub fn timestamp(&self) -> Option<&Timestamp> {
        self.lines.iter().rev().find_map(|line| match line {
            SnapshotLine::Timestamp(ts) => Some(ts),
            _ => None,
        })
    }

    /// The raw annotation body, fences excluded, if any.
    #[must_use]
    pub fn annotations(&self) -> Option<&str> {
        self.lines.iter().rev().find_map(|line| match line {
            SnapshotLine::Annotations(body) => Some(body.as_str()),
            _ => None,
        })
    }

    /// The moment body: every non-header line, in document order.
    pub fn moment_lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|line| match line {
            SnapshotLine::MomentLine(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Assemble the field view over this document.
    ///
    /// # Errors
    ///
    /// Fails with [`MdlError::MissingHeader`] when a required header is
    /// absent.
    pub fn to_record(&self) -> Result<SnapshotRecord> {
        SnapshotRecord::try_from(self)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

impl FromStr for Snapshot {
    type Err = MdlError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a SnapshotLine;
    type IntoIter = std::slice::Iter<'a, SnapshotLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
