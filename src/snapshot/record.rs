//! Field view over a snapshot document.
//!
//! [`SnapshotRecord`] flattens the line sequence of a [`Snapshot`] into
//! named fields for callers that do not care about line order. Assembly
//! requires the moment id, snapshot id and timestamp headers; the previous
//! snapshot id and annotations stay optional. Rendering a record produces
//! the canonical document: headers first, in fixed order, then the moment
//! body.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{MdlError, Result};
use crate::snapshot::document::Snapshot;
use crate::snapshot::line::{HeaderKind, SnapshotLine, Timestamp};

/// Named-field view of one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// The moment this snapshot belongs to.
    pub moment_id: Uuid,
    /// This snapshot's own identifier.
    pub snapshot_id: Uuid,
    /// The snapshot this one supersedes, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_snapshot_id: Option<Uuid>,
    /// When the snapshot was taken.
    pub timestamp: Timestamp,
    /// Raw annotation body, fences excluded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<String>,
    /// The moment body, one entry per line.
    #[serde(default)]
    pub moment: Vec<String>,
}

impl SnapshotRecord {
    /// Create a record for a brand new moment: fresh identifiers, current
    /// time, no predecessor.
    #[must_use]
    pub fn new(moment: Vec<String>) -> Self {
        Self {
            moment_id: Uuid::new_v4(),
            snapshot_id: Uuid::new_v4(),
            previous_snapshot_id: None,
            timestamp: Timestamp::now(),
            annotations: None,
            moment,
        }
    }

    /// Parse a document and assemble its field view in one step.
    ///
    /// # Errors
    ///
    /// Fails on parse errors and on missing required headers.
    pub fn parse(text: &str) -> Result<Self> {
        Snapshot::parse(text)?.to_record()
    }

    /// Set the raw annotation body, fences excluded.
    ///
    /// The body renders verbatim between the fences; include leading and
    /// trailing newlines for a block layout.
    pub fn with_annotations(mut self, annotations: String) -> Self {
        self.annotations = Some(annotations);
        self
    }

    /// The next snapshot of the same moment.
    ///
    /// Keeps the moment id, body and annotations, takes a fresh snapshot id
    /// and timestamp, and records this snapshot as the predecessor.
    #[must_use]
    pub fn successor(&self) -> Self {
        Self {
            moment_id: self.moment_id,
            snapshot_id: Uuid::new_v4(),
            previous_snapshot_id: Some(self.snapshot_id),
            timestamp: Timestamp::now(),
            annotations: self.annotations.clone(),
            moment: self.moment.clone(),
        }
    }

    /// Parse the annotation body as YAML.
    ///
    /// Returns `Ok(None)` when the record carries no annotations; an empty
    /// body parses as YAML null.
    pub fn annotations_yaml(&self) -> Result<Option<serde_yaml::Value>> {
        match &self.annotations {
            None => Ok(None),
            Some(raw) => Ok(Some(serde_yaml::from_str(raw)?)),
        }
    }

    /// Rebuild the canonical line sequence for this record.
    #[must_use]
    pub fn to_snapshot(&self) -> Snapshot {
        let mut lines = Vec::with_capacity(4 + self.moment.len());
        lines.push(SnapshotLine::MomentId(self.moment_id));
        lines.push(SnapshotLine::SnapshotId(self.snapshot_id));
        if let Some(previous) = self.previous_snapshot_id {
            lines.push(SnapshotLine::PreviousSnapshotId(previous));
        }
        lines.push(SnapshotLine::Timestamp(self.timestamp.clone()));
        if let Some(annotations) = &self.annotations {
            lines.push(SnapshotLine::Annotations(annotations.clone()));
        }
        lines.extend(self.moment.iter().cloned().map(SnapshotLine::MomentLine));
        Snapshot::from_lines(lines)
    }
}

impl TryFrom<&Snapshot> for SnapshotRecord {
    type Error = MdlError;

    fn try_from(snapshot: &Snapshot) -> Result<Self> {
        let moment_id = snapshot.moment_id().ok_or(MdlError::MissingHeader {
            header: HeaderKind::MomentId,
        })?;
        let snapshot_id = snapshot.snapshot_id().ok_or(MdlError::MissingHeader {
            header: HeaderKind::SnapshotId,
        })?;
        let timestamp = snapshot
            .timestamp()
            .cloned()
            .ok_or(MdlError::MissingHeader {
                header: HeaderKind::Timestamp,
            })?;
        debug!(%moment_id, %snapshot_id, "Assembled snapshot record");
        Ok(Self {
            moment_id,
            snapshot_id,
            previous_snapshot_id: snapshot.previous_snapshot_id(),
            timestamp,
            annotations: snapshot.annotations().map(str::to_string),
            moment: snapshot.moment_lines().map(str::to_string).collect(),
        })
    }
}

impl fmt::Display for SnapshotRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_snapshot().fmt(f)
    }
}
