//! Parsing and assembly of MDL snapshot documents.
//!
//! A snapshot document is a plain-text serialization of one moment of an
//! agent conversation: a handful of `# ...:` headers interleaved with the
//! transcript itself, which this crate treats as opaque lines.
//!
//! # Document Structure
//!
//! ````text
//! # Moment ID: 77e39706-d044-4345-afdf-61f7c729f1e3
//! # Snapshot ID: 84bcdd64-fb5f-48b6-a44a-cd3e13a65a88
//! # Timestamp: 2023-02-05T14:23:50.983374+00:00
//! # Annotations: ```
//! toxicity: 0.0004
//! ```
//! hello world
//! ````
//!
//! # Usage
//!
//! ```ignore
//! use mdl::snapshot::{Snapshot, SnapshotRecord};
//!
//! // Parse the line sequence
//! let snapshot = Snapshot::parse(&text)?;
//! println!("moment: {:?}", snapshot.moment_id());
//!
//! // Or flatten it into named fields
//! let record = SnapshotRecord::parse(&text)?;
//! if let Some(yaml) = record.annotations_yaml()? {
//!     println!("toxicity: {:?}", yaml["toxicity"]);
//! }
//!
//! // Start a new chain and extend it
//! let first = SnapshotRecord::new(vec!["Human: hi".to_string()]);
//! let second = first.successor();
//! println!("{second}");
//! ```

mod document;
mod line;
mod parser;
mod record;

pub use document::Snapshot;
pub use line::{HeaderKind, SnapshotLine, Timestamp};
pub use record::SnapshotRecord;
