//! MDL library - Parse, inspect and author Moment Definition Language snapshots.
//!
//! This library exposes the core functionality of the `mdl` CLI for use in
//! tests and potentially other applications.
//!
//! # Modules
//!
//! - `snapshot`: The MDL document model, parser and record assembly
//! - `error`: Error types with user-recoverable hints
//! - `output`: Output mode abstraction (robot/human)
//! - `cli`: Command-line argument definitions
//! - `logging`: Tracing subscriber setup
#![forbid(unsafe_code)]

pub mod cli;
pub mod error;
pub mod logging;
pub mod output;
pub mod snapshot;
