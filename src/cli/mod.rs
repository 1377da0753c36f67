//! CLI argument definitions and command dispatch.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// MDL CLI - Parse, validate and inspect Moment Definition Language snapshots.
///
/// Robot Mode: Use --robot or --json for machine-parseable output optimized for AI agents.
#[derive(Parser, Debug)]
#[command(name = "mdl", version, about, long_about = None)]
#[command(propagate_version = true)]
#[allow(clippy::struct_excessive_bools)] // CLI flags naturally use multiple bools
pub struct Cli {
    /// Output format (text for humans, json for agents/scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "MDL_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json (optimized for AI agents)
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose output (show debug information)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Quiet mode (suppress non-essential output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts and agents
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // === Validation & Inspection ===
    /// Validate a snapshot document against the MDL grammar
    Check(CheckArgs),

    /// Show the parsed fields of a snapshot document
    Show(ShowArgs),

    /// Rewrite a snapshot document in canonical form
    Fmt(FmtArgs),

    // === Authoring ===
    /// Create a snapshot for a brand new moment
    New(NewArgs),

    /// Derive the successor snapshot of an existing document
    Next(NextArgs),

    // === Utilities ===
    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// === Argument Structs ===

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Snapshot document to validate (use "-" for stdin)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Also require the Moment ID, Snapshot ID and Timestamp headers
    #[arg(long, short = 'r')]
    pub record: bool,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Snapshot document to inspect (use "-" for stdin)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the annotations parsed as YAML instead of the summary
    #[arg(long, short = 'a')]
    pub annotations: bool,
}

#[derive(Parser, Debug)]
pub struct FmtArgs {
    /// Snapshot document to format (use "-" for stdin)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Check whether the document is already canonical; exit nonzero when not
    #[arg(long, short = 'c')]
    pub check: bool,
}

#[derive(Parser, Debug)]
pub struct NewArgs {
    /// File holding the moment body (use "-" for stdin); empty without it
    #[arg(long, short = 'm', value_name = "FILE")]
    pub moment: Option<PathBuf>,

    /// Inline YAML to embed as the annotation block
    #[arg(long, short = 'a', value_name = "YAML")]
    pub annotations: Option<String>,
}

#[derive(Parser, Debug)]
pub struct NextArgs {
    /// Snapshot document to supersede (use "-" for stdin)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
