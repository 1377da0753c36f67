//! MDL CLI - Parse, validate and author Moment Definition Language snapshots.
//!
//! Provides both human-friendly and agent-friendly (robot mode) interfaces.
#![forbid(unsafe_code)]

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use console::style;
use serde::Serialize;

use mdl::cli::{self, Cli, Commands};
use mdl::error::{MdlError, Result, ResultExt};
use mdl::logging;
use mdl::output::{CheckReport, DocumentSummary, Output, OutputMode};
use mdl::snapshot::{HeaderKind, Snapshot, SnapshotRecord};

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Handle no-color flag or non-TTY
    if cli.no_color || !io::stdout().is_terminal() {
        console::set_colors_enabled(false);
    }

    logging::init_logging(cli.use_json(), u8::from(cli.verbose), cli.quiet);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            output_error(&cli, &e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    match &cli.command {
        None => print_quick_start(cli),
        Some(Commands::Check(args)) => cmd_check(cli, args),
        Some(Commands::Show(args)) => cmd_show(cli, args),
        Some(Commands::Fmt(args)) => cmd_fmt(cli, args),
        Some(Commands::New(args)) => cmd_new(cli, args),
        Some(Commands::Next(args)) => cmd_next(cli, args),
        Some(Commands::Version) => cmd_version(cli),
        Some(Commands::Completions(args)) => cmd_completions(cli, args),
    }
}

// === Quick Start (Robot Mode Optimized) ===

/// Prints quick-start help optimized for both humans and AI agents.
#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn print_quick_start(cli: &Cli) -> Result<ExitCode> {
    if cli.use_json() {
        print_robot_quick_start();
    } else {
        print_human_quick_start();
    }
    Ok(ExitCode::SUCCESS)
}

fn print_robot_quick_start() {
    let help = RobotQuickStart {
        tool: "mdl",
        version: build_info::VERSION,
        description: "Moment Definition Language snapshot CLI with robot mode for AI agents",
        validation: RobotValidation {
            check_file: "mdl check <FILE> --robot",
            check_stdin: "cat doc.mdl | mdl check - --robot",
            check_record: "mdl check <FILE> --record --robot",
        },
        inspection: RobotInspection {
            show_summary: "mdl show <FILE> --robot",
            show_annotations: "mdl show <FILE> --annotations --robot",
            canonical_form: "mdl fmt <FILE>",
        },
        authoring: RobotAuthoring {
            new_snapshot: "mdl new --moment <FILE> --robot",
            next_snapshot: "mdl next <FILE> --robot",
        },
        document_layout: DocumentLayout {
            note: "Headers open with '# <Name>: ' at the start of a line; every other line belongs to the moment body",
            headers: "Moment ID, Snapshot ID, Previous Snapshot ID, Timestamp, Annotations",
        },
        output_modes: OutputModes {
            human: "--format=text (default)",
            robot: "--robot or --format=json",
            compact: "--format=json-compact",
        },
    };

    println!("{}", serde_json::to_string_pretty(&help).unwrap());
}

fn print_human_quick_start() {
    println!(
        "{} {} - Moment Definition Language snapshots\n",
        style("mdl").bold().cyan(),
        build_info::VERSION
    );

    println!("{}", style("QUICK START").bold().underlined());
    println!();

    println!("  {}  Validate a document", style("mdl check doc.mdl").green());
    println!("  {}  Field summary", style("mdl show doc.mdl").green());
    println!("  {}  Annotations as YAML", style("mdl show doc.mdl -a").green());
    println!("  {}  Canonical form", style("mdl fmt doc.mdl").green());
    println!("  {}  Author a snapshot", style("mdl new -m moment.txt").green());
    println!("  {}  Chain a successor", style("mdl next doc.mdl").green());
    println!();

    println!("{}", style("ROBOT MODE (for AI agents)").bold().underlined());
    println!();
    println!("  {}  JSON output", style("mdl --robot <command>").cyan());
    println!("  {}  Quick-start JSON", style("mdl --robot").cyan());
    println!();

    println!("{}", style("DOCUMENT LAYOUT").bold().underlined());
    println!();
    println!("  # Moment ID: 77e39706-d044-4345-afdf-61f7c729f1e3");
    println!("  # Snapshot ID: 84bcdd64-fb5f-48b6-a44a-cd3e13a65a88");
    println!("  # Timestamp: 2023-02-05T14:23:50.983374+00:00");
    println!("  # Annotations: ```");
    println!("  toxicity: 0.0004");
    println!("  ```");
    println!("  hello world");
    println!();

    println!("Run {} for full help", style("mdl --help").yellow());
}

// === Robot Mode JSON Structures ===

#[derive(Serialize)]
struct RobotQuickStart {
    tool: &'static str,
    version: &'static str,
    description: &'static str,
    validation: RobotValidation,
    inspection: RobotInspection,
    authoring: RobotAuthoring,
    document_layout: DocumentLayout,
    output_modes: OutputModes,
}

#[derive(Serialize)]
struct RobotValidation {
    check_file: &'static str,
    check_stdin: &'static str,
    check_record: &'static str,
}

#[derive(Serialize)]
struct RobotInspection {
    show_summary: &'static str,
    show_annotations: &'static str,
    canonical_form: &'static str,
}

#[derive(Serialize)]
struct RobotAuthoring {
    new_snapshot: &'static str,
    next_snapshot: &'static str,
}

#[derive(Serialize)]
struct DocumentLayout {
    note: &'static str,
    headers: &'static str,
}

#[derive(Serialize)]
struct OutputModes {
    human: &'static str,
    robot: &'static str,
    compact: &'static str,
}

// === Command Implementations ===

fn cmd_check(cli: &Cli, args: &cli::CheckArgs) -> Result<ExitCode> {
    let text = read_input(&args.file)?;
    let output = OutputMode::from_cli(cli).into_output();

    let report = match Snapshot::parse(&text) {
        Ok(snapshot) => {
            if args.record {
                match snapshot.to_record() {
                    Ok(_) => CheckReport::passed(&args.file, &snapshot),
                    Err(e) => CheckReport::failed(&args.file, &e),
                }
            } else {
                CheckReport::passed(&args.file, &snapshot)
            }
        }
        Err(e) => CheckReport::failed(&args.file, &e),
    };

    output.check_report(&report);
    Ok(if report.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn cmd_show(cli: &Cli, args: &cli::ShowArgs) -> Result<ExitCode> {
    let text = read_input(&args.file)?;
    let snapshot = Snapshot::parse(&text)?;
    let output = OutputMode::from_cli(cli).into_output();

    if args.annotations {
        match snapshot.annotations() {
            Some(body) => {
                let value: serde_yaml::Value = serde_yaml::from_str(body)?;
                output.annotations(&value);
            }
            None => output.warning(&format!(
                "{} carries no annotations",
                args.file.display()
            )),
        }
    } else {
        output.document_summary(&DocumentSummary::from_snapshot(&args.file, &snapshot));
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_fmt(cli: &Cli, args: &cli::FmtArgs) -> Result<ExitCode> {
    let text = read_input(&args.file)?;
    let snapshot = Snapshot::parse(&text)?;
    let canonical = snapshot.to_string();

    if args.check {
        let output = OutputMode::from_cli(cli).into_output();
        if canonical == text {
            if !cli.quiet {
                output.success(&format!("{} is in canonical form", args.file.display()));
            }
            return Ok(ExitCode::SUCCESS);
        }
        output.warning(&format!(
            "{} is not in canonical form",
            args.file.display()
        ));
        return Ok(ExitCode::FAILURE);
    }

    print!("{canonical}");
    Ok(ExitCode::SUCCESS)
}

fn cmd_new(cli: &Cli, args: &cli::NewArgs) -> Result<ExitCode> {
    let moment: Vec<String> = match &args.moment {
        Some(path) => read_input(path)?.lines().map(str::to_string).collect(),
        None => Vec::new(),
    };

    // A body line opening with a header prefix would be read back as that
    // header, silently changing the document's meaning.
    for (idx, line) in moment.iter().enumerate() {
        if let Some(kind) = HeaderKind::ALL.iter().find(|k| line.starts_with(k.prefix())) {
            return Err(MdlError::Other(format!(
                "moment line {} starts with '{}' and would be read back as a {} header",
                idx + 1,
                kind.prefix(),
                kind
            )));
        }
    }

    let mut record = SnapshotRecord::new(moment);
    if let Some(yaml) = &args.annotations {
        if yaml.contains("```") {
            return Err(MdlError::Other(
                "annotations may not contain a ``` fence".to_string(),
            ));
        }
        // Reject YAML that would fail every later read.
        serde_yaml::from_str::<serde_yaml::Value>(yaml)?;
        record = record.with_annotations(format!("\n{}\n", yaml.trim_end()));
    }

    output_record(cli, &record);
    Ok(ExitCode::SUCCESS)
}

fn cmd_next(cli: &Cli, args: &cli::NextArgs) -> Result<ExitCode> {
    let text = read_input(&args.file)?;
    let record = SnapshotRecord::parse(&text)?;
    let next = record.successor();

    output_record(cli, &next);
    Ok(ExitCode::SUCCESS)
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_version(cli: &Cli) -> Result<ExitCode> {
    let output = OutputMode::from_cli(cli).into_output();
    output.version_info(build_info::VERSION);
    Ok(ExitCode::SUCCESS)
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_completions(_cli: &Cli, args: &cli::CompletionsArgs) -> Result<ExitCode> {
    use clap::CommandFactory;
    clap_complete::generate(args.shell, &mut Cli::command(), "mdl", &mut io::stdout());
    Ok(ExitCode::SUCCESS)
}

// === Utility Functions ===

/// Read a document from a file, or stdin when the path is "-".
fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}

/// Print an authored record: the document text for humans, the document
/// plus its parsed fields for robots.
fn output_record(cli: &Cli, record: &SnapshotRecord) {
    if cli.use_json() {
        output_json(
            cli,
            &serde_json::json!({
                "document": record.to_string(),
                "record": record,
            }),
        );
    } else {
        print!("{record}");
    }
}

fn output_json<T: Serialize>(cli: &Cli, data: &T) {
    let json = if cli.use_compact_json() {
        serde_json::to_string(data).unwrap()
    } else {
        serde_json::to_string_pretty(data).unwrap()
    };
    println!("{json}");
}

fn output_error(cli: &Cli, error: &MdlError) {
    OutputMode::from_cli(cli).into_output().error(error);
}
