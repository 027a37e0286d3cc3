use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use glob::glob;
use irshark_core::{AnalysisOptions, DetailLevel, Report};
use tracing::{Level, debug};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("IRSHARK_BUILD_COMMIT"),
    ", ",
    env!("IRSHARK_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "irshark")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Offline decoder for IrDA captures (IrLAP, IrLMP, IAS, Tiny TP, IrCOMM, IrLPT).",
    long_about = None,
    after_help = "Examples:\n  irshark pcap analyse irda.pcapng -o report.json\n  irshark pcap analyze irda.pcap --stdout --summary-only\n  irshark pcap analyse irda.pcapng --stdout --frame 12 --pretty"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on PCAP/PCAPNG inputs.
    Pcap {
        #[command(subcommand)]
        command: PcapCommands,
    },
}

#[derive(Subcommand, Debug)]
enum PcapCommands {
    /// Decode an IrDA capture and write a versioned JSON report.
    #[command(alias = "analyze")]
    #[command(
        after_help = "Examples:\n  irshark pcap analyse irda.pcapng -o report.json\n  irshark pcap analyze irda.pcap --stdout --summary-only\n  irshark pcap analyse irda.pcapng --stdout --frame 12 --pretty"
    )]
    Analyse {
        /// Path to a .pcap or .pcapng file
        input: PathBuf,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,

        /// Exit with a non-zero code if malformed frames are present
        #[arg(long)]
        strict: bool,

        /// List malformed frames after analysis
        #[arg(long)]
        list_malformed: bool,

        /// Omit per-frame field trees
        #[arg(long)]
        summary_only: bool,

        /// Only list this frame number (repeatable)
        #[arg(long = "frame", value_name = "N")]
        frames: Vec<u32>,

        /// Increase log verbosity (-v info, -vv debug)
        #[arg(short, long, action = ArgAction::Count)]
        verbose: u8,
    },
}

struct AnalyseArgs {
    input: PathBuf,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    quiet: bool,
    strict: bool,
    list_malformed: bool,
    options: AnalysisOptions,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Pcap { command } => match command {
            PcapCommands::Analyse {
                input,
                report,
                stdout,
                pretty,
                compact,
                quiet,
                strict,
                list_malformed,
                summary_only,
                frames,
                verbose,
            } => {
                init_tracing(quiet, verbose);
                let detail = if summary_only {
                    DetailLevel::SummaryOnly
                } else {
                    DetailLevel::Full
                };
                cmd_pcap_analyse(AnalyseArgs {
                    input,
                    report,
                    stdout,
                    pretty,
                    compact,
                    quiet,
                    strict,
                    list_malformed,
                    options: AnalysisOptions {
                        detail,
                        frames: (!frames.is_empty()).then_some(frames),
                    },
                })
            }
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn log_level(quiet: bool, verbose: u8) -> Level {
    match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::WARN,
        (false, 1) => Level::INFO,
        (false, _) => Level::DEBUG,
    }
}

fn init_tracing(quiet: bool, verbose: u8) {
    tracing_subscriber::fmt()
        .with_max_level(log_level(quiet, verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

fn cmd_pcap_analyse(args: AnalyseArgs) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&args.input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;
    let report_path = if args.stdout {
        None
    } else {
        Some(args.report.clone().ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?)
    };

    if let Some(report_path) = report_path.as_ref() {
        let report_abs = report_path
            .parent()
            .map(|parent| {
                if parent.as_os_str().is_empty() {
                    fs::canonicalize(".")
                } else {
                    fs::canonicalize(parent)
                }
            })
            .transpose()
            .with_context(|| format!("Failed to resolve output path: {}", report_path.display()))?;
        if let Some(report_dir) = report_abs {
            let report_target = report_dir.join(
                report_path
                    .file_name()
                    .ok_or_else(|| anyhow::anyhow!("Invalid report path"))?,
            );
            if report_target == input_abs {
                return Err(CliError::new(
                    format!(
                        "report path must differ from input: {}",
                        report_path.display()
                    ),
                    Some("choose a different output path".to_string()),
                ));
            }
        }
    }

    let meta = fs::metadata(&resolved_input)
        .with_context(|| format!("Failed to read input file: {}", resolved_input.display()))?;
    if !meta.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", args.input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }

    debug!(input = %resolved_input.display(), "analysing capture");
    let rep = irshark_core::analyze_pcap_file_with(&resolved_input, &args.options)
        .context("PCAP/PCAPNG analysis failed")?;
    check_requested_frames(&rep, &args.options)?;
    let json = serialize_report(&rep, args.pretty, args.compact)?;

    match report_path {
        None => print!("{}", json),
        Some(report) => {
            if let Some(parent) = report.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            fs::write(&report, json)
                .with_context(|| format!("Failed to write report: {}", report.display()))?;
            if !args.quiet {
                eprintln!("OK: report written -> {}", report.display());
            }
        }
    }

    if args.list_malformed && !args.quiet {
        print_malformed(&rep);
    }
    if args.strict && malformed_count(&rep) > 0 {
        return Err(CliError::new(
            format!("{} malformed frame(s) detected", malformed_count(&rep)),
            Some("use --list-malformed to inspect".to_string()),
        ));
    }
    Ok(())
}

/// `--frame` numbers must name IrLAP frames of the capture.
fn check_requested_frames(rep: &Report, options: &AnalysisOptions) -> Result<(), CliError> {
    let Some(requested) = options.frames.as_ref() else {
        return Ok(());
    };
    let missing: Vec<String> = requested
        .iter()
        .filter(|number| !rep.frames.iter().any(|frame| frame.number == **number))
        .map(|number| number.to_string())
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(CliError::new(
        format!("no IrLAP frame numbered {}", missing.join(", ")),
        Some("frame numbers are 1-based positions in the capture file".to_string()),
    ))
}

fn serialize_report(rep: &Report, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn malformed_count(rep: &Report) -> u64 {
    rep.capture_summary
        .as_ref()
        .map(|summary| summary.malformed_frames)
        .unwrap_or(0)
}

fn print_malformed(rep: &Report) {
    eprintln!("Malformed frames:");
    for frame in rep.frames.iter().filter(|frame| frame.malformed) {
        eprintln!("  #{} {}: {}", frame.number, frame.protocol, frame.info);
    }
}

fn validate_input_file(input: &PathBuf) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "pcap" && ext != "pcapng" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .pcap or .pcapng file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &PathBuf) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.clone());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .pcap or .pcapng".to_string()),
        ));
    }
    if matches.len() > 1 {
        let shown: Vec<String> = matches
            .iter()
            .take(3)
            .map(|path| path.display().to_string())
            .collect();
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                shown.join(", "),
                more
            ),
            Some("pass a single capture file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
