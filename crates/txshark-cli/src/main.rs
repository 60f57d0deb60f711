//! txshark command-line interface.
//!
//! Analyzes a TCP capture of Ydb.Table gRPC traffic and prints the latency
//! breakdown of the committed transactions: wall time per transaction,
//! server share, client-and-network share, and per-query latencies, with
//! percentile tables over the whole capture.
//!
//! Typical usage:
//! - `txshark capture.pcap`
//! - `txshark capture.pcap --all-types --print-all-transactions`
//! - `txshark capture.pcap --skip 1000 -n 500000 --report report.json`
//!
//! The report goes to stdout; diagnostics go to stderr. A non-zero exit
//! code indicates an unreadable capture, a malformed frame, or a protocol
//! invariant violation; partial data at end of capture is not an error.
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use txshark_core::{AnalyzeOptions, TransactionFilter, analyze_capture_file, render_text};

#[derive(Parser, Debug)]
#[command(name = "txshark")]
#[command(version)]
#[command(
    about = "Offline analyzer for YDB transaction latency in TCP captures.",
    long_about = None,
    after_help = "Examples:\n  txshark capture.pcap\n  txshark capture.pcap --all-types --top 10\n  txshark capture.pcap --skip 1000 -n 500000 --report report.json"
)]
struct Cli {
    /// Path to a .pcap or .pcapng capture
    input: PathBuf,

    /// Stop after decoding N frames
    #[arg(short = 'n', long = "number", value_name = "N")]
    number: Option<u64>,

    /// Discard the first N frames without decoding them
    #[arg(long, value_name = "N", default_value_t = 0)]
    skip: u64,

    /// Do not truncate the ranked transaction list
    #[arg(long)]
    print_all_transactions: bool,

    /// Track every transaction type instead of NewOrder only
    #[arg(long)]
    all_types: bool,

    /// Ranked transaction list length
    #[arg(long, value_name = "N", default_value_t = 50)]
    top: usize,

    /// Also write the report as JSON
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Per-transaction state transition diagnostics
    #[arg(long)]
    debug: bool,

    /// Per-frame decoding diagnostics
    #[arg(long, conflicts_with = "debug")]
    trace: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug, cli.trace);

    match run(cli) {
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

fn init_logging(debug: bool, trace: bool) {
    let level = if trace {
        "trace"
    } else if debug {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!(
            "warn,txshark_core={level},txshark={level}"
        )))
        .with_writer(std::io::stderr)
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
        CliError::new(err.to_string(), None)
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if !cli.input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", cli.input.display()),
            Some("pass a .pcap or .pcapng capture".to_string()),
        ));
    }

    let options = AnalyzeOptions {
        skip: cli.skip,
        limit: cli.number,
        filter: if cli.all_types {
            TransactionFilter::All
        } else {
            TransactionFilter::new_order()
        },
    };

    let report = analyze_capture_file(&cli.input, &options)
        .map_err(|err| CliError::new(format!("capture analysis failed: {err}"), None))?;

    let top_n = if cli.print_all_transactions {
        None
    } else {
        Some(cli.top)
    };
    print!("{}", render_text(&report, top_n));

    if let Some(path) = cli.report.as_ref() {
        let json = serde_json::to_string_pretty(&report).context("JSON serialization failed")?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
        }
        fs::write(path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        eprintln!("OK: report written -> {}", path.display());
    }

    Ok(())
}
