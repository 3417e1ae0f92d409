//! flowtag entry point.
//!
//! Loads the lookup table, classifies the flow log and writes the report.
//! Any fatal error is logged and turns into a non-zero exit status.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use flowtag::{FlowLogAnalyzer, FlowTagConfig, TracingSink};

/// Tag and count flow log records using a port/protocol lookup table
#[derive(Parser, Debug)]
#[command(name = "flowtag")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Lookup table CSV (dstport,protocol,tag)
    lookup_table: PathBuf,

    /// Flow log file
    flow_log: PathBuf,

    /// Output report file
    output: PathBuf,

    /// Inputs have no header line
    #[arg(long)]
    no_headers: bool,

    /// Configuration file (TOML)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

/// Initialize tracing/logging. RUST_LOG takes precedence over --log-level.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> anyhow::Result<FlowTagConfig> {
    let config = match &args.config {
        Some(path) => FlowTagConfig::load(path)?,
        None => FlowTagConfig::load_default()?,
    };

    if args.no_headers {
        Ok(config.with_headers(false))
    } else {
        Ok(config)
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = load_config(args).context("Failed to load configuration")?;
    info!("Header lines: {}", if config.has_headers { "skipped" } else { "none" });

    let mut sink = TracingSink;
    let analyzer = FlowLogAnalyzer::from_lookup_file(&args.lookup_table, config, &mut sink)
        .context("Error loading lookup table")?;

    let result = analyzer
        .analyze_file(&args.flow_log, &mut sink)
        .context("Error processing flow log")?;

    analyzer
        .write_results(&args.output, &result)
        .context("Error writing results")?;

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level);

    match run(&args) {
        Ok(()) => {
            info!(
                "Analysis complete. Results written to {}",
                args.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
