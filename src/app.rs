//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the real entry point that:
//! - parses CLI arguments and sets up logging
//! - loads configuration and credentials
//! - builds the provider clients
//! - runs the pipeline and prints the summary

use chrono::Utc;
use clap::Parser;

use crate::cli::{Cli, Command, RunArgs};
use crate::config::DashboardConfig;
use crate::data::{FredClient, YahooClient};
use crate::error::AppError;

pub mod pipeline;

use pipeline::Sources;

/// Environment variable holding the FRED API key.
pub const FRED_API_KEY_VAR: &str = "FRED_API_KEY";

/// Entry point for the `regime` binary.
pub fn run() -> Result<(), AppError> {
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);
    init_logging(cli.verbose);

    match cli.command {
        Command::Run(args) => handle_run(args, OutputMode::Dashboard),
        Command::Scores(args) => handle_run(args, OutputMode::ScoresOnly),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Dashboard,
    ScoresOnly,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    // A second init (e.g. in tests) is harmless.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .try_init();
}

fn handle_run(args: RunArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = config_from_args(&args)?;
    let api_key = fred_api_key()?;

    let fred = FredClient::new(api_key, config.retry.clone())?;
    let market = YahooClient::new(config.retry.clone())?;
    let sources = Sources {
        fred: &fred,
        market: &market,
    };

    let today = Utc::now().date_naive();
    let raw = pipeline::fetch_inputs(&config, sources, today)?;
    let analysis = pipeline::analyze(raw, &config, today)?;

    println!(
        "{}",
        crate::report::format_run_summary(analysis.span(), &analysis.raw, &analysis.scores)
    );

    if let Some(path) = &args.export_csv {
        crate::io::write_aligned_csv(path, &analysis.index, &analysis.aligned)?;
    }

    if mode == OutputMode::Dashboard {
        let path = pipeline::publish(&analysis, &config, Utc::now())?;
        println!("Successfully wrote dashboard: {}", path.display());
    }

    Ok(())
}

/// Load the config file and apply CLI overrides.
pub fn config_from_args(args: &RunArgs) -> Result<DashboardConfig, AppError> {
    let mut config = DashboardConfig::load(args.config.as_deref())?;
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(days) = args.lookback_days {
        config.start_days_ago = days;
    }
    config.validate()?;
    Ok(config)
}

/// Read the FRED key from the environment, loading `.env` first if present.
fn fred_api_key() -> Result<String, AppError> {
    dotenvy::dotenv().ok();
    match std::env::var(FRED_API_KEY_VAR) {
        Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(AppError::config(format!(
            "{FRED_API_KEY_VAR} is not set. Export it or add it to a .env file."
        ))),
    }
}

/// Rewrite argv so a bare `regime` (or `regime` followed by flags) runs the
/// full dashboard.
///
/// Rules:
/// - `regime`                          -> `regime run`
/// - `regime -o site ...`              -> `regime run -o site ...`
/// - `regime --help/--version/-h/-V`   -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "scores");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
    }
    argv
}
