//! Command-line parsing for the macro regime dashboard.
//!
//! Argument parsing and command dispatch live apart from the pipeline so the
//! core stays free of CLI concerns.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "regime", version, about = "Daily macro liquidity / risk regime dashboard (FRED + market data)")]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch, score, render charts and write the markdown dashboard.
    Run(RunArgs),
    /// Fetch and score only; print to the terminal without writing the report.
    Scores(RunArgs),
}

/// Options shared by `run` and `scores`.
#[derive(Debug, Parser, Clone, Default)]
pub struct RunArgs {
    /// JSON config file (defaults to ./config.json when present).
    #[arg(short, long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Override the output directory.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Override how many days of history to request.
    #[arg(long, value_name = "DAYS")]
    pub lookback_days: Option<u32>,

    /// Also export the aligned inputs to CSV.
    #[arg(long, value_name = "CSV")]
    pub export_csv: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_overrides() {
        let cli = Cli::parse_from(["regime", "run", "-v", "--lookback-days", "365", "-o", "site"]);
        assert!(cli.verbose);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.lookback_days, Some(365));
        assert_eq!(args.output_dir, Some(PathBuf::from("site")));
        assert!(args.config.is_none());
    }

    #[test]
    fn parses_scores_with_export() {
        let cli = Cli::parse_from(["regime", "scores", "--export-csv", "aligned.csv"]);
        assert!(!cli.verbose);
        assert!(matches!(
            cli.command,
            Command::Scores(RunArgs { export_csv: Some(ref p), .. }) if p == &PathBuf::from("aligned.csv")
        ));
    }

    #[test]
    fn rejects_non_numeric_lookback() {
        assert!(Cli::try_parse_from(["regime", "run", "--lookback-days", "soon"]).is_err());
    }
}
