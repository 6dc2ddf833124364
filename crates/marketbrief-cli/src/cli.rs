//! CLI argument definitions for marketbrief.
//!
//! Two run modes:
//!
//! | Command  | Description |
//! |----------|-------------|
//! | `report` | Build the market-summary report and email it |
//! | `watch`  | Check every instrument for a large intraday move |
//!
//! ```bash
//! # Email the daily summary for the default watchlist
//! marketbrief report --catalog watchlist.csv
//!
//! # Include 3-month changes and inline charts
//! marketbrief report --horizons 1d,1w,1mo,3mo --charts
//!
//! # Print the plain-text rendering instead of sending
//! marketbrief report --dry-run
//!
//! # Alert on intraday moves of 2% or more (cron-friendly)
//! marketbrief watch --threshold 2.0
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use marketbrief_core::{Horizon, MissingRowPolicy};

/// Emails a periodic market-summary report for a CSV watchlist, or
/// watches the same watchlist for large intraday moves.
#[derive(Debug, Parser)]
#[command(name = "marketbrief", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the summary report and email it.
    Report(ReportArgs),
    /// Evaluate every instrument once against an intraday threshold.
    Watch(WatchArgs),
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Path to the watchlist CSV.
    #[arg(long, default_value = "watchlist.csv")]
    pub catalog: PathBuf,

    /// Comma-separated change columns to render, in order.
    #[arg(long, value_delimiter = ',', default_values_t = vec![
        HorizonArg::OneDay,
        HorizonArg::OneWeek,
        HorizonArg::OneMonth,
    ])]
    pub horizons: Vec<HorizonArg>,

    /// Embed inline chart images for instruments with a chart ticker.
    #[arg(long, default_value_t = false)]
    pub charts: bool,

    /// What to do with instruments whose data could not be fetched.
    #[arg(long, value_enum, default_value_t = FailurePolicy::Placeholder)]
    pub on_failure: FailurePolicy,

    /// Color gains green and losses red instead of the default
    /// red-gain convention.
    #[arg(long, default_value_t = false)]
    pub green_up: bool,

    /// Print the plain-text rendering to stdout instead of sending
    /// mail. Mail settings are not required in this mode.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Path to the watchlist CSV.
    #[arg(long, default_value = "watchlist.csv")]
    pub catalog: PathBuf,

    /// Intraday move threshold in percent; only the magnitude matters.
    #[arg(long)]
    pub threshold: f64,

    /// Print triggered alerts to stdout instead of sending mail.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

/// Horizon spelling accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HorizonArg {
    #[value(name = "1d")]
    OneDay,
    #[value(name = "1w")]
    OneWeek,
    #[value(name = "1mo")]
    OneMonth,
    #[value(name = "3mo")]
    ThreeMonth,
}

impl std::fmt::Display for HorizonArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(Horizon::from(*self).as_str())
    }
}

impl From<HorizonArg> for Horizon {
    fn from(value: HorizonArg) -> Self {
        match value {
            HorizonArg::OneDay => Self::OneDay,
            HorizonArg::OneWeek => Self::OneWeek,
            HorizonArg::OneMonth => Self::OneMonth,
            HorizonArg::ThreeMonth => Self::ThreeMonth,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailurePolicy {
    /// Keep the instrument visible as an N/A row.
    Placeholder,
    /// Drop the instrument from the report.
    Skip,
}

impl From<FailurePolicy> for MissingRowPolicy {
    fn from(value: FailurePolicy) -> Self {
        match value {
            FailurePolicy::Placeholder => Self::Placeholder,
            FailurePolicy::Skip => Self::Skip,
        }
    }
}
