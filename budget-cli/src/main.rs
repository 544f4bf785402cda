use std::path::PathBuf;

use anyhow::Context;
use budget_cli::{app, logging, utils};
use budget_core::ViewMode;
use chrono::{Local, NaiveDateTime};
use clap::Parser;
use tracing::debug;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Salary deductions and period budget for a personal finance tracker.
///
/// Reads the user's salary settings and transaction history, then prints the
/// salary breakdown, the month and biweekly balances, and how much is left to
/// spend per day.
#[derive(Debug, Parser)]
#[command(name = "budget", version)]
struct Cli {
    /// Settings file (TOML) holding the monthly salary.
    #[arg(long, short = 's')]
    settings: PathBuf,

    /// Transactions file (CSV).
    #[arg(long, short = 't')]
    transactions: PathBuf,

    /// Evaluate as of this local date-time instead of the wall clock,
    /// e.g. `2025-06-10T18:30:00` or `2025-06-10`.
    #[arg(long, value_parser = utils::parse_now)]
    now: Option<NaiveDateTime>,

    /// Budget period: `monthly` or `biweekly`.
    #[arg(long, default_value = "monthly")]
    view: ViewMode,

    /// Log filter, e.g. `debug` or `budget_core=trace`. Overrides RUST_LOG.
    #[arg(long)]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())
        .context("initializing logging")?;

    let now = cli.now.unwrap_or_else(|| Local::now().naive_local());
    debug!(%now, view = %cli.view, "starting");

    let dashboard = app::load_dashboard(&cli.settings, &cli.transactions, now, cli.view)?;
    print!("{dashboard}");

    Ok(())
}
