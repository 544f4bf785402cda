use std::path::Path;

use anyhow::{Context, Result};
use budget_core::{
    BalanceSummary, BudgetView, DeductionCalculator, DeductionConfig, DeductionError,
    ResolvedPeriods, SalaryBreakdown, Transaction, ViewMode, aggregate_balance,
    compose_budget_view, resolve_periods,
};
use budget_data::{Settings, TransactionLoader, newest_first};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::{debug, info};

/// How many of the latest transactions the report lists.
pub const RECENT_LIMIT: usize = 5;

/// Everything the report renders, computed for one "now".
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub currency: String,
    pub withholding_rate: Decimal,
    pub periods: ResolvedPeriods,
    pub salary: SalaryBreakdown,
    pub balances: BalanceSummary,
    pub view: BudgetView,
    /// Most recent first, at most [`RECENT_LIMIT`].
    pub recent: Vec<Transaction>,
}

/// Runs the calculation pipeline over already-loaded inputs.
///
/// # Errors
///
/// Returns [`DeductionError`] if the salary is negative or `config` is
/// invalid.
pub fn build_dashboard(
    settings: &Settings,
    config: DeductionConfig,
    mut transactions: Vec<Transaction>,
    now: NaiveDateTime,
    view_mode: ViewMode,
) -> Result<Dashboard, DeductionError> {
    config.validate()?;
    let calculator = DeductionCalculator::new(config);
    let salary = calculator.breakdown(settings.monthly_salary)?;

    let periods = resolve_periods(now);
    let balances = aggregate_balance(&transactions, &periods);
    let view = compose_budget_view(&salary.monthly, &balances, view_mode, &periods);

    newest_first(&mut transactions);
    transactions.truncate(RECENT_LIMIT);

    Ok(Dashboard {
        currency: settings.currency.clone(),
        withholding_rate: calculator.config().withholding_rate,
        periods,
        salary,
        balances,
        view,
        recent: transactions,
    })
}

/// Loads the settings and transaction files, then builds the dashboard.
pub fn load_dashboard(
    settings_path: &Path,
    transactions_path: &Path,
    now: NaiveDateTime,
    view_mode: ViewMode,
) -> Result<Dashboard> {
    let settings = Settings::load(settings_path)
        .with_context(|| format!("loading settings from '{}'", settings_path.display()))?;
    let base_dir = settings_path.parent().unwrap_or_else(|| Path::new("."));
    let config = settings
        .deduction_config(base_dir)
        .context("building deduction settings")?;

    let transactions = TransactionLoader::load_from_file(transactions_path).with_context(|| {
        format!(
            "loading transactions from '{}'",
            transactions_path.display()
        )
    })?;
    info!(
        count = transactions.len(),
        "loaded transactions from {}",
        transactions_path.display()
    );

    debug!(%now, mode = %view_mode, "building dashboard");
    let dashboard = build_dashboard(&settings, config, transactions, now, view_mode)
        .context("calculating salary deductions")?;
    Ok(dashboard)
}
