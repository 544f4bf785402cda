//! Period-adjusted budget view combining net salary and period balances.
//!
//! # Apportionment
//!
//! In [`ViewMode::Biweekly`] the view does **not** use the expenses actually
//! recorded in the current biweekly window. It allocates half of the whole
//! month's expenses to each half ([`provision_for_expense`]), so a large bill
//! paid on the 2nd weighs on both halves equally. The actual biweekly totals
//! remain available in [`BalanceSummary::biweekly`].
//!
//! | Mode     | Period income | Period expenses        | Days counted to |
//! |----------|---------------|------------------------|-----------------|
//! | Monthly  | net           | monthly expenses       | month end       |
//! | Biweekly | net / 2       | monthly expenses / 2   | biweekly end    |

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::PeriodKind;
use crate::calculations::balance::BalanceSummary;
use crate::calculations::common::{half, max, round_whole};
use crate::calculations::deductions::DeductionResult;
use crate::calculations::periods::ResolvedPeriods;

/// Which period the budget view is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Monthly,
    Biweekly,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Biweekly => "biweekly",
        }
    }

    /// The period window this mode budgets against.
    pub fn period_kind(&self) -> PeriodKind {
        match self {
            Self::Monthly => PeriodKind::Month,
            Self::Biweekly => PeriodKind::Biweekly,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown view mode '{0}' (expected 'monthly' or 'biweekly')")]
pub struct ParseViewModeError(pub String);

impl FromStr for ViewMode {
    type Err = ParseViewModeError;

    /// Accepts `monthly`/`month` and `biweekly`/`quincenal`, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" | "month" => Ok(Self::Monthly),
            "biweekly" | "quincenal" => Ok(Self::Biweekly),
            _ => Err(ParseViewModeError(s.to_string())),
        }
    }
}

/// Figures shown on the balance card for one view mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetView {
    pub view_mode: ViewMode,

    /// Human label of the period, e.g. `"16 Jun - 30 Jun"`.
    pub period_label: String,

    /// Net salary attributed to the period.
    pub period_income: Decimal,

    /// Expenses attributed to the period (apportioned in biweekly mode).
    pub period_expenses: Decimal,

    /// Real expenses recorded this month, unscaled in both modes.
    pub actual_monthly_expenses: Decimal,

    /// `period_expenses / period_income`, capped at 1; 0 when income is 0.
    pub spending_progress: Decimal,

    /// Days left in the period counting today, at least 1.
    pub remaining_days: u32,

    /// Unspent period income spread over the remaining days, whole units.
    pub remaining_daily_budget: Decimal,
}

impl BudgetView {
    pub fn period_balance(&self) -> Decimal {
        self.period_income - self.period_expenses
    }

    /// Spending progress as a whole percentage (0–100).
    pub fn spending_percent(&self) -> Decimal {
        round_whole(self.spending_progress * Decimal::ONE_HUNDRED)
    }
}

/// Share of a monthly amount provisioned for one biweekly period.
///
/// ```
/// use rust_decimal_macros::dec;
/// use budget_core::calculations::provision_for_expense;
///
/// assert_eq!(provision_for_expense(dec!(200000)), dec!(100000));
/// ```
pub fn provision_for_expense(monthly_amount: Decimal) -> Decimal {
    half(monthly_amount)
}

/// Builds the budget view for `view_mode`.
///
/// Deterministic and side-effect free given its inputs.
///
/// ```
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
/// use budget_core::{
///     BalanceSummary, DeductionResult, PeriodBalance, ViewMode, compose_budget_view,
///     resolve_periods,
/// };
///
/// let deductions = DeductionResult {
///     gross_salary: dec!(700000),
///     statutory_withholding: dec!(100000),
///     income_tax: dec!(0),
///     net_salary: dec!(600000),
/// };
/// let balances = BalanceSummary {
///     monthly: PeriodBalance { income: dec!(0), expenses: dec!(200000) },
///     biweekly: PeriodBalance { income: dec!(0), expenses: dec!(5000) },
/// };
/// let now = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap().and_hms_opt(9, 0, 0).unwrap();
///
/// let view = compose_budget_view(&deductions, &balances, ViewMode::Biweekly, &resolve_periods(now));
///
/// assert_eq!(view.period_income, dec!(300000));
/// assert_eq!(view.period_expenses, dec!(100000));
/// assert_eq!(view.remaining_days, 6);
/// assert_eq!(view.remaining_daily_budget, dec!(33333));
/// ```
pub fn compose_budget_view(
    deductions: &DeductionResult,
    balances: &BalanceSummary,
    view_mode: ViewMode,
    periods: &ResolvedPeriods,
) -> BudgetView {
    let monthly_expenses = balances.monthly.expenses;

    let (period_income, period_expenses) = match view_mode {
        ViewMode::Monthly => (deductions.net_salary, monthly_expenses),
        ViewMode::Biweekly => (
            half(deductions.net_salary),
            provision_for_expense(monthly_expenses),
        ),
    };

    let kind = view_mode.period_kind();
    let window = periods.window(kind);
    let remaining_days = periods.remaining_days(kind);
    let spending_progress = spending_progress(period_income, period_expenses);
    let remaining_daily_budget =
        remaining_daily_budget(period_income, period_expenses, remaining_days);

    debug!(
        mode = %view_mode,
        income = %period_income,
        expenses = %period_expenses,
        remaining_days,
        daily = %remaining_daily_budget,
        "composed budget view"
    );

    BudgetView {
        view_mode,
        period_label: window.label(),
        period_income,
        period_expenses,
        actual_monthly_expenses: monthly_expenses,
        spending_progress,
        remaining_days,
        remaining_daily_budget,
    }
}

fn spending_progress(
    income: Decimal,
    expenses: Decimal,
) -> Decimal {
    if income.is_zero() {
        warn!(
            expenses = %expenses,
            "period income is zero; reporting no spending progress"
        );
        return Decimal::ZERO;
    }
    (expenses / income).min(Decimal::ONE)
}

fn remaining_daily_budget(
    income: Decimal,
    expenses: Decimal,
    remaining_days: u32,
) -> Decimal {
    let remaining = max(income - expenses, Decimal::ZERO);
    round_whole(remaining / Decimal::from(remaining_days.max(1)))
}
