//! Income and expense totals per period window.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::periods::ResolvedPeriods;
use crate::{PeriodBalance, PeriodWindow, Transaction};

/// Totals for the current month and the current biweekly window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub monthly: PeriodBalance,
    pub biweekly: PeriodBalance,
}

/// Sums the transactions whose `created_at` falls inside `window`.
///
/// Accumulation is exact decimal addition, so long runs of small amounts do
/// not drift.
pub fn sum_window(
    transactions: &[Transaction],
    window: &PeriodWindow,
) -> PeriodBalance {
    transactions
        .iter()
        .filter(|tx| window.contains(tx.created_at))
        .fold(PeriodBalance::default(), |mut balance, tx| {
            balance.record(tx);
            balance
        })
}

/// Aggregates `transactions` over the month and biweekly windows.
///
/// Monthly totals count every transaction on or after the month start; inputs
/// are expected to be scoped to the current month already, so nothing later is
/// filtered out. Biweekly totals additionally require `created_at` inside the
/// biweekly window. An empty slice yields all-zero balances.
///
/// ```
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
/// use budget_core::{Transaction, TransactionKind, aggregate_balance, resolve_periods};
///
/// let day = |d| NaiveDate::from_ymd_opt(2025, 6, d).unwrap().and_hms_opt(10, 0, 0).unwrap();
/// let transactions = vec![Transaction {
///     id: "1".into(),
///     amount: dec!(1000),
///     category: "Food".into(),
///     description: None,
///     kind: TransactionKind::Expense,
///     created_at: day(10),
/// }];
///
/// let summary = aggregate_balance(&transactions, &resolve_periods(day(20)));
///
/// assert_eq!(summary.monthly.expenses, dec!(1000));
/// assert_eq!(summary.biweekly.expenses, dec!(0));
/// ```
pub fn aggregate_balance(
    transactions: &[Transaction],
    periods: &ResolvedPeriods,
) -> BalanceSummary {
    let mut summary = BalanceSummary::default();
    let mut skipped = 0usize;

    for tx in transactions {
        if tx.created_at < periods.month.start {
            skipped += 1;
            continue;
        }
        summary.monthly.record(tx);
        if periods.biweekly.contains(tx.created_at) {
            summary.biweekly.record(tx);
        }
    }

    if skipped > 0 {
        debug!(
            skipped,
            month_start = %periods.month.start,
            "ignored transactions before the current month"
        );
    }
    debug!(
        monthly_income = %summary.monthly.income,
        monthly_expenses = %summary.monthly.expenses,
        biweekly_income = %summary.biweekly.income,
        biweekly_expenses = %summary.biweekly.expenses,
        "aggregated period balances"
    );

    summary
}
