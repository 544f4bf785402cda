//! Pure salary, period and balance calculations for the personal budget
//! tracker.
//!
//! Nothing in this crate performs I/O or reads a clock: every operation takes
//! its inputs (gross salary, transactions, "now") as parameters and returns a
//! freshly computed value.

pub mod calculations;
pub mod models;

pub use calculations::{
    BalanceSummary, BudgetView, DeductionCalculator, DeductionConfig, DeductionError,
    DeductionResult, ResolvedPeriods, SalaryBreakdown, ViewMode, aggregate_balance,
    compose_budget_view, resolve_periods,
};
pub use models::*;
