//! Salary, period and balance calculations.
//!
//! Leaves first: [`deductions`] and [`periods`] stand alone, [`balance`]
//! aggregates transactions over resolved periods, and [`budget`] combines
//! both into the view shown to the user.

pub mod balance;
pub mod budget;
pub mod common;
pub mod deductions;
pub mod periods;

pub use balance::{BalanceSummary, aggregate_balance, sum_window};
pub use budget::{
    BudgetView, ParseViewModeError, ViewMode, compose_budget_view, provision_for_expense,
};
pub use deductions::{
    DeductionCalculator, DeductionConfig, DeductionError, DeductionResult, SalaryBreakdown,
};
pub use periods::{ResolvedPeriods, biweekly_windows, last_day_of_month, resolve_periods};
