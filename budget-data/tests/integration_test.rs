//! Integration tests running the loaders against the files in `test-data/`
//! and feeding the results through the calculations.

use std::path::{Path, PathBuf};

use budget_core::{
    DeductionCalculator, DeductionConfig, TransactionKind, aggregate_balance, resolve_periods,
};
use budget_data::{Settings, TaxBracketLoader, TransactionLoader, newest_first};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

const CANONICAL_CSV: &str = include_str!("../test-data/brackets_canonical.csv");
const ALTERNATE_CSV: &str = include_str!("../test-data/brackets_918k.csv");
const TRANSACTIONS_CSV: &str = include_str!("../test-data/transactions_june_2025.csv");

fn test_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data")
}

// =============================================================================
// Bracket tables
// =============================================================================

#[test]
fn test_canonical_file_matches_builtin_table() {
    let config = TaxBracketLoader::load(CANONICAL_CSV.as_bytes(), DeductionConfig::CCSS_RATE)
        .expect("canonical table should load");

    assert_eq!(config, DeductionConfig::canonical());
}

#[test]
fn test_alternate_table_changes_income_tax() {
    let config = TaxBracketLoader::load(ALTERNATE_CSV.as_bytes(), DeductionConfig::CCSS_RATE)
        .expect("alternate table should load");
    let calculator = DeductionCalculator::new(config);

    let result = calculator.calculate(dec!(1000000)).unwrap();

    assert_eq!(result.income_tax, dec!(8200));
    assert_eq!(result.statutory_withholding, dec!(108300));
    assert_eq!(result.net_salary, dec!(883500));
}

// =============================================================================
// Settings
// =============================================================================

#[test]
fn test_settings_with_builtin_table() {
    let dir = test_data_dir();
    let settings = Settings::load(&dir.join("settings.toml")).expect("settings should load");
    let config = settings.deduction_config(&dir).unwrap();

    let result = DeductionCalculator::new(config)
        .calculate(settings.monthly_salary)
        .unwrap();

    assert_eq!(result.statutory_withholding, dec!(216600));
    assert_eq!(result.income_tax, dec!(138950));
    assert_eq!(result.net_salary, dec!(1644450));
}

#[test]
fn test_settings_resolve_brackets_file_relative_to_settings() {
    let dir = test_data_dir();
    let settings = Settings::load(&dir.join("settings_custom_brackets.toml")).unwrap();

    let config = settings.deduction_config(&dir).unwrap();

    assert_eq!(config.brackets[0].max_income, Some(dec!(918000)));
    assert_eq!(
        DeductionCalculator::new(config)
            .calculate(settings.monthly_salary)
            .unwrap()
            .income_tax,
        dec!(8200)
    );
}

// =============================================================================
// Transactions
// =============================================================================

#[test]
fn test_transactions_file_aggregates_by_period() {
    let transactions = TransactionLoader::load_from_str(TRANSACTIONS_CSV).unwrap();
    let now = NaiveDate::from_ymd_opt(2025, 6, 10)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();

    let summary = aggregate_balance(&transactions, &resolve_periods(now));

    assert_eq!(transactions.len(), 7);
    assert_eq!(summary.monthly.income, dec!(1245000));
    assert_eq!(summary.monthly.expenses, dec!(255750.50));
    assert_eq!(summary.biweekly.income, dec!(1200000));
    assert_eq!(summary.biweekly.expenses, dec!(223750.50));
    assert_eq!(summary.biweekly.balance(), dec!(976249.50));
}

#[test]
fn test_transactions_file_loads_from_path() {
    let mut transactions =
        TransactionLoader::load_from_file(&test_data_dir().join("transactions_june_2025.csv"))
            .unwrap();

    newest_first(&mut transactions);

    let ids: Vec<&str> = transactions.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["tx-006", "tx-005", "tx-004", "tx-003", "tx-002", "tx-001", "tx-007"]
    );
    assert_eq!(transactions[0].kind, TransactionKind::Expense);
    assert!(transactions[2].description.is_none());
}
