//! CSV loader for transaction records.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter.
//!
//! | Column        | Required | Type     | Notes                                        |
//! |---------------|----------|----------|----------------------------------------------|
//! | `id`          | yes      | string   | Opaque identifier                            |
//! | `amount`      | yes      | decimal  | Strictly positive, e.g. `15250.50`           |
//! | `category`    | yes      | string   | Must not be blank                            |
//! | `description` | no       | string   | Leave cell empty for `None`                  |
//! | `type`        | yes      | string   | `income` or `expense` (case-insensitive)     |
//! | `created_at`  | yes      | datetime | Wall-clock time, see below                   |
//!
//! `created_at` accepts `2025-06-10T18:30:00`, `2025-06-10 18:30:00` (both
//! with optional fractional seconds), an RFC 3339 timestamp whose offset is
//! dropped, or a bare date taken as midnight.
//!
//! ```csv
//! id,amount,category,description,type,created_at
//! tx-1,15250.50,Comida,Supermercado,expense,2025-06-10T18:30:00
//! tx-2,750000,Salario,,income,2025-06-01 08:00:00
//! ```

use std::path::Path;

use budget_core::{Transaction, TransactionError, TransactionKind};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    amount: Decimal,
    category: String,
    description: Option<String>,
    #[serde(rename = "type")]
    kind: String,
    created_at: String,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading transactions from CSV.
///
/// Row numbers are 1-based data rows (the header is row 0).
#[derive(Debug, thiserror::Error)]
pub enum TransactionLoaderError {
    /// Bad structure, missing column or a type mismatch.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("unrecognised transaction type '{kind}' on row {row}")]
    InvalidKind { kind: String, row: usize },

    #[error("unrecognised timestamp '{value}' on row {row}")]
    InvalidTimestamp { value: String, row: usize },

    #[error("invalid transaction on row {row}: {source}")]
    InvalidTransaction {
        row: usize,
        #[source]
        source: TransactionError,
    },

    #[error("cannot read transactions file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

/// Parses a wall-clock timestamp in any of the accepted layouts.
fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    for format in NAIVE_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Some(ts);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.naive_local());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<Transaction, TransactionLoaderError> {
    let kind =
        TransactionKind::parse(&row.kind).ok_or_else(|| TransactionLoaderError::InvalidKind {
            kind: row.kind.clone(),
            row: row_number,
        })?;
    let created_at = parse_timestamp(&row.created_at).ok_or_else(|| {
        TransactionLoaderError::InvalidTimestamp {
            value: row.created_at.clone(),
            row: row_number,
        }
    })?;

    let transaction = Transaction {
        id: row.id,
        amount: row.amount,
        category: row.category,
        description: row.description.filter(|d| !d.is_empty()),
        kind,
        created_at,
    };
    transaction
        .validate()
        .map_err(|source| TransactionLoaderError::InvalidTransaction {
            row: row_number,
            source,
        })?;
    Ok(transaction)
}

/// Loader for transaction CSV files.
pub struct TransactionLoader;

impl TransactionLoader {
    /// Parse and validate every row, preserving file order.
    ///
    /// Fails on the first bad row.
    pub fn parse<R: std::io::Read>(reader: R) -> Result<Vec<Transaction>, TransactionLoaderError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(reader);

        let mut transactions = Vec::new();
        for (idx, result) in rdr.deserialize::<CsvRow>().enumerate() {
            let row = result?;
            transactions.push(convert_row(row, idx + 1)?);
        }

        debug!(count = transactions.len(), "loaded transactions");
        Ok(transactions)
    }

    pub fn load_from_str(csv: &str) -> Result<Vec<Transaction>, TransactionLoaderError> {
        Self::parse(csv.as_bytes())
    }

    pub fn load_from_file(path: &Path) -> Result<Vec<Transaction>, TransactionLoaderError> {
        let file = std::fs::File::open(path).map_err(|source| TransactionLoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(file)
    }
}

/// Orders transactions most recent first, the way listings present them.
///
/// The sort is stable, so records sharing a timestamp keep their file order.
pub fn newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
