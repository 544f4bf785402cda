use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a recognised [`TransactionKind`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown transaction type '{0}' (expected 'income' or 'expense')")]
pub struct ParseTransactionKindError(pub String);

impl FromStr for TransactionKind {
    type Err = ParseTransactionKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseTransactionKindError(s.to_string()))
    }
}

/// Validation failures for a [`Transaction`] supplied by a collaborator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    /// Amounts are unsigned; the direction lives in [`TransactionKind`].
    #[error("transaction '{id}' has non-positive amount {amount}")]
    NonPositiveAmount { id: String, amount: Decimal },

    #[error("transaction '{id}' has an empty category")]
    BlankCategory { id: String },
}

/// A single income or expense record owned by a user.
///
/// `created_at` is wall-clock time in the user's zone; period windows are
/// compared against it directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub amount: Decimal,
    pub category: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub created_at: NaiveDateTime,
}

impl Transaction {
    /// Checks the invariants the aggregator relies on.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError`] if the amount is zero or negative, or the
    /// category is blank.
    pub fn validate(&self) -> Result<(), TransactionError> {
        if self.amount <= Decimal::ZERO {
            return Err(TransactionError::NonPositiveAmount {
                id: self.id.clone(),
                amount: self.amount,
            });
        }
        if self.category.trim().is_empty() {
            return Err(TransactionError::BlankCategory {
                id: self.id.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn groceries() -> Transaction {
        Transaction {
            id: "tx-1".to_string(),
            amount: dec!(15250.50),
            category: "Comida".to_string(),
            description: Some("Supermercado".to_string()),
            kind: TransactionKind::Expense,
            created_at: NaiveDate::from_ymd_opt(2025, 6, 10)
                .unwrap()
                .and_hms_opt(18, 30, 0)
                .unwrap(),
        }
    }

    #[test]
    fn parse_accepts_known_kinds_case_insensitively() {
        assert_eq!(TransactionKind::parse("income"), Some(TransactionKind::Income));
        assert_eq!(TransactionKind::parse(" Expense "), Some(TransactionKind::Expense));
        assert_eq!(TransactionKind::parse("transfer"), None);
    }

    #[test]
    fn from_str_reports_offending_value() {
        let err = "refund".parse::<TransactionKind>().unwrap_err();

        assert_eq!(err, ParseTransactionKindError("refund".to_string()));
    }

    #[test]
    fn validate_accepts_positive_amount() {
        assert_eq!(groceries().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_zero_amount() {
        let tx = Transaction {
            amount: dec!(0),
            ..groceries()
        };

        assert_eq!(
            tx.validate(),
            Err(TransactionError::NonPositiveAmount {
                id: "tx-1".to_string(),
                amount: dec!(0),
            })
        );
    }

    #[test]
    fn validate_rejects_negative_amount() {
        let tx = Transaction {
            amount: dec!(-10),
            ..groceries()
        };

        assert!(matches!(
            tx.validate(),
            Err(TransactionError::NonPositiveAmount { .. })
        ));
    }

    #[test]
    fn validate_rejects_blank_category() {
        let tx = Transaction {
            category: "   ".to_string(),
            ..groceries()
        };

        assert_eq!(
            tx.validate(),
            Err(TransactionError::BlankCategory {
                id: "tx-1".to_string()
            })
        );
    }

    #[test]
    fn kind_displays_lowercase() {
        let tx = groceries();

        assert_eq!(tx.kind, TransactionKind::Expense);
        assert_eq!(tx.kind.to_string(), "expense");
    }
}
