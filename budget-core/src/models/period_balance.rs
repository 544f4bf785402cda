use rust_decimal::Decimal;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::{Transaction, TransactionKind};

/// Income and expense totals for one period window.
///
/// The balance is derived on demand and never stored, so it cannot drift from
/// its two inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct PeriodBalance {
    pub income: Decimal,
    pub expenses: Decimal,
}

impl PeriodBalance {
    pub fn balance(&self) -> Decimal {
        self.income - self.expenses
    }

    /// Adds a transaction's amount to the matching side.
    pub fn record(
        &mut self,
        transaction: &Transaction,
    ) {
        match transaction.kind {
            TransactionKind::Income => self.income += transaction.amount,
            TransactionKind::Expense => self.expenses += transaction.amount,
        }
    }
}

// Emits the derived balance alongside the two totals for display layers.
impl Serialize for PeriodBalance {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PeriodBalance", 3)?;
        state.serialize_field("income", &self.income)?;
        state.serialize_field("expenses", &self.expenses)?;
        state.serialize_field("balance", &self.balance())?;
        state.end()
    }
}
