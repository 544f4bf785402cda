mod period;
mod period_balance;
mod tax_bracket;
mod transaction;

pub use period::{PeriodKind, PeriodWindow};
pub use period_balance::PeriodBalance;
pub use tax_bracket::TaxBracket;
pub use transaction::{
    ParseTransactionKindError, Transaction, TransactionError, TransactionKind,
};
