use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One slice of a progressive income-tax table.
///
/// `max_income` is `None` for the final, unbounded bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
}

impl TaxBracket {
    /// Portion of `gross` that falls inside this bracket, never negative.
    pub fn taxable_slice(
        &self,
        gross: Decimal,
    ) -> Decimal {
        let ceiling = match self.max_income {
            Some(max_income) => gross.min(max_income),
            None => gross,
        };
        (ceiling - self.min_income).max(Decimal::ZERO)
    }
}
