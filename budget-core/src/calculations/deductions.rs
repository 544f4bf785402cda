//! Statutory payroll deductions: social-security withholding and progressive
//! income tax.
//!
//! # Calculation
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Withholding (CCSS): gross × flat rate (10.83%) |
//! | 2    | Income tax: for each bracket, (min(gross, max) − min) × rate, summed |
//! | 3    | Net salary: gross − withholding − income tax |
//!
//! Steps 1 and 2 are rounded to two decimal places; step 3 is an exact
//! subtraction, so the three parts always add back up to the gross salary.
//!
//! # Canonical table
//!
//! [`DeductionConfig::canonical`] uses a single table whose first bracket is a
//! 0% band up to 929,000. Any other table can be supplied through
//! [`DeductionConfig`] as long as it passes [`DeductionConfig::validate`].
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use budget_core::calculations::{DeductionCalculator, DeductionConfig};
//!
//! let calculator = DeductionCalculator::new(DeductionConfig::canonical());
//! let result = calculator.calculate(dec!(2000000)).unwrap();
//!
//! assert_eq!(result.statutory_withholding, dec!(216600.00));
//! assert_eq!(result.income_tax, dec!(138950.00));
//! assert_eq!(result.net_salary, dec!(1644450.00));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::TaxBracket;
use crate::calculations::common::{half, round_half_up};

/// Errors raised by the deduction calculator and its configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeductionError {
    /// Gross salary must be validated as non-negative before calling.
    #[error("gross salary must be non-negative, got {0}")]
    NegativeGrossSalary(Decimal),

    #[error("withholding rate must be between 0 and 1, got {0}")]
    InvalidWithholdingRate(Decimal),

    #[error("no tax brackets provided")]
    NoBrackets,

    #[error("tax rate of bracket {index} must be between 0 and 1, got {rate}")]
    InvalidBracketRate { index: usize, rate: Decimal },

    #[error("first tax bracket must start at 0, got {0}")]
    FirstBracketNotAtZero(Decimal),

    /// Bracket `index` does not start where the previous one ended.
    #[error("tax bracket {index} starts at {min_income} but previous bracket ends at {expected}")]
    BracketGap {
        index: usize,
        expected: Decimal,
        min_income: Decimal,
    },

    #[error("tax bracket {index} has max {max_income} not above its min {min_income}")]
    EmptyBracket {
        index: usize,
        min_income: Decimal,
        max_income: Decimal,
    },

    #[error("only the final tax bracket may be unbounded, bracket {0} is unbounded")]
    UnboundedBracketNotLast(usize),

    #[error("final tax bracket must be unbounded, it ends at {0}")]
    FinalBracketBounded(Decimal),

    /// Withholding plus the top marginal rate would take more than the gross.
    #[error("withholding rate {withholding_rate} plus top tax rate {tax_rate} exceeds 1")]
    CombinedRateTooHigh {
        withholding_rate: Decimal,
        tax_rate: Decimal,
    },
}

/// Rates and brackets driving [`DeductionCalculator`].
///
/// Passed in explicitly so the calculator never depends on module-level
/// tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionConfig {
    /// Flat social-security (CCSS) withholding rate.
    pub withholding_rate: Decimal,

    /// Income-tax brackets, ascending, contiguous, last one unbounded.
    pub brackets: Vec<TaxBracket>,
}

impl DeductionConfig {
    /// CCSS withholding rate (SEM + IVM): 10.83%.
    pub const CCSS_RATE: Decimal = dec!(0.1083);

    /// The built-in table: 10.83% withholding and five monthly brackets.
    ///
    /// | From      | To        | Rate |
    /// |-----------|-----------|------|
    /// | 0         | 929,000   | 0%   |
    /// | 929,000   | 1,363,000 | 10%  |
    /// | 1,363,000 | 2,392,000 | 15%  |
    /// | 2,392,000 | 4,783,000 | 20%  |
    /// | 4,783,000 | ∞         | 25%  |
    pub fn canonical() -> Self {
        Self::with_brackets(
            Self::CCSS_RATE,
            &[
                (dec!(929000), dec!(0)),
                (dec!(1363000), dec!(0.10)),
                (dec!(2392000), dec!(0.15)),
                (dec!(4783000), dec!(0.20)),
            ],
            dec!(0.25),
        )
    }

    /// Builds a contiguous table from `(upper_bound, rate)` pairs plus the
    /// rate of the final unbounded bracket.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use budget_core::calculations::DeductionConfig;
    ///
    /// let config = DeductionConfig::with_brackets(
    ///     dec!(0.1083),
    ///     &[(dec!(500000), dec!(0)), (dec!(1000000), dec!(0.10))],
    ///     dec!(0.20),
    /// );
    ///
    /// assert_eq!(config.brackets.len(), 3);
    /// assert_eq!(config.brackets[1].min_income, dec!(500000));
    /// assert_eq!(config.brackets[2].max_income, None);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn with_brackets(
        withholding_rate: Decimal,
        bounded: &[(Decimal, Decimal)],
        top_rate: Decimal,
    ) -> Self {
        let mut brackets = Vec::with_capacity(bounded.len() + 1);
        let mut floor = Decimal::ZERO;
        for &(upper_bound, tax_rate) in bounded {
            brackets.push(TaxBracket {
                min_income: floor,
                max_income: Some(upper_bound),
                tax_rate,
            });
            floor = upper_bound;
        }
        brackets.push(TaxBracket {
            min_income: floor,
            max_income: None,
            tax_rate: top_rate,
        });
        Self {
            withholding_rate,
            brackets,
        }
    }

    /// Checks that the table covers `[0, ∞)` without gaps and that every rate
    /// is a valid fraction.
    ///
    /// # Errors
    ///
    /// Returns the first [`DeductionError`] configuration variant that
    /// applies.
    pub fn validate(&self) -> Result<(), DeductionError> {
        if self.withholding_rate < Decimal::ZERO || self.withholding_rate > Decimal::ONE {
            return Err(DeductionError::InvalidWithholdingRate(
                self.withholding_rate,
            ));
        }

        let Some(first) = self.brackets.first() else {
            return Err(DeductionError::NoBrackets);
        };
        if first.min_income != Decimal::ZERO {
            return Err(DeductionError::FirstBracketNotAtZero(first.min_income));
        }

        let last_index = self.brackets.len() - 1;
        let mut expected_min = Decimal::ZERO;
        let mut top_rate = Decimal::ZERO;

        for (index, bracket) in self.brackets.iter().enumerate() {
            if bracket.tax_rate < Decimal::ZERO || bracket.tax_rate > Decimal::ONE {
                return Err(DeductionError::InvalidBracketRate {
                    index,
                    rate: bracket.tax_rate,
                });
            }
            if bracket.min_income != expected_min {
                return Err(DeductionError::BracketGap {
                    index,
                    expected: expected_min,
                    min_income: bracket.min_income,
                });
            }
            match bracket.max_income {
                Some(max_income) if index == last_index => {
                    return Err(DeductionError::FinalBracketBounded(max_income));
                }
                Some(max_income) if max_income <= bracket.min_income => {
                    return Err(DeductionError::EmptyBracket {
                        index,
                        min_income: bracket.min_income,
                        max_income,
                    });
                }
                Some(max_income) => expected_min = max_income,
                None if index != last_index => {
                    return Err(DeductionError::UnboundedBracketNotLast(index));
                }
                None => {}
            }
            top_rate = top_rate.max(bracket.tax_rate);
        }

        if self.withholding_rate + top_rate > Decimal::ONE {
            return Err(DeductionError::CombinedRateTooHigh {
                withholding_rate: self.withholding_rate,
                tax_rate: top_rate,
            });
        }
        Ok(())
    }
}

impl Default for DeductionConfig {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Deductions for one gross salary figure.
///
/// Always recomputed from the gross salary; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionResult {
    pub gross_salary: Decimal,

    /// Social-security (CCSS) withholding.
    pub statutory_withholding: Decimal,

    /// Progressive income tax summed across brackets.
    pub income_tax: Decimal,

    /// `gross_salary - statutory_withholding - income_tax`.
    pub net_salary: Decimal,
}

impl DeductionResult {
    pub fn total_deductions(&self) -> Decimal {
        self.statutory_withholding + self.income_tax
    }

    /// Every figure divided by two.
    ///
    /// This scales the monthly result; it does not re-run the brackets on half
    /// the salary, which would give a different (lower) tax.
    pub fn half(&self) -> Self {
        Self {
            gross_salary: half(self.gross_salary),
            statutory_withholding: half(self.statutory_withholding),
            income_tax: half(self.income_tax),
            net_salary: half(self.net_salary),
        }
    }
}

/// Monthly deductions alongside their biweekly share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBreakdown {
    pub monthly: DeductionResult,
    pub biweekly: DeductionResult,
}

impl SalaryBreakdown {
    pub fn from_monthly(monthly: DeductionResult) -> Self {
        Self {
            biweekly: monthly.half(),
            monthly,
        }
    }

    /// No salary configured; displays are expected to hide the breakdown.
    pub fn is_empty(&self) -> bool {
        self.monthly.gross_salary.is_zero()
    }
}

/// Calculator for statutory deductions on a monthly gross salary.
#[derive(Debug, Clone)]
pub struct DeductionCalculator {
    config: DeductionConfig,
}

impl DeductionCalculator {
    pub fn new(config: DeductionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DeductionConfig {
        &self.config
    }

    /// Computes withholding, income tax and net salary for `gross_salary`.
    ///
    /// # Errors
    ///
    /// Returns [`DeductionError::NegativeGrossSalary`] for negative input, or a
    /// configuration variant if the table is invalid.
    ///
    /// # Example: exempt salary
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use budget_core::calculations::{DeductionCalculator, DeductionConfig};
    ///
    /// let calculator = DeductionCalculator::new(DeductionConfig::canonical());
    /// let result = calculator.calculate(dec!(850000)).unwrap();
    ///
    /// assert_eq!(result.income_tax, dec!(0));
    /// assert_eq!(result.statutory_withholding, dec!(92055.00));
    /// assert_eq!(result.net_salary, dec!(757945.00));
    /// ```
    pub fn calculate(
        &self,
        gross_salary: Decimal,
    ) -> Result<DeductionResult, DeductionError> {
        self.config.validate()?;

        if gross_salary < Decimal::ZERO {
            return Err(DeductionError::NegativeGrossSalary(gross_salary));
        }
        if gross_salary.is_zero() {
            warn!("gross salary is zero; all deductions are zero");
        }

        let statutory_withholding = self.statutory_withholding(gross_salary);
        let income_tax = self.income_tax(gross_salary);
        let net_salary = gross_salary - statutory_withholding - income_tax;

        debug!(
            gross = %gross_salary,
            withholding = %statutory_withholding,
            income_tax = %income_tax,
            net = %net_salary,
            "computed salary deductions"
        );

        Ok(DeductionResult {
            gross_salary,
            statutory_withholding,
            income_tax,
            net_salary,
        })
    }

    /// Monthly deductions plus the biweekly half.
    ///
    /// # Errors
    ///
    /// Same as [`DeductionCalculator::calculate`].
    pub fn breakdown(
        &self,
        gross_salary: Decimal,
    ) -> Result<SalaryBreakdown, DeductionError> {
        self.calculate(gross_salary).map(SalaryBreakdown::from_monthly)
    }

    fn statutory_withholding(
        &self,
        gross_salary: Decimal,
    ) -> Decimal {
        round_half_up(gross_salary * self.config.withholding_rate)
    }

    fn income_tax(
        &self,
        gross_salary: Decimal,
    ) -> Decimal {
        let tax: Decimal = self
            .config
            .brackets
            .iter()
            .take_while(|bracket| gross_salary > bracket.min_income)
            .map(|bracket| bracket.taxable_slice(gross_salary) * bracket.tax_rate)
            .sum();
        round_half_up(tax)
    }
}
