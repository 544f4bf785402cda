//! Rounding and comparison helpers shared by the calculators.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to two decimal places, halves away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use budget_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(92055.004)), dec!(92055.00));
/// assert_eq!(round_half_up(dec!(92055.005)), dec!(92055.01));
/// assert_eq!(round_half_up(dec!(-0.125)), dec!(-0.13));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to a whole currency unit, halves away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use budget_core::calculations::common::round_whole;
///
/// assert_eq!(round_whole(dec!(33333.33)), dec!(33333));
/// assert_eq!(round_whole(dec!(12.5)), dec!(13));
/// ```
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Splits a monthly figure evenly across the two halves of the month.
///
/// Exact: `half(x) * 2 == x` for every `x`.
pub fn half(value: Decimal) -> Decimal {
    value / Decimal::TWO
}
