//! Decimal rounding rules
//!
//! Currency rounds to cents, rates to a fixed number of places. Midpoints
//! round away from zero (ROUND_HALF_UP in accounting terms).

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Largest monetary amount accepted on input (one quadrillion)
///
/// Sums, horizon multiples and percent conversions of amounts up to this stay
/// far inside `Decimal`'s 96-bit range.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Round a monetary amount to cents
pub fn round_currency(value: Decimal) -> Decimal {
    round_places(value, 2)
}

/// Round a fractional rate (band, score, dispersion) to 3 places
pub fn round_rate(value: Decimal) -> Decimal {
    round_places(value, 3)
}

/// Round a percentage or ratio to 2 places
pub fn round_percent(value: Decimal) -> Decimal {
    round_places(value, 2)
}

/// Round to `dp` places, half away from zero, keeping trailing zeros
pub fn round_places(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    // round_dp leaves the scale untouched when it is already lower
    rounded.rescale(dp);
    rounded
}
