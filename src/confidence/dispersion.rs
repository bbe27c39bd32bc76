//! Dispersion across independent value estimates

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

/// Population coefficient of variation (std-dev / mean)
///
/// Returns `None` for fewer than two estimates or a non-positive mean.
/// Each estimate is divided by the mean before squaring, so the variance is
/// computed on ratios near 1.0 rather than on squared currency amounts.
pub fn coefficient_of_variation(estimates: &[Decimal]) -> Option<Decimal> {
    if estimates.len() < 2 {
        return None;
    }

    let count = Decimal::from(estimates.len());
    let mean = estimates.iter().copied().sum::<Decimal>() / count;
    if mean <= Decimal::ZERO {
        return None;
    }

    let variance = estimates
        .iter()
        .map(|estimate| {
            let deviation = *estimate / mean - Decimal::ONE;
            deviation * deviation
        })
        .sum::<Decimal>()
        / count;

    variance.sqrt()
}

/// Agreement score between methods, falling as dispersion rises
pub fn method_consistency(cv: Decimal) -> Decimal {
    if cv > dec!(0.3) {
        dec!(0.3)
    } else if cv > dec!(0.2) {
        dec!(0.6)
    } else if cv > dec!(0.1) {
        dec!(0.8)
    } else {
        dec!(1.0)
    }
}
