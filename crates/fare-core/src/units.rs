//! Whole-unit money arithmetic.
//!
//! Every amount is an integer in the smallest currency unit the caller uses.
//! Ratios are computed in `i128` so `amount * minutes` cannot overflow.

/// An amount of money in whole currency units.
pub type Units = i64;

/// Largest activity cost, expense, or expense total a plan accepts.
///
/// Keeps `activity cost + shared total` far inside `i64`, so no allocation
/// step can overflow.
pub const MAX_AMOUNT: Units = 1_000_000_000_000_000;

/// Computes `numerator / denominator` rounded half away from zero.
///
/// Returns 0 when `denominator` is not positive.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn round_ratio(numerator: i128, denominator: i128) -> Units {
    if denominator <= 0 {
        return 0;
    }
    let magnitude = (2 * numerator.abs() + denominator) / (2 * denominator);
    // Callers only divide a share of a total by the total's basis, so the
    // quotient never exceeds the original `Units` value.
    let rounded = magnitude as Units;
    if numerator < 0 { -rounded } else { rounded }
}

/// Computes `floor(numerator / denominator)`.
///
/// Returns 0 when `denominator` is not positive.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn floor_ratio(numerator: i128, denominator: i128) -> Units {
    if denominator <= 0 {
        return 0;
    }
    numerator.div_euclid(denominator) as Units
}

/// Scales `amount` by `part / whole`, rounding half away from zero.
pub(crate) fn share_rounded(amount: Units, part: i64, whole: i64) -> Units {
    round_ratio(i128::from(amount) * i128::from(part), i128::from(whole))
}

/// Scales `amount` by `part / whole`, rounding down.
pub(crate) fn share_floored(amount: Units, part: i64, whole: i64) -> Units {
    floor_ratio(i128::from(amount) * i128::from(part), i128::from(whole))
}

/// Spreads `drift` over `values` one unit at a time.
///
/// Walks the eligible indices in list order, adding `+1` (positive drift) or
/// `-1` (negative drift) to each until the drift is used up. When the drift is
/// larger than the number of eligible entries the walk starts over from the
/// front. A decrement is skipped for entries already at zero, and the walk
/// stops once a full pass changes nothing.
///
/// Returns whatever drift could not be placed.
pub(crate) fn distribute_units<F>(values: &mut [Units], is_eligible: F, drift: Units) -> Units
where
    F: Fn(usize) -> bool,
{
    let mut remaining = drift;
    let mut passes = 0_u32;

    while remaining != 0 {
        let step = remaining.signum();
        let mut progressed = false;

        for (index, value) in values.iter_mut().enumerate() {
            if remaining == 0 {
                break;
            }
            if !is_eligible(index) || (step < 0 && *value == 0) {
                continue;
            }
            *value += step;
            remaining -= step;
            progressed = true;
        }

        passes += 1;
        if !progressed {
            break;
        }
    }

    if passes > 1 {
        tracing::debug!(passes, drift, remaining, "drift needed more than one pass");
    }
    if remaining != 0 {
        tracing::warn!(drift, remaining, "drift could not be fully distributed");
    }

    remaining
}
