//! Trait sampling — the only source of randomness in a projection.

use rand::Rng;

use crate::genome::{CategoryWeights, RangeValues};

/// Blend a uniform draw over `[min, max]` toward the stored default.
///
/// `final = default + (u − default) · influence`, with `influence` clamped
/// into [0, 1].  At influence 0 the result is exactly the default; the
/// final clamp only absorbs rounding at the bounds.
pub fn sample_range<R: Rng + ?Sized>(range: &RangeValues, influence: f64, rng: &mut R) -> f64 {
    let influence = if influence.is_nan() { 0.0 } else { influence.clamp(0.0, 1.0) };
    let u = range.min + rng.gen::<f64>() * range.span();
    let value = range.default + (u - range.default) * influence;
    range.clamp(value)
}

/// Weighted pick walking categories in declared order.
///
/// Non-positive weights are never selected.  Returns `None` only when no
/// category has positive weight.
pub fn select_category<'a, R: Rng + ?Sized>(
    weights: &'a CategoryWeights,
    rng: &mut R,
) -> Option<&'a str> {
    let total = weights.total();
    if total <= 0.0 {
        return None;
    }

    let mut x = rng.gen::<f64>() * total;
    let mut last_positive = None;
    for (label, w) in weights.iter() {
        if w <= 0.0 {
            continue;
        }
        if x < w {
            return Some(label);
        }
        x -= w;
        last_positive = Some(label);
    }
    // x can land on the upper edge through accumulated subtraction error
    last_positive
}
