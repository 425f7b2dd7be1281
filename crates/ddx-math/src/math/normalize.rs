//! Normalization of keyed probability maps.

use std::collections::BTreeMap;

/// Sum of all values in a probability map.
pub fn total_mass<K>(map: &BTreeMap<K, f64>) -> f64 {
    map.values().sum()
}

/// Rescale `map` in place so its values sum to 1.0.
///
/// Returns `false` (leaving the map untouched) when the total mass is zero,
/// negative, or not finite.
pub fn normalize_in_place<K>(map: &mut BTreeMap<K, f64>) -> bool {
    let total = total_mass(map);
    if !total.is_finite() || total <= 0.0 {
        return false;
    }
    for value in map.values_mut() {
        *value /= total;
    }
    true
}

/// Divide every value by the maximum so the largest entry becomes 1.0.
///
/// Returns `false` when the maximum is not strictly positive.
pub fn scale_to_max<K>(map: &mut BTreeMap<K, f64>) -> bool {
    let max = map.values().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() || max <= 0.0 {
        return false;
    }
    for value in map.values_mut() {
        *value /= max;
    }
    true
}

/// Approximate equality with an absolute tolerance.
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}
