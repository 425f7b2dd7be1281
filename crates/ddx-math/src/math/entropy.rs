//! Shannon entropy over discrete distributions.
//!
//! All entropies are measured in bits. Terms with non-positive probability
//! contribute nothing, so callers may pass unnormalized or sparse vectors
//! without special casing zeros.

/// Shannon entropy in bits: `-sum(p * log2(p))` over strictly positive `p`.
///
/// Returns 0.0 for an empty iterator.
pub fn shannon_entropy_bits<I>(probabilities: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    probabilities
        .into_iter()
        .filter(|p| *p > 0.0)
        .map(|p| -p * p.log2())
        .sum()
}

/// Entropy of a uniform distribution over `k` outcomes.
pub fn uniform_entropy_bits(k: usize) -> f64 {
    if k == 0 {
        return 0.0;
    }
    (k as f64).log2()
}

/// Expected entropy of a binary split.
///
/// `p_true` weights the entropy of the `true` branch and `p_false` the
/// entropy of the `false` branch. Branches with non-positive weight are
/// skipped.
pub fn expected_entropy_bits(p_true: f64, h_true: f64, p_false: f64, h_false: f64) -> f64 {
    let mut expected = 0.0;
    if p_true > 0.0 {
        expected += p_true * h_true;
    }
    if p_false > 0.0 {
        expected += p_false * h_false;
    }
    expected
}
