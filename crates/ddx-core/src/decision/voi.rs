//! Value of information for follow-up question selection.
//!
//! The value of asking about a symptom is its expected information gain:
//!
//! ```text
//! IG(s) = H(b) - [ P(s) · H(b | s) + P(¬s) · H(b | ¬s) ]
//! ```
//!
//! Only diseases that are both in the belief distribution and in the
//! symptom's likelihood row enter `P(s)` and the branch posteriors; there is
//! no neutral fill-in here, unlike the update itself. The gain is reported
//! as computed, without clamping.

use crate::inference::BeliefState;
use ddx_config::ProbabilityTable;
use ddx_math::{expected_entropy_bits, shannon_entropy_bits};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A candidate follow-up question scored by information gain (bits).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionCandidate {
    pub symptom: String,
    pub information_gain: f64,
}

/// Expected reduction in diagnostic entropy from asking about `symptom`.
///
/// Returns 0.0 for symptoms already observed or not in the table.
pub fn information_gain(table: &ProbabilityTable, state: &BeliefState, symptom: &str) -> f64 {
    if state.is_observed(symptom) {
        return 0.0;
    }
    let Some(row) = table.row(symptom) else {
        return 0.0;
    };

    // (belief, P(s | d)) for diseases in both the distribution and the row.
    let terms: Vec<(f64, f64)> = table
        .diseases
        .iter()
        .filter_map(|d| Some((state.belief(d)?, *row.get(d)?)))
        .collect();

    let current = shannon_entropy_bits(state.beliefs().values().copied());

    let p_true: f64 = terms.iter().map(|(b, p)| b * p).sum();
    let p_false: f64 = terms.iter().map(|(b, p)| b * (1.0 - p)).sum();

    let h_true = branch_entropy(&terms, p_true, |p| p);
    let h_false = branch_entropy(&terms, p_false, |p| 1.0 - p);

    let gain = current - expected_entropy_bits(p_true, h_true, p_false, h_false);
    tracing::trace!(symptom, gain, p_true, "information gain");
    gain
}

fn branch_entropy(terms: &[(f64, f64)], mass: f64, likelihood: impl Fn(f64) -> f64) -> f64 {
    if mass <= 0.0 {
        return 0.0;
    }
    shannon_entropy_bits(terms.iter().map(|&(b, p)| likelihood(p) * b / mass))
}

/// The `n` unobserved symptoms with the highest information gain.
///
/// Ties are broken by symptom name.
pub fn rank_questions(table: &ProbabilityTable, state: &BeliefState, n: usize) -> Vec<QuestionCandidate> {
    let mut candidates: Vec<QuestionCandidate> = table
        .symptoms()
        .filter(|s| !state.is_observed(s))
        .map(|s| QuestionCandidate {
            symptom: s.to_string(),
            information_gain: information_gain(table, state, s),
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.information_gain
            .partial_cmp(&a.information_gain)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.symptom.cmp(&b.symptom))
    });
    candidates.truncate(n);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn two_disease_table(row: &[(&str, f64)]) -> ProbabilityTable {
        let priors: BTreeMap<String, f64> = [("A".to_string(), 0.5), ("B".to_string(), 0.5)]
            .into_iter()
            .collect();
        let row: BTreeMap<String, f64> = row.iter().map(|(d, p)| (d.to_string(), *p)).collect();
        let table: BTreeMap<String, BTreeMap<String, f64>> =
            [("S".to_string(), row)].into_iter().collect();
        ProbabilityTable::from_parts(
            Some(vec!["A".to_string(), "B".to_string()]),
            Some(priors),
            Some(table),
        )
    }

    #[test]
    fn test_perfect_discriminator_gains_one_bit() {
        let table = two_disease_table(&[("A", 1.0), ("B", 0.0)]);
        let state = BeliefState::from_priors(&table.priors);
        let gain = information_gain(&table, &state, "S");
        assert!((gain - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_uninformative_symptom_gains_nothing() {
        let table = two_disease_table(&[("A", 0.3), ("B", 0.3)]);
        let state = BeliefState::from_priors(&table.priors);
        assert!(information_gain(&table, &state, "S").abs() < 1e-12);
    }

    #[test]
    fn test_observed_and_unknown_are_zero() {
        let table = two_disease_table(&[("A", 1.0), ("B", 0.0)]);
        let mut state = BeliefState::from_priors(&table.priors);
        assert_eq!(information_gain(&table, &state, "Nope"), 0.0);
        state.record("S", true);
        assert_eq!(information_gain(&table, &state, "S"), 0.0);
    }

    #[test]
    fn test_partial_row_is_not_clamped() {
        // Only A is in the row, so both branches collapse onto A and the
        // expected entropy is zero: the gain is the full current entropy.
        let table = two_disease_table(&[("A", 0.7)]);
        let state = BeliefState::from_priors(&table.priors);
        let gain = information_gain(&table, &state, "S");
        assert!((gain - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rank_questions_excludes_observed() {
        let table = ProbabilityTable::default();
        let mut state = BeliefState::from_priors(&table.priors);
        state.record("Fever", true);
        let ranked = rank_questions(&table, &state, 50);
        assert_eq!(ranked.len(), table.symptom_given_disease.len() - 1);
        assert!(ranked.iter().all(|q| q.symptom != "Fever"));
        for pair in ranked.windows(2) {
            assert!(pair[0].information_gain >= pair[1].information_gain);
        }
    }
}
