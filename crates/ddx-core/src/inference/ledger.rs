//! Evidence ledger for explainability.
//!
//! Turns the observation log into per-disease supporting/contradicting
//! evidence (the differential) and into a likelihood-factor breakdown for a
//! single disease (the reasoning record).

use super::belief_state::BeliefState;
use super::engine::Diagnosis;
use ddx_config::ProbabilityTable;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Qualitative weight of a piece of evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceStrength {
    Strong,
    Moderate,
    Mild,
}

impl EvidenceStrength {
    /// Grade a likelihood that lies above 0.5.
    fn above_half(p: f64) -> Self {
        if p > 0.8 {
            EvidenceStrength::Strong
        } else if p > 0.6 {
            EvidenceStrength::Moderate
        } else {
            EvidenceStrength::Mild
        }
    }

    /// Grade a likelihood that lies below 0.5.
    fn below_half(p: f64) -> Self {
        if p < 0.2 {
            EvidenceStrength::Strong
        } else if p < 0.4 {
            EvidenceStrength::Moderate
        } else {
            EvidenceStrength::Mild
        }
    }

    /// Grade a likelihood factor by its distance from neutral.
    fn from_distance(distance: f64) -> Self {
        if distance > 0.3 {
            EvidenceStrength::Strong
        } else if distance > 0.1 {
            EvidenceStrength::Moderate
        } else {
            EvidenceStrength::Mild
        }
    }

    /// Capitalized label for display.
    pub fn label(&self) -> &'static str {
        match self {
            EvidenceStrength::Strong => "Strong",
            EvidenceStrength::Moderate => "Moderate",
            EvidenceStrength::Mild => "Mild",
        }
    }
}

impl fmt::Display for EvidenceStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvidenceStrength::Strong => write!(f, "strong"),
            EvidenceStrength::Moderate => write!(f, "moderate"),
            EvidenceStrength::Mild => write!(f, "mild"),
        }
    }
}

/// Direction a factor pushes the posterior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Supporting,
    Contradicting,
}

impl Effect {
    pub fn label(&self) -> &'static str {
        match self {
            Effect::Supporting => "Supporting",
            Effect::Contradicting => "Contradicting",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Supporting => write!(f, "supporting"),
            Effect::Contradicting => write!(f, "contradicting"),
        }
    }
}

/// One line of evidence in a differential entry.
///
/// `symptom` is the display label: the symptom name when it was reported
/// present, `"absence of <symptom>"` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EvidenceItem {
    pub symptom: String,
    pub probability: f64,
    pub strength: EvidenceStrength,
}

/// A ranked disease with the observations for and against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DifferentialEntry {
    pub disease: String,
    pub probability: f64,
    pub supporting_evidence: Vec<EvidenceItem>,
    pub contradicting_evidence: Vec<EvidenceItem>,
}

/// Contribution of one observed symptom to a disease's posterior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EvidenceFactor {
    pub symptom: String,
    pub present: bool,
    /// Configured `P(symptom | disease)`.
    pub conditional_probability: f64,
    /// Likelihood of the observed answer: `P` if present, `1 - P` if absent.
    pub likelihood_factor: f64,
    pub effect: Effect,
    pub strength: EvidenceStrength,
}

/// Prior/posterior explanation for a single disease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReasoningRecord {
    pub disease: String,
    pub explanation: String,
    pub prior_probability: f64,
    pub posterior_probability: f64,
    pub evidence_factors: Vec<EvidenceFactor>,
}

/// Text used when the disease has no place in the belief distribution.
pub const UNKNOWN_DISEASE_EXPLANATION: &str = "Disease not in knowledge base";

/// Supporting and contradicting evidence for each ranked disease.
///
/// Only observations whose likelihood row names the disease count. A
/// likelihood of exactly 0.5 is neutral and listed on neither side.
pub fn differential_diagnosis(
    table: &ProbabilityTable,
    state: &BeliefState,
    ranked: &[Diagnosis],
) -> Vec<DifferentialEntry> {
    ranked
        .iter()
        .map(|dx| {
            let mut supporting = Vec::new();
            let mut contradicting = Vec::new();

            for obs in state.observations() {
                let Some(p) = table.configured_likelihood(&obs.symptom, &dx.disease) else {
                    continue;
                };
                let absent_label = || format!("absence of {}", obs.symptom);

                match (obs.present, p.partial_cmp(&0.5)) {
                    (true, Some(Ordering::Greater)) => supporting.push(EvidenceItem {
                        symptom: obs.symptom.clone(),
                        probability: p,
                        strength: EvidenceStrength::above_half(p),
                    }),
                    (false, Some(Ordering::Less)) => supporting.push(EvidenceItem {
                        symptom: absent_label(),
                        probability: 1.0 - p,
                        strength: EvidenceStrength::below_half(p),
                    }),
                    (true, Some(Ordering::Less)) => contradicting.push(EvidenceItem {
                        symptom: obs.symptom.clone(),
                        probability: p,
                        strength: EvidenceStrength::below_half(p),
                    }),
                    (false, Some(Ordering::Greater)) => contradicting.push(EvidenceItem {
                        symptom: absent_label(),
                        probability: p,
                        strength: EvidenceStrength::above_half(p),
                    }),
                    _ => {}
                }
            }

            supporting.sort_by(|a, b| desc(a.probability, b.probability));
            contradicting.sort_by(|a, b| desc(1.0 - a.probability, 1.0 - b.probability));

            DifferentialEntry {
                disease: dx.disease.clone(),
                probability: dx.probability,
                supporting_evidence: supporting,
                contradicting_evidence: contradicting,
            }
        })
        .collect()
}

/// Explain how the observations moved one disease from prior to posterior.
pub fn explain_reasoning(
    table: &ProbabilityTable,
    state: &BeliefState,
    disease: &str,
) -> ReasoningRecord {
    let Some(posterior) = state.belief(disease) else {
        return ReasoningRecord {
            disease: disease.to_string(),
            explanation: UNKNOWN_DISEASE_EXPLANATION.to_string(),
            prior_probability: 0.0,
            posterior_probability: 0.0,
            evidence_factors: Vec::new(),
        };
    };
    let prior = table.prior(disease);

    let mut factors: Vec<EvidenceFactor> = state
        .observations()
        .iter()
        .filter_map(|obs| {
            let p = table.configured_likelihood(&obs.symptom, disease)?;
            let likelihood = if obs.present { p } else { 1.0 - p };
            Some(EvidenceFactor {
                symptom: obs.symptom.clone(),
                present: obs.present,
                conditional_probability: p,
                likelihood_factor: likelihood,
                effect: if likelihood > 0.5 {
                    Effect::Supporting
                } else {
                    Effect::Contradicting
                },
                strength: EvidenceStrength::from_distance((likelihood - 0.5).abs()),
            })
        })
        .collect();

    factors.sort_by(|a, b| {
        desc(
            (a.likelihood_factor - 0.5).abs(),
            (b.likelihood_factor - 0.5).abs(),
        )
    });

    let mut explanation = format!(
        "The diagnosis of {} has a posterior probability of {:.2} (prior: {:.2}). ",
        disease, posterior, prior
    );
    if !factors.is_empty() {
        explanation.push_str("Key factors: ");
        for factor in factors.iter().take(3) {
            let status = if factor.present { "presence" } else { "absence" };
            explanation.push_str(&format!(
                "The {} of {} is a {} {} factor (likelihood: {:.2}). ",
                status, factor.symptom, factor.strength, factor.effect, factor.likelihood_factor
            ));
        }
    }

    ReasoningRecord {
        disease: disease.to_string(),
        explanation,
        prior_probability: prior,
        posterior_probability: posterior,
        evidence_factors: factors,
    }
}

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn table() -> ProbabilityTable {
        let rows: BTreeMap<String, BTreeMap<String, f64>> = [
            ("Fever", [("Flu", 0.9), ("Cold", 0.3)]),
            ("Sneezing", [("Flu", 0.15), ("Cold", 0.5)]),
            ("Cough", [("Flu", 0.7), ("Cold", 0.65)]),
        ]
        .into_iter()
        .map(|(s, row)| {
            (
                s.to_string(),
                row.into_iter().map(|(d, p)| (d.to_string(), p)).collect(),
            )
        })
        .collect();
        let priors: BTreeMap<String, f64> = [("Flu".to_string(), 0.5), ("Cold".to_string(), 0.5)]
            .into_iter()
            .collect();
        ProbabilityTable::from_parts(
            Some(vec!["Flu".to_string(), "Cold".to_string()]),
            Some(priors),
            Some(rows),
        )
    }

    fn state_with(obs: &[(&str, bool)]) -> BeliefState {
        let t = table();
        let mut state = BeliefState::from_priors(&t.priors);
        for (s, present) in obs {
            state.record(s, *present);
        }
        state
    }

    fn dx(disease: &str) -> Diagnosis {
        Diagnosis {
            disease: disease.to_string(),
            probability: 0.5,
        }
    }

    #[test]
    fn test_differential_buckets() {
        let t = table();
        let state = state_with(&[("Fever", true), ("Sneezing", false), ("Cough", false)]);
        let diff = differential_diagnosis(&t, &state, &[dx("Flu"), dx("Cold")]);

        let flu = &diff[0];
        assert_eq!(flu.supporting_evidence.len(), 2);
        assert_eq!(flu.supporting_evidence[0].symptom, "Fever");
        assert_eq!(flu.supporting_evidence[0].strength, EvidenceStrength::Strong);
        assert_eq!(flu.supporting_evidence[1].symptom, "absence of Sneezing");
        assert!((flu.supporting_evidence[1].probability - 0.85).abs() < 1e-12);
        assert_eq!(flu.contradicting_evidence.len(), 1);
        assert_eq!(flu.contradicting_evidence[0].symptom, "absence of Cough");
        assert_eq!(
            flu.contradicting_evidence[0].strength,
            EvidenceStrength::Moderate
        );

        // Sneezing at exactly 0.5 is neutral for Cold.
        let cold = &diff[1];
        assert!(cold.supporting_evidence.is_empty());
        assert_eq!(cold.contradicting_evidence.len(), 2);
        assert_eq!(cold.contradicting_evidence[0].symptom, "Fever");
        assert_eq!(cold.contradicting_evidence[1].symptom, "absence of Cough");
    }

    #[test]
    fn test_explain_reasoning_factors_sorted() {
        let t = table();
        let state = state_with(&[("Cough", true), ("Fever", true), ("Sneezing", true)]);
        let record = explain_reasoning(&t, &state, "Flu");

        assert_eq!(record.evidence_factors.len(), 3);
        assert_eq!(record.evidence_factors[0].symptom, "Fever");
        assert_eq!(record.evidence_factors[1].symptom, "Sneezing");
        assert_eq!(record.evidence_factors[1].effect, Effect::Contradicting);
        assert_eq!(record.evidence_factors[2].strength, EvidenceStrength::Moderate);
        assert!(record
            .explanation
            .starts_with("The diagnosis of Flu has a posterior probability of 0.50 (prior: 0.50). Key factors: "));
        assert!(record.explanation.contains(
            "The presence of Fever is a strong supporting factor (likelihood: 0.90). "
        ));
    }

    #[test]
    fn test_explain_reasoning_absent_factor_uses_complement() {
        let t = table();
        let state = state_with(&[("Fever", false)]);
        let record = explain_reasoning(&t, &state, "Cold");
        let factor = &record.evidence_factors[0];
        assert!((factor.likelihood_factor - 0.7).abs() < 1e-12);
        assert_eq!(factor.effect, Effect::Supporting);
        assert_eq!(factor.strength, EvidenceStrength::Moderate);
    }

    #[test]
    fn test_explain_unknown_disease() {
        let t = table();
        let state = state_with(&[]);
        let record = explain_reasoning(&t, &state, "Scurvy");
        assert_eq!(record.explanation, UNKNOWN_DISEASE_EXPLANATION);
        assert_eq!(record.prior_probability, 0.0);
        assert!(record.evidence_factors.is_empty());
    }

    #[test]
    fn test_no_observations_has_no_key_factors() {
        let t = table();
        let state = state_with(&[]);
        let record = explain_reasoning(&t, &state, "Flu");
        assert!(!record.explanation.contains("Key factors"));
    }

    #[test]
    fn test_labels() {
        assert_eq!(EvidenceStrength::Moderate.label(), "Moderate");
        assert_eq!(Effect::Contradicting.label(), "Contradicting");
        assert_eq!(
            serde_json::to_string(&EvidenceStrength::Strong).unwrap(),
            "\"strong\""
        );
    }
}
