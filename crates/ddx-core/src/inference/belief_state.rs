//! Posterior belief tracking over the disease set.
//!
//! A [`BeliefState`] holds the current `P(disease | observations)` map and
//! the ordered log of observations that produced it. Only diseases with a
//! configured prior take part in the distribution.
//!
//! The sequential update is plain Bayes:
//!   b'(d) = P(obs | d) · b(d) / Σ_d' P(obs | d') · b(d')

use ddx_math::{normalize_in_place, total_mass};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single recorded symptom answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Observation {
    pub symptom: String,
    pub present: bool,
}

/// Posterior distribution plus the observation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeliefState {
    beliefs: BTreeMap<String, f64>,
    observed: Vec<Observation>,
}

impl BeliefState {
    /// Normalized copy of the priors with an empty observation log.
    ///
    /// A prior map with no positive mass is kept as-is.
    pub fn from_priors(priors: &BTreeMap<String, f64>) -> Self {
        let mut beliefs = priors.clone();
        normalize_in_place(&mut beliefs);
        BeliefState {
            beliefs,
            observed: Vec::new(),
        }
    }

    pub fn beliefs(&self) -> &BTreeMap<String, f64> {
        &self.beliefs
    }

    /// Current posterior for a disease, if it is part of the distribution.
    pub fn belief(&self, disease: &str) -> Option<f64> {
        self.beliefs.get(disease).copied()
    }

    /// Observations in first-seen order.
    pub fn observations(&self) -> &[Observation] {
        &self.observed
    }

    /// Recorded answer for a symptom.
    pub fn observation(&self, symptom: &str) -> Option<bool> {
        self.observed
            .iter()
            .find(|o| o.symptom == symptom)
            .map(|o| o.present)
    }

    pub fn is_observed(&self, symptom: &str) -> bool {
        self.observation(symptom).is_some()
    }

    pub fn total_mass(&self) -> f64 {
        total_mass(&self.beliefs)
    }

    /// Record an answer. A repeated symptom keeps its original position and
    /// takes the new value.
    pub(crate) fn record(&mut self, symptom: &str, present: bool) {
        match self.observed.iter_mut().find(|o| o.symptom == symptom) {
            Some(existing) => existing.present = present,
            None => self.observed.push(Observation {
                symptom: symptom.to_string(),
                present,
            }),
        }
    }

    /// Multiply each belief by its likelihood and divide by `evidence`.
    ///
    /// Diseases missing from `likelihoods` are left untouched.
    pub(crate) fn apply(&mut self, likelihoods: &BTreeMap<&str, f64>, evidence: f64) {
        for (disease, belief) in self.beliefs.iter_mut() {
            if let Some(&l) = likelihoods.get(disease.as_str()) {
                *belief = l * *belief / evidence;
            }
        }
    }

    /// Rescale to unit mass. Returns false when there is no mass to scale.
    pub fn normalize(&mut self) -> bool {
        normalize_in_place(&mut self.beliefs)
    }

    /// Back to normalized priors with an empty log.
    pub fn reset(&mut self, priors: &BTreeMap<String, f64>) {
        *self = BeliefState::from_priors(priors);
    }
}
