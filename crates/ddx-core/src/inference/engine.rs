//! Sequential Bayesian differential-diagnosis engine.
//!
//! One engine per session. The probability table is shared read-only; the
//! engine owns its [`BeliefState`].

use super::belief_state::{BeliefState, Observation};
use super::ledger::{self, DifferentialEntry, ReasoningRecord};
use crate::decision::voi::{self, QuestionCandidate};
use ddx_config::{ProbabilityTable, SymptomRow};
use ddx_math::shannon_entropy_bits;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// A disease with its current posterior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Diagnosis {
    pub disease: String,
    pub probability: f64,
}

/// Serializable view of the engine state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BeliefSnapshot {
    pub beliefs: BTreeMap<String, f64>,
    pub observed: Vec<Observation>,
    pub entropy_bits: f64,
    pub confidence: f64,
    pub top: Option<Diagnosis>,
}

#[derive(Debug, Clone)]
pub struct BayesianEngine {
    table: Arc<ProbabilityTable>,
    state: BeliefState,
}

impl Default for BayesianEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl BayesianEngine {
    pub fn new(table: Arc<ProbabilityTable>) -> Self {
        let state = BeliefState::from_priors(&table.priors);
        BayesianEngine { table, state }
    }

    /// Engine over the built-in table.
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(ProbabilityTable::default()))
    }

    /// Engine over a table assembled from optional parts; see
    /// [`ProbabilityTable::from_parts`].
    pub fn from_parts(
        diseases: Option<Vec<String>>,
        priors: Option<BTreeMap<String, f64>>,
        symptom_given_disease: Option<BTreeMap<String, SymptomRow>>,
    ) -> Self {
        Self::new(Arc::new(ProbabilityTable::from_parts(
            diseases,
            priors,
            symptom_given_disease,
        )))
    }

    pub fn table(&self) -> &ProbabilityTable {
        &self.table
    }

    pub fn state(&self) -> &BeliefState {
        &self.state
    }

    pub fn beliefs(&self) -> &BTreeMap<String, f64> {
        self.state.beliefs()
    }

    pub fn observed_symptoms(&self) -> &[Observation] {
        self.state.observations()
    }

    pub fn known_symptoms(&self) -> impl Iterator<Item = &str> {
        self.table.symptoms()
    }

    /// Apply one observation.
    ///
    /// Unknown symptoms change nothing. Known symptoms are always recorded;
    /// if the observation has zero probability under the current beliefs
    /// the posterior is left as it was.
    pub fn update_belief(&mut self, symptom: &str, present: bool) -> &BTreeMap<String, f64> {
        if !self.table.has_symptom(symptom) {
            debug!(symptom, "ignoring symptom outside the knowledge base");
            return self.state.beliefs();
        }

        self.state.record(symptom, present);

        let likelihoods: BTreeMap<&str, f64> = self
            .table
            .diseases
            .iter()
            .map(|d| {
                let p = self.table.likelihood(symptom, d);
                (d.as_str(), if present { p } else { 1.0 - p })
            })
            .collect();

        let evidence: f64 = likelihoods
            .iter()
            .filter_map(|(d, l)| self.state.belief(d).map(|b| b * l))
            .sum();

        if evidence == 0.0 {
            warn!(symptom, present, "observation has zero evidence; beliefs unchanged");
            return self.state.beliefs();
        }

        self.state.apply(&likelihoods, evidence);
        self.state.normalize();

        debug!(symptom, present, evidence, "belief updated");
        self.state.beliefs()
    }

    /// Diseases with posterior at or above `threshold`, most likely first.
    ///
    /// Equal posteriors are ordered by disease name.
    pub fn get_diagnosis(&self, threshold: f64) -> Vec<Diagnosis> {
        let mut ranked: Vec<Diagnosis> = self
            .state
            .beliefs()
            .iter()
            .filter(|(_, &p)| p >= threshold)
            .map(|(d, &p)| Diagnosis {
                disease: d.clone(),
                probability: p,
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.probability
                .partial_cmp(&a.probability)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.disease.cmp(&b.disease))
        });
        ranked
    }

    pub fn get_top_diagnoses(&self, n: usize) -> Vec<Diagnosis> {
        let mut ranked = self.get_diagnosis(0.0);
        ranked.truncate(n);
        ranked
    }

    /// Shannon entropy in bits of an arbitrary distribution.
    pub fn calculate_entropy(probabilities: &BTreeMap<String, f64>) -> f64 {
        shannon_entropy_bits(probabilities.values().copied())
    }

    /// Entropy of the current beliefs.
    pub fn entropy(&self) -> f64 {
        Self::calculate_entropy(self.state.beliefs())
    }

    pub fn calculate_information_gain(&self, symptom: &str) -> f64 {
        voi::information_gain(&self.table, &self.state, symptom)
    }

    pub fn suggest_questions(&self, n: usize) -> Vec<QuestionCandidate> {
        voi::rank_questions(&self.table, &self.state, n)
    }

    /// Posterior of the leading diagnosis, or 0.0.
    pub fn get_confidence(&self) -> f64 {
        self.get_top_diagnoses(1)
            .first()
            .map(|d| d.probability)
            .unwrap_or(0.0)
    }

    pub fn get_differential_diagnosis(&self, n: usize) -> Vec<DifferentialEntry> {
        ledger::differential_diagnosis(&self.table, &self.state, &self.get_top_diagnoses(n))
    }

    pub fn explain_reasoning(&self, disease: &str) -> ReasoningRecord {
        ledger::explain_reasoning(&self.table, &self.state, disease)
    }

    /// Back to normalized priors with no observations.
    pub fn reset(&mut self) -> &BTreeMap<String, f64> {
        self.state.reset(&self.table.priors);
        self.state.beliefs()
    }

    pub fn snapshot(&self) -> BeliefSnapshot {
        let top = self.get_top_diagnoses(1).into_iter().next();
        BeliefSnapshot {
            beliefs: self.state.beliefs().clone(),
            observed: self.state.observations().to_vec(),
            entropy_bits: self.entropy(),
            confidence: top.as_ref().map(|d| d.probability).unwrap_or(0.0),
            top,
        }
    }
}
