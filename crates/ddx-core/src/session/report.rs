//! Serializable report of a session's state.

use chrono::{DateTime, Utc};
use ddx_common::SessionId;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::decision::QuestionCandidate;
use crate::inference::{DifferentialEntry, Diagnosis, Observation};
use crate::systems::{PatternMatch, SystemScore};

/// Everything a host needs to render or archive one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SessionReport {
    pub session_id: SessionId,
    pub generated_at: DateTime<Utc>,

    /// Observations in the order they were first made.
    pub observed: Vec<Observation>,
    /// Ranked diagnoses, most probable first.
    pub top_diagnoses: Vec<Diagnosis>,
    pub differential: Vec<DifferentialEntry>,
    /// Posterior entropy in bits.
    pub entropy_bits: f64,
    pub confidence: f64,
    pub suggested_questions: Vec<QuestionCandidate>,
    pub next_question: String,

    /// Top-3 snapshots, one per change of leading disease.
    pub diagnosis_history: Vec<Vec<Diagnosis>>,

    pub reported_symptoms: Vec<String>,
    pub denied_symptoms: Vec<String>,
    pub affected_systems: Vec<SystemScore>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub potential_patterns: Vec<PatternMatch>,
    pub systems_suggestions: Vec<String>,
    pub systems_next_question: String,
}

impl SessionReport {
    /// One-line status.
    pub fn summary_line(&self) -> String {
        let leader = match self.top_diagnoses.first() {
            Some(d) => format!("{} ({:.2})", d.disease, d.probability),
            None => "none".to_string(),
        };
        format!(
            "{}: {} observation(s), leading {}, entropy {:.3} bits, next: {}",
            self.session_id,
            self.observed.len(),
            leader,
            self.entropy_bits,
            self.suggested_questions
                .first()
                .map(|q| q.symptom.as_str())
                .unwrap_or("-")
        )
    }
}
