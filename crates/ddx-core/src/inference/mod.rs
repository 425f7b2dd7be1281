//! Inference engine modules.

pub mod belief_state;
pub mod engine;
pub mod ledger;

pub use belief_state::{BeliefState, Observation};
pub use engine::{BayesianEngine, BeliefSnapshot, Diagnosis};
pub use ledger::{
    DifferentialEntry, Effect, EvidenceFactor, EvidenceItem, EvidenceStrength, ReasoningRecord,
};
