//! Body-systems association engine and the assessments built on it.

pub mod assessment;
pub mod engine;
pub mod insights;

pub use assessment::{
    ConnectionReport, HolisticAssessment, InterventionCategory, Interventions, LifestyleLink,
    SymptomConnection, SymptomSystems,
};
pub use engine::{
    PatternMatch, SymptomWeight, SystemScore, SystemsEngine, PATTERN_THRESHOLD,
    RELATED_SYSTEM_THRESHOLD, SYMPTOM_SYSTEM_THRESHOLD, SYSTEM_SYMPTOM_THRESHOLD,
};
pub use insights::{
    append_unified_perspective, specialty_for, warrants_unified_perspective,
    CrossSpecialtyInsights, SpecialtyScore,
};
