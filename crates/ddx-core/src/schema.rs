//! JSON Schema generation for the CLI's output and config types.
//!
//! ```bash
//! # Schema of the diagnose report
//! ddx schema
//!
//! # One type, or all of them
//! ddx schema HolisticAssessment
//! ddx schema --all
//! ```

use schemars::schema_for;
use serde_json::Value;
use std::collections::BTreeMap;

pub use crate::inference::{BeliefSnapshot, DifferentialEntry, ReasoningRecord};
pub use crate::session::SessionReport;
pub use crate::systems::{ConnectionReport, CrossSpecialtyInsights, HolisticAssessment};
pub use ddx_common::SessionId;
pub use ddx_config::{BodySystem, ConfigSnapshot, ProbabilityTable, SystemGraph};

/// Type emitted by `ddx schema` with no argument.
pub const DEFAULT_SCHEMA: &str = "SessionReport";

/// Available schema types with their descriptions.
pub fn available_schemas() -> Vec<(&'static str, &'static str)> {
    vec![
        ("SessionReport", "Output of `ddx diagnose`"),
        ("ReasoningRecord", "Output of `ddx explain`"),
        ("HolisticAssessment", "Output of `ddx systems`"),
        ("BeliefSnapshot", "Posterior distribution with entropy and leader"),
        ("DifferentialEntry", "Ranked disease with supporting and contradicting evidence"),
        ("ConnectionReport", "How reported symptoms connect through body systems"),
        ("CrossSpecialtyInsights", "Specialties spanned by the reported symptoms"),
        ("SessionId", "Diagnostic session identifier"),
        ("BodySystem", "One of the twelve body systems"),
        ("ProbabilityTable", "table.json: diseases, priors, symptom likelihoods"),
        ("SystemGraph", "graph.json: body-system association graph"),
        ("ConfigSnapshot", "Provenance of the loaded configuration"),
    ]
}

/// Generate JSON Schema for a type by name.
///
/// Returns None if the type is unknown.
pub fn generate_schema(type_name: &str) -> Option<Value> {
    let schema = match type_name {
        "SessionReport" => schema_for!(SessionReport),
        "ReasoningRecord" => schema_for!(ReasoningRecord),
        "HolisticAssessment" => schema_for!(HolisticAssessment),
        "BeliefSnapshot" => schema_for!(BeliefSnapshot),
        "DifferentialEntry" => schema_for!(DifferentialEntry),
        "ConnectionReport" => schema_for!(ConnectionReport),
        "CrossSpecialtyInsights" => schema_for!(CrossSpecialtyInsights),
        "SessionId" => schema_for!(SessionId),
        "BodySystem" => schema_for!(BodySystem),
        "ProbabilityTable" => schema_for!(ProbabilityTable),
        "SystemGraph" => schema_for!(SystemGraph),
        "ConfigSnapshot" => schema_for!(ConfigSnapshot),
        _ => return None,
    };

    serde_json::to_value(schema).ok()
}

/// Generate all schemas as a map from type name to schema.
pub fn generate_all_schemas() -> BTreeMap<String, Value> {
    available_schemas()
        .into_iter()
        .filter_map(|(name, _)| generate_schema(name).map(|s| (name.to_string(), s)))
        .collect()
}
