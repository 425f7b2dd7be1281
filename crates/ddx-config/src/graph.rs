//! Body-system association graph configuration types.
//!
//! The graph carries four weighted relations, all in [0, 1]:
//! system → system influence, symptom → system association,
//! lifestyle factor → system impact, and named multi-system patterns.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;

/// The closed set of body systems.
///
/// Declaration order is the deterministic tie-break order used by the
/// systems engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum BodySystem {
    Neurological,
    Endocrine,
    Immune,
    Digestive,
    Cardiovascular,
    Respiratory,
    Musculoskeletal,
    Integumentary,
    Urinary,
    Reproductive,
    #[serde(rename = "Mental Health")]
    MentalHealth,
    Metabolic,
}

impl BodySystem {
    /// Every system in declaration order.
    pub const ALL: [BodySystem; 12] = [
        BodySystem::Neurological,
        BodySystem::Endocrine,
        BodySystem::Immune,
        BodySystem::Digestive,
        BodySystem::Cardiovascular,
        BodySystem::Respiratory,
        BodySystem::Musculoskeletal,
        BodySystem::Integumentary,
        BodySystem::Urinary,
        BodySystem::Reproductive,
        BodySystem::MentalHealth,
        BodySystem::Metabolic,
    ];

    /// Display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BodySystem::Neurological => "Neurological",
            BodySystem::Endocrine => "Endocrine",
            BodySystem::Immune => "Immune",
            BodySystem::Digestive => "Digestive",
            BodySystem::Cardiovascular => "Cardiovascular",
            BodySystem::Respiratory => "Respiratory",
            BodySystem::Musculoskeletal => "Musculoskeletal",
            BodySystem::Integumentary => "Integumentary",
            BodySystem::Urinary => "Urinary",
            BodySystem::Reproductive => "Reproductive",
            BodySystem::MentalHealth => "Mental Health",
            BodySystem::Metabolic => "Metabolic",
        }
    }
}

impl fmt::Display for BodySystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BodySystem {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        BodySystem::ALL
            .iter()
            .copied()
            .find(|sys| {
                sys.as_str().eq_ignore_ascii_case(wanted)
                    || format!("{:?}", sys).eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "body_system".to_string(),
                message: format!("unknown body system '{}'", s),
            })
    }
}

/// Weight per body system.
pub type SystemWeights = BTreeMap<BodySystem, f64>;

/// A directed influence edge between two systems.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Connection {
    pub from: BodySystem,
    pub to: BodySystem,
    pub strength: f64,
}

/// Complete body-system graph configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SystemGraph {
    pub schema_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Explicitly defined edges. Reverse edges are implied unless given.
    pub connections: Vec<Connection>,

    /// Symptom name → associated systems.
    pub symptom_systems: BTreeMap<String, SystemWeights>,

    /// Lifestyle factor → impacted systems.
    #[serde(default)]
    pub lifestyle_impact: BTreeMap<String, SystemWeights>,

    /// Named multi-system disease patterns → system involvement.
    #[serde(default)]
    pub patterns: BTreeMap<String, SystemWeights>,
}

impl Default for SystemGraph {
    fn default() -> Self {
        crate::defaults::default_graph()
    }
}

impl SystemGraph {
    /// Load a graph from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_str(&content)
    }

    /// Parse a graph from a JSON string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Symmetric adjacency: every explicit edge, plus the reverse of each
    /// edge whose reverse is not itself explicit.
    ///
    /// When an explicit edge is listed twice the later entry wins.
    pub fn mirrored_connections(&self) -> BTreeMap<(BodySystem, BodySystem), f64> {
        let explicit: BTreeMap<(BodySystem, BodySystem), f64> = self
            .connections
            .iter()
            .map(|c| ((c.from, c.to), c.strength))
            .collect();

        let mut mirrored = explicit.clone();
        for (&(from, to), &strength) in &explicit {
            if !explicit.contains_key(&(to, from)) {
                mirrored.insert((to, from), strength);
            }
        }
        mirrored
    }

    /// Systems associated with a symptom.
    pub fn systems_for(&self, symptom: &str) -> Option<&SystemWeights> {
        self.symptom_systems.get(symptom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_system_display() {
        assert_eq!(BodySystem::MentalHealth.to_string(), "Mental Health");
        assert_eq!(BodySystem::Neurological.to_string(), "Neurological");
    }

    #[test]
    fn test_body_system_parse() {
        assert_eq!(
            "mental health".parse::<BodySystem>().unwrap(),
            BodySystem::MentalHealth
        );
        assert_eq!(
            "MentalHealth".parse::<BodySystem>().unwrap(),
            BodySystem::MentalHealth
        );
        assert_eq!(
            "Digestive".parse::<BodySystem>().unwrap(),
            BodySystem::Digestive
        );
        assert!("Skeletal".parse::<BodySystem>().is_err());
    }

    #[test]
    fn test_body_system_serde_name() {
        let json = serde_json::to_string(&BodySystem::MentalHealth).unwrap();
        assert_eq!(json, "\"Mental Health\"");
        let back: BodySystem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BodySystem::MentalHealth);
    }

    #[test]
    fn test_default_graph_shape() {
        let graph = SystemGraph::default();
        assert_eq!(graph.connections.len(), 35);
        assert_eq!(graph.symptom_systems.len(), 33);
        assert_eq!(graph.lifestyle_impact.len(), 5);
        assert_eq!(graph.patterns.len(), 7);
    }

    #[test]
    fn test_mirror_adds_missing_reverse() {
        let graph = SystemGraph::default();
        let adj = graph.mirrored_connections();
        // Only Neurological -> Musculoskeletal is explicit.
        assert_eq!(
            adj.get(&(BodySystem::Musculoskeletal, BodySystem::Neurological)),
            Some(&0.5)
        );
        assert_eq!(
            adj.get(&(BodySystem::Urinary, BodySystem::Cardiovascular)),
            Some(&0.6)
        );
    }

    #[test]
    fn test_mirror_keeps_explicit_reverse() {
        let graph = SystemGraph {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            description: None,
            connections: vec![
                Connection {
                    from: BodySystem::Immune,
                    to: BodySystem::Digestive,
                    strength: 0.8,
                },
                Connection {
                    from: BodySystem::Digestive,
                    to: BodySystem::Immune,
                    strength: 0.4,
                },
            ],
            symptom_systems: BTreeMap::new(),
            lifestyle_impact: BTreeMap::new(),
            patterns: BTreeMap::new(),
        };
        let adj = graph.mirrored_connections();
        assert_eq!(adj.len(), 2);
        assert_eq!(
            adj.get(&(BodySystem::Digestive, BodySystem::Immune)),
            Some(&0.4)
        );
    }

    #[test]
    fn test_graph_json_roundtrip() {
        let graph = SystemGraph::default();
        let json = serde_json::to_string(&graph).unwrap();
        assert!(json.contains("\"Mental Health\""));
        let parsed = SystemGraph::from_str(&json).unwrap();
        assert_eq!(parsed, graph);
    }
}
