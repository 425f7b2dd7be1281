//! Configuration snapshots for session provenance.
//!
//! A snapshot captures which knowledge base a session ran against, so a
//! diagnostic report can be traced back to the exact tables that produced it.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::resolve::{ConfigPaths, ConfigSource};
use crate::{ProbabilityTable, SystemGraph};

/// A frozen snapshot of configuration state.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Schema version of the configuration.
    pub schema_version: String,

    /// SHA-256 hash of the table JSON content.
    #[serde(default)]
    pub table_hash: Option<String>,

    /// Path where the table was loaded from.
    #[serde(default)]
    pub table_path: Option<String>,

    /// Source of the table configuration.
    pub table_source: String,

    /// SHA-256 hash of the graph JSON content.
    #[serde(default)]
    pub graph_hash: Option<String>,

    /// Path where the graph was loaded from.
    #[serde(default)]
    pub graph_path: Option<String>,

    /// Source of the graph configuration.
    pub graph_source: String,

    /// Combined hash of all config files (for quick comparison).
    pub combined_hash: String,

    /// Key configuration counts for quick reference.
    pub summary: ConfigSummary,
}

/// Size summary of the loaded knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConfigSummary {
    pub disease_count: usize,
    pub symptom_count: usize,
    pub connection_count: usize,
    pub mapped_symptom_count: usize,
    pub pattern_count: usize,
}

impl ConfigSummary {
    fn from_config(table: &ProbabilityTable, graph: &SystemGraph) -> Self {
        ConfigSummary {
            disease_count: table.diseases.len(),
            symptom_count: table.symptom_given_disease.len(),
            connection_count: graph.connections.len(),
            mapped_symptom_count: graph.symptom_systems.len(),
            pattern_count: graph.patterns.len(),
        }
    }
}

impl ConfigSnapshot {
    /// Create a new snapshot from loaded configuration.
    pub fn new(
        table: &ProbabilityTable,
        graph: &SystemGraph,
        paths: &ConfigPaths,
        table_json: Option<&str>,
        graph_json: Option<&str>,
    ) -> Self {
        let table_hash = table_json.map(hash_content);
        let graph_hash = graph_json.map(hash_content);

        let combined = format!(
            "{}:{}",
            table_hash.as_deref().unwrap_or("none"),
            graph_hash.as_deref().unwrap_or("none")
        );

        ConfigSnapshot {
            timestamp: Utc::now(),
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            table_hash,
            table_path: paths.table.as_ref().map(|p| p.display().to_string()),
            table_source: paths.table_source.to_string(),
            graph_hash,
            graph_path: paths.graph.as_ref().map(|p| p.display().to_string()),
            graph_source: paths.graph_source.to_string(),
            combined_hash: hash_content(&combined),
            summary: ConfigSummary::from_config(table, graph),
        }
    }

    /// Create a snapshot with only defaults (no config files loaded).
    pub fn defaults_only() -> Self {
        let table = ProbabilityTable::default();
        let graph = SystemGraph::default();
        ConfigSnapshot {
            timestamp: Utc::now(),
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            table_hash: None,
            table_path: None,
            table_source: ConfigSource::BuiltinDefault.to_string(),
            graph_hash: None,
            graph_path: None,
            graph_source: ConfigSource::BuiltinDefault.to_string(),
            combined_hash: hash_content("none:none"),
            summary: ConfigSummary::from_config(&table, &graph),
        }
    }

    /// Check if this snapshot matches another (same config).
    pub fn matches(&self, other: &ConfigSnapshot) -> bool {
        self.combined_hash == other.combined_hash
    }

    /// Get a short identifier for this snapshot (first 12 chars of hash).
    pub fn short_id(&self) -> &str {
        &self.combined_hash[..12.min(self.combined_hash.len())]
    }
}

/// Hash content with SHA-256 and return hex string.
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
