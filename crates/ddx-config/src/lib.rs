//! ddx configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for table.json (disease priors and symptom likelihoods)
//!   and graph.json (body-system association graph)
//! - Built-in defaults for both
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation
//! - Config snapshots for session provenance

mod defaults;
pub mod graph;
pub mod resolve;
pub mod snapshot;
pub mod table;
pub mod validate;

pub use graph::{BodySystem, Connection, SystemGraph, SystemWeights};
pub use resolve::{resolve_config, ConfigPaths, ConfigSource};
pub use snapshot::ConfigSnapshot;
pub use table::{ProbabilityTable, SymptomRow, NEUTRAL_LIKELIHOOD};
pub use validate::{validate_graph, validate_table, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
