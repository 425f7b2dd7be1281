//! Configuration loading and validation for ddx-core.
//!
//! This module handles:
//! - Loading table.json and graph.json files
//! - Config resolution order (CLI > env > config dir > XDG > defaults)
//! - Schema validation (shape/type checking via serde)
//! - Semantic validation (probability ranges, positive prior mass)
//! - Config snapshot generation for reports

pub use ddx_config::validate::ValidationError;
pub use ddx_config::{BodySystem, ConfigSnapshot, ProbabilityTable, SystemGraph};

use ddx_config::resolve::{resolve_config, ConfigPaths, GRAPH_FILENAME, TABLE_FILENAME};
use ddx_config::validate::{validate_graph, validate_table};
use ddx_config::CONFIG_SCHEMA_VERSION;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid JSON in config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid probability table: {0}")]
    InvalidTable(#[source] ValidationError),

    #[error("Invalid system graph: {0}")]
    InvalidGraph(#[source] ValidationError),

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Schema version mismatch in {path}: expected {expected}, got {actual}")]
    VersionMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}

impl From<ConfigError> for ddx_common::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::IoError { source, .. } => ddx_common::Error::Io(source),
            ConfigError::InvalidTable(v) => ddx_common::Error::InvalidTable(v.to_string()),
            ConfigError::InvalidGraph(v) => ddx_common::Error::InvalidGraph(v.to_string()),
            ConfigError::VersionMismatch {
                path,
                expected,
                actual,
            } => ddx_common::Error::SchemaValidation(format!(
                "{}: expected {}, got {}",
                path.display(),
                expected,
                actual
            )),
            other => ddx_common::Error::Config(other.to_string()),
        }
    }
}

/// Resolved configuration with provenance information.
///
/// The table and graph are shared read-only by every session.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub table: Arc<ProbabilityTable>,
    pub graph: Arc<SystemGraph>,
    pub paths: ConfigPaths,
    pub snapshot: ConfigSnapshot,
}

impl ResolvedConfig {
    /// Built-in tables with no files involved.
    pub fn builtin() -> Self {
        ResolvedConfig {
            table: Arc::new(ProbabilityTable::default()),
            graph: Arc::new(SystemGraph::default()),
            paths: resolve_paths_none(),
            snapshot: ConfigSnapshot::defaults_only(),
        }
    }
}

fn resolve_paths_none() -> ConfigPaths {
    ConfigPaths {
        table: None,
        graph: None,
        table_source: ddx_config::ConfigSource::BuiltinDefault,
        graph_source: ddx_config::ConfigSource::BuiltinDefault,
    }
}

/// Configuration resolution options.
#[derive(Debug, Default, Clone)]
pub struct ConfigOptions {
    /// Explicit config directory (searched before env and XDG).
    pub config_dir: Option<PathBuf>,
    /// Explicit table file path.
    pub table_path: Option<PathBuf>,
    /// Explicit graph file path.
    pub graph_path: Option<PathBuf>,
}

/// Load configuration with the standard resolution order.
///
/// Resolution order (highest to lowest priority):
/// 1. Explicit file flags, then files inside an explicit config directory
/// 2. Environment variables (DDX_TABLE, DDX_GRAPH, DDX_CONFIG_DIR)
/// 3. XDG config home (~/.config/ddx/)
/// 4. Built-in defaults
///
/// An explicit file flag that points nowhere is an error rather than a
/// silent fallback.
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    let cli_table = explicit_path(options.table_path.as_deref(), options, TABLE_FILENAME)?;
    let cli_graph = explicit_path(options.graph_path.as_deref(), options, GRAPH_FILENAME)?;

    let paths = resolve_config(cli_table.as_deref(), cli_graph.as_deref());

    let (table, table_json) = match &paths.table {
        Some(path) => {
            let content = read_file(path)?;
            let table: ProbabilityTable = parse_json(path, &content)?;
            check_version(path, &table.schema_version)?;
            (table.with_implied_diseases(), Some(content))
        }
        None => (ProbabilityTable::default(), None),
    };

    let (graph, graph_json) = match &paths.graph {
        Some(path) => {
            let content = read_file(path)?;
            let graph: SystemGraph = parse_json(path, &content)?;
            check_version(path, &graph.schema_version)?;
            (graph, Some(content))
        }
        None => (SystemGraph::default(), None),
    };

    validate_table(&table).map_err(ConfigError::InvalidTable)?;
    validate_graph(&graph).map_err(ConfigError::InvalidGraph)?;

    let snapshot = ConfigSnapshot::new(
        &table,
        &graph,
        &paths,
        table_json.as_deref(),
        graph_json.as_deref(),
    );

    tracing::debug!(
        table_source = %paths.table_source,
        graph_source = %paths.graph_source,
        config_id = snapshot.short_id(),
        "configuration loaded"
    );

    Ok(ResolvedConfig {
        table: Arc::new(table),
        graph: Arc::new(graph),
        paths,
        snapshot,
    })
}

fn explicit_path(
    flag: Option<&Path>,
    options: &ConfigOptions,
    filename: &str,
) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = flag {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        return Ok(Some(path.to_path_buf()));
    }
    Ok(options
        .config_dir
        .as_ref()
        .map(|dir| dir.join(filename))
        .filter(|p| p.exists()))
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn parse_json<T: serde::de::DeserializeOwned>(path: &Path, content: &str) -> Result<T, ConfigError> {
    serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn check_version(path: &Path, actual: &str) -> Result<(), ConfigError> {
    if actual != CONFIG_SCHEMA_VERSION {
        return Err(ConfigError::VersionMismatch {
            path: path.to_path_buf(),
            expected: CONFIG_SCHEMA_VERSION.to_string(),
            actual: actual.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_table_and_graph_load() {
        let temp = TempDir::new().unwrap();
        let table_path = temp.path().join("table.json");
        let graph_path = temp.path().join("graph.json");
        std::fs::write(
            &table_path,
            serde_json::to_string(&ProbabilityTable::default()).unwrap(),
        )
        .unwrap();
        std::fs::write(
            &graph_path,
            serde_json::to_string(&SystemGraph::default()).unwrap(),
        )
        .unwrap();

        let options = ConfigOptions {
            config_dir: None,
            table_path: Some(table_path.clone()),
            graph_path: Some(graph_path),
        };
        let config = load_config(&options).unwrap();
        assert_eq!(config.paths.table.as_deref(), Some(table_path.as_path()));
        assert!(config.snapshot.table_hash.is_some());
        assert_eq!(config.table.diseases.len(), 13);
    }

    #[test]
    fn test_missing_explicit_file_is_not_found() {
        let options = ConfigOptions {
            table_path: Some(PathBuf::from("/nonexistent/ddx/table.json")),
            ..Default::default()
        };
        let err = load_config(&options).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let temp = TempDir::new().unwrap();
        let mut table = ProbabilityTable::default();
        table.schema_version = "0.9.0".to_string();
        let path = temp.path().join("table.json");
        std::fs::write(&path, serde_json::to_string(&table).unwrap()).unwrap();

        let options = ConfigOptions {
            table_path: Some(path),
            ..Default::default()
        };
        let err = load_config(&options).unwrap_err();
        assert!(matches!(err, ConfigError::VersionMismatch { .. }));
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let temp = TempDir::new().unwrap();
        let mut table = ProbabilityTable::default();
        if let Some(row) = table.symptom_given_disease.get_mut("Fever") {
            row.insert("Influenza".to_string(), 1.4);
        }
        let path = temp.path().join("table.json");
        std::fs::write(&path, serde_json::to_string(&table).unwrap()).unwrap();

        let options = ConfigOptions {
            table_path: Some(path),
            ..Default::default()
        };
        let err = load_config(&options).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTable(_)));
        let err: ddx_common::Error = err.into();
        assert!(matches!(err, ddx_common::Error::InvalidTable(_)));
        assert_eq!(err.code(), 11);
    }

    #[test]
    fn test_invalid_graph_rejected() {
        let temp = TempDir::new().unwrap();
        let mut graph = SystemGraph::default();
        graph.connections[0].strength = 2.0;
        let path = temp.path().join("graph.json");
        std::fs::write(&path, serde_json::to_string(&graph).unwrap()).unwrap();

        let options = ConfigOptions {
            graph_path: Some(path),
            ..Default::default()
        };
        let err = load_config(&options).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGraph(_)));
        let err: ddx_common::Error = err.into();
        assert!(matches!(err, ddx_common::Error::InvalidGraph(_)));
        assert_eq!(err.code(), 12);
    }

    #[test]
    fn test_version_mismatch_maps_to_schema_validation() {
        let err: ddx_common::Error = ConfigError::VersionMismatch {
            path: PathBuf::from("table.json"),
            expected: "1.0.0".to_string(),
            actual: "0.9.0".to_string(),
        }
        .into();
        assert_eq!(err.code(), 13);
        assert!(err.to_string().contains("expected 1.0.0, got 0.9.0"));
    }

    #[test]
    fn test_row_only_disease_is_adopted_on_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("table.json");
        std::fs::write(
            &path,
            r#"{
                "schema_version": "1.0.0",
                "diseases": ["Flu"],
                "priors": {"Flu": 1.0},
                "symptom_given_disease": {"Fever": {"Flu": 0.9, "Measles": 0.8}}
            }"#,
        )
        .unwrap();

        let options = ConfigOptions {
            table_path: Some(path),
            ..Default::default()
        };
        let config = load_config(&options).unwrap();
        assert_eq!(config.table.diseases, vec!["Flu", "Measles"]);
    }

    #[test]
    fn test_config_error_maps_to_common_error() {
        let err: ddx_common::Error = ConfigError::NotFound {
            path: PathBuf::from("x.json"),
        }
        .into();
        assert_eq!(err.code(), 10);
    }
}
