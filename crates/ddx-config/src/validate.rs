//! Configuration validation errors and semantic validation.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::graph::{SystemGraph, SystemWeights};
use crate::table::ProbabilityTable;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::MissingField(_) => 64,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

fn check_version(actual: &str) -> ValidationResult<()> {
    if actual != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: actual.to_string(),
        });
    }
    Ok(())
}

fn check_probability(field: String, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::InvalidValue {
            field,
            message: format!("Must be in [0, 1], got {}", value),
        });
    }
    Ok(())
}

/// Validate a probability table semantically.
pub fn validate_table(table: &ProbabilityTable) -> ValidationResult<()> {
    check_version(&table.schema_version)?;

    if table.diseases.is_empty() {
        return Err(ValidationError::MissingField("diseases".to_string()));
    }

    let mut seen = BTreeSet::new();
    for disease in &table.diseases {
        if !seen.insert(disease.as_str()) {
            return Err(ValidationError::SemanticError(format!(
                "Disease '{}' listed more than once",
                disease
            )));
        }
    }

    for (disease, prior) in &table.priors {
        if !prior.is_finite() || *prior < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: format!("priors.{}", disease),
                message: format!("Must be finite and non-negative, got {}", prior),
            });
        }
    }

    let mass = table.prior_mass();
    if mass <= 0.0 {
        return Err(ValidationError::SemanticError(format!(
            "Priors must have positive total mass, got {}",
            mass
        )));
    }

    for (symptom, row) in &table.symptom_given_disease {
        for (disease, p) in row {
            check_probability(
                format!("symptom_given_disease.{}.{}", symptom, disease),
                *p,
            )?;
        }
    }

    Ok(())
}

fn check_weights(prefix: &str, name: &str, weights: &SystemWeights) -> ValidationResult<()> {
    for (system, w) in weights {
        check_probability(format!("{}.{}.{}", prefix, name, system), *w)?;
    }
    Ok(())
}

/// Validate a body-system graph semantically.
pub fn validate_graph(graph: &SystemGraph) -> ValidationResult<()> {
    check_version(&graph.schema_version)?;

    let mut edges = BTreeSet::new();
    for conn in &graph.connections {
        if conn.from == conn.to {
            return Err(ValidationError::SemanticError(format!(
                "Connection from {} to itself",
                conn.from
            )));
        }
        if !edges.insert((conn.from, conn.to)) {
            return Err(ValidationError::SemanticError(format!(
                "Connection {} -> {} defined more than once",
                conn.from, conn.to
            )));
        }
        check_probability(
            format!("connections.{}->{}", conn.from, conn.to),
            conn.strength,
        )?;
    }

    for (symptom, weights) in &graph.symptom_systems {
        check_weights("symptom_systems", symptom, weights)?;
    }
    for (factor, weights) in &graph.lifestyle_impact {
        check_weights("lifestyle_impact", factor, weights)?;
    }
    for (pattern, weights) in &graph.patterns {
        check_weights("patterns", pattern, weights)?;
        if weights.values().sum::<f64>() <= 0.0 {
            return Err(ValidationError::SemanticError(format!(
                "Pattern '{}' has no positive system weight",
                pattern
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{BodySystem, Connection};

    #[test]
    fn test_default_table_is_valid() {
        validate_table(&ProbabilityTable::default()).unwrap();
    }

    #[test]
    fn test_default_graph_is_valid() {
        validate_graph(&SystemGraph::default()).unwrap();
    }

    #[test]
    fn test_rejects_out_of_range_likelihood() {
        let mut table = ProbabilityTable::default();
        table
            .symptom_given_disease
            .get_mut("Fever")
            .unwrap()
            .insert("Influenza".to_string(), 1.5);
        let err = validate_table(&table).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));
        assert_eq!(err.code(), 65);
    }

    #[test]
    fn test_rejects_zero_prior_mass() {
        let mut table = ProbabilityTable::default();
        for p in table.priors.values_mut() {
            *p = 0.0;
        }
        let err = validate_table(&table).unwrap_err();
        assert!(matches!(err, ValidationError::SemanticError(_)));
    }

    #[test]
    fn test_rejects_version_mismatch() {
        let mut table = ProbabilityTable::default();
        table.schema_version = "0.9.0".to_string();
        let err = validate_table(&table).unwrap_err();
        assert!(matches!(err, ValidationError::VersionMismatch { .. }));
    }

    #[test]
    fn test_rejects_self_loop() {
        let mut graph = SystemGraph::default();
        graph.connections.push(Connection {
            from: BodySystem::Immune,
            to: BodySystem::Immune,
            strength: 0.5,
        });
        assert!(validate_graph(&graph).is_err());
    }

    #[test]
    fn test_rejects_duplicate_edge() {
        let mut graph = SystemGraph::default();
        let first = graph.connections[0];
        graph.connections.push(first);
        let err = validate_graph(&graph).unwrap_err();
        assert!(matches!(err, ValidationError::SemanticError(_)));
    }
}
