//! Disease prior and symptom likelihood configuration types.
//!
//! A [`ProbabilityTable`] is the static knowledge base consumed by the
//! Bayesian engine: the ordered disease list, a prior per disease, and
//! `P(symptom present | disease)` for each known symptom.

use std::collections::BTreeMap;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;

/// Likelihood used for a (symptom, disease) pair with no configured value.
pub const NEUTRAL_LIKELIHOOD: f64 = 0.5;

/// `P(symptom present | disease)` keyed by disease name.
pub type SymptomRow = BTreeMap<String, f64>;

/// Complete probability table configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProbabilityTable {
    pub schema_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Ordered disease list.
    pub diseases: Vec<String>,

    /// Prior probability per disease. Need not sum to one.
    pub priors: BTreeMap<String, f64>,

    /// Symptom name → disease name → P(present | disease).
    pub symptom_given_disease: BTreeMap<String, SymptomRow>,
}

impl Default for ProbabilityTable {
    fn default() -> Self {
        crate::defaults::default_table()
    }
}

impl ProbabilityTable {
    /// Build a table from optional parts, filling omitted parts from the
    /// built-in defaults.
    ///
    /// Diseases that appear only in the priors or in a symptom row are
    /// appended to the disease list.
    pub fn from_parts(
        diseases: Option<Vec<String>>,
        priors: Option<BTreeMap<String, f64>>,
        symptom_given_disease: Option<BTreeMap<String, SymptomRow>>,
    ) -> Self {
        let defaults = Self::default();
        let all_default = diseases.is_none() && priors.is_none() && symptom_given_disease.is_none();

        ProbabilityTable {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            description: if all_default { defaults.description } else { None },
            diseases: diseases.unwrap_or(defaults.diseases),
            priors: priors.unwrap_or(defaults.priors),
            symptom_given_disease: symptom_given_disease.unwrap_or(defaults.symptom_given_disease),
        }
        .with_implied_diseases()
    }

    /// Append diseases named only in the priors or a symptom row, in the
    /// order they are first seen.
    pub fn with_implied_diseases(mut self) -> Self {
        let extra: Vec<String> = self
            .priors
            .keys()
            .chain(self.symptom_given_disease.values().flat_map(|row| row.keys()))
            .cloned()
            .collect();
        for name in extra {
            if !self.diseases.contains(&name) {
                self.diseases.push(name);
            }
        }
        self
    }

    /// Load a table from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_str(&content)
    }

    /// Parse a table from a JSON string.
    ///
    /// Diseases implied by the priors or rows join the disease list, as with
    /// [`ProbabilityTable::from_parts`].
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str::<Self>(json)
            .map(Self::with_implied_diseases)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Configured prior for a disease, or 0.0 when it has none.
    pub fn prior(&self, disease: &str) -> f64 {
        self.priors.get(disease).copied().unwrap_or(0.0)
    }

    /// Whether the symptom has a likelihood row.
    pub fn has_symptom(&self, symptom: &str) -> bool {
        self.symptom_given_disease.contains_key(symptom)
    }

    /// Whether the disease is part of the knowledge base.
    pub fn has_disease(&self, disease: &str) -> bool {
        self.diseases.iter().any(|d| d == disease)
    }

    /// Likelihood row for a symptom.
    pub fn row(&self, symptom: &str) -> Option<&SymptomRow> {
        self.symptom_given_disease.get(symptom)
    }

    /// Configured `P(symptom | disease)`, if any.
    pub fn configured_likelihood(&self, symptom: &str, disease: &str) -> Option<f64> {
        self.row(symptom).and_then(|row| row.get(disease)).copied()
    }

    /// `P(symptom | disease)`, falling back to [`NEUTRAL_LIKELIHOOD`].
    pub fn likelihood(&self, symptom: &str, disease: &str) -> f64 {
        self.configured_likelihood(symptom, disease)
            .unwrap_or(NEUTRAL_LIKELIHOOD)
    }

    /// Known symptom names in lexical order.
    pub fn symptoms(&self) -> impl Iterator<Item = &str> {
        self.symptom_given_disease.keys().map(String::as_str)
    }

    /// Sum of configured priors.
    pub fn prior_mass(&self) -> f64 {
        self.priors.values().sum()
    }
}
