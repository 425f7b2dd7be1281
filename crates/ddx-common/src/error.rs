//! Error types for ddx.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for automation
//! - Remediation suggestions for humans
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Invalid Probability Table
//!   Reason: invalid probability table: Invalid value for symptom_given_disease.Fever.Influenza: Must be in [0, 1], got 1.4
//!   Fix: Run 'ddx config validate' to locate the problem, or remove table.json to use defaults.
//! ```
//!
//! # Agent-Facing Output
//!
//! ```json
//! {
//!   "code": 20,
//!   "category": "input",
//!   "message": "unknown symptom: Hiccups",
//!   "recoverable": true,
//!   "suggested_action": "fix_input",
//!   "context": { "symptom": "Hiccups" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for ddx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration file errors (table, graph, schema).
    Config,
    /// Caller-supplied symptoms, diseases, or systems.
    Input,
    /// Bayesian inference and numerical errors.
    Inference,
    /// Session management errors.
    Session,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Inference => write!(f, "inference"),
            ErrorCategory::Session => write!(f, "session"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Suggested actions for agents to take in response to errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Retry the operation.
    Retry,
    /// Reset configuration to defaults.
    ResetConfig,
    /// Run validation/check command.
    RunCheck,
    /// Correct the offending input and resubmit.
    FixInput,
    /// Start a fresh session.
    StartSession,
    /// Abort the operation.
    Abort,
}

impl std::fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestedAction::Retry => write!(f, "retry"),
            SuggestedAction::ResetConfig => write!(f, "reset_config"),
            SuggestedAction::RunCheck => write!(f, "run_check"),
            SuggestedAction::FixInput => write!(f, "fix_input"),
            SuggestedAction::StartSession => write!(f, "start_session"),
            SuggestedAction::Abort => write!(f, "abort"),
        }
    }
}

/// Unified error type for ddx.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid probability table: {0}")]
    InvalidTable(String),

    #[error("invalid system graph: {0}")]
    InvalidGraph(String),

    #[error("schema validation failed: {0}")]
    SchemaValidation(String),

    // Input errors (20-29)
    #[error("unknown symptom: {symptom}")]
    UnknownSymptom { symptom: String },

    #[error("unknown disease: {disease}")]
    UnknownDisease { disease: String },

    // Inference errors (30-39)
    #[error("inference failed: {0}")]
    Inference(String),

    // Session errors (50-59)
    #[error("session not found: {session_id}")]
    SessionNotFound { session_id: String },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Input errors
    /// - 30-39: Inference errors
    /// - 50-59: Session errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidTable(_) => 11,
            Error::InvalidGraph(_) => 12,
            Error::SchemaValidation(_) => 13,
            Error::UnknownSymptom { .. } => 20,
            Error::UnknownDisease { .. } => 21,
            Error::Inference(_) => 30,
            Error::SessionNotFound { .. } => 50,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_)
            | Error::InvalidTable(_)
            | Error::InvalidGraph(_)
            | Error::SchemaValidation(_) => ErrorCategory::Config,

            Error::UnknownSymptom { .. } | Error::UnknownDisease { .. } => ErrorCategory::Input,

            Error::Inference(_) => ErrorCategory::Inference,

            Error::SessionNotFound { .. } => ErrorCategory::Session,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_)
            | Error::InvalidTable(_)
            | Error::InvalidGraph(_)
            | Error::SchemaValidation(_) => true,

            // Input: resubmit with corrected names
            Error::UnknownSymptom { .. } | Error::UnknownDisease { .. } => true,

            Error::Inference(_) => true,

            Error::SessionNotFound { .. } => false,

            Error::Io(_) => true,
            Error::Json(_) => false,
        }
    }

    /// Returns the suggested action for agents.
    pub fn suggested_action(&self) -> SuggestedAction {
        match self {
            Error::Config(_) => SuggestedAction::RunCheck,
            Error::InvalidTable(_) => SuggestedAction::ResetConfig,
            Error::InvalidGraph(_) => SuggestedAction::ResetConfig,
            Error::SchemaValidation(_) => SuggestedAction::RunCheck,
            Error::UnknownSymptom { .. } => SuggestedAction::FixInput,
            Error::UnknownDisease { .. } => SuggestedAction::FixInput,
            Error::Inference(_) => SuggestedAction::Retry,
            Error::SessionNotFound { .. } => SuggestedAction::StartSession,
            Error::Io(_) => SuggestedAction::Retry,
            Error::Json(_) => SuggestedAction::Abort,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => {
                "Run 'ddx config validate' to check configuration, or check syntax in config files."
            }
            Error::InvalidTable(_) => {
                "Run 'ddx config validate' to locate the problem, or remove table.json to use defaults."
            }
            Error::InvalidGraph(_) => {
                "Run 'ddx config validate' to locate the problem, or remove graph.json to use defaults."
            }
            Error::SchemaValidation(_) => {
                "Ensure configuration files carry the expected schema_version. See 'ddx schema ProbabilityTable'."
            }
            Error::UnknownSymptom { .. } => {
                "Use a symptom name from the loaded table. List them with 'ddx config show'."
            }
            Error::UnknownDisease { .. } => {
                "Use a disease name from the loaded table. List them with 'ddx config show'."
            }
            Error::Inference(_) => "Retry with fewer observations. If persistent, report as a bug.",
            Error::SessionNotFound { .. } => {
                "The session has been closed or never existed. Start a new session."
            }
            Error::Io(_) => "Check file permissions and disk space, then retry.",
            Error::Json(_) => "The input is not valid JSON for this command.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::InvalidTable(_) => "Invalid Probability Table",
            Error::InvalidGraph(_) => "Invalid System Graph",
            Error::SchemaValidation(_) => "Schema Validation Failed",
            Error::UnknownSymptom { .. } => "Unknown Symptom",
            Error::UnknownDisease { .. } => "Unknown Disease",
            Error::Inference(_) => "Inference Error",
            Error::SessionNotFound { .. } => "Session Not Found",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Suggested action for agents.
    pub suggested_action: SuggestedAction,

    /// Additional structured context (e.g., symptom name, session id).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::UnknownSymptom { symptom } => {
                context.insert("symptom".to_string(), serde_json::json!(symptom));
            }
            Error::UnknownDisease { disease } => {
                context.insert("disease".to_string(), serde_json::json!(disease));
            }
            Error::SessionNotFound { session_id } => {
                context.insert("session_id".to_string(), serde_json::json!(session_id));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            suggested_action: err.suggested_action(),
            context,
        }
    }
}

impl StructuredError {
    /// Add additional context to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_grouped_by_category() {
        let cases = [
            (Error::InvalidTable("x".into()), ErrorCategory::Config, 11),
            (
                Error::UnknownSymptom {
                    symptom: "Hiccups".into(),
                },
                ErrorCategory::Input,
                20,
            ),
            (Error::InvalidGraph("x".into()), ErrorCategory::Config, 12),
            (
                Error::Inference("no diagnosis".into()),
                ErrorCategory::Inference,
                30,
            ),
            (
                Error::SessionNotFound {
                    session_id: "dx-x".into(),
                },
                ErrorCategory::Session,
                50,
            ),
        ];
        for (err, category, code) in cases {
            assert_eq!(err.category(), category);
            assert_eq!(err.code(), code);
        }
    }

    #[test]
    fn test_structured_error_context() {
        let err = Error::UnknownSymptom {
            symptom: "Hiccups".into(),
        };
        let structured = StructuredError::from(&err);
        assert_eq!(structured.code, 20);
        assert_eq!(structured.suggested_action, SuggestedAction::FixInput);
        assert_eq!(
            structured.context.get("symptom"),
            Some(&serde_json::json!("Hiccups"))
        );
        let json = structured.to_json();
        assert!(json.contains("\"category\":\"input\""));
        assert!(json.contains("\"suggested_action\":\"fix_input\""));
    }

    #[test]
    fn test_with_context() {
        let err = Error::Inference("no diagnosis available".into());
        let structured = StructuredError::from(&err).with_context("command", "explain");
        assert_eq!(
            structured.context.get("command"),
            Some(&serde_json::json!("explain"))
        );
        assert_eq!(structured.suggested_action, SuggestedAction::Retry);
    }

    #[test]
    fn test_format_error_human_plain() {
        let err = Error::UnknownDisease {
            disease: "Scurvy".into(),
        };
        let text = format_error_human(&err, false);
        assert!(text.starts_with("✗ Unknown Disease"));
        assert!(text.contains("Reason: unknown disease: Scurvy"));
        assert!(text.contains("Fix: Use a disease name"));
        assert!(!text.contains("\x1b["));
    }

    #[test]
    fn test_io_error_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert_eq!(err.code(), 60);
        assert!(err.is_recoverable());
    }
}
