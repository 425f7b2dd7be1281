//! Structured event vocabulary for logging.
//!
//! Every event carries the run ID, the session ID when one exists, and the
//! pipeline stage that produced it.

use serde::{Deserialize, Serialize};

/// Stages of the diagnostic pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and configuration loading.
    Init,
    /// Recording symptom observations.
    Observe,
    /// Posterior updates.
    Infer,
    /// Follow-up question selection.
    Suggest,
    /// Differential and reasoning explanations.
    Explain,
    /// Body-system analysis.
    Systems,
    /// Report rendering.
    Report,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Observe => "observe",
            Stage::Infer => "infer",
            Stage::Suggest => "suggest",
            Stage::Explain => "explain",
            Stage::Systems => "systems",
            Stage::Report => "report",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used as tracing targets.
pub mod event_names {
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    pub const SESSION_STARTED: &str = "session.started";
    pub const SESSION_RESET: &str = "session.reset";

    pub const OBSERVE_RECORDED: &str = "observe.recorded";
    pub const OBSERVE_UNCHANGED: &str = "observe.unchanged";
    pub const OBSERVE_UNKNOWN: &str = "observe.unknown";
    pub const OBSERVE_INTAKE: &str = "observe.intake";

    pub const INFER_LEADER_CHANGED: &str = "infer.leader_changed";

    pub const SUGGEST_REFRESHED: &str = "suggest.refreshed";

    pub const EXPLAIN_BUILT: &str = "explain.built";

    pub const SYSTEMS_ASSESSED: &str = "systems.assessed";

    pub const REPORT_BUILT: &str = "report.built";

    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_ERROR: &str = "config.error";
}

/// Correlation IDs shared by every event of one run or session.
#[derive(Debug, Clone)]
pub struct LogContext {
    /// Unique ID for this invocation.
    pub run_id: String,
    /// Session ID (if a session has been created).
    pub session_id: Option<String>,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
            session_id: None,
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}
