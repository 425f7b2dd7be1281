//! ddx core library.
//!
//! This library provides the diagnostic engines and everything around them:
//! - Sequential Bayesian differential diagnosis (`inference`, `decision`)
//! - Body-systems association analysis (`systems`)
//! - Per-conversation sessions that tie the two together (`session`)
//! - Configuration loading, logging, exit codes, and JSON schemas
//!
//! The binary entry point is in `main.rs`.

pub mod config;
pub mod decision;
pub mod exit_codes;
pub mod inference;
pub mod logging;
pub mod schema;
pub mod session;
pub mod systems;

pub use inference::{BayesianEngine, Diagnosis};
pub use session::{DiagnosticSession, ObservationOutcome, SessionRegistry, SessionReport};
pub use systems::SystemsEngine;
