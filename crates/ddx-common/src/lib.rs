//! ddx common types, IDs, and errors.
//!
//! This crate provides foundational types shared across ddx-core modules:
//! - Session identity
//! - Common error types
//! - Output format selection

pub mod error;
pub mod id;
pub mod output;

pub use error::{Error, Result};
pub use id::SessionId;
pub use output::OutputFormat;
