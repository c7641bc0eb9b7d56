//! Error types for the ritmo engine.

use thiserror::Error;

/// Errors that can occur in engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid recurrence rule: {field}: {reason}")]
    InvalidRule { field: &'static str, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Store request timed out after {0}s")]
    StoreTimeout(u64),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
