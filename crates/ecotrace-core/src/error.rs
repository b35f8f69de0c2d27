// crates/ecotrace-core/src/error.rs

use thiserror::Error;

/// Error types shared across the EcoTrace workspace.
#[derive(Debug, Error)]
pub enum EcoTraceError {
    /// A single model's output cannot be used (unknown verdict label,
    /// out-of-range confidence, self-contradicting score, reported failure).
    #[error("Malformed output from model '{model}': {reason}")]
    MalformedOutput { model: String, reason: String },

    /// Not a single model output survived normalization.
    #[error("No analysis possible: zero usable model outputs")]
    NoAnalysisPossible,

    /// Configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Caller-supplied input failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage layer error (RocksDB, lock poisoning).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A record with the same key already exists. Analyses are immutable.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl EcoTraceError {
    /// Shorthand for building a `MalformedOutput` error.
    pub fn malformed(model: impl Into<String>, reason: impl Into<String>) -> Self {
        EcoTraceError::MalformedOutput {
            model: model.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for EcoTraceError {
    fn from(e: serde_json::Error) -> Self {
        EcoTraceError::Serialization(e.to_string())
    }
}
