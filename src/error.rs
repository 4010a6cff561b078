//! Persona engine errors.

use thiserror::Error;

/// Errors that can occur while building or driving a persona session.
///
/// "Not applicable" situations (drifting a categorical locus, writing a
/// default to a categorical locus) are not errors: those calls return a
/// `NoOp` outcome instead.
#[derive(Debug, Error)]
pub enum PersonaError {
    /// Unknown locus id, preset name, or other lookup key.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A genome mutation was attempted after the lifecycle reached LOCKED.
    #[error("Persona is locked: {0} rejected")]
    Locked(String),

    /// History index beyond the current ring length.
    #[error("History index {index} out of range (len {len})")]
    OutOfRange { index: usize, len: usize },

    /// Genome, rule matrix, or config failed validation at construction.
    #[error("Validation error: {0}")]
    Validation(String),

    /// YAML parsing or serialization failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing or serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, PersonaError>;
