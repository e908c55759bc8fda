//! Error types for registry operations.
//!
//! Provides a unified error type covering I/O, serialization and registry
//! validation failures.

use thiserror::Error;

use crate::validate::ValidationError;

/// Errors that can occur while loading or saving a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The registry loaded but failed validation.
    #[error("invalid registry: {0}")]
    Invalid(#[from] ValidationError),

    /// All configured catalog sources failed.
    #[error("no registry sources available")]
    NoSourcesAvailable,
}

/// Convenience alias for results with [`RegistryError`].
pub type Result<T> = std::result::Result<T, RegistryError>;
