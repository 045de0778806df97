//! Error types for template operations

use thiserror::Error;

/// Errors surfaced by the template store.
///
/// Storage faults on the collection and pointer slots are absorbed by the
/// store; only structural violations reach callers.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Attempt to delete the reserved default template
    #[error("Template is protected and cannot be deleted: {0}")]
    ProtectedEntity(String),

    /// Template not found
    #[error("Template not found: {0}")]
    NotFound(String),

    /// Import payload is not a template
    #[error("Invalid template format: {0}")]
    InvalidFormat(String),

    /// Identity already stored (strict mode only)
    #[error("Template already exists: {0}")]
    AlreadyExists(String),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for template operations
pub type TemplateResult<T> = std::result::Result<T, TemplateError>;
