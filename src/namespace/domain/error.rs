//! Error types for namespace validation.

use thiserror::Error;

/// Errors returned while constructing namespace values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NamespaceDomainError {
    /// The namespace identifier is empty after trimming.
    #[error("namespace identifier must not be empty")]
    EmptyNamespaceId,

    /// The identifier contains characters outside `[A-Za-z0-9_-]`.
    #[error(
        "namespace identifier '{0}' may only contain letters, digits, underscores, and hyphens"
    )]
    InvalidNamespaceId(String),

    /// The identifier exceeds the 128-character storage limit.
    #[error("namespace identifier exceeds 128 character limit: {0}")]
    NamespaceIdTooLong(String),

    /// The display name is empty after trimming.
    #[error("namespace name must not be empty")]
    EmptyName,

    /// The display name exceeds the 255-character storage limit.
    #[error("namespace name exceeds 255 character limit: {0}")]
    NameTooLong(String),
}
