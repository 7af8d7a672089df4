//! Error types for agent card validation.

use crate::validation::ValidationReport;
use thiserror::Error;

/// Errors returned while constructing or editing agent card values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgentCardDomainError {
    /// The agent name contains characters outside printable ASCII.
    #[error("agent name '{0}' may only contain printable ASCII characters")]
    InvalidAgentName(String),

    /// The agent name exceeds the 64-character storage limit.
    #[error("agent name exceeds 64 character limit: {0}")]
    AgentNameTooLong(String),

    /// The agent version is empty after trimming.
    #[error("agent version must not be empty")]
    EmptyAgentVersion,

    /// The agent version exceeds the 32-character storage limit.
    #[error("agent version exceeds 32 character limit: {0}")]
    AgentVersionTooLong(String),

    /// No extension with the given URI is attached to the card.
    #[error("agent card has no extension with URI '{0}'")]
    UnknownExtension(String),

    /// An extension record could not be bound.
    #[error(transparent)]
    Extension(#[from] ExtensionError),
}

/// Errors returned while binding an extension record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtensionError {
    /// Neither the draft nor a referenced schema supplies a URI.
    #[error("extension URI must not be empty")]
    EmptyUri,

    /// The URI exceeds the 512-character storage limit.
    #[error("extension URI exceeds 512 character limit: {0}")]
    UriTooLong(String),

    /// The draft URI differs from the referenced schema's URI.
    #[error("extension URI '{uri}' does not match schema URI '{schema_uri}'")]
    UriMismatch {
        /// URI supplied by the caller.
        uri: String,
        /// URI of the referenced schema.
        schema_uri: String,
    },

    /// The params value is not a JSON object.
    #[error("extension params must be a JSON object")]
    ParamsNotObject,

    /// The params do not conform to the referenced schema.
    #[error("extension params for '{uri}' do not match the schema:\n{report}")]
    InvalidParams {
        /// URI of the extension being bound.
        uri: String,
        /// Every violation found in the params.
        report: ValidationReport,
    },
}
