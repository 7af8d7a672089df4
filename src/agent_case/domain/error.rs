//! Error types for agent case validation.

use crate::agent_card::domain::AgentCardDomainError;
use thiserror::Error;

/// Errors returned while constructing or editing agent cases.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AgentCaseDomainError {
    /// The case name is empty after trimming.
    #[error("case name must not be empty")]
    EmptyCaseName,

    /// The case name exceeds the 255-character storage limit.
    #[error("case name exceeds 255 character limit: {0}")]
    CaseNameTooLong(String),

    /// The query key exceeds the 255-character storage limit.
    #[error("query key exceeds 255 character limit: {0}")]
    QueryKeyTooLong(String),

    /// The score is NaN or infinite.
    #[error("case score must be a finite number, got {0}")]
    NonFiniteScore(f64),

    /// An exact version selector is not a valid agent version.
    #[error(transparent)]
    Version(#[from] AgentCardDomainError),
}
