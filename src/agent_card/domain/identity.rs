//! Agent name and version values.

use super::AgentCardDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_NAME_LENGTH: usize = 64;
const MAX_VERSION_LENGTH: usize = 32;

/// Human-readable agent name.
///
/// Restricted to printable ASCII (`0x20..=0x7E`). An empty name is storable;
/// the strict export refuses it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AgentName(String);

impl AgentName {
    /// Creates a validated agent name.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCardDomainError::AgentNameTooLong`] or
    /// [`AgentCardDomainError::InvalidAgentName`].
    pub fn new(value: impl Into<String>) -> Result<Self, AgentCardDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        if normalized.chars().count() > MAX_NAME_LENGTH {
            return Err(AgentCardDomainError::AgentNameTooLong(raw));
        }
        if !normalized.chars().all(|c| matches!(c, ' '..='~')) {
            return Err(AgentCardDomainError::InvalidAgentName(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AgentName {
    type Error = AgentCardDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AgentName> for String {
    fn from(value: AgentName) -> Self {
        value.0
    }
}

/// Agent version label such as `1.0.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AgentVersion(String);

impl AgentVersion {
    /// Creates a validated agent version.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCardDomainError::EmptyAgentVersion`] or
    /// [`AgentCardDomainError::AgentVersionTooLong`].
    pub fn new(value: impl Into<String>) -> Result<Self, AgentCardDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        if normalized.is_empty() {
            return Err(AgentCardDomainError::EmptyAgentVersion);
        }
        if normalized.chars().count() > MAX_VERSION_LENGTH {
            return Err(AgentCardDomainError::AgentVersionTooLong(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the version as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AgentVersion {
    type Error = AgentCardDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AgentVersion> for String {
    fn from(value: AgentVersion) -> Self {
        value.0
    }
}
