//! Namespace identifier.

use super::NamespaceDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_NAMESPACE_ID_LENGTH: usize = 128;

/// Namespace key such as `dev` or `lab-instruments`.
///
/// Contains only ASCII letters, digits, underscores, and hyphens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NamespaceId(String);

impl NamespaceId {
    /// Creates a validated namespace identifier.
    ///
    /// # Errors
    ///
    /// Returns [`NamespaceDomainError::EmptyNamespaceId`],
    /// [`NamespaceDomainError::NamespaceIdTooLong`], or
    /// [`NamespaceDomainError::InvalidNamespaceId`].
    pub fn new(value: impl Into<String>) -> Result<Self, NamespaceDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        if normalized.is_empty() {
            return Err(NamespaceDomainError::EmptyNamespaceId);
        }
        if normalized.len() > MAX_NAMESPACE_ID_LENGTH {
            return Err(NamespaceDomainError::NamespaceIdTooLong(raw));
        }
        let is_valid = normalized
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !is_valid {
            return Err(NamespaceDomainError::InvalidNamespaceId(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NamespaceId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for NamespaceId {
    type Error = NamespaceDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NamespaceId> for String {
    fn from(value: NamespaceId) -> Self {
        value.0
    }
}
