//! Agent version selector of a case.

use crate::agent_card::domain::{AgentCardDomainError, AgentVersion};
use serde::{Deserialize, Serialize};
use std::fmt;

const ANY_VERSION: &str = "*";
const LATEST_VERSION: &str = "latest";

/// Which versions of the bound agent a case applies to.
///
/// A blank selector is read as [`VersionSelector::Any`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VersionSelector {
    /// Every version (`*` or blank).
    #[default]
    Any,
    /// Whichever version is current (`latest`).
    Latest,
    /// One exact version.
    Exact(AgentVersion),
}

impl VersionSelector {
    /// Parses a selector.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCardDomainError::AgentVersionTooLong`] when an exact
    /// version exceeds the version length limit.
    pub fn new(value: impl Into<String>) -> Result<Self, AgentCardDomainError> {
        let raw = value.into();
        match raw.trim() {
            "" | ANY_VERSION => Ok(Self::Any),
            LATEST_VERSION => Ok(Self::Latest),
            exact => AgentVersion::new(exact).map(Self::Exact),
        }
    }

    /// Returns the stored form of the selector.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Any => ANY_VERSION,
            Self::Latest => LATEST_VERSION,
            Self::Exact(version) => version.as_str(),
        }
    }

    /// Returns whether a case with this selector applies to `version`.
    ///
    /// Wildcard and `latest` selectors apply to every version.
    #[must_use]
    pub fn admits(&self, version: &str) -> bool {
        match self {
            Self::Any | Self::Latest => true,
            Self::Exact(exact) => exact.as_str() == version.trim(),
        }
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for VersionSelector {
    type Error = AgentCardDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VersionSelector> for String {
    fn from(value: VersionSelector) -> Self {
        value.as_str().to_owned()
    }
}
