//! Registry configuration.
//!
//! Configuration is a plain value passed to the services that need it; there
//! is no process-wide settings object.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Protocol version stamped on new agent cards when none is supplied.
pub const DEFAULT_PROTOCOL_VERSION: &str = "0.3.0";

/// URL prefix accepted without TLS in the default policy.
pub const DEFAULT_INSECURE_PREFIX: &str = "http://localhost";

/// Policy deciding which agent endpoint URLs are acceptable.
///
/// Endpoints must use `https://` unless they start with one of the
/// configured local/dev prefixes.
///
/// # Examples
///
/// ```
/// use agentcards::config::UrlPolicy;
///
/// let policy = UrlPolicy::default();
/// assert!(policy.allows("https://agents.example.com/a2a"));
/// assert!(policy.allows("http://localhost:8080/a2a"));
/// assert!(!policy.allows("http://agents.example.com/a2a"));
///
/// assert!(!UrlPolicy::strict().allows("http://localhost:8080/a2a"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlPolicy {
    /// Prefixes allowed to bypass the `https://` requirement.
    pub insecure_prefixes: Vec<String>,
}

impl Default for UrlPolicy {
    fn default() -> Self {
        Self {
            insecure_prefixes: vec![DEFAULT_INSECURE_PREFIX.to_owned()],
        }
    }
}

impl UrlPolicy {
    /// Creates a policy with explicit insecure prefixes.
    #[must_use]
    pub fn new(prefixes: impl IntoIterator<Item = String>) -> Self {
        Self {
            insecure_prefixes: prefixes.into_iter().collect(),
        }
    }

    /// Creates a policy without any local/dev exception.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            insecure_prefixes: Vec::new(),
        }
    }

    /// Returns whether `url` satisfies the policy.
    #[must_use]
    pub fn allows(&self, url: &str) -> bool {
        url.starts_with("https://")
            || self
                .insecure_prefixes
                .iter()
                .any(|prefix| url.starts_with(prefix.as_str()))
    }
}

/// Top-level configuration for the registry services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Endpoint URL policy applied at storage time.
    pub url_policy: UrlPolicy,
    /// Protocol version used when a card does not declare one.
    pub default_protocol_version: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url_policy: UrlPolicy::default(),
            default_protocol_version: DEFAULT_PROTOCOL_VERSION.to_owned(),
        }
    }
}

impl RegistryConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the URL policy.
    #[must_use]
    pub fn with_url_policy(mut self, policy: UrlPolicy) -> Self {
        self.url_policy = policy;
        self
    }

    /// Replaces the default protocol version.
    #[must_use]
    pub fn with_default_protocol_version(mut self, version: impl Into<String>) -> Self {
        self.default_protocol_version = version.into();
        self
    }

    /// Parses configuration from a JSON document; absent keys keep defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the document is not valid JSON or
    /// a key has the wrong shape, and [`ConfigError::EmptyProtocolVersion`]
    /// when the protocol version is blank.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        if config.default_protocol_version.trim().is_empty() {
            return Err(ConfigError::EmptyProtocolVersion);
        }
        Ok(config)
    }
}

/// Errors returned while loading registry configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    #[error("invalid registry configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured default protocol version is blank.
    #[error("default protocol version must not be empty")]
    EmptyProtocolVersion,
}
