//! Editable protocol body of an agent card.

use super::{CardCapabilities, Transport};
use crate::config::DEFAULT_PROTOCOL_VERSION;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Everything an agent card advertises besides its identity and extensions.
///
/// Keys serialise in camelCase, matching the protocol document. Structured
/// members (skills, provider, interfaces, security) are kept as JSON and
/// checked by the storage rules rather than typed here, so documents written
/// by newer protocol revisions survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardProfile {
    /// Protocol revision the card targets.
    pub protocol_version: String,
    /// Free-text description of the agent.
    pub description: String,
    /// Endpoint URL.
    pub url: String,
    /// Preferred transport.
    pub preferred_transport: Transport,
    /// Capability flags.
    pub capabilities: CardCapabilities,
    /// MIME types accepted by default.
    pub default_input_modes: Vec<String>,
    /// MIME types produced by default.
    pub default_output_modes: Vec<String>,
    /// Skill objects.
    pub skills: Vec<Value>,
    /// Provider object with `organization` and `url`.
    pub provider: Option<Value>,
    /// Icon URL.
    pub icon_url: Option<String>,
    /// Documentation URL.
    pub documentation_url: Option<String>,
    /// Additional endpoint interfaces.
    pub additional_interfaces: Vec<Value>,
    /// Security scheme definitions keyed by scheme name.
    pub security_schemes: Map<String, Value>,
    /// Security requirements.
    pub security: Vec<Value>,
    /// Whether an authenticated extended card is available.
    pub supports_authenticated_extended_card: bool,
    /// Card signatures.
    pub signatures: Vec<Value>,
}

impl Default for CardProfile {
    fn default() -> Self {
        Self {
            protocol_version: DEFAULT_PROTOCOL_VERSION.to_owned(),
            description: String::new(),
            url: String::new(),
            preferred_transport: Transport::default(),
            capabilities: CardCapabilities::default(),
            default_input_modes: Vec::new(),
            default_output_modes: Vec::new(),
            skills: Vec::new(),
            provider: None,
            icon_url: None,
            documentation_url: None,
            additional_interfaces: Vec::new(),
            security_schemes: Map::new(),
            security: Vec::new(),
            supports_authenticated_extended_card: false,
            signatures: Vec::new(),
        }
    }
}

impl CardProfile {
    /// Creates an empty profile targeting the default protocol version.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the endpoint URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the preferred transport.
    #[must_use]
    pub const fn with_transport(mut self, transport: Transport) -> Self {
        self.preferred_transport = transport;
        self
    }

    /// Sets the capability flags.
    #[must_use]
    pub const fn with_capabilities(mut self, capabilities: CardCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Sets the default input and output MIME types.
    #[must_use]
    pub fn with_modes<I, O>(mut self, input: I, output: O) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        self.default_input_modes = input.into_iter().map(Into::into).collect();
        self.default_output_modes = output.into_iter().map(Into::into).collect();
        self
    }

    /// Appends a skill object.
    #[must_use]
    pub fn with_skill(mut self, skill: Value) -> Self {
        self.skills.push(skill);
        self
    }

    /// Sets the provider object.
    #[must_use]
    pub fn with_provider(mut self, provider: Value) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Returns the provider when it carries any data.
    #[must_use]
    pub fn provider_if_set(&self) -> Option<&Value> {
        self.provider.as_ref().filter(|value| !is_empty_json(value))
    }

    /// Returns the icon URL when it is non-blank.
    #[must_use]
    pub fn icon_url_if_set(&self) -> Option<&str> {
        non_blank(self.icon_url.as_deref())
    }

    /// Returns the documentation URL when it is non-blank.
    #[must_use]
    pub fn documentation_url_if_set(&self) -> Option<&str> {
        non_blank(self.documentation_url.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

/// Returns `true` for `null`, `{}`, `[]`, and `""`.
pub(super) fn is_empty_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(text) => text.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
