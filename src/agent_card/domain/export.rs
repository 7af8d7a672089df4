//! Protocol document exports.

use super::AgentCard;
use super::profile::is_empty_json;
use crate::validation::{ValidationReport, Violation};
use serde_json::{Map, Value, json};
use thiserror::Error;

/// Key of the registry metadata block appended on request.
pub const METADATA_KEY: &str = "_metadata";

/// Errors returned by the strict export.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExportError {
    /// Required protocol fields are blank or empty.
    #[error("agent card is incomplete and cannot be exported:\n{0}")]
    Incomplete(ValidationReport),
}

impl AgentCard {
    /// Builds the protocol document without completeness checks.
    ///
    /// `capabilities` is always an object holding only the enabled flags,
    /// plus `extensions` when the card has any. Optional top-level members
    /// appear only when they carry data. The `_metadata` block is appended
    /// when `include_metadata` is set.
    #[must_use]
    pub fn to_raw_export(&self, include_metadata: bool) -> Value {
        let profile = self.profile();
        let mut document = Map::new();
        document.insert(
            "protocolVersion".to_owned(),
            json!(profile.protocol_version),
        );
        document.insert("name".to_owned(), json!(self.name().as_str()));
        document.insert("description".to_owned(), json!(profile.description));
        document.insert("url".to_owned(), json!(profile.url));
        document.insert(
            "preferredTransport".to_owned(),
            json!(profile.preferred_transport.as_str()),
        );
        document.insert("version".to_owned(), json!(self.version().as_str()));
        document.insert("capabilities".to_owned(), self.capabilities_object());
        document.insert(
            "defaultInputModes".to_owned(),
            json!(profile.default_input_modes),
        );
        document.insert(
            "defaultOutputModes".to_owned(),
            json!(profile.default_output_modes),
        );
        document.insert("skills".to_owned(), json!(profile.skills));

        if let Some(provider) = profile.provider_if_set() {
            document.insert("provider".to_owned(), provider.clone());
        }
        if let Some(icon_url) = profile.icon_url_if_set() {
            document.insert("iconUrl".to_owned(), json!(icon_url));
        }
        if let Some(documentation_url) = profile.documentation_url_if_set() {
            document.insert("documentationUrl".to_owned(), json!(documentation_url));
        }
        insert_non_empty(
            &mut document,
            "additionalInterfaces",
            json!(profile.additional_interfaces),
        );
        insert_non_empty(
            &mut document,
            "securitySchemes",
            Value::Object(profile.security_schemes.clone()),
        );
        insert_non_empty(&mut document, "security", json!(profile.security));
        if profile.supports_authenticated_extended_card {
            document.insert(
                "supportsAuthenticatedExtendedCard".to_owned(),
                Value::Bool(true),
            );
        }
        insert_non_empty(&mut document, "signatures", json!(profile.signatures));

        if include_metadata {
            document.insert(METADATA_KEY.to_owned(), self.metadata_object());
        }
        Value::Object(document)
    }

    /// Collects every missing protocol-required member.
    ///
    /// `name`, `description`, and `url` must be non-blank;
    /// `defaultInputModes`, `defaultOutputModes`, and `skills` must be
    /// non-empty.
    #[must_use]
    pub fn completeness_report(&self) -> ValidationReport {
        let profile = self.profile();
        let mut report = ValidationReport::new();
        for (field, text) in [
            ("name", self.name().as_str()),
            ("description", profile.description.as_str()),
            ("url", profile.url.as_str()),
        ] {
            if text.trim().is_empty() {
                report.push(Violation::new(field, format!("{field} is required")));
            }
        }
        for (field, is_empty) in [
            ("defaultInputModes", profile.default_input_modes.is_empty()),
            ("defaultOutputModes", profile.default_output_modes.is_empty()),
            ("skills", profile.skills.is_empty()),
        ] {
            if is_empty {
                report.push(Violation::new(
                    field,
                    format!("{field} must contain at least one entry"),
                ));
            }
        }
        report
    }

    /// Builds the protocol document, refusing incomplete cards when
    /// `validate` is set.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Incomplete`] naming every missing member.
    pub fn to_strict_export(
        &self,
        include_metadata: bool,
        validate: bool,
    ) -> Result<Value, ExportError> {
        if validate {
            self.completeness_report()
                .into_result()
                .map_err(ExportError::Incomplete)?;
        }
        Ok(self.to_raw_export(include_metadata))
    }

    fn capabilities_object(&self) -> Value {
        let mut capabilities = self.profile().capabilities.to_enabled_flags();
        if !self.extensions().is_empty() {
            let entries = self
                .extensions()
                .iter()
                .map(super::ExtensionRecord::to_export_entry)
                .collect();
            capabilities.insert("extensions".to_owned(), Value::Array(entries));
        }
        Value::Object(capabilities)
    }

    fn metadata_object(&self) -> Value {
        json!({
            "namespace": self.namespace().as_str(),
            "isDefaultVersion": self.is_default_version(),
            "isActive": self.is_active(),
            "createdAt": self.created_at().to_rfc3339(),
            "updatedAt": self.updated_at().to_rfc3339(),
            "createdBy": self.created_by(),
            "updatedBy": self.updated_by(),
        })
    }
}

fn insert_non_empty(document: &mut Map<String, Value>, key: &str, value: Value) {
    if !is_empty_json(&value) {
        document.insert(key.to_owned(), value);
    }
}
