//! Storage-time checks for agent cards.
//!
//! These rules are lenient: empty collections and blank descriptive fields
//! pass, so drafts can be saved and completed later. Every problem is
//! collected into one [`ValidationReport`]. Completeness is only demanded by
//! the strict export.

use super::{AgentName, AgentVersion, CardProfile, Transport};
use crate::config::UrlPolicy;
use crate::validation::{ValidationReport, Violation};
use serde_json::{Map, Value};

/// Security scheme `type` values accepted in `securitySchemes`.
pub const SECURITY_SCHEME_TYPES: [&str; 5] =
    ["apiKey", "http", "oauth2", "openIdConnect", "mutualTLS"];

const MAX_PROTOCOL_VERSION_LENGTH: usize = 16;
const SKILL_TEXT_KEYS: [&str; 3] = ["id", "name", "description"];

/// Checks the raw name and version of a card.
#[must_use]
pub fn check_identity(name: &str, version: &str) -> ValidationReport {
    let mut report = ValidationReport::new();
    if let Err(err) = AgentName::new(name) {
        report.push(Violation::invalid("name", err));
    }
    if let Err(err) = AgentVersion::new(version) {
        report.push(Violation::invalid("version", err));
    }
    report
}

/// Checks the protocol body of a card against the storage rules.
#[must_use]
pub fn check_profile(profile: &CardProfile, policy: &UrlPolicy) -> ValidationReport {
    let mut report = ValidationReport::new();

    if profile.protocol_version.trim().chars().count() > MAX_PROTOCOL_VERSION_LENGTH {
        report.push(Violation::invalid(
            "protocolVersion",
            format!("must not exceed {MAX_PROTOCOL_VERSION_LENGTH} characters"),
        ));
    }
    check_endpoint_url(&mut report, &profile.url, policy);
    check_web_url(&mut report, "iconUrl", profile.icon_url_if_set());
    check_web_url(&mut report, "documentationUrl", profile.documentation_url_if_set());
    check_modes(&mut report, "defaultInputModes", &profile.default_input_modes);
    check_modes(&mut report, "defaultOutputModes", &profile.default_output_modes);

    for (index, skill) in profile.skills.iter().enumerate() {
        check_skill(&mut report, index, skill);
    }
    if let Some(provider) = profile.provider_if_set() {
        check_provider(&mut report, provider);
    }
    for (index, interface) in profile.additional_interfaces.iter().enumerate() {
        check_interface(&mut report, index, interface);
    }
    for (scheme_name, scheme) in &profile.security_schemes {
        check_security_scheme(&mut report, scheme_name, scheme);
    }
    for (index, requirement) in profile.security.iter().enumerate() {
        check_security_requirement(&mut report, index, requirement);
    }

    report
}

fn check_endpoint_url(report: &mut ValidationReport, url: &str, policy: &UrlPolicy) {
    let trimmed = url.trim();
    if trimmed.is_empty() || policy.allows(trimmed) {
        return;
    }
    let reason = if policy.insecure_prefixes.is_empty() {
        "must start with https://".to_owned()
    } else {
        format!(
            "must start with https:// unless it starts with one of: {}",
            policy.insecure_prefixes.join(", ")
        )
    };
    report.push(Violation::invalid("url", reason));
}

fn check_web_url(report: &mut ValidationReport, field: &str, url: Option<&str>) {
    if let Some(value) = url
        && !is_web_url(value.trim())
    {
        report.push(Violation::invalid(field, "must start with http:// or https://"));
    }
}

fn is_web_url(url: &str) -> bool {
    ["https://", "http://"]
        .into_iter()
        .any(|scheme| url.len() > scheme.len() && url.starts_with(scheme))
}

fn is_mime_type(mode: &str) -> bool {
    mode.contains('/')
}

fn check_modes(report: &mut ValidationReport, field: &str, modes: &[String]) {
    for mode in modes.iter().filter(|mode| !is_mime_type(mode)) {
        report.push(Violation::invalid(
            field,
            format!("'{mode}' is not a MIME type of the form type/subtype"),
        ));
    }
}

fn as_string_list(value: &Value) -> Option<Vec<&str>> {
    value
        .as_array()?
        .iter()
        .map(Value::as_str)
        .collect::<Option<Vec<_>>>()
}

fn check_skill(report: &mut ValidationReport, index: usize, skill: &Value) {
    let path = format!("skills[{index}]");
    let Some(object) = skill.as_object() else {
        report.push(Violation::invalid(path, "must be an object"));
        return;
    };

    for key in SKILL_TEXT_KEYS {
        if !object.get(key).is_some_and(Value::is_string) {
            report.push(Violation::invalid(format!("{path}.{key}"), "must be a string"));
        }
    }
    if object.get("tags").and_then(as_string_list).is_none() {
        report.push(Violation::invalid(
            format!("{path}.tags"),
            "must be a list of strings",
        ));
    }
    check_optional_string_list(report, &path, object, "examples", false);
    check_optional_string_list(report, &path, object, "inputModes", true);
    check_optional_string_list(report, &path, object, "outputModes", true);
}

fn check_optional_string_list(
    report: &mut ValidationReport,
    path: &str,
    object: &Map<String, Value>,
    key: &str,
    as_modes: bool,
) {
    let Some(value) = object.get(key) else {
        return;
    };
    let field = format!("{path}.{key}");
    match as_string_list(value) {
        None => report.push(Violation::invalid(field, "must be a list of strings")),
        Some(entries) if as_modes => {
            for mode in entries.into_iter().filter(|mode| !is_mime_type(mode)) {
                report.push(Violation::invalid(
                    field.as_str(),
                    format!("'{mode}' is not a MIME type of the form type/subtype"),
                ));
            }
        }
        Some(_) => {}
    }
}

fn check_provider(report: &mut ValidationReport, provider: &Value) {
    let Some(object) = provider.as_object() else {
        report.push(Violation::invalid("provider", "must be an object"));
        return;
    };
    for key in ["organization", "url"] {
        if !object.get(key).is_some_and(Value::is_string) {
            report.push(Violation::invalid(
                format!("provider.{key}"),
                "must be a string",
            ));
        }
    }
}

fn check_interface(report: &mut ValidationReport, index: usize, interface: &Value) {
    let path = format!("additionalInterfaces[{index}]");
    let Some(object) = interface.as_object() else {
        report.push(Violation::invalid(path, "must be an object"));
        return;
    };
    if !object.get("url").is_some_and(Value::is_string) {
        report.push(Violation::invalid(format!("{path}.url"), "must be a string"));
    }
    let transport = object.get("transport").and_then(Value::as_str);
    if !transport.is_some_and(Transport::is_supported) {
        report.push(Violation::invalid(
            format!("{path}.transport"),
            "must be one of: http, grpc, websocket, jsonrpc, http+json",
        ));
    }
}

fn check_security_scheme(report: &mut ValidationReport, scheme_name: &str, scheme: &Value) {
    let path = format!("securitySchemes.{scheme_name}");
    let Some(object) = scheme.as_object() else {
        report.push(Violation::invalid(path, "must be an object"));
        return;
    };
    let scheme_type = object.get("type").and_then(Value::as_str);
    if !scheme_type.is_some_and(|kind| SECURITY_SCHEME_TYPES.contains(&kind)) {
        report.push(Violation::invalid(
            format!("{path}.type"),
            format!("must be one of: {}", SECURITY_SCHEME_TYPES.join(", ")),
        ));
    }
}

fn check_security_requirement(report: &mut ValidationReport, index: usize, requirement: &Value) {
    let path = format!("security[{index}]");
    let Some(object) = requirement.as_object() else {
        report.push(Violation::invalid(path, "must be an object"));
        return;
    };
    for (scheme_name, scopes) in object {
        if as_string_list(scopes).is_none() {
            report.push(Violation::invalid(
                format!("{path}.{scheme_name}"),
                "must be a list of strings",
            ));
        }
    }
}
