//! Reading protocol documents back into card parts.

use super::{CardProfile, ExtensionDraft, METADATA_KEY};
use serde_json::{Map, Value};
use thiserror::Error;

/// Top-level key of the older `{uri: params}` extension map.
pub const LEGACY_EXTENSIONS_KEY: &str = "domainExtensions";

/// Errors returned while reading a protocol document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImportError {
    /// The document is not a JSON object.
    #[error("agent card document must be a JSON object")]
    NotAnObject,

    /// A member has the wrong shape.
    #[error("invalid agent card document: {0}")]
    InvalidMember(String),
}

/// A protocol document split into the parts needed to create a card.
///
/// Name and version are kept raw so the caller can report them together
/// with the other storage-rule violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDocument {
    /// Raw agent name.
    pub name: String,
    /// Raw agent version.
    pub version: String,
    /// Protocol body.
    pub profile: CardProfile,
    /// Extensions from `capabilities.extensions` and `domainExtensions`.
    pub extensions: Vec<ExtensionDraft>,
}

impl CardDocument {
    /// Parses an exported or hand-written protocol document.
    ///
    /// The `_metadata` block is ignored. Extension entries keep their
    /// document order; legacy `domainExtensions` entries follow them.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::NotAnObject`] or [`ImportError::InvalidMember`]
    /// when a member cannot be read.
    pub fn parse(document: &Value) -> Result<Self, ImportError> {
        let object = document.as_object().ok_or(ImportError::NotAnObject)?;

        let mut body = object.clone();
        body.remove(METADATA_KEY);
        let legacy = body.remove(LEGACY_EXTENSIONS_KEY);
        let listed = body
            .get_mut("capabilities")
            .and_then(Value::as_object_mut)
            .and_then(|capabilities| capabilities.remove("extensions"));

        let name = text_member(object, "name")?;
        let version = text_member(object, "version")?;
        let profile: CardProfile = serde_json::from_value(Value::Object(body))
            .map_err(|err| ImportError::InvalidMember(err.to_string()))?;

        let mut extensions = listed_extensions(listed)?;
        extensions.extend(legacy_extensions(legacy, extensions.len())?);

        Ok(Self {
            name,
            version,
            profile,
            extensions,
        })
    }
}

fn text_member(object: &Map<String, Value>, key: &str) -> Result<String, ImportError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(ImportError::InvalidMember(format!("{key} must be a string"))),
    }
}

fn listed_extensions(listed: Option<Value>) -> Result<Vec<ExtensionDraft>, ImportError> {
    let Some(value) = listed else {
        return Ok(Vec::new());
    };
    let Value::Array(entries) = value else {
        return Err(ImportError::InvalidMember(
            "capabilities.extensions must be a list".to_owned(),
        ));
    };
    entries
        .into_iter()
        .zip(0_i32..)
        .map(|(entry, order)| {
            serde_json::from_value::<ExtensionDraft>(entry)
                .map(|draft| draft.with_order(order))
                .map_err(|err| {
                    ImportError::InvalidMember(format!("capabilities.extensions: {err}"))
                })
        })
        .collect()
}

fn legacy_extensions(
    legacy: Option<Value>,
    offset: usize,
) -> Result<Vec<ExtensionDraft>, ImportError> {
    let Some(value) = legacy else {
        return Ok(Vec::new());
    };
    let Value::Object(entries) = value else {
        return Err(ImportError::InvalidMember(format!(
            "{LEGACY_EXTENSIONS_KEY} must be an object"
        )));
    };
    let first_order = i32::try_from(offset)
        .map_err(|_| ImportError::InvalidMember("too many extensions".to_owned()))?;
    Ok(entries
        .into_iter()
        .zip(first_order..)
        .map(|((uri, params), order)| {
            ExtensionDraft::new(uri)
                .with_params(params)
                .with_order(order)
        })
        .collect())
}
