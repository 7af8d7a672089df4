//! Extension records attached to agent cards.

use super::{ExtensionError, ExtensionId};
use crate::schema::domain::{SchemaDefinition, SchemaId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const MAX_URI_LENGTH: usize = 512;

/// Caller-supplied extension before it is bound to a card.
///
/// A blank `uri` or `description` is filled from the referenced schema when
/// one is bound. `schema_uri` names a registered schema explicitly; when it
/// is unset the service looks the extension URI up in the schema registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtensionDraft {
    /// Extension URI.
    pub uri: String,
    /// Human-readable description.
    pub description: String,
    /// Whether clients must understand the extension.
    pub required: bool,
    /// Extension parameters; must be a JSON object.
    pub params: Value,
    /// Display position.
    pub order: i32,
    /// URI of a registered schema to validate against.
    pub schema_uri: Option<String>,
}

impl Default for ExtensionDraft {
    fn default() -> Self {
        Self {
            uri: String::new(),
            description: String::new(),
            required: false,
            params: Value::Object(Map::new()),
            order: 0,
            schema_uri: None,
        }
    }
}

impl ExtensionDraft {
    /// Creates a draft for `uri` with empty params.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }

    /// Creates a draft that takes its URI from a registered schema.
    #[must_use]
    pub fn for_schema(schema_uri: impl Into<String>) -> Self {
        Self {
            schema_uri: Some(schema_uri.into()),
            ..Self::default()
        }
    }

    /// Sets the params.
    #[must_use]
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Marks the extension as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the display position.
    #[must_use]
    pub const fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Returns the URI used to look up a schema for this draft.
    #[must_use]
    pub fn lookup_uri(&self) -> &str {
        self.schema_uri
            .as_deref()
            .map_or_else(|| self.uri.trim(), str::trim)
    }
}

/// An extension bound to an agent card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionRecord {
    id: ExtensionId,
    uri: String,
    description: String,
    required: bool,
    params: Map<String, Value>,
    schema_id: Option<SchemaId>,
    order: i32,
}

/// Parameter object for reconstructing a persisted extension record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedExtensionData {
    /// Persisted identifier.
    pub id: ExtensionId,
    /// Persisted URI.
    pub uri: String,
    /// Persisted description.
    pub description: String,
    /// Persisted required flag.
    pub required: bool,
    /// Persisted params object.
    pub params: Map<String, Value>,
    /// Persisted schema reference.
    pub schema_id: Option<SchemaId>,
    /// Persisted display position.
    pub order: i32,
}

impl ExtensionRecord {
    /// Binds a draft, validating it against `schema` when one is referenced.
    ///
    /// With a schema, a blank URI becomes the schema URI and a blank
    /// description becomes the schema description, or `"{type} {version}"`
    /// when that is blank too. Without a schema the params are not checked.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::ParamsNotObject`] when params are not an
    /// object, [`ExtensionError::EmptyUri`] or [`ExtensionError::UriTooLong`]
    /// for an unusable URI, [`ExtensionError::UriMismatch`] when the URI
    /// differs from the schema URI, and [`ExtensionError::InvalidParams`]
    /// with every violation when the params fail the schema.
    pub fn bind(
        draft: ExtensionDraft,
        schema: Option<&SchemaDefinition>,
    ) -> Result<Self, ExtensionError> {
        let params = match draft.params {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Array(_) => {
                return Err(ExtensionError::ParamsNotObject);
            }
        };
        let requested_uri = draft.uri.trim();
        let requested_description = draft.description.trim();

        let (uri, description) = match schema {
            Some(definition) => {
                let schema_uri = definition.uri().as_str();
                if !requested_uri.is_empty() && requested_uri != schema_uri {
                    return Err(ExtensionError::UriMismatch {
                        uri: requested_uri.to_owned(),
                        schema_uri: schema_uri.to_owned(),
                    });
                }
                let resolved_description = if requested_description.is_empty() {
                    schema_description(definition)
                } else {
                    requested_description.to_owned()
                };
                let report = definition.validate_extension_data(&params);
                if !report.is_valid() {
                    return Err(ExtensionError::InvalidParams {
                        uri: schema_uri.to_owned(),
                        report,
                    });
                }
                (schema_uri.to_owned(), resolved_description)
            }
            None => (requested_uri.to_owned(), requested_description.to_owned()),
        };

        if uri.is_empty() {
            return Err(ExtensionError::EmptyUri);
        }
        if uri.chars().count() > MAX_URI_LENGTH {
            return Err(ExtensionError::UriTooLong(uri));
        }

        Ok(Self {
            id: ExtensionId::new(),
            uri,
            description,
            required: draft.required,
            params,
            schema_id: schema.map(SchemaDefinition::id),
            order: draft.order,
        })
    }

    /// Reconstructs an extension record from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedExtensionData) -> Self {
        Self {
            id: data.id,
            uri: data.uri,
            description: data.description,
            required: data.required,
            params: data.params,
            schema_id: data.schema_id,
            order: data.order,
        }
    }

    pub(super) const fn with_id(mut self, id: ExtensionId) -> Self {
        self.id = id;
        self
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> ExtensionId {
        self.id
    }

    /// Returns the extension URI.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns whether clients must understand the extension.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the params object.
    #[must_use]
    pub const fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    /// Returns the referenced schema, if any.
    #[must_use]
    pub const fn schema_id(&self) -> Option<SchemaId> {
        self.schema_id
    }

    /// Returns the display position.
    #[must_use]
    pub const fn order(&self) -> i32 {
        self.order
    }

    /// Builds the `capabilities.extensions` entry.
    ///
    /// `description` and `params` appear only when non-empty and `required`
    /// only when true.
    #[must_use]
    pub fn to_export_entry(&self) -> Value {
        let mut entry = Map::new();
        entry.insert("uri".to_owned(), Value::String(self.uri.clone()));
        if !self.description.is_empty() {
            entry.insert(
                "description".to_owned(),
                Value::String(self.description.clone()),
            );
        }
        if self.required {
            entry.insert("required".to_owned(), Value::Bool(true));
        }
        if !self.params.is_empty() {
            entry.insert("params".to_owned(), Value::Object(self.params.clone()));
        }
        Value::Object(entry)
    }
}

fn schema_description(schema: &SchemaDefinition) -> String {
    if schema.description().is_empty() {
        schema.label()
    } else {
        schema.description().to_owned()
    }
}
