//! Validated identity values for schemas and their fields.

use super::SchemaDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_URI_LENGTH: usize = 512;
const MAX_TYPE_LENGTH: usize = 128;
const MAX_VERSION_LENGTH: usize = 32;
const MAX_FIELD_NAME_LENGTH: usize = 128;

/// Globally unique schema URI, e.g. `https://my-org.com/schemas/physicalAsset/v1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaUri(String);

impl SchemaUri {
    /// Creates a validated schema URI.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaDomainError::EmptySchemaUri`] when blank,
    /// [`SchemaDomainError::SchemaUriTooLong`] beyond 512 characters, or
    /// [`SchemaDomainError::InvalidSchemaUri`] without an `http(s)://` scheme.
    pub fn new(value: impl Into<String>) -> Result<Self, SchemaDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        if normalized.is_empty() {
            return Err(SchemaDomainError::EmptySchemaUri);
        }
        if normalized.chars().count() > MAX_URI_LENGTH {
            return Err(SchemaDomainError::SchemaUriTooLong(raw));
        }
        let has_scheme = ["http://", "https://"].iter().any(|scheme| {
            normalized
                .strip_prefix(scheme)
                .is_some_and(|rest| !rest.is_empty())
        });
        if !has_scheme {
            return Err(SchemaDomainError::InvalidSchemaUri(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the URI as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SchemaUri {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SchemaUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SchemaUri {
    type Error = SchemaDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SchemaUri> for String {
    fn from(value: SchemaUri) -> Self {
        value.0
    }
}

/// Short category tag grouping schema versions, e.g. `physicalAsset`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaType(String);

impl SchemaType {
    /// Creates a validated type tag.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaDomainError::EmptySchemaType`] when blank or
    /// [`SchemaDomainError::SchemaTypeTooLong`] beyond 128 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, SchemaDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(SchemaDomainError::EmptySchemaType);
        }
        if normalized.chars().count() > MAX_TYPE_LENGTH {
            return Err(SchemaDomainError::SchemaTypeTooLong(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-form schema version tag, e.g. `v1.2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaVersion(String);

impl SchemaVersion {
    /// Creates a validated version tag.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaDomainError::EmptySchemaVersion`] when blank or
    /// [`SchemaDomainError::SchemaVersionTooLong`] beyond 32 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, SchemaDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(SchemaDomainError::EmptySchemaVersion);
        }
        if normalized.chars().count() > MAX_VERSION_LENGTH {
            return Err(SchemaDomainError::SchemaVersionTooLong(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the version as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Field identifier, unique within one schema.
///
/// Must start with an ASCII letter and continue with letters, digits, or
/// underscores (camelCase is conventional, e.g. `physicalAssetId`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldName(String);

impl FieldName {
    /// Creates a validated field name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaDomainError::EmptyFieldName`],
    /// [`SchemaDomainError::FieldNameTooLong`], or
    /// [`SchemaDomainError::InvalidFieldName`].
    pub fn new(value: impl Into<String>) -> Result<Self, SchemaDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        if normalized.is_empty() {
            return Err(SchemaDomainError::EmptyFieldName);
        }
        if normalized.len() > MAX_FIELD_NAME_LENGTH {
            return Err(SchemaDomainError::FieldNameTooLong(raw));
        }

        let mut chars = normalized.chars();
        let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        let rest_is_valid = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !starts_with_letter || !rest_is_valid {
            return Err(SchemaDomainError::InvalidFieldName(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the field name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FieldName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for FieldName {
    type Error = SchemaDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FieldName> for String {
    fn from(value: FieldName) -> Self {
        value.0
    }
}
