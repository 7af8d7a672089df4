//! Declared field types for extension schemas.

use super::ParseFieldTypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The nine value types a schema field may declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free text.
    #[default]
    String,
    /// Whole number; booleans never qualify.
    Integer,
    /// Integer or floating-point number; booleans never qualify.
    Number,
    /// `true` or `false`.
    Boolean,
    /// JSON array.
    Array,
    /// JSON object.
    Object,
    /// Calendar date, advertised as `format: date`.
    Date,
    /// Timestamp, advertised as `format: datetime`.
    Datetime,
    /// One of a fixed set of strings.
    Enum,
}

impl FieldType {
    /// Every supported type in declaration order.
    pub const ALL: [Self; 9] = [
        Self::String,
        Self::Integer,
        Self::Number,
        Self::Boolean,
        Self::Array,
        Self::Object,
        Self::Date,
        Self::Datetime,
        Self::Enum,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Enum => "enum",
        }
    }

    /// Returns the JSON Schema `type` keyword used for this field type.
    #[must_use]
    pub const fn json_type(self) -> &'static str {
        match self {
            Self::String | Self::Date | Self::Datetime | Self::Enum => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// Returns the JSON Schema `format` keyword, if the type carries one.
    #[must_use]
    pub const fn json_format(self) -> Option<&'static str> {
        match self {
            Self::Date => Some("date"),
            Self::Datetime => Some("datetime"),
            Self::String
            | Self::Integer
            | Self::Number
            | Self::Boolean
            | Self::Array
            | Self::Object
            | Self::Enum => None,
        }
    }

    /// Returns whether the type admits a numeric value range.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Number)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for FieldType {
    type Error = ParseFieldTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == normalized)
            .ok_or_else(|| ParseFieldTypeError(value.to_owned()))
    }
}
