//! Error types for schema domain validation and parsing.

use super::FieldType;
use thiserror::Error;

/// Errors returned while constructing or editing schema domain values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaDomainError {
    /// The schema URI is empty after trimming.
    #[error("schema URI must not be empty")]
    EmptySchemaUri,

    /// The schema URI does not use `http://` or `https://`.
    #[error("schema URI '{0}' must start with 'http://' or 'https://'")]
    InvalidSchemaUri(String),

    /// The schema URI exceeds the 512-character storage limit.
    #[error("schema URI exceeds 512 character limit: {0}")]
    SchemaUriTooLong(String),

    /// The schema type tag is empty after trimming.
    #[error("schema type must not be empty")]
    EmptySchemaType,

    /// The schema type tag exceeds the 128-character storage limit.
    #[error("schema type exceeds 128 character limit: {0}")]
    SchemaTypeTooLong(String),

    /// The schema version is empty after trimming.
    #[error("schema version must not be empty")]
    EmptySchemaVersion,

    /// The schema version exceeds the 32-character storage limit.
    #[error("schema version exceeds 32 character limit: {0}")]
    SchemaVersionTooLong(String),

    /// The field name is empty after trimming.
    #[error("field name must not be empty")]
    EmptyFieldName,

    /// The field name does not match `[A-Za-z][A-Za-z0-9_]*`.
    #[error(
        "field name '{0}' must start with a letter and contain only letters, digits, and underscores"
    )]
    InvalidFieldName(String),

    /// The field name exceeds the 128-character storage limit.
    #[error("field name exceeds 128 character limit: {0}")]
    FieldNameTooLong(String),

    /// A field with the same name already exists in the schema.
    #[error("field '{0}' already exists in this schema")]
    DuplicateField(String),

    /// No field with the given name exists in the schema.
    #[error("field '{0}' does not exist in this schema")]
    UnknownField(String),

    /// The field's constraints do not fit its declared type.
    #[error("field '{field}': {source}")]
    Shape {
        /// Name of the offending field.
        field: String,
        /// The shape violation.
        source: ShapeError,
    },
}

/// Constraint configuration that does not fit the declared field type.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ShapeError {
    /// Length limits are only meaningful for string fields.
    #[error("{0} fields cannot set a minimum or maximum length")]
    LengthNotAllowed(FieldType),

    /// Value ranges are only meaningful for integer and number fields.
    #[error("{0} fields cannot set a minimum or maximum value")]
    RangeNotAllowed(FieldType),

    /// Patterns are only meaningful for string fields.
    #[error("{0} fields cannot set a pattern")]
    PatternNotAllowed(FieldType),

    /// The pattern exceeds the storage limit.
    #[error("pattern must not exceed {max} characters")]
    PatternTooLong {
        /// Maximum pattern length in characters.
        max: usize,
    },

    /// Choice lists are only meaningful for enum fields.
    #[error("{0} fields cannot set enum choices; use the enum type")]
    ChoicesNotAllowed(FieldType),

    /// Enum fields need a non-empty choice list.
    #[error("enum fields require a non-empty list of choices")]
    MissingChoices,

    /// The minimum length exceeds the maximum length.
    #[error("minimum length {min} exceeds maximum length {max}")]
    InvertedLength {
        /// Configured minimum length.
        min: u64,
        /// Configured maximum length.
        max: u64,
    },

    /// The minimum value exceeds the maximum value.
    #[error("minimum value {min} exceeds maximum value {max}")]
    InvertedRange {
        /// Configured minimum value.
        min: f64,
        /// Configured maximum value.
        max: f64,
    },
}

/// Reason a value failed a field's checks.
///
/// The `Display` output is the human-readable reason shown to operators.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValueError {
    /// The value has the wrong JSON type.
    #[error("expected a value of type {expected}")]
    TypeMismatch {
        /// The declared field type.
        expected: FieldType,
    },

    /// The value is not one of the enum choices.
    #[error("value must be one of: {}", .choices.join(", "))]
    NotAChoice {
        /// The configured choices.
        choices: Vec<String>,
    },

    /// The string is shorter than the minimum length.
    #[error("length must be at least {min}")]
    TooShort {
        /// Configured minimum length.
        min: u64,
    },

    /// The string is longer than the maximum length.
    #[error("length must be at most {max}")]
    TooLong {
        /// Configured maximum length.
        max: u64,
    },

    /// The number is below the minimum value.
    #[error("value must be at least {min}")]
    BelowMinimum {
        /// Configured minimum value.
        min: f64,
    },

    /// The number is above the maximum value.
    #[error("value must be at most {max}")]
    AboveMaximum {
        /// Configured maximum value.
        max: f64,
    },
}

/// Error returned while parsing a field type from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown field type: {0}")]
pub struct ParseFieldTypeError(pub String);
