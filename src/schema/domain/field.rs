//! Field constraints: per-type value checks and JSON Schema fragments.
//!
//! Operators submit a flat [`FieldSpec`] (one optional slot per constraint,
//! mirroring the storage columns). [`FieldSpec::validate_shape`] rejects
//! constraint slots that do not fit the declared type and produces a
//! [`FieldKind`], the closed per-type representation the rest of the
//! domain works with. A [`FieldConstraint`] can only exist for a spec that
//! passed the shape check.

use super::bound::compare_integer;
use super::{FieldName, FieldType, SchemaDomainError, ShapeError, ValueError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;

/// Longest pattern a string field may advertise, in characters.
pub const MAX_PATTERN_LENGTH: usize = 512;

/// Raw field description as submitted by an operator or loaded from storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSpec {
    /// Field identifier.
    pub name: String,
    /// Declared value type.
    pub field_type: FieldType,
    /// Whether payloads must contain the field.
    pub required: bool,
    /// Human description shown in documentation.
    pub description: String,
    /// Default value advertised in the JSON Schema.
    pub default_value: Option<Value>,
    /// Minimum string length (string only).
    pub min_length: Option<u64>,
    /// Maximum string length (string only).
    pub max_length: Option<u64>,
    /// Inclusive minimum value (integer/number only).
    pub min_value: Option<f64>,
    /// Inclusive maximum value (integer/number only).
    pub max_value: Option<f64>,
    /// Allowed choices (enum only).
    pub enum_choices: Option<Vec<String>>,
    /// Regular expression advertised in the JSON Schema (string only).
    pub pattern: Option<String>,
    /// Display and validation order; lower sorts first.
    pub order: i32,
}

impl FieldSpec {
    /// Creates a spec with a name and type and no constraints.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            ..Self::default()
        }
    }

    /// Marks the field as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Sets the minimum string length.
    #[must_use]
    pub const fn with_min_length(mut self, min: u64) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Sets the maximum string length.
    #[must_use]
    pub const fn with_max_length(mut self, max: u64) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Sets the inclusive minimum value.
    #[must_use]
    pub const fn with_min_value(mut self, min: f64) -> Self {
        self.min_value = Some(min);
        self
    }

    /// Sets the inclusive maximum value.
    #[must_use]
    pub const fn with_max_value(mut self, max: f64) -> Self {
        self.max_value = Some(max);
        self
    }

    /// Sets the enum choices.
    #[must_use]
    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the pattern.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Sets the display order.
    #[must_use]
    pub const fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Checks that only constraints applicable to the declared type are set.
    ///
    /// This is a static check on the configuration; it never looks at a
    /// payload value. A blank pattern and an empty choice list on a
    /// non-enum field count as unset.
    ///
    /// # Errors
    ///
    /// Returns the first [`ShapeError`] found: a constraint slot that does
    /// not apply to the type, a missing enum choice list, or an inverted
    /// length or value range.
    pub fn validate_shape(&self) -> Result<FieldKind, ShapeError> {
        let field_type = self.field_type;
        let has_length = self.min_length.is_some() || self.max_length.is_some();
        let has_range = self.min_value.is_some() || self.max_value.is_some();
        let pattern = self.trimmed_pattern();
        let choice_list = self
            .enum_choices
            .as_ref()
            .filter(|choices| !choices.is_empty());

        match field_type {
            FieldType::String => {
                ensure_absent(has_range, ShapeError::RangeNotAllowed(field_type))?;
                ensure_absent(choice_list.is_some(), ShapeError::ChoicesNotAllowed(field_type))?;
                if let (Some(min), Some(max)) = (self.min_length, self.max_length)
                    && min > max
                {
                    return Err(ShapeError::InvertedLength { min, max });
                }
                if pattern.is_some_and(|text| text.chars().count() > MAX_PATTERN_LENGTH) {
                    return Err(ShapeError::PatternTooLong {
                        max: MAX_PATTERN_LENGTH,
                    });
                }
                Ok(FieldKind::String(StringRules {
                    min_length: self.min_length,
                    max_length: self.max_length,
                    pattern: pattern.map(str::to_owned),
                }))
            }
            FieldType::Integer | FieldType::Number => {
                ensure_absent(has_length, ShapeError::LengthNotAllowed(field_type))?;
                ensure_absent(pattern.is_some(), ShapeError::PatternNotAllowed(field_type))?;
                ensure_absent(choice_list.is_some(), ShapeError::ChoicesNotAllowed(field_type))?;
                if let (Some(min), Some(max)) = (self.min_value, self.max_value)
                    && min > max
                {
                    return Err(ShapeError::InvertedRange { min, max });
                }
                let range = NumericRange {
                    minimum: self.min_value,
                    maximum: self.max_value,
                };
                if field_type == FieldType::Integer {
                    Ok(FieldKind::Integer(range))
                } else {
                    Ok(FieldKind::Number(range))
                }
            }
            FieldType::Enum => {
                let choices = choice_list.ok_or(ShapeError::MissingChoices)?;
                ensure_absent(has_length, ShapeError::LengthNotAllowed(field_type))?;
                ensure_absent(has_range, ShapeError::RangeNotAllowed(field_type))?;
                ensure_absent(pattern.is_some(), ShapeError::PatternNotAllowed(field_type))?;
                Ok(FieldKind::Enum(choices.clone()))
            }
            FieldType::Boolean => self.unconstrained(FieldKind::Boolean),
            FieldType::Array => self.unconstrained(FieldKind::Array),
            FieldType::Object => self.unconstrained(FieldKind::Object),
            FieldType::Date => self.unconstrained(FieldKind::Date),
            FieldType::Datetime => self.unconstrained(FieldKind::Datetime),
        }
    }

    fn trimmed_pattern(&self) -> Option<&str> {
        self.pattern
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    fn unconstrained(&self, kind: FieldKind) -> Result<FieldKind, ShapeError> {
        let field_type = kind.field_type();
        let has_choices = self
            .enum_choices
            .as_ref()
            .is_some_and(|choices| !choices.is_empty());
        ensure_absent(
            self.min_length.is_some() || self.max_length.is_some(),
            ShapeError::LengthNotAllowed(field_type),
        )?;
        ensure_absent(
            self.min_value.is_some() || self.max_value.is_some(),
            ShapeError::RangeNotAllowed(field_type),
        )?;
        ensure_absent(
            self.trimmed_pattern().is_some(),
            ShapeError::PatternNotAllowed(field_type),
        )?;
        ensure_absent(has_choices, ShapeError::ChoicesNotAllowed(field_type))?;
        Ok(kind)
    }
}

const fn ensure_absent(present: bool, error: ShapeError) -> Result<(), ShapeError> {
    if present { Err(error) } else { Ok(()) }
}

/// Length and pattern constraints of a string field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringRules {
    min_length: Option<u64>,
    max_length: Option<u64>,
    pattern: Option<String>,
}

impl StringRules {
    fn check(&self, text: &str) -> Result<(), ValueError> {
        let length = u64::try_from(text.chars().count()).unwrap_or(u64::MAX);
        if let Some(min) = self.min_length
            && length < min
        {
            return Err(ValueError::TooShort { min });
        }
        if let Some(max) = self.max_length
            && length > max
        {
            return Err(ValueError::TooLong { max });
        }
        Ok(())
    }
}

/// Inclusive value range of an integer or number field.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumericRange {
    minimum: Option<f64>,
    maximum: Option<f64>,
}

impl NumericRange {
    fn check(self, number: &Number) -> Result<(), ValueError> {
        exact_integer(number).map_or_else(
            || {
                let value = number.as_f64().unwrap_or(f64::NAN);
                self.check_ordering(|bound| value.partial_cmp(&bound))
            },
            |integer| self.check_ordering(|bound| compare_integer(integer, bound)),
        )
    }

    fn check_ordering(
        self,
        order_against: impl Fn(f64) -> Option<Ordering>,
    ) -> Result<(), ValueError> {
        if let Some(min) = self.minimum
            && order_against(min) == Some(Ordering::Less)
        {
            return Err(ValueError::BelowMinimum { min });
        }
        if let Some(max) = self.maximum
            && order_against(max) == Some(Ordering::Greater)
        {
            return Err(ValueError::AboveMaximum { max });
        }
        Ok(())
    }
}

fn exact_integer(number: &Number) -> Option<i128> {
    number
        .as_i64()
        .map(i128::from)
        .or_else(|| number.as_u64().map(i128::from))
}

/// Declared type of a field together with the constraints valid for it.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// String with optional length limits and advertised pattern.
    String(StringRules),
    /// Integer with optional inclusive range.
    Integer(NumericRange),
    /// Number with optional inclusive range.
    Number(NumericRange),
    /// Boolean.
    Boolean,
    /// Array.
    Array,
    /// Object.
    Object,
    /// Date, not checked beyond presence.
    Date,
    /// Timestamp, not checked beyond presence.
    Datetime,
    /// One of the listed strings.
    Enum(Vec<String>),
}

impl FieldKind {
    /// Returns the declared field type.
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        match self {
            Self::String(_) => FieldType::String,
            Self::Integer(_) => FieldType::Integer,
            Self::Number(_) => FieldType::Number,
            Self::Boolean => FieldType::Boolean,
            Self::Array => FieldType::Array,
            Self::Object => FieldType::Object,
            Self::Date => FieldType::Date,
            Self::Datetime => FieldType::Datetime,
            Self::Enum(_) => FieldType::Enum,
        }
    }

    /// Checks a candidate value: type first, then type-specific constraints.
    ///
    /// JSON booleans are a distinct type and never satisfy integer or number
    /// checks.
    ///
    /// # Errors
    ///
    /// Returns the first failing check as a [`ValueError`].
    pub fn check(&self, value: &Value) -> Result<(), ValueError> {
        let mismatch = || ValueError::TypeMismatch {
            expected: self.field_type(),
        };

        match self {
            Self::String(rules) => {
                let Value::String(text) = value else {
                    return Err(mismatch());
                };
                rules.check(text)
            }
            Self::Integer(range) => match value {
                Value::Number(number) if number.is_i64() || number.is_u64() => range.check(number),
                _ => Err(mismatch()),
            },
            Self::Number(range) => match value {
                Value::Number(number) => range.check(number),
                _ => Err(mismatch()),
            },
            Self::Boolean => value.is_boolean().then_some(()).ok_or_else(mismatch),
            Self::Array => value.is_array().then_some(()).ok_or_else(mismatch),
            Self::Object => value.is_object().then_some(()).ok_or_else(mismatch),
            Self::Date | Self::Datetime => Ok(()),
            Self::Enum(choices) => {
                let is_choice = value
                    .as_str()
                    .is_some_and(|text| choices.iter().any(|choice| choice == text));
                if is_choice {
                    Ok(())
                } else {
                    Err(ValueError::NotAChoice {
                        choices: choices.clone(),
                    })
                }
            }
        }
    }

    fn write_schema_constraints(&self, property: &mut Map<String, Value>) {
        match self {
            Self::String(rules) => {
                if let Some(min) = rules.min_length {
                    property.insert("minLength".to_owned(), Value::from(min));
                }
                if let Some(max) = rules.max_length {
                    property.insert("maxLength".to_owned(), Value::from(max));
                }
                if let Some(pattern) = &rules.pattern {
                    property.insert("pattern".to_owned(), Value::from(pattern.as_str()));
                }
            }
            Self::Integer(range) | Self::Number(range) => {
                if let Some(min) = range.minimum {
                    property.insert("minimum".to_owned(), Value::from(min));
                }
                if let Some(max) = range.maximum {
                    property.insert("maximum".to_owned(), Value::from(max));
                }
            }
            Self::Enum(choices) => {
                property.insert("enum".to_owned(), Value::from(choices.clone()));
            }
            Self::Boolean | Self::Array | Self::Object | Self::Date | Self::Datetime => {}
        }
    }

    fn write_constraint_summary(&self, summary: &mut Map<String, Value>) {
        match self {
            Self::String(rules) => {
                if let Some(min) = rules.min_length {
                    summary.insert("minLength".to_owned(), Value::from(min));
                }
                if let Some(max) = rules.max_length {
                    summary.insert("maxLength".to_owned(), Value::from(max));
                }
                if let Some(pattern) = &rules.pattern {
                    summary.insert("pattern".to_owned(), Value::from(pattern.as_str()));
                }
            }
            Self::Integer(range) | Self::Number(range) => {
                if let Some(min) = range.minimum {
                    summary.insert("minValue".to_owned(), Value::from(min));
                }
                if let Some(max) = range.maximum {
                    summary.insert("maxValue".to_owned(), Value::from(max));
                }
            }
            Self::Enum(choices) => {
                summary.insert("enum".to_owned(), Value::from(choices.clone()));
            }
            Self::Boolean | Self::Array | Self::Object | Self::Date | Self::Datetime => {}
        }
    }
}

/// One validated field of a schema definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FieldSpec", into = "FieldSpec")]
pub struct FieldConstraint {
    name: FieldName,
    kind: FieldKind,
    required: bool,
    description: String,
    default_value: Option<Value>,
    order: i32,
}

impl FieldConstraint {
    /// Builds a field from a spec after validating its name and shape.
    ///
    /// # Errors
    ///
    /// Returns a name error from [`FieldName::new`] or
    /// [`SchemaDomainError::Shape`] when constraints do not fit the type.
    pub fn new(spec: FieldSpec) -> Result<Self, SchemaDomainError> {
        let name = FieldName::new(spec.name.as_str())?;
        let kind = spec
            .validate_shape()
            .map_err(|source| SchemaDomainError::Shape {
                field: name.to_string(),
                source,
            })?;
        Ok(Self {
            name,
            kind,
            required: spec.required,
            description: spec.description.trim().to_owned(),
            default_value: spec.default_value,
            order: spec.order,
        })
    }

    /// Returns the field name.
    #[must_use]
    pub const fn name(&self) -> &FieldName {
        &self.name
    }

    /// Returns the declared type with its constraints.
    #[must_use]
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Returns the declared type.
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }

    /// Returns whether payloads must contain this field.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the default value, if configured.
    #[must_use]
    pub const fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// Returns the display order.
    #[must_use]
    pub const fn order(&self) -> i32 {
        self.order
    }

    /// Checks a candidate value against this field.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] naming the violated constraint.
    pub fn validate_value(&self, value: &Value) -> Result<(), ValueError> {
        self.kind.check(value)
    }

    /// Renders the draft-07 property definition for this field.
    #[must_use]
    pub fn to_schema_property(&self) -> Value {
        let field_type = self.field_type();
        let mut property = Map::new();
        property.insert("type".to_owned(), Value::from(field_type.json_type()));
        let description = if self.description.is_empty() {
            self.name.as_str()
        } else {
            self.description.as_str()
        };
        property.insert("description".to_owned(), Value::from(description));
        if let Some(format) = field_type.json_format() {
            property.insert("format".to_owned(), Value::from(format));
        }
        self.kind.write_schema_constraints(&mut property);
        if let Some(default) = &self.default_value {
            property.insert("default".to_owned(), default.clone());
        }
        Value::Object(property)
    }

    /// Summarises the configured constraints for API consumers.
    #[must_use]
    pub fn constraints(&self) -> Value {
        let mut summary = Map::new();
        self.kind.write_constraint_summary(&mut summary);
        Value::Object(summary)
    }

    /// Returns the API-facing field summary.
    #[must_use]
    pub fn definition(&self) -> FieldDefinition {
        FieldDefinition {
            name: self.name.to_string(),
            field_type: self.field_type(),
            required: self.required,
            description: self.description.clone(),
            default: self.default_value.clone(),
            constraints: self.constraints(),
        }
    }

    /// Flattens the field back into its storage form.
    #[must_use]
    pub fn to_spec(&self) -> FieldSpec {
        let mut spec = FieldSpec {
            name: self.name.to_string(),
            field_type: self.field_type(),
            required: self.required,
            description: self.description.clone(),
            default_value: self.default_value.clone(),
            order: self.order,
            ..FieldSpec::default()
        };
        match &self.kind {
            FieldKind::String(rules) => {
                spec.min_length = rules.min_length;
                spec.max_length = rules.max_length;
                spec.pattern.clone_from(&rules.pattern);
            }
            FieldKind::Integer(range) | FieldKind::Number(range) => {
                spec.min_value = range.minimum;
                spec.max_value = range.maximum;
            }
            FieldKind::Enum(choices) => spec.enum_choices = Some(choices.clone()),
            FieldKind::Boolean
            | FieldKind::Array
            | FieldKind::Object
            | FieldKind::Date
            | FieldKind::Datetime => {}
        }
        spec
    }

    pub(super) fn sort_key(&self) -> (i32, &str) {
        (self.order, self.name.as_str())
    }
}

impl TryFrom<FieldSpec> for FieldConstraint {
    type Error = SchemaDomainError;

    fn try_from(spec: FieldSpec) -> Result<Self, Self::Error> {
        Self::new(spec)
    }
}

impl From<FieldConstraint> for FieldSpec {
    fn from(field: FieldConstraint) -> Self {
        field.to_spec()
    }
}

/// Field summary exposed through the API and the schema catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether the field is required.
    pub required: bool,
    /// Field description.
    pub description: String,
    /// Default value, if any.
    pub default: Option<Value>,
    /// Constraint summary.
    pub constraints: Value,
}
