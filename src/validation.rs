//! Aggregated validation results shared by the registry contexts.
//!
//! Checks that must report every problem at once (extension payloads,
//! storage-time card rules, strict export completeness) collect
//! [`Violation`]s into a [`ValidationReport`] instead of failing on the first
//! error. Callers decide whether a non-empty report is fatal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single failed check, keyed by the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Violation {
    field: String,
    message: String,
}

impl Violation {
    /// Creates a violation with a fully formatted message.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a violation for a required field absent from the input.
    #[must_use]
    pub fn missing_required(name: impl Into<String>) -> Self {
        let field = name.into();
        let message = format!("missing required field: {field}");
        Self { field, message }
    }

    /// Creates a violation for a present field whose value failed a check.
    #[must_use]
    pub fn invalid(name: impl Into<String>, reason: impl fmt::Display) -> Self {
        let field = name.into();
        let message = format!("field '{field}': {reason}");
        Self { field, message }
    }

    /// Returns the offending field name or path.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Ordered collection of violations produced by one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    /// Creates an empty (passing) report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    /// Records a violation.
    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Appends every violation from another report.
    pub fn merge(&mut self, other: Self) {
        self.violations.extend(other.violations);
    }

    /// Returns `true` when no violation was recorded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns the recorded violations in detection order.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Returns the number of recorded violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns `true` when no violation was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns `true` when any violation concerns `field`.
    #[must_use]
    pub fn mentions(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// Joins every message with a newline, the combined form shown to users.
    #[must_use]
    pub fn message(&self) -> String {
        self.violations
            .iter()
            .map(Violation::message)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Converts the report into a `Result`, failing when it is non-empty.
    ///
    /// # Errors
    ///
    /// Returns the report itself when it contains at least one violation.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_valid() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ValidationReport {}

impl FromIterator<Violation> for ValidationReport {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        Self {
            violations: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ValidationReport {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{ValidationReport, Violation};
    use rstest::rstest;

    #[rstest]
    fn empty_report_is_valid() {
        let report = ValidationReport::new();
        assert!(report.is_valid());
        assert_eq!(report.message(), "");
        assert!(report.into_result().is_ok());
    }

    #[rstest]
    fn report_joins_messages_with_newlines() {
        let report: ValidationReport = vec![
            Violation::missing_required("id"),
            Violation::invalid("status", "value must be one of: A, B"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            report.message(),
            "missing required field: id\nfield 'status': value must be one of: A, B"
        );
        assert!(report.mentions("status"));
        assert!(!report.mentions("other"));
    }

    #[rstest]
    fn merge_preserves_order() {
        let mut first = ValidationReport::new();
        first.push(Violation::new("a", "first"));
        let mut second = ValidationReport::new();
        second.push(Violation::new("b", "second"));

        first.merge(second);

        let fields: Vec<&str> = first.violations().iter().map(Violation::field).collect();
        assert_eq!(fields, vec!["a", "b"]);
    }
}
