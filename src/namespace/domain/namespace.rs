//! Namespace entity.

use super::{NamespaceDomainError, NamespaceId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

const MAX_NAME_LENGTH: usize = 255;

/// Isolation boundary for agent cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    id: NamespaceId,
    name: String,
    description: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedNamespaceData {
    /// Persisted identifier.
    pub id: NamespaceId,
    /// Persisted display name.
    pub name: String,
    /// Persisted description.
    pub description: String,
    /// Persisted active flag.
    pub is_active: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Namespace {
    /// Creates an active namespace.
    ///
    /// # Errors
    ///
    /// Returns [`NamespaceDomainError::EmptyName`] or
    /// [`NamespaceDomainError::NameTooLong`] for an invalid display name.
    pub fn new(
        id: NamespaceId,
        name: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, NamespaceDomainError> {
        let timestamp = clock.utc();
        Ok(Self {
            id,
            name: validate_name(name.into())?,
            description: String::new(),
            is_active: true,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a namespace from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedNamespaceData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            is_active: data.is_active,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Sets the description at creation time.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into().trim().to_owned();
        self
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> &NamespaceId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns whether the namespace is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Renames the namespace.
    ///
    /// # Errors
    ///
    /// Returns [`NamespaceDomainError::EmptyName`] or
    /// [`NamespaceDomainError::NameTooLong`] for an invalid display name.
    pub fn rename(
        &mut self,
        name: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), NamespaceDomainError> {
        self.name = validate_name(name.into())?;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: impl Into<String>, clock: &impl Clock) {
        self.description = description.into().trim().to_owned();
        self.updated_at = clock.utc();
    }

    /// Activates the namespace.
    pub fn activate(&mut self, clock: &impl Clock) {
        self.is_active = true;
        self.updated_at = clock.utc();
    }

    /// Deactivates the namespace.
    pub fn deactivate(&mut self, clock: &impl Clock) {
        self.is_active = false;
        self.updated_at = clock.utc();
    }
}

fn validate_name(raw: String) -> Result<String, NamespaceDomainError> {
    let normalized = raw.trim();
    if normalized.is_empty() {
        return Err(NamespaceDomainError::EmptyName);
    }
    if normalized.chars().count() > MAX_NAME_LENGTH {
        return Err(NamespaceDomainError::NameTooLong(raw));
    }
    Ok(normalized.to_owned())
}
