//! Agent card aggregate root.

use super::{
    AgentCardDomainError, AgentCardId, AgentName, AgentVersion, CardProfile, ExtensionRecord,
};
use crate::namespace::domain::NamespaceId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One version of an agent inside a namespace.
///
/// `(namespace, name, version)` is unique, and at most one version per
/// `(namespace, name)` carries the default flag. Both are enforced by the
/// repository and checked by the service before any write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCard {
    id: AgentCardId,
    namespace: NamespaceId,
    name: AgentName,
    version: AgentVersion,
    is_default_version: bool,
    is_active: bool,
    profile: CardProfile,
    extensions: Vec<ExtensionRecord>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    created_by: Option<String>,
    updated_by: Option<String>,
}

/// Parameter object for creating a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAgentCard {
    /// Owning namespace.
    pub namespace: NamespaceId,
    /// Agent name.
    pub name: AgentName,
    /// Agent version.
    pub version: AgentVersion,
    /// Protocol body.
    pub profile: CardProfile,
    /// Whether this version is the default for its name.
    pub is_default_version: bool,
    /// Whether the card is published.
    pub is_active: bool,
    /// Username of the creator.
    pub created_by: Option<String>,
}

/// Parameter object for reconstructing a persisted card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAgentCardData {
    /// Persisted identifier.
    pub id: AgentCardId,
    /// Persisted namespace.
    pub namespace: NamespaceId,
    /// Persisted name.
    pub name: AgentName,
    /// Persisted version.
    pub version: AgentVersion,
    /// Persisted default-version flag.
    pub is_default_version: bool,
    /// Persisted active flag.
    pub is_active: bool,
    /// Persisted protocol body.
    pub profile: CardProfile,
    /// Persisted extension records.
    pub extensions: Vec<ExtensionRecord>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted creator.
    pub created_by: Option<String>,
    /// Persisted last editor.
    pub updated_by: Option<String>,
}

impl AgentCard {
    /// Creates a card without extensions.
    #[must_use]
    pub fn new(data: NewAgentCard, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: AgentCardId::new(),
            namespace: data.namespace,
            name: data.name,
            version: data.version,
            is_default_version: data.is_default_version,
            is_active: data.is_active,
            profile: data.profile,
            extensions: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
            updated_by: data.created_by.clone(),
            created_by: data.created_by,
        }
    }

    /// Reconstructs a card from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAgentCardData) -> Self {
        let mut card = Self {
            id: data.id,
            namespace: data.namespace,
            name: data.name,
            version: data.version,
            is_default_version: data.is_default_version,
            is_active: data.is_active,
            profile: data.profile,
            extensions: data.extensions,
            created_at: data.created_at,
            updated_at: data.updated_at,
            created_by: data.created_by,
            updated_by: data.updated_by,
        };
        card.sort_extensions();
        card
    }

    /// Attaches an extension at creation time, replacing one with the same
    /// URI.
    #[must_use]
    pub fn with_extension(mut self, record: ExtensionRecord) -> Self {
        self.upsert_extension(record);
        self
    }

    /// Returns the card identifier.
    #[must_use]
    pub const fn id(&self) -> AgentCardId {
        self.id
    }

    /// Returns the owning namespace.
    #[must_use]
    pub const fn namespace(&self) -> &NamespaceId {
        &self.namespace
    }

    /// Returns the agent name.
    #[must_use]
    pub const fn name(&self) -> &AgentName {
        &self.name
    }

    /// Returns the agent version.
    #[must_use]
    pub const fn version(&self) -> &AgentVersion {
        &self.version
    }

    /// Returns whether this is the default version for its name.
    #[must_use]
    pub const fn is_default_version(&self) -> bool {
        self.is_default_version
    }

    /// Returns whether the card is published.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the protocol body.
    #[must_use]
    pub const fn profile(&self) -> &CardProfile {
        &self.profile
    }

    /// Returns extensions ordered by display position, then URI.
    #[must_use]
    pub fn extensions(&self) -> &[ExtensionRecord] {
        &self.extensions
    }

    /// Finds an extension by URI.
    #[must_use]
    pub fn extension(&self, uri: &str) -> Option<&ExtensionRecord> {
        self.extensions.iter().find(|record| record.uri() == uri)
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

    /// Returns the creator's username.
    #[must_use]
    pub fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    /// Returns the last editor's username.
    #[must_use]
    pub fn updated_by(&self) -> Option<&str> {
        self.updated_by.as_deref()
    }

    /// Returns `true` when `other` shares this card's namespace and name.
    #[must_use]
    pub fn is_sibling_of(&self, other: &Self) -> bool {
        self.namespace == other.namespace && self.name == other.name
    }

    /// Replaces the protocol body.
    pub fn update_profile(&mut self, profile: CardProfile, actor: Option<&str>, clock: &impl Clock) {
        self.profile = profile;
        self.touch(actor, clock);
    }

    /// Sets or clears the default-version flag.
    pub fn set_default_version(&mut self, is_default: bool, actor: Option<&str>, clock: &impl Clock) {
        self.is_default_version = is_default;
        self.touch(actor, clock);
    }

    /// Publishes or withdraws the card.
    pub fn set_active(&mut self, is_active: bool, actor: Option<&str>, clock: &impl Clock) {
        self.is_active = is_active;
        self.touch(actor, clock);
    }

    /// Attaches an extension, replacing one with the same URI.
    ///
    /// A replaced record keeps its identifier. Returns the previous record.
    pub fn put_extension(
        &mut self,
        record: ExtensionRecord,
        actor: Option<&str>,
        clock: &impl Clock,
    ) -> Option<ExtensionRecord> {
        let previous = self.upsert_extension(record);
        self.touch(actor, clock);
        previous
    }

    /// Detaches the extension with `uri`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCardDomainError::UnknownExtension`] when no extension
    /// has that URI.
    pub fn remove_extension(
        &mut self,
        uri: &str,
        actor: Option<&str>,
        clock: &impl Clock,
    ) -> Result<ExtensionRecord, AgentCardDomainError> {
        let position = self
            .extensions
            .iter()
            .position(|record| record.uri() == uri)
            .ok_or_else(|| AgentCardDomainError::UnknownExtension(uri.to_owned()))?;
        let removed = self.extensions.remove(position);
        self.touch(actor, clock);
        Ok(removed)
    }

    fn upsert_extension(&mut self, record: ExtensionRecord) -> Option<ExtensionRecord> {
        let existing = self
            .extensions
            .iter()
            .position(|current| current.uri() == record.uri());
        let previous = existing.map(|position| self.extensions.remove(position));
        let kept_id = previous.as_ref().map_or_else(|| record.id(), ExtensionRecord::id);
        self.extensions.push(record.with_id(kept_id));
        self.sort_extensions();
        previous
    }

    fn sort_extensions(&mut self) {
        self.extensions
            .sort_by(|a, b| a.order().cmp(&b.order()).then_with(|| a.uri().cmp(b.uri())));
    }

    fn touch(&mut self, actor: Option<&str>, clock: &impl Clock) {
        self.updated_at = clock.utc();
        if let Some(username) = actor {
            self.updated_by = Some(username.to_owned());
        }
    }
}

impl fmt::Display for AgentCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.namespace, self.name, self.version)
    }
}
