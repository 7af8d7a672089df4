//! Service layer for agent card management.
//!
//! [`AgentCardService`] checks namespaces, storage rules, default-version
//! uniqueness, and extension schemas before anything is written, so a
//! refused request leaves the store untouched.

use crate::agent_card::{
    domain::{
        AgentCard, AgentCardDomainError, AgentCardId, AgentName, AgentVersion, CardDocument,
        CardProfile, ExportError, ExtensionDraft, ExtensionRecord, ImportError, NewAgentCard,
        check_identity, check_profile,
    },
    ports::{AgentCardRepository, AgentCardRepositoryError, CardFilter},
};
use crate::config::RegistryConfig;
use crate::namespace::{
    domain::{NamespaceDomainError, NamespaceId},
    ports::{NamespaceRepository, NamespaceRepositoryError},
};
use crate::schema::{
    domain::{SchemaDefinition, SchemaUri},
    ports::{SchemaRepository, SchemaRepositoryError},
};
use crate::validation::ValidationReport;
use mockable::Clock;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request payload for creating an agent card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAgentCardRequest {
    namespace: String,
    name: String,
    version: String,
    profile: CardProfile,
    is_default_version: bool,
    is_active: bool,
    extensions: Vec<ExtensionDraft>,
    actor: Option<String>,
}

impl CreateAgentCardRequest {
    /// Creates a request for an active, non-default card with an empty
    /// profile.
    #[must_use]
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            version: version.into(),
            profile: CardProfile::default(),
            is_default_version: false,
            is_active: true,
            extensions: Vec::new(),
            actor: None,
        }
    }

    /// Sets the protocol body.
    #[must_use]
    pub fn with_profile(mut self, profile: CardProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Marks the card as the default version of its name.
    #[must_use]
    pub const fn as_default_version(mut self) -> Self {
        self.is_default_version = true;
        self
    }

    /// Creates the card unpublished.
    #[must_use]
    pub const fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Appends an extension draft.
    #[must_use]
    pub fn with_extension(mut self, draft: ExtensionDraft) -> Self {
        self.extensions.push(draft);
        self
    }

    /// Records the creating user.
    #[must_use]
    pub fn by(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

/// Service-level errors for agent card operations.
#[derive(Debug, Error)]
pub enum AgentCardServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] AgentCardDomainError),
    /// The namespace identifier is malformed.
    #[error(transparent)]
    NamespaceId(#[from] NamespaceDomainError),
    /// Card repository operation failed.
    #[error(transparent)]
    Repository(#[from] AgentCardRepositoryError),
    /// Schema lookup failed.
    #[error(transparent)]
    SchemaLookup(#[from] SchemaRepositoryError),
    /// Namespace lookup failed.
    #[error(transparent)]
    NamespaceLookup(#[from] NamespaceRepositoryError),
    /// The strict export refused an incomplete card.
    #[error(transparent)]
    Export(#[from] ExportError),
    /// A protocol document could not be read.
    #[error(transparent)]
    Import(#[from] ImportError),
    /// The namespace does not exist.
    #[error("namespace '{0}' does not exist")]
    UnknownNamespace(NamespaceId),
    /// An extension names a schema that is not registered.
    #[error("no schema is registered with URI '{0}'")]
    UnknownSchema(String),
    /// The card failed the storage rules.
    #[error("agent card failed validation:\n{0}")]
    Invalid(ValidationReport),
    /// Another version of the agent is already the default.
    #[error(
        "agent '{namespace}/{name}' already has default version '{existing_version}'; \
         clear it before promoting another version"
    )]
    DefaultVersionConflict {
        /// Namespace of the agent.
        namespace: NamespaceId,
        /// Name of the agent.
        name: AgentName,
        /// Version currently holding the default flag.
        existing_version: AgentVersion,
    },
}

/// Result type for agent card service operations.
pub type AgentCardServiceResult<T> = Result<T, AgentCardServiceError>;

/// Agent card orchestration service.
#[derive(Clone)]
pub struct AgentCardService<R, S, N, C>
where
    R: AgentCardRepository,
    S: SchemaRepository,
    N: NamespaceRepository,
    C: Clock + Send + Sync,
{
    cards: Arc<R>,
    schemas: Arc<S>,
    namespaces: Arc<N>,
    clock: Arc<C>,
    config: RegistryConfig,
}

impl<R, S, N, C> AgentCardService<R, S, N, C>
where
    R: AgentCardRepository,
    S: SchemaRepository,
    N: NamespaceRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new agent card service.
    #[must_use]
    pub const fn new(
        cards: Arc<R>,
        schemas: Arc<S>,
        namespaces: Arc<N>,
        clock: Arc<C>,
        config: RegistryConfig,
    ) -> Self {
        Self {
            cards,
            schemas,
            namespaces,
            clock,
            config,
        }
    }

    /// Returns the configuration in use.
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Creates a card with its extensions.
    ///
    /// A blank protocol version is replaced by the configured default.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCardServiceError::UnknownNamespace`] when the namespace
    /// is missing, [`AgentCardServiceError::Invalid`] with every storage-rule
    /// violation, [`AgentCardServiceError::DefaultVersionConflict`] when the
    /// default slot is taken, [`AgentCardServiceError::Domain`] or
    /// [`AgentCardServiceError::UnknownSchema`] when an extension cannot be
    /// bound, or [`AgentCardServiceError::Repository`] when the
    /// `(namespace, name, version)` triple is taken.
    pub async fn create(&self, request: CreateAgentCardRequest) -> AgentCardServiceResult<AgentCard> {
        let CreateAgentCardRequest {
            namespace: raw_namespace,
            name: raw_name,
            version: raw_version,
            profile: raw_profile,
            is_default_version,
            is_active,
            extensions: drafts,
            actor,
        } = request;

        let namespace = NamespaceId::new(raw_namespace)?;
        self.ensure_namespace(&namespace).await?;

        let profile = self.with_protocol_default(raw_profile);
        let mut report = check_identity(&raw_name, &raw_version);
        report.merge(check_profile(&profile, &self.config.url_policy));
        ensure_valid(report)?;
        let name = AgentName::new(raw_name)?;
        let version = AgentVersion::new(raw_version)?;

        if is_default_version {
            self.ensure_default_slot_free(&namespace, &name, None).await?;
        }

        let mut records = Vec::with_capacity(drafts.len());
        for draft in drafts {
            records.push(self.bind_extension(draft).await?);
        }

        let new_card = NewAgentCard {
            namespace,
            name,
            version,
            profile,
            is_default_version,
            is_active,
            created_by: actor,
        };
        let card = records
            .into_iter()
            .fold(AgentCard::new(new_card, &*self.clock), AgentCard::with_extension);

        self.cards.create(&card).await?;
        info!(
            card_id = %card.id(),
            card = %card,
            extensions = card.extensions().len(),
            "created agent card"
        );
        Ok(card)
    }

    /// Replaces the protocol body of a card.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCardServiceError::Invalid`] with every storage-rule
    /// violation, or [`AgentCardServiceError::Repository`] when the card is
    /// not found.
    pub async fn update_profile(
        &self,
        id: AgentCardId,
        profile: CardProfile,
        actor: Option<&str>,
    ) -> AgentCardServiceResult<AgentCard> {
        let mut card = self.load(id).await?;
        let normalised = self.with_protocol_default(profile);
        ensure_valid(check_profile(&normalised, &self.config.url_policy))?;
        card.update_profile(normalised, actor, &*self.clock);
        self.cards.update(&card).await?;
        info!(card_id = %id, card = %card, "updated agent card profile");
        Ok(card)
    }

    /// Sets or clears the default-version flag.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCardServiceError::DefaultVersionConflict`] when another
    /// version already holds the flag; nothing is changed in that case.
    pub async fn set_default_version(
        &self,
        id: AgentCardId,
        is_default: bool,
        actor: Option<&str>,
    ) -> AgentCardServiceResult<AgentCard> {
        let mut card = self.load(id).await?;
        if is_default {
            self.ensure_default_slot_free(card.namespace(), card.name(), Some(id))
                .await?;
        }
        card.set_default_version(is_default, actor, &*self.clock);
        self.cards.update(&card).await?;
        info!(card_id = %id, card = %card, is_default, "changed default version flag");
        Ok(card)
    }

    /// Publishes or withdraws a card.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCardServiceError::Repository`] when the card is not
    /// found.
    pub async fn set_active(
        &self,
        id: AgentCardId,
        is_active: bool,
        actor: Option<&str>,
    ) -> AgentCardServiceResult<AgentCard> {
        let mut card = self.load(id).await?;
        card.set_active(is_active, actor, &*self.clock);
        self.cards.update(&card).await?;
        info!(card_id = %id, card = %card, is_active, "changed agent card status");
        Ok(card)
    }

    /// Attaches an extension, replacing one with the same URI.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCardServiceError::Domain`] when binding fails (URI
    /// mismatch or params violating the schema), or
    /// [`AgentCardServiceError::UnknownSchema`] when an explicitly named
    /// schema is not registered.
    pub async fn put_extension(
        &self,
        id: AgentCardId,
        draft: ExtensionDraft,
        actor: Option<&str>,
    ) -> AgentCardServiceResult<AgentCard> {
        let mut card = self.load(id).await?;
        let record = self.bind_extension(draft).await?;
        let uri = record.uri().to_owned();
        let replaced = card.put_extension(record, actor, &*self.clock).is_some();
        self.cards.update(&card).await?;
        info!(card_id = %id, uri = %uri, replaced, "stored agent card extension");
        Ok(card)
    }

    /// Detaches an extension.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCardServiceError::Domain`] when the card has no
    /// extension with `uri`.
    pub async fn remove_extension(
        &self,
        id: AgentCardId,
        uri: &str,
        actor: Option<&str>,
    ) -> AgentCardServiceResult<AgentCard> {
        let mut card = self.load(id).await?;
        card.remove_extension(uri, actor, &*self.clock)?;
        self.cards.update(&card).await?;
        info!(card_id = %id, uri = %uri, "removed agent card extension");
        Ok(card)
    }

    /// Deletes a card and its extensions.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCardServiceError::Repository`] when the card is not
    /// found or persistence fails.
    pub async fn delete(&self, id: AgentCardId) -> AgentCardServiceResult<()> {
        self.cards.delete(id).await?;
        info!(card_id = %id, "deleted agent card");
        Ok(())
    }

    /// Finds a card by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCardServiceError::Repository`] when the lookup fails.
    pub async fn find(&self, id: AgentCardId) -> AgentCardServiceResult<Option<AgentCard>> {
        Ok(self.cards.find_by_id(id).await?)
    }

    /// Finds a card by namespace, name, and version.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCardServiceError::NamespaceId`] or
    /// [`AgentCardServiceError::Domain`] for malformed keys, or
    /// [`AgentCardServiceError::Repository`] when the lookup fails.
    pub async fn find_by_identity(
        &self,
        namespace: &str,
        name: &str,
        version: &str,
    ) -> AgentCardServiceResult<Option<AgentCard>> {
        let namespace_id = NamespaceId::new(namespace)?;
        let agent_name = AgentName::new(name)?;
        let agent_version = AgentVersion::new(version)?;
        Ok(self
            .cards
            .find_by_identity(&namespace_id, &agent_name, &agent_version)
            .await?)
    }

    /// Finds the default version of an agent.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCardServiceError::NamespaceId`] or
    /// [`AgentCardServiceError::Domain`] for malformed keys, or
    /// [`AgentCardServiceError::Repository`] when the lookup fails.
    pub async fn find_default_version(
        &self,
        namespace: &str,
        name: &str,
    ) -> AgentCardServiceResult<Option<AgentCard>> {
        let namespace_id = NamespaceId::new(namespace)?;
        let agent_name = AgentName::new(name)?;
        Ok(self
            .cards
            .find_default_version(&namespace_id, &agent_name)
            .await?)
    }

    /// Lists cards matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCardServiceError::Repository`] when the lookup fails.
    pub async fn list(&self, filter: &CardFilter) -> AgentCardServiceResult<Vec<AgentCard>> {
        Ok(self.cards.list(filter).await?)
    }

    /// Exports a card without completeness checks.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCardServiceError::Repository`] when the card is not
    /// found.
    pub async fn raw_export(
        &self,
        id: AgentCardId,
        include_metadata: bool,
    ) -> AgentCardServiceResult<Value> {
        let card = self.load(id).await?;
        Ok(card.to_raw_export(include_metadata))
    }

    /// Exports a card as a protocol-compliant document.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCardServiceError::Export`] naming every missing
    /// protocol member, or [`AgentCardServiceError::Repository`] when the
    /// card is not found.
    pub async fn standard_export(
        &self,
        id: AgentCardId,
        include_metadata: bool,
    ) -> AgentCardServiceResult<Value> {
        let card = self.load(id).await?;
        card.to_strict_export(include_metadata, true)
            .map_err(|err| {
                let ExportError::Incomplete(ref report) = err;
                warn!(
                    card_id = %id,
                    card = %card,
                    missing = report.len(),
                    "refusing to export incomplete agent card"
                );
                err.into()
            })
    }

    /// Creates a card from a protocol document.
    ///
    /// Extensions listed under `capabilities.extensions` and the legacy
    /// `domainExtensions` map are both attached.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCardServiceError::Import`] when the document cannot be
    /// read, plus every error [`Self::create`] returns.
    pub async fn import_document(
        &self,
        namespace: &str,
        document: &Value,
        actor: Option<&str>,
    ) -> AgentCardServiceResult<AgentCard> {
        let parsed = CardDocument::parse(document)?;
        let mut request = CreateAgentCardRequest::new(namespace, parsed.name, parsed.version)
            .with_profile(parsed.profile);
        request.extensions = parsed.extensions;
        request.actor = actor.map(str::to_owned);
        self.create(request).await
    }

    async fn load(&self, id: AgentCardId) -> AgentCardServiceResult<AgentCard> {
        self.cards
            .find_by_id(id)
            .await?
            .ok_or_else(|| AgentCardRepositoryError::NotFound(id).into())
    }

    async fn ensure_namespace(&self, namespace: &NamespaceId) -> AgentCardServiceResult<()> {
        if self.namespaces.find_by_id(namespace).await?.is_none() {
            debug!(namespace = %namespace, "rejecting card for unknown namespace");
            return Err(AgentCardServiceError::UnknownNamespace(namespace.clone()));
        }
        Ok(())
    }

    async fn ensure_default_slot_free(
        &self,
        namespace: &NamespaceId,
        name: &AgentName,
        exclude: Option<AgentCardId>,
    ) -> AgentCardServiceResult<()> {
        let holder = self.cards.find_default_version(namespace, name).await?;
        if let Some(existing) = holder
            && Some(existing.id()) != exclude
        {
            warn!(
                namespace = %namespace,
                name = %name,
                existing_version = %existing.version(),
                "default version already taken"
            );
            return Err(AgentCardServiceError::DefaultVersionConflict {
                namespace: namespace.clone(),
                name: name.clone(),
                existing_version: existing.version().clone(),
            });
        }
        Ok(())
    }

    async fn bind_extension(&self, draft: ExtensionDraft) -> AgentCardServiceResult<ExtensionRecord> {
        let schema = self.resolve_schema(&draft).await?;
        let record = ExtensionRecord::bind(draft, schema.as_ref()).map_err(|err| {
            debug!(error = %err, "extension rejected");
            AgentCardDomainError::from(err)
        })?;
        Ok(record)
    }

    /// Finds the schema an extension draft is validated against.
    ///
    /// An explicit `schema_uri` must name a registered schema. Otherwise the
    /// extension URI is looked up and only an active schema is used.
    async fn resolve_schema(
        &self,
        draft: &ExtensionDraft,
    ) -> AgentCardServiceResult<Option<SchemaDefinition>> {
        let lookup = draft.lookup_uri();
        let Ok(uri) = SchemaUri::new(lookup) else {
            if draft.schema_uri.is_some() {
                return Err(AgentCardServiceError::UnknownSchema(lookup.to_owned()));
            }
            return Ok(None);
        };
        let found = self.schemas.find_by_uri(&uri).await?;
        if draft.schema_uri.is_some() {
            return found
                .map(Some)
                .ok_or_else(|| AgentCardServiceError::UnknownSchema(lookup.to_owned()));
        }
        Ok(found.filter(SchemaDefinition::is_active))
    }

    fn with_protocol_default(&self, mut profile: CardProfile) -> CardProfile {
        let protocol_version = profile.protocol_version.trim();
        profile.protocol_version = if protocol_version.is_empty() {
            self.config.default_protocol_version.clone()
        } else {
            protocol_version.to_owned()
        };
        profile.url = profile.url.trim().to_owned();
        profile
    }
}

fn ensure_valid(report: ValidationReport) -> AgentCardServiceResult<()> {
    report.into_result().map_err(|failed| {
        debug!(violations = failed.len(), "agent card failed storage rules");
        AgentCardServiceError::Invalid(failed)
    })
}
