//! Shared wiring for in-memory registry integration tests.
//!
//! Every service shares one card store, which also answers the usage
//! queries behind the schema and namespace delete guards and the card
//! lookups behind case bindings.

use std::sync::Arc;

use agentcards::agent_card::{
    adapters::memory::InMemoryAgentCardRepository,
    domain::CardProfile,
    services::{AgentCardService, CreateAgentCardRequest},
};
use agentcards::agent_case::{
    adapters::memory::InMemoryAgentCaseRepository, services::AgentCaseService,
};
use agentcards::config::RegistryConfig;
use agentcards::namespace::{
    adapters::memory::InMemoryNamespaceRepository,
    services::{CreateNamespaceRequest, NamespaceService},
};
use agentcards::schema::{
    adapters::memory::InMemorySchemaRepository,
    domain::{FieldSpec, FieldType},
    services::{RegisterSchemaRequest, SchemaRegistryService},
};
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::json;

/// URI of the asset schema registered by [`asset_schema_request`].
pub const ASSET_URI: &str = "https://my-org.com/schemas/physicalAsset/v1";

/// Card service wired to the shared in-memory stores.
pub type CardService = AgentCardService<
    InMemoryAgentCardRepository,
    InMemorySchemaRepository,
    InMemoryNamespaceRepository,
    DefaultClock,
>;

/// Schema service using the card store for usage counts.
pub type SchemaService =
    SchemaRegistryService<InMemorySchemaRepository, InMemoryAgentCardRepository, DefaultClock>;

/// Namespace service using the card store for usage counts.
pub type DirectoryService =
    NamespaceService<InMemoryNamespaceRepository, InMemoryAgentCardRepository, DefaultClock>;

/// Case service checking card bindings against the card store.
pub type CaseService =
    AgentCaseService<InMemoryAgentCaseRepository, InMemoryAgentCardRepository, DefaultClock>;

/// The registry services over shared stores.
pub struct Registry {
    /// Agent card operations.
    pub cards: CardService,
    /// Extension schema operations.
    pub schemas: SchemaService,
    /// Namespace operations.
    pub namespaces: DirectoryService,
    /// Agent case operations.
    pub cases: CaseService,
}

/// Provides a registry with empty stores.
#[fixture]
pub fn registry() -> Registry {
    let card_store = Arc::new(InMemoryAgentCardRepository::new());
    let schema_store = Arc::new(InMemorySchemaRepository::new());
    let namespace_store = Arc::new(InMemoryNamespaceRepository::new());
    let clock = Arc::new(DefaultClock);

    Registry {
        cards: AgentCardService::new(
            Arc::clone(&card_store),
            Arc::clone(&schema_store),
            Arc::clone(&namespace_store),
            Arc::clone(&clock),
            RegistryConfig::default(),
        ),
        schemas: SchemaRegistryService::new(
            schema_store,
            Arc::clone(&card_store),
            Arc::clone(&clock),
        ),
        namespaces: NamespaceService::new(
            namespace_store,
            Arc::clone(&card_store),
            Arc::clone(&clock),
        ),
        cases: AgentCaseService::new(
            Arc::new(InMemoryAgentCaseRepository::new()),
            card_store,
            clock,
        ),
    }
}

/// Creates a namespace, panicking on failure.
///
/// # Panics
///
/// Panics when the namespace cannot be created.
pub async fn seed_namespace(registry: &Registry, id: &str) {
    registry
        .namespaces
        .create(CreateNamespaceRequest::new(id, format!("{id} agents")))
        .await
        .expect("namespace should be created");
}

/// Asset schema with a required `id` of at least three characters and a
/// required `status` enum.
#[must_use]
pub fn asset_schema_request() -> RegisterSchemaRequest {
    RegisterSchemaRequest::new(ASSET_URI, "physicalAsset", "v1")
        .with_description("Physical asset identity")
        .with_field(
            FieldSpec::new("id", FieldType::String)
                .required()
                .with_min_length(3),
        )
        .with_field(
            FieldSpec::new("status", FieldType::Enum)
                .required()
                .with_choices(["OPERATIONAL", "OFFLINE"])
                .with_order(1),
        )
}

/// A profile that passes the strict export.
#[must_use]
pub fn complete_profile() -> CardProfile {
    CardProfile::new()
        .with_description("Tracks lab instruments")
        .with_url("https://agents.example.com/a2a")
        .with_modes(["text/plain"], ["application/json"])
        .with_skill(json!({
            "id": "lookup",
            "name": "Lookup",
            "description": "Find an instrument",
            "tags": ["lab"]
        }))
}

/// Request for a complete card in `namespace`.
#[must_use]
pub fn card_request(namespace: &str, name: &str, version: &str) -> CreateAgentCardRequest {
    CreateAgentCardRequest::new(namespace, name, version).with_profile(complete_profile())
}
