//! Shared world state for registry BDD scenarios.

use std::sync::Arc;

use agentcards::agent_card::{
    adapters::memory::InMemoryAgentCardRepository,
    domain::{AgentCard, CardProfile},
    services::{AgentCardService, AgentCardServiceError},
};
use agentcards::config::RegistryConfig;
use agentcards::namespace::{
    adapters::memory::InMemoryNamespaceRepository, services::NamespaceService,
};
use agentcards::schema::{
    adapters::memory::InMemorySchemaRepository,
    domain::{FieldSpec, FieldType, SchemaDefinition},
    services::{RegisterSchemaRequest, SchemaRegistryService, SchemaRegistryServiceError},
};
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::{Value, json};

/// URI of the physical asset schema used by the scenarios.
pub const ASSET_URI: &str = "https://my-org.com/schemas/physicalAsset/v1";

/// Card service used by the BDD world.
pub type TestCardService = AgentCardService<
    InMemoryAgentCardRepository,
    InMemorySchemaRepository,
    InMemoryNamespaceRepository,
    DefaultClock,
>;

/// Schema service used by the BDD world.
pub type TestSchemaService =
    SchemaRegistryService<InMemorySchemaRepository, InMemoryAgentCardRepository, DefaultClock>;

/// Namespace service used by the BDD world.
pub type TestNamespaceService =
    NamespaceService<InMemoryNamespaceRepository, InMemoryAgentCardRepository, DefaultClock>;

/// Scenario world for registry behaviour tests.
pub struct RegistryWorld {
    /// Card operations.
    pub cards: TestCardService,
    /// Schema operations.
    pub schemas: TestSchemaService,
    /// Namespace operations.
    pub namespaces: TestNamespaceService,
    /// Schema registered by the scenario.
    pub schema: Option<SchemaDefinition>,
    /// Card created by the scenario.
    pub card: Option<AgentCard>,
    /// Result of the last schema deletion.
    pub last_delete_result: Option<Result<(), SchemaRegistryServiceError>>,
    /// Result of the last export.
    pub last_export_result: Option<Result<Value, AgentCardServiceError>>,
}

impl RegistryWorld {
    /// Creates a world whose services share empty in-memory stores.
    #[must_use]
    pub fn new() -> Self {
        let card_store = Arc::new(InMemoryAgentCardRepository::new());
        let schema_store = Arc::new(InMemorySchemaRepository::new());
        let namespace_store = Arc::new(InMemoryNamespaceRepository::new());
        let clock = Arc::new(DefaultClock);
        Self {
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
            namespaces: NamespaceService::new(namespace_store, card_store, clock),
            schema: None,
            card: None,
            last_delete_result: None,
            last_export_result: None,
        }
    }

    /// Returns the card created by the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error when no card has been created yet.
    pub fn card(&self) -> Result<&AgentCard, eyre::Report> {
        self.card
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no card in scenario world"))
    }

    /// Returns the schema registered by the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error when no schema has been registered yet.
    pub fn schema(&self) -> Result<&SchemaDefinition, eyre::Report> {
        self.schema
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no schema in scenario world"))
    }
}

impl Default for RegistryWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> RegistryWorld {
    RegistryWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Builds the physical asset schema registration.
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

/// Builds a profile that passes the strict export.
pub fn complete_profile() -> CardProfile {
    CardProfile::new()
        .with_description("Monitors pumps on the plant floor")
        .with_url("https://agents.example.com/pumps")
        .with_modes(["text/plain"], ["application/json"])
        .with_skill(json!({
            "id": "status",
            "name": "Pump status",
            "description": "Reports the status of a pump",
            "tags": ["plant"]
        }))
}
