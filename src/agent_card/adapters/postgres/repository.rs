//! `PostgreSQL` repository implementation for agent cards.

use super::{
    models::{AgentCardRow, ExtensionRow},
    schema::{agent_card_extensions, agent_cards},
};
use crate::agent_card::{
    domain::{
        AgentCard, AgentCardId, AgentName, AgentVersion, CardProfile, ExtensionId,
        ExtensionRecord, PersistedAgentCardData, PersistedExtensionData, Transport,
    },
    ports::{AgentCardRepository, AgentCardRepositoryError, AgentCardRepositoryResult, CardFilter},
};
use crate::namespace::{
    domain::NamespaceId,
    ports::{NamespaceRepositoryError, NamespaceRepositoryResult, NamespaceUsage},
};
use crate::schema::{
    domain::{SchemaId, SchemaUri},
    ports::{SchemaRepositoryError, SchemaRepositoryResult, SchemaUsage},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

/// `PostgreSQL` connection pool type used by agent card adapters.
pub type CardPgPool = Pool<ConnectionManager<PgConnection>>;

const IDENTITY_CONSTRAINT: &str = "uq_agent_cards_identity";
const DEFAULT_VERSION_INDEX: &str = "idx_unique_default_version";

/// `PostgreSQL`-backed agent card repository.
///
/// Also answers schema and namespace usage counts from the same tables.
#[derive(Debug, Clone)]
pub struct PostgresAgentCardRepository {
    pool: CardPgPool,
}

/// Identity of the card being written, kept for error mapping.
#[derive(Debug, Clone)]
struct WriteTarget {
    id: AgentCardId,
    namespace: NamespaceId,
    name: AgentName,
    version: AgentVersion,
}

impl WriteTarget {
    fn of(card: &AgentCard) -> Self {
        Self {
            id: card.id(),
            namespace: card.namespace().clone(),
            name: card.name().clone(),
            version: card.version().clone(),
        }
    }

    fn map_write_error(&self, err: DieselError) -> AgentCardRepositoryError {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                if violates(info.as_ref(), IDENTITY_CONSTRAINT) =>
            {
                AgentCardRepositoryError::DuplicateIdentity {
                    namespace: self.namespace.clone(),
                    name: self.name.clone(),
                    version: self.version.clone(),
                }
            }
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                if violates(info.as_ref(), DEFAULT_VERSION_INDEX) =>
            {
                AgentCardRepositoryError::DuplicateDefaultVersion {
                    namespace: self.namespace.clone(),
                    name: self.name.clone(),
                }
            }
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                AgentCardRepositoryError::DuplicateCard(self.id)
            }
            _ => AgentCardRepositoryError::persistence(err),
        }
    }
}

impl PostgresAgentCardRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: CardPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> AgentCardRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> AgentCardRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(AgentCardRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(AgentCardRepositoryError::persistence)?
    }

    async fn count_extensions_with_uri(&self, uri: String) -> AgentCardRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let count = agent_card_extensions::table
                .filter(agent_card_extensions::uri.eq(&uri))
                .count()
                .get_result::<i64>(connection)
                .map_err(AgentCardRepositoryError::persistence)?;
            u64::try_from(count).map_err(AgentCardRepositoryError::invalid_persisted_data)
        })
        .await
    }

    async fn count_cards_with_namespace(
        &self,
        namespace: String,
    ) -> AgentCardRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let count = agent_cards::table
                .filter(agent_cards::namespace_id.eq(&namespace))
                .count()
                .get_result::<i64>(connection)
                .map_err(AgentCardRepositoryError::persistence)?;
            u64::try_from(count).map_err(AgentCardRepositoryError::invalid_persisted_data)
        })
        .await
    }
}

#[async_trait]
impl AgentCardRepository for PostgresAgentCardRepository {
    async fn create(&self, card: &AgentCard) -> AgentCardRepositoryResult<()> {
        let target = WriteTarget::of(card);
        let row = to_row(card)?;
        let extension_rows = to_extension_rows(card);

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, DieselError, _>(|tx| {
                    diesel::insert_into(agent_cards::table)
                        .values(&row)
                        .execute(tx)?;
                    insert_extensions(tx, &extension_rows)
                })
                .map_err(|err| target.map_write_error(err))
        })
        .await
    }

    async fn update(&self, card: &AgentCard) -> AgentCardRepositoryResult<()> {
        let target = WriteTarget::of(card);
        let row = to_row(card)?;
        let extension_rows = to_extension_rows(card);

        self.run_blocking(move |connection| {
            let found = connection
                .transaction::<_, DieselError, _>(|tx| {
                    let updated_count =
                        diesel::update(agent_cards::table.filter(agent_cards::id.eq(row.id)))
                            .set(&row)
                            .execute(tx)?;
                    if updated_count == 0 {
                        return Ok(false);
                    }

                    diesel::delete(
                        agent_card_extensions::table
                            .filter(agent_card_extensions::card_id.eq(row.id)),
                    )
                    .execute(tx)?;
                    insert_extensions(tx, &extension_rows)?;
                    Ok(true)
                })
                .map_err(|err| target.map_write_error(err))?;

            if found {
                Ok(())
            } else {
                Err(AgentCardRepositoryError::NotFound(target.id))
            }
        })
        .await
    }

    async fn delete(&self, id: AgentCardId) -> AgentCardRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted_count =
                diesel::delete(agent_cards::table.filter(agent_cards::id.eq(id.into_inner())))
                    .execute(connection)
                    .map_err(AgentCardRepositoryError::persistence)?;
            if deleted_count == 0 {
                return Err(AgentCardRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: AgentCardId) -> AgentCardRepositoryResult<Option<AgentCard>> {
        self.run_blocking(move |connection| {
            let row = agent_cards::table
                .filter(agent_cards::id.eq(id.into_inner()))
                .select(AgentCardRow::as_select())
                .first::<AgentCardRow>(connection)
                .optional()
                .map_err(AgentCardRepositoryError::persistence)?;
            row.map(|found| load_single(connection, found)).transpose()
        })
        .await
    }

    async fn find_by_identity(
        &self,
        namespace: &NamespaceId,
        name: &AgentName,
        version: &AgentVersion,
    ) -> AgentCardRepositoryResult<Option<AgentCard>> {
        let namespace_key = namespace.as_str().to_owned();
        let name_key = name.as_str().to_owned();
        let version_key = version.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = agent_cards::table
                .filter(agent_cards::namespace_id.eq(&namespace_key))
                .filter(agent_cards::name.eq(&name_key))
                .filter(agent_cards::version.eq(&version_key))
                .select(AgentCardRow::as_select())
                .first::<AgentCardRow>(connection)
                .optional()
                .map_err(AgentCardRepositoryError::persistence)?;
            row.map(|found| load_single(connection, found)).transpose()
        })
        .await
    }

    async fn find_default_version(
        &self,
        namespace: &NamespaceId,
        name: &AgentName,
    ) -> AgentCardRepositoryResult<Option<AgentCard>> {
        let namespace_key = namespace.as_str().to_owned();
        let name_key = name.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = agent_cards::table
                .filter(agent_cards::namespace_id.eq(&namespace_key))
                .filter(agent_cards::name.eq(&name_key))
                .filter(agent_cards::is_default_version.eq(true))
                .select(AgentCardRow::as_select())
                .first::<AgentCardRow>(connection)
                .optional()
                .map_err(AgentCardRepositoryError::persistence)?;
            row.map(|found| load_single(connection, found)).transpose()
        })
        .await
    }

    async fn list(&self, filter: &CardFilter) -> AgentCardRepositoryResult<Vec<AgentCard>> {
        let criteria = filter.clone();
        self.run_blocking(move |connection| {
            let mut query = agent_cards::table
                .select(AgentCardRow::as_select())
                .into_boxed();
            if let Some(namespace) = criteria.namespace {
                query = query.filter(agent_cards::namespace_id.eq(String::from(namespace)));
            }
            if let Some(fragment) = criteria.name_contains {
                let pattern = format!("%{}%", escape_like(&fragment));
                query = query.filter(agent_cards::name.ilike(pattern));
            }
            if criteria.default_only {
                query = query.filter(agent_cards::is_default_version.eq(true));
            }
            if criteria.active_only {
                query = query.filter(agent_cards::is_active.eq(true));
            }
            let rows = query
                .order((
                    agent_cards::namespace_id.asc(),
                    agent_cards::name.asc(),
                    agent_cards::version.desc(),
                ))
                .load::<AgentCardRow>(connection)
                .map_err(AgentCardRepositoryError::persistence)?;
            load_many(connection, rows)
        })
        .await
    }
}

#[async_trait]
impl SchemaUsage for PostgresAgentCardRepository {
    async fn count_schema_references(&self, uri: &SchemaUri) -> SchemaRepositoryResult<u64> {
        self.count_extensions_with_uri(uri.as_str().to_owned())
            .await
            .map_err(SchemaRepositoryError::persistence)
    }
}

#[async_trait]
impl NamespaceUsage for PostgresAgentCardRepository {
    async fn count_cards_in_namespace(
        &self,
        namespace: &NamespaceId,
    ) -> NamespaceRepositoryResult<u64> {
        self.count_cards_with_namespace(namespace.as_str().to_owned())
            .await
            .map_err(NamespaceRepositoryError::persistence)
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> AgentCardRepositoryResult<Value> {
    serde_json::to_value(value).map_err(AgentCardRepositoryError::persistence)
}

fn to_row(card: &AgentCard) -> AgentCardRepositoryResult<AgentCardRow> {
    let profile = card.profile();
    Ok(AgentCardRow {
        id: card.id().into_inner(),
        namespace_id: card.namespace().as_str().to_owned(),
        name: card.name().as_str().to_owned(),
        version: card.version().as_str().to_owned(),
        is_default_version: card.is_default_version(),
        is_active: card.is_active(),
        protocol_version: profile.protocol_version.clone(),
        description: profile.description.clone(),
        url: profile.url.clone(),
        preferred_transport: profile.preferred_transport.as_str().to_owned(),
        capabilities: to_json(&profile.capabilities)?,
        default_input_modes: to_json(&profile.default_input_modes)?,
        default_output_modes: to_json(&profile.default_output_modes)?,
        skills: to_json(&profile.skills)?,
        provider: profile.provider.clone(),
        icon_url: profile.icon_url.clone(),
        documentation_url: profile.documentation_url.clone(),
        additional_interfaces: to_json(&profile.additional_interfaces)?,
        security_schemes: Value::Object(profile.security_schemes.clone()),
        security: to_json(&profile.security)?,
        supports_authenticated_extended_card: profile.supports_authenticated_extended_card,
        signatures: to_json(&profile.signatures)?,
        created_at: card.created_at(),
        updated_at: card.updated_at(),
        created_by: card.created_by().map(str::to_owned),
        updated_by: card.updated_by().map(str::to_owned),
    })
}

fn to_extension_rows(card: &AgentCard) -> Vec<ExtensionRow> {
    let card_id = card.id().into_inner();
    card.extensions()
        .iter()
        .map(|record| ExtensionRow {
            id: record.id().into_inner(),
            card_id,
            uri: record.uri().to_owned(),
            description: record.description().to_owned(),
            required: record.is_required(),
            params: Value::Object(record.params().clone()),
            schema_id: record.schema_id().map(SchemaId::into_inner),
            display_order: record.order(),
        })
        .collect()
}

fn insert_extensions(connection: &mut PgConnection, rows: &[ExtensionRow]) -> QueryResult<()> {
    if !rows.is_empty() {
        diesel::insert_into(agent_card_extensions::table)
            .values(rows)
            .execute(connection)?;
    }
    Ok(())
}

fn load_single(
    connection: &mut PgConnection,
    row: AgentCardRow,
) -> AgentCardRepositoryResult<AgentCard> {
    let extension_rows = agent_card_extensions::table
        .filter(agent_card_extensions::card_id.eq(row.id))
        .select(ExtensionRow::as_select())
        .load::<ExtensionRow>(connection)
        .map_err(AgentCardRepositoryError::persistence)?;
    row_to_card(row, extension_rows)
}

fn load_many(
    connection: &mut PgConnection,
    rows: Vec<AgentCardRow>,
) -> AgentCardRepositoryResult<Vec<AgentCard>> {
    let ids: Vec<uuid::Uuid> = rows.iter().map(|row| row.id).collect();
    let extension_rows = agent_card_extensions::table
        .filter(agent_card_extensions::card_id.eq_any(ids))
        .select(ExtensionRow::as_select())
        .load::<ExtensionRow>(connection)
        .map_err(AgentCardRepositoryError::persistence)?;

    let mut extensions_by_card: HashMap<uuid::Uuid, Vec<ExtensionRow>> = HashMap::new();
    for extension_row in extension_rows {
        extensions_by_card
            .entry(extension_row.card_id)
            .or_default()
            .push(extension_row);
    }

    rows.into_iter()
        .map(|row| {
            let extensions = extensions_by_card.remove(&row.id).unwrap_or_default();
            row_to_card(row, extensions)
        })
        .collect()
}

fn from_json<T: DeserializeOwned>(value: Value) -> AgentCardRepositoryResult<T> {
    serde_json::from_value(value).map_err(AgentCardRepositoryError::invalid_persisted_data)
}

fn row_to_card(
    row: AgentCardRow,
    extension_rows: Vec<ExtensionRow>,
) -> AgentCardRepositoryResult<AgentCard> {
    let profile = CardProfile {
        protocol_version: row.protocol_version,
        description: row.description,
        url: row.url,
        preferred_transport: Transport::try_from(row.preferred_transport.as_str())
            .map_err(AgentCardRepositoryError::invalid_persisted_data)?,
        capabilities: from_json(row.capabilities)?,
        default_input_modes: from_json(row.default_input_modes)?,
        default_output_modes: from_json(row.default_output_modes)?,
        skills: from_json(row.skills)?,
        provider: row.provider,
        icon_url: row.icon_url,
        documentation_url: row.documentation_url,
        additional_interfaces: from_json(row.additional_interfaces)?,
        security_schemes: from_json(row.security_schemes)?,
        security: from_json(row.security)?,
        supports_authenticated_extended_card: row.supports_authenticated_extended_card,
        signatures: from_json(row.signatures)?,
    };

    let extensions = extension_rows
        .into_iter()
        .map(row_to_extension)
        .collect::<AgentCardRepositoryResult<Vec<_>>>()?;

    let data = PersistedAgentCardData {
        id: AgentCardId::from_uuid(row.id),
        namespace: NamespaceId::new(row.namespace_id)
            .map_err(AgentCardRepositoryError::invalid_persisted_data)?,
        name: AgentName::new(row.name).map_err(AgentCardRepositoryError::invalid_persisted_data)?,
        version: AgentVersion::new(row.version)
            .map_err(AgentCardRepositoryError::invalid_persisted_data)?,
        is_default_version: row.is_default_version,
        is_active: row.is_active,
        profile,
        extensions,
        created_at: row.created_at,
        updated_at: row.updated_at,
        created_by: row.created_by,
        updated_by: row.updated_by,
    };
    Ok(AgentCard::from_persisted(data))
}

fn row_to_extension(row: ExtensionRow) -> AgentCardRepositoryResult<ExtensionRecord> {
    Ok(ExtensionRecord::from_persisted(PersistedExtensionData {
        id: ExtensionId::from_uuid(row.id),
        uri: row.uri,
        description: row.description,
        required: row.required,
        params: from_json(row.params)?,
        schema_id: row.schema_id.map(SchemaId::from_uuid),
        order: row.display_order,
    }))
}

fn escape_like(fragment: &str) -> String {
    fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn violates(info: &dyn DatabaseErrorInformation, constraint: &str) -> bool {
    info.constraint_name().is_some_and(|name| name == constraint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent_card::domain::{CardCapabilities, ExtensionDraft, NewAgentCard};
    use mockable::DefaultClock;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn card() -> AgentCard {
        let profile = CardProfile::new()
            .with_description("Tracks pumps")
            .with_url("https://agents.example.com/pumps")
            .with_transport(Transport::HttpJson)
            .with_capabilities(CardCapabilities::default().with_streaming())
            .with_modes(["text/plain"], ["application/json"])
            .with_skill(json!({"id": "status", "name": "Status"}))
            .with_provider(json!({"organization": "Acme", "url": "https://acme.example"}));
        let new_card = NewAgentCard {
            namespace: NamespaceId::new("plant").expect("valid namespace"),
            name: AgentName::new("Pump Agent").expect("valid name"),
            version: AgentVersion::new("1.2.0").expect("valid version"),
            profile,
            is_default_version: true,
            is_active: true,
            created_by: Some("alice".to_owned()),
        };
        let record = ExtensionRecord::bind(
            ExtensionDraft::new("https://acme.example/ext/site")
                .required()
                .with_params(json!({"site": "north"})),
            None,
        )
        .expect("valid extension");
        AgentCard::new(new_card, &DefaultClock).with_extension(record)
    }

    #[rstest]
    fn card_survives_row_conversion(card: AgentCard) {
        let row = to_row(&card).expect("row conversion");
        let extensions = to_extension_rows(&card);

        assert_eq!(row.preferred_transport, "http+json");
        assert_eq!(
            row.capabilities,
            json!({
                "streaming": true,
                "pushNotifications": false,
                "stateTransitionHistory": false
            })
        );
        assert_eq!(extensions.len(), 1);
        assert_eq!(row_to_card(row, extensions).expect("card conversion"), card);
    }

    #[rstest]
    fn unknown_transport_label_is_invalid_persisted_data(card: AgentCard) {
        let mut row = to_row(&card).expect("row conversion");
        row.preferred_transport = "carrier-pigeon".to_owned();

        let result = row_to_card(row, Vec::new());

        assert!(matches!(
            result,
            Err(AgentCardRepositoryError::InvalidPersistedData(_))
        ));
    }

    #[rstest]
    fn non_object_params_are_invalid_persisted_data(card: AgentCard) {
        let row = to_row(&card).expect("row conversion");
        let mut extensions = to_extension_rows(&card);
        for extension in &mut extensions {
            extension.params = json!([1, 2]);
        }

        assert!(matches!(
            row_to_card(row, extensions),
            Err(AgentCardRepositoryError::InvalidPersistedData(_))
        ));
    }

    #[rstest]
    #[case("pump", "pump")]
    #[case("50%", "50\\%")]
    #[case("a_b", "a\\_b")]
    #[case("back\\slash", "back\\\\slash")]
    fn like_wildcards_are_escaped(#[case] fragment: &str, #[case] expected: &str) {
        assert_eq!(escape_like(fragment), expected);
    }
}
