//! Diesel row models for agent card persistence.

use super::schema::{agent_card_extensions, agent_cards};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query, insert, and update row for agent cards.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = agent_cards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct AgentCardRow {
    /// Internal card identifier.
    pub id: uuid::Uuid,
    /// Owning namespace.
    pub namespace_id: String,
    /// Agent name.
    pub name: String,
    /// Agent version.
    pub version: String,
    /// Default-version flag.
    pub is_default_version: bool,
    /// Active flag.
    pub is_active: bool,
    /// Protocol revision.
    pub protocol_version: String,
    /// Description.
    pub description: String,
    /// Endpoint URL.
    pub url: String,
    /// Preferred transport label.
    pub preferred_transport: String,
    /// Capability flags.
    pub capabilities: Value,
    /// Default input MIME types.
    pub default_input_modes: Value,
    /// Default output MIME types.
    pub default_output_modes: Value,
    /// Skill objects.
    pub skills: Value,
    /// Provider object.
    pub provider: Option<Value>,
    /// Icon URL.
    pub icon_url: Option<String>,
    /// Documentation URL.
    pub documentation_url: Option<String>,
    /// Additional interfaces.
    pub additional_interfaces: Value,
    /// Security schemes.
    pub security_schemes: Value,
    /// Security requirements.
    pub security: Value,
    /// Authenticated extended card flag.
    pub supports_authenticated_extended_card: bool,
    /// Signatures.
    pub signatures: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Creator username.
    pub created_by: Option<String>,
    /// Last editor username.
    pub updated_by: Option<String>,
}

/// Query and insert row for extension records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = agent_card_extensions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ExtensionRow {
    /// Internal extension identifier.
    pub id: uuid::Uuid,
    /// Owning card.
    pub card_id: uuid::Uuid,
    /// Extension URI.
    pub uri: String,
    /// Description.
    pub description: String,
    /// Required flag.
    pub required: bool,
    /// Params object.
    pub params: Value,
    /// Referenced schema.
    pub schema_id: Option<uuid::Uuid>,
    /// Display order.
    pub display_order: i32,
}
