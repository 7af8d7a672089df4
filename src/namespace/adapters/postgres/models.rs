//! Diesel row models for namespace persistence.

use super::schema::namespaces;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query and insert row for namespace records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = namespaces)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NamespaceRow {
    /// Namespace key.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Active flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
