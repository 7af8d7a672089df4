//! Port for counting references to a schema URI.

use super::SchemaRepositoryResult;
use crate::schema::domain::SchemaUri;
use async_trait::async_trait;

/// Reports how many extension records point at a schema URI.
///
/// The schema registry uses this to refuse deleting a schema that is still
/// in use and to show usage counts in the catalog. The agent card
/// repositories implement it.
#[async_trait]
pub trait SchemaUsage: Send + Sync {
    /// Counts extension records whose URI equals `uri`.
    ///
    /// # Errors
    ///
    /// Returns [`super::SchemaRepositoryError::Persistence`] when the lookup
    /// fails.
    async fn count_schema_references(&self, uri: &SchemaUri) -> SchemaRepositoryResult<u64>;
}
