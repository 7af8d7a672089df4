//! Port for counting agent cards held by a namespace.

use super::NamespaceRepositoryResult;
use crate::namespace::domain::NamespaceId;
use async_trait::async_trait;

/// Reports how many agent cards a namespace holds.
#[async_trait]
pub trait NamespaceUsage: Send + Sync {
    /// Counts agent cards stored under `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`super::NamespaceRepositoryError::Persistence`] when the
    /// lookup fails.
    async fn count_cards_in_namespace(
        &self,
        namespace: &NamespaceId,
    ) -> NamespaceRepositoryResult<u64>;
}
