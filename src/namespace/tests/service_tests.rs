//! Unit tests for namespace service orchestration.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::namespace::{
    adapters::memory::InMemoryNamespaceRepository,
    domain::NamespaceId,
    ports::{NamespaceRepositoryError, NamespaceRepositoryResult, NamespaceUsage},
    services::{
        CreateNamespaceRequest, NamespaceService, NamespaceServiceError, UpdateNamespaceRequest,
    },
};
use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

/// Card counts keyed by namespace, set directly by tests.
#[derive(Debug, Default)]
struct FixedCardCounts {
    counts: RwLock<HashMap<String, u64>>,
}

impl FixedCardCounts {
    fn set(&self, namespace: &str, count: u64) {
        self.counts
            .write()
            .expect("count lock")
            .insert(namespace.to_owned(), count);
    }
}

#[async_trait]
impl NamespaceUsage for FixedCardCounts {
    async fn count_cards_in_namespace(
        &self,
        namespace: &NamespaceId,
    ) -> NamespaceRepositoryResult<u64> {
        let counts = self.counts.read().expect("count lock");
        Ok(counts.get(namespace.as_str()).copied().unwrap_or(0))
    }
}

type TestService = NamespaceService<InMemoryNamespaceRepository, FixedCardCounts, DefaultClock>;

struct Harness {
    service: TestService,
    usage: Arc<FixedCardCounts>,
}

#[fixture]
fn harness() -> Harness {
    let usage = Arc::new(FixedCardCounts::default());
    let service = NamespaceService::new(
        Arc::new(InMemoryNamespaceRepository::new()),
        Arc::clone(&usage),
        Arc::new(DefaultClock),
    );
    Harness { service, usage }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_and_find(harness: Harness) {
    let created = harness
        .service
        .create(CreateNamespaceRequest::new("dev", "Development"))
        .await
        .expect("create should succeed");

    let found = harness.service.find("dev").await.expect("lookup succeeds");

    assert_eq!(found, Some(created));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_namespace_is_rejected(harness: Harness) {
    harness
        .service
        .create(CreateNamespaceRequest::new("dev", "Development"))
        .await
        .expect("create should succeed");

    let result = harness
        .service
        .create(CreateNamespaceRequest::new("dev", "Again"))
        .await;

    assert!(matches!(
        result,
        Err(NamespaceServiceError::Repository(
            NamespaceRepositoryError::DuplicateNamespace(_)
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_is_ordered_by_identifier(harness: Harness) {
    for (id, name) in [("prod", "Production"), ("dev", "Development"), ("lab", "Lab")] {
        harness
            .service
            .create(CreateNamespaceRequest::new(id, name))
            .await
            .expect("create should succeed");
    }

    let namespaces = harness.service.list().await.expect("list succeeds");
    let ids: Vec<&str> = namespaces.iter().map(|ns| ns.id().as_str()).collect();

    assert_eq!(ids, vec!["dev", "lab", "prod"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_applies_changes(harness: Harness) {
    harness
        .service
        .create(CreateNamespaceRequest::new("dev", "Development"))
        .await
        .expect("create should succeed");

    let updated = harness
        .service
        .update(
            "dev",
            UpdateNamespaceRequest::new()
                .with_name("Dev sandbox")
                .with_active(false),
        )
        .await
        .expect("update should succeed");

    assert_eq!(updated.name(), "Dev sandbox");
    assert!(!updated.is_active());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_is_refused_while_namespace_holds_cards(harness: Harness) {
    harness
        .service
        .create(CreateNamespaceRequest::new("prod", "Production"))
        .await
        .expect("create should succeed");
    harness.usage.set("prod", 2);

    let err = harness
        .service
        .delete("prod")
        .await
        .expect_err("delete should be refused");

    assert!(matches!(err, NamespaceServiceError::InUse { count: 2, .. }));
    assert!(err.to_string().contains("contains 2 agent card(s)"));

    harness.usage.set("prod", 0);
    harness
        .service
        .delete("prod")
        .await
        .expect("delete should succeed once empty");
    assert!(
        harness
            .service
            .find("prod")
            .await
            .expect("lookup succeeds")
            .is_none()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_unknown_namespace_reports_not_found(harness: Harness) {
    let result = harness.service.delete("ghost").await;

    assert!(matches!(
        result,
        Err(NamespaceServiceError::Repository(
            NamespaceRepositoryError::NotFound(_)
        ))
    ));
}
