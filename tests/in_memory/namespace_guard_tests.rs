//! Namespace deletion guarded by the cards it holds.

use super::helpers::{Registry, card_request, registry, seed_namespace};
use agentcards::agent_card::services::AgentCardServiceError;
use agentcards::namespace::services::NamespaceServiceError;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn namespace_with_cards_cannot_be_deleted(registry: Registry) {
    seed_namespace(&registry, "lab").await;
    let first = registry
        .cards
        .create(card_request("lab", "Pump Agent", "1.0.0"))
        .await
        .expect("card should be created");
    let second = registry
        .cards
        .create(card_request("lab", "Pump Agent", "2.0.0"))
        .await
        .expect("card should be created");

    let err = registry
        .namespaces
        .delete("lab")
        .await
        .expect_err("non-empty namespace should be kept");
    assert!(matches!(err, NamespaceServiceError::InUse { count: 2, .. }));
    assert!(err.to_string().contains("it contains 2 agent card(s)"));

    for id in [first.id(), second.id()] {
        registry.cards.delete(id).await.expect("card should be deleted");
    }
    registry
        .namespaces
        .delete("lab")
        .await
        .expect("empty namespace should be deleted");
    let found = registry.namespaces.find("lab").await.expect("lookup succeeds");
    assert!(found.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn card_count_is_scoped_to_the_namespace(registry: Registry) {
    seed_namespace(&registry, "lab").await;
    seed_namespace(&registry, "plant").await;
    for (namespace, version) in [("lab", "1.0.0"), ("lab", "1.1.0"), ("plant", "1.0.0")] {
        registry
            .cards
            .create(card_request(namespace, "Pump Agent", version))
            .await
            .expect("card should be created");
    }

    let lab = registry.namespaces.card_count("lab").await.expect("count");
    let plant = registry.namespaces.card_count("plant").await.expect("count");

    assert_eq!((lab, plant), (2, 1));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cards_cannot_be_created_in_a_deleted_namespace(registry: Registry) {
    seed_namespace(&registry, "lab").await;
    registry
        .namespaces
        .delete("lab")
        .await
        .expect("empty namespace should be deleted");

    let result = registry
        .cards
        .create(card_request("lab", "Pump Agent", "1.0.0"))
        .await;

    assert!(matches!(
        result,
        Err(AgentCardServiceError::UnknownNamespace(ref ns)) if ns.as_str() == "lab"
    ));
}
