//! Agent cases bound to cards managed by the card service.

use super::helpers::{Registry, card_request, registry, seed_namespace};
use agentcards::agent_case::{
    domain::CaseQuery, ports::CaseFilter, services::CreateAgentCaseRequest,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_card_releases_its_cases(registry: Registry) {
    seed_namespace(&registry, "lab").await;
    let card = registry
        .cards
        .create(card_request("lab", "Pump Agent", "2.0.0"))
        .await
        .expect("card should be created");
    for (name, version) in [("any version", "*"), ("this version", "2.0.0")] {
        registry
            .cases
            .create(
                CreateAgentCaseRequest::new(name)
                    .for_card(card.id(), version)
                    .with_query(CaseQuery::new("flow-rate")),
            )
            .await
            .expect("case should be recorded");
    }

    let bound = registry
        .cases
        .list(&CaseFilter::new().for_card(card.id()).at_version("2.0.0"))
        .await
        .expect("list should succeed");
    assert_eq!(bound.len(), 2);

    registry
        .cards
        .delete(card.id())
        .await
        .expect("card should be deleted");
    let released = registry
        .cases
        .release_card(card.id())
        .await
        .expect("release should succeed");

    let unassigned = registry
        .cases
        .list(&CaseFilter::new().unassigned_only().query_key_contains("flow"))
        .await
        .expect("list should succeed");
    assert_eq!(released, 2);
    assert_eq!(unassigned.len(), 2);
}
