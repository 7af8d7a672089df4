//! Schema deletion guarded by the extensions that reference it.

use super::helpers::{
    ASSET_URI, Registry, asset_schema_request, card_request, registry, seed_namespace,
};
use agentcards::agent_card::{domain::ExtensionDraft, ports::CardFilter};
use agentcards::schema::services::SchemaRegistryServiceError;
use rstest::rstest;
use serde_json::json;

fn asset_extension() -> ExtensionDraft {
    ExtensionDraft::new(ASSET_URI).with_params(json!({"id": "PUMP-7", "status": "OPERATIONAL"}))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn referenced_schema_cannot_be_deleted_until_released(registry: Registry) {
    seed_namespace(&registry, "lab").await;
    let schema = registry
        .schemas
        .register(asset_schema_request())
        .await
        .expect("schema should register");
    let card = registry
        .cards
        .create(card_request("lab", "Pump Agent", "1.0.0").with_extension(asset_extension()))
        .await
        .expect("card should be created");

    let refused = registry.schemas.delete(schema.id()).await;
    let Err(SchemaRegistryServiceError::InUse { count, .. }) = refused else {
        panic!("expected in-use error, got {refused:?}");
    };
    assert_eq!(count, 1);

    registry
        .cards
        .remove_extension(card.id(), ASSET_URI, Some("alice"))
        .await
        .expect("extension should be removed");
    registry
        .schemas
        .delete(schema.id())
        .await
        .expect("unreferenced schema should be deleted");
    let found = registry
        .schemas
        .find_by_uri(ASSET_URI)
        .await
        .expect("lookup should succeed");
    assert!(found.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_the_card_releases_the_schema(registry: Registry) {
    seed_namespace(&registry, "lab").await;
    let schema = registry
        .schemas
        .register(asset_schema_request())
        .await
        .expect("schema should register");
    let card = registry
        .cards
        .create(card_request("lab", "Pump Agent", "1.0.0").with_extension(asset_extension()))
        .await
        .expect("card should be created");

    registry
        .cards
        .delete(card.id())
        .await
        .expect("card should be deleted");

    registry
        .schemas
        .delete(schema.id())
        .await
        .expect("schema should be deleted once no card uses it");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn catalog_counts_extensions_across_cards(registry: Registry) {
    seed_namespace(&registry, "lab").await;
    seed_namespace(&registry, "plant").await;
    registry
        .schemas
        .register(asset_schema_request())
        .await
        .expect("schema should register");
    for (namespace, version) in [("lab", "1.0.0"), ("lab", "1.1.0"), ("plant", "1.0.0")] {
        registry
            .cards
            .create(card_request(namespace, "Pump Agent", version).with_extension(asset_extension()))
            .await
            .expect("card should be created");
    }

    let catalog = registry.schemas.catalog().await.expect("catalog builds");

    let entries = catalog.entries("physicalAsset");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries.first().map(|entry| entry.usage_count), Some(3));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn params_violating_the_schema_are_rejected_with_every_violation(registry: Registry) {
    seed_namespace(&registry, "lab").await;
    registry
        .schemas
        .register(asset_schema_request())
        .await
        .expect("schema should register");

    let err = registry
        .cards
        .create(
            card_request("lab", "Pump Agent", "1.0.0")
                .with_extension(ExtensionDraft::new(ASSET_URI).with_params(json!({"id": "P"}))),
        )
        .await
        .expect_err("invalid params should be refused");

    let message = err.to_string();
    assert!(message.contains("missing required field: status"));
    assert!(message.contains("field 'id': length must be at least 3"));
    let cards = registry
        .cards
        .list(&CardFilter::new())
        .await
        .expect("list should succeed");
    assert!(cards.is_empty());
}
