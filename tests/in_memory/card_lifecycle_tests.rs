//! Versioning, import, and export flows across the registry services.

use super::helpers::{
    ASSET_URI, Registry, asset_schema_request, card_request, registry, seed_namespace,
};
use agentcards::agent_card::{
    domain::{ExtensionDraft, METADATA_KEY},
    ports::CardFilter,
    services::AgentCardServiceError,
};
use agentcards::namespace::domain::NamespaceId;
use rstest::rstest;
use serde_json::{Value, json};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn default_version_moves_between_versions(registry: Registry) {
    seed_namespace(&registry, "lab").await;
    let old = registry
        .cards
        .create(card_request("lab", "Pump Agent", "1.0.0").as_default_version())
        .await
        .expect("default card should be created");
    let new = registry
        .cards
        .create(card_request("lab", "Pump Agent", "2.0.0"))
        .await
        .expect("second version should be created");

    let conflict = registry
        .cards
        .set_default_version(new.id(), true, Some("alice"))
        .await;
    assert!(matches!(
        conflict,
        Err(AgentCardServiceError::DefaultVersionConflict { ref existing_version, .. })
            if existing_version.as_str() == "1.0.0"
    ));

    registry
        .cards
        .set_default_version(old.id(), false, Some("alice"))
        .await
        .expect("flag should clear");
    registry
        .cards
        .set_default_version(new.id(), true, Some("alice"))
        .await
        .expect("flag should move");

    let default = registry
        .cards
        .find_default_version("lab", "Pump Agent")
        .await
        .expect("lookup should succeed")
        .expect("a default version exists");
    assert_eq!(default.version().as_str(), "2.0.0");
    assert_eq!(default.updated_by(), Some("alice"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn exported_card_imports_into_another_namespace(registry: Registry) {
    seed_namespace(&registry, "lab").await;
    seed_namespace(&registry, "plant").await;
    registry
        .schemas
        .register(asset_schema_request())
        .await
        .expect("schema should register");
    let original = registry
        .cards
        .create(
            card_request("lab", "Pump Agent", "1.0.0").with_extension(
                ExtensionDraft::new(ASSET_URI)
                    .required()
                    .with_params(json!({"id": "PUMP-7", "status": "OFFLINE"})),
            ),
        )
        .await
        .expect("card should be created");
    let document = registry
        .cards
        .standard_export(original.id(), true)
        .await
        .expect("complete card should export");
    assert_eq!(document[METADATA_KEY]["namespace"], json!("lab"));

    let copy = registry
        .cards
        .import_document("plant", &document, Some("bob"))
        .await
        .expect("exported document should import");

    assert_eq!(copy.namespace().as_str(), "plant");
    assert_eq!(copy.created_by(), Some("bob"));
    assert_eq!(copy.profile(), original.profile());
    let extension = copy.extension(ASSET_URI).expect("extension carried over");
    assert!(extension.is_required());
    assert_eq!(extension.description(), "Physical asset identity");
    assert!(extension.schema_id().is_some());

    let reexported = registry
        .cards
        .standard_export(copy.id(), false)
        .await
        .expect("copy should export");
    let mut expected = document;
    if let Value::Object(ref mut members) = expected {
        members.remove(METADATA_KEY);
    }
    assert_eq!(reexported, expected);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn legacy_extension_map_is_validated_on_import(registry: Registry) {
    seed_namespace(&registry, "lab").await;
    registry
        .schemas
        .register(asset_schema_request())
        .await
        .expect("schema should register");
    let document = json!({
        "name": "Legacy Agent",
        "version": "0.9.0",
        "description": "Imported from an older registry",
        "url": "https://legacy.example.com/a2a",
        "domainExtensions": {
            ASSET_URI: {"id": "X"}
        }
    });

    let err = registry
        .cards
        .import_document("lab", &document, None)
        .await
        .expect_err("legacy params should be validated");

    assert!(err.to_string().contains("missing required field: status"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_filters_compose(registry: Registry) {
    seed_namespace(&registry, "lab").await;
    seed_namespace(&registry, "plant").await;
    registry
        .cards
        .create(card_request("lab", "Pump Agent", "1.0.0").as_default_version())
        .await
        .expect("card should be created");
    registry
        .cards
        .create(card_request("lab", "Pump Agent", "2.0.0").inactive())
        .await
        .expect("card should be created");
    registry
        .cards
        .create(card_request("lab", "Valve Agent", "1.0.0"))
        .await
        .expect("card should be created");
    registry
        .cards
        .create(card_request("plant", "Pump Agent", "1.0.0"))
        .await
        .expect("card should be created");

    let lab = NamespaceId::new("lab").expect("valid namespace");
    let pumps = registry
        .cards
        .list(&CardFilter::new().in_namespace(lab.clone()).name_contains("PUMP"))
        .await
        .expect("list should succeed");
    let active = registry
        .cards
        .list(&CardFilter::new().in_namespace(lab).active_only())
        .await
        .expect("list should succeed");
    let defaults = registry
        .cards
        .list(&CardFilter::new().default_only())
        .await
        .expect("list should succeed");

    let versions: Vec<&str> = pumps.iter().map(|card| card.version().as_str()).collect();
    assert_eq!(versions, vec!["2.0.0", "1.0.0"]);
    assert_eq!(active.len(), 2);
    assert_eq!(defaults.len(), 1);
}
