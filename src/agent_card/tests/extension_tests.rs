//! Unit tests for binding extension records.

use crate::agent_card::domain::{ExtensionDraft, ExtensionError, ExtensionRecord};
use crate::schema::domain::{
    FieldConstraint, FieldSpec, FieldType, SchemaDefinition, SchemaType, SchemaUri, SchemaVersion,
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::json;

const ASSET_URI: &str = "https://my-org.com/schemas/physicalAsset/v1";

#[fixture]
fn asset_schema() -> SchemaDefinition {
    SchemaDefinition::new(
        SchemaUri::new(ASSET_URI).expect("valid uri"),
        SchemaType::new("physicalAsset").expect("valid type"),
        SchemaVersion::new("v1").expect("valid version"),
        &DefaultClock,
    )
    .with_fields([
        FieldConstraint::new(
            FieldSpec::new("id", FieldType::String)
                .required()
                .with_min_length(3),
        )
        .expect("valid field"),
        FieldConstraint::new(
            FieldSpec::new("status", FieldType::Enum)
                .required()
                .with_choices(["OPERATIONAL", "OFFLINE"]),
        )
        .expect("valid field"),
    ])
    .expect("distinct fields")
}

#[rstest]
fn blank_uri_and_description_come_from_schema(asset_schema: SchemaDefinition) {
    let draft = ExtensionDraft::default().with_params(json!({"id": "A-100", "status": "OFFLINE"}));

    let bound = ExtensionRecord::bind(draft, Some(&asset_schema)).expect("params conform");

    assert_eq!(bound.uri(), ASSET_URI);
    assert_eq!(bound.description(), "physicalAsset v1");
    assert_eq!(bound.schema_id(), Some(asset_schema.id()));
}

#[rstest]
fn schema_description_is_preferred_over_label(asset_schema: SchemaDefinition) {
    let described = asset_schema.with_description("Physical asset identity");
    let draft = ExtensionDraft::new(ASSET_URI).with_params(json!({"id": "abc", "status": "OFFLINE"}));

    let bound = ExtensionRecord::bind(draft, Some(&described)).expect("params conform");

    assert_eq!(bound.description(), "Physical asset identity");
}

#[rstest]
fn caller_description_is_kept(asset_schema: SchemaDefinition) {
    let draft = ExtensionDraft::new(ASSET_URI)
        .with_description("Bench scale")
        .with_params(json!({"id": "abc", "status": "OFFLINE"}));

    let bound = ExtensionRecord::bind(draft, Some(&asset_schema)).expect("params conform");

    assert_eq!(bound.description(), "Bench scale");
}

#[rstest]
fn uri_must_match_referenced_schema(asset_schema: SchemaDefinition) {
    let draft = ExtensionDraft::new("https://elsewhere.example/ext")
        .with_params(json!({"id": "abc", "status": "OFFLINE"}));

    let result = ExtensionRecord::bind(draft, Some(&asset_schema));

    assert_eq!(
        result,
        Err(ExtensionError::UriMismatch {
            uri: "https://elsewhere.example/ext".to_owned(),
            schema_uri: ASSET_URI.to_owned(),
        })
    );
}

#[rstest]
fn nonconforming_params_report_every_violation(asset_schema: SchemaDefinition) {
    let draft = ExtensionDraft::new(ASSET_URI).with_params(json!({"id": "ab"}));

    let Err(ExtensionError::InvalidParams { uri, report }) =
        ExtensionRecord::bind(draft, Some(&asset_schema))
    else {
        panic!("expected invalid params");
    };

    assert_eq!(uri, ASSET_URI);
    assert_eq!(
        report.message(),
        "missing required field: status\nfield 'id': length must be at least 3"
    );
}

#[rstest]
#[case(json!([1, 2]))]
#[case(json!("text"))]
#[case(json!(7))]
fn params_must_be_an_object(#[case] params: serde_json::Value) {
    let draft = ExtensionDraft::new("https://any.example/ext").with_params(params);
    assert_eq!(
        ExtensionRecord::bind(draft, None),
        Err(ExtensionError::ParamsNotObject)
    );
}

#[rstest]
fn unregistered_extension_is_not_validated() {
    let draft = ExtensionDraft::new("https://vendor.example/free-form")
        .with_params(json!({"anything": [true, null]}))
        .required();

    let bound = ExtensionRecord::bind(draft, None).expect("lenient binding");

    assert!(bound.is_required());
    assert!(bound.schema_id().is_none());
}

#[rstest]
fn extension_without_any_uri_is_rejected() {
    assert_eq!(
        ExtensionRecord::bind(ExtensionDraft::new("   "), None),
        Err(ExtensionError::EmptyUri)
    );
}

#[rstest]
fn export_entry_omits_empty_members() {
    let plain = ExtensionRecord::bind(ExtensionDraft::new("https://a.example/ext"), None)
        .expect("valid draft");
    let full = ExtensionRecord::bind(
        ExtensionDraft::new("https://b.example/ext")
            .with_description("Bench data")
            .with_params(json!({"unit": "g"}))
            .required(),
        None,
    )
    .expect("valid draft");

    assert_eq!(plain.to_export_entry(), json!({"uri": "https://a.example/ext"}));
    assert_eq!(
        full.to_export_entry(),
        json!({
            "uri": "https://b.example/ext",
            "description": "Bench data",
            "required": true,
            "params": {"unit": "g"}
        })
    );
}
