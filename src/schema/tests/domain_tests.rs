//! Unit tests for schema identity values and the schema aggregate.

use crate::schema::domain::{
    FieldConstraint, FieldName, FieldSpec, FieldType, JSON_SCHEMA_DRAFT_07, SchemaDefinition,
    SchemaDomainError, SchemaType, SchemaUri, SchemaVersion,
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::{Map, Value, json};

fn field(spec: FieldSpec) -> FieldConstraint {
    FieldConstraint::new(spec).expect("valid field spec")
}

fn payload(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object payload, got {other}"),
    }
}

fn empty_schema(schema_type: &str, version: &str) -> SchemaDefinition {
    SchemaDefinition::new(
        SchemaUri::new(format!("https://example.com/schemas/{schema_type}/{version}"))
            .expect("valid uri"),
        SchemaType::new(schema_type).expect("valid type"),
        SchemaVersion::new(version).expect("valid version"),
        &DefaultClock,
    )
}

/// Schema with a required string `id` (minLength 3) and a required enum
/// `status`.
#[fixture]
fn asset_schema() -> SchemaDefinition {
    empty_schema("physicalAsset", "v1")
        .with_fields([
            field(
                FieldSpec::new("id", FieldType::String)
                    .required()
                    .with_min_length(3),
            ),
            field(
                FieldSpec::new("status", FieldType::Enum)
                    .required()
                    .with_choices(["OPERATIONAL", "OFFLINE"])
                    .with_order(1),
            ),
        ])
        .expect("distinct fields")
}

// ── Identity values ────────────────────────────────────────────────

#[rstest]
#[case("https://my-org.com/schemas/physicalAsset/v1")]
#[case("http://localhost/schemas/x")]
#[case("  https://trimmed.example/x  ")]
fn valid_schema_uris_are_accepted(#[case] input: &str) {
    let uri = SchemaUri::new(input).expect("valid uri");
    assert_eq!(uri.as_str(), input.trim());
}

#[rstest]
#[case("", SchemaDomainError::EmptySchemaUri)]
#[case("ftp://example.com/x", SchemaDomainError::InvalidSchemaUri("ftp://example.com/x".to_owned()))]
#[case("https://", SchemaDomainError::InvalidSchemaUri("https://".to_owned()))]
#[case("urn:example", SchemaDomainError::InvalidSchemaUri("urn:example".to_owned()))]
fn invalid_schema_uris_are_rejected(#[case] input: &str, #[case] expected: SchemaDomainError) {
    assert_eq!(SchemaUri::new(input), Err(expected));
}

#[rstest]
fn overlong_schema_uri_is_rejected() {
    let uri = format!("https://example.com/{}", "a".repeat(512));
    assert!(matches!(
        SchemaUri::new(uri),
        Err(SchemaDomainError::SchemaUriTooLong(_))
    ));
}

#[rstest]
#[case(32, true)]
#[case(33, false)]
fn schema_version_length_boundary(#[case] length: usize, #[case] expected_ok: bool) {
    let result = SchemaVersion::new("v".repeat(length));
    assert_eq!(result.is_ok(), expected_ok);
}

#[rstest]
fn blank_schema_type_is_rejected() {
    assert_eq!(SchemaType::new("  "), Err(SchemaDomainError::EmptySchemaType));
}

// ── Aggregate construction and editing ─────────────────────────────

#[rstest]
fn new_schema_is_active_without_fields() {
    let schema = empty_schema("sensor", "v2");
    assert!(schema.is_active());
    assert!(schema.fields().is_empty());
    assert_eq!(schema.label(), "sensor v2");
    assert_eq!(schema.created_at(), schema.updated_at());
}

#[rstest]
fn fields_are_sorted_by_order_then_name(asset_schema: SchemaDefinition) {
    let clock = DefaultClock;
    let mut schema = asset_schema;
    schema
        .add_field(field(FieldSpec::new("alpha", FieldType::Boolean)), &clock)
        .expect("new field");

    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(names, vec!["alpha", "id", "status"]);
}

#[rstest]
fn duplicate_field_is_rejected(asset_schema: SchemaDefinition) {
    let mut schema = asset_schema;
    let result = schema.add_field(field(FieldSpec::new("id", FieldType::String)), &DefaultClock);
    assert_eq!(result, Err(SchemaDomainError::DuplicateField("id".to_owned())));
}

#[rstest]
fn replace_field_may_rename(asset_schema: SchemaDefinition) {
    let mut schema = asset_schema;
    let old = FieldName::new("id").expect("valid name");
    schema
        .replace_field(
            &old,
            field(FieldSpec::new("assetId", FieldType::String).required()),
            &DefaultClock,
        )
        .expect("rename should succeed");

    assert!(schema.field("id").is_none());
    assert!(schema.field("assetId").is_some());
}

#[rstest]
fn replace_field_onto_existing_name_is_rejected(asset_schema: SchemaDefinition) {
    let mut schema = asset_schema;
    let old = FieldName::new("id").expect("valid name");
    let result = schema.replace_field(
        &old,
        field(FieldSpec::new("status", FieldType::String)),
        &DefaultClock,
    );
    assert_eq!(
        result,
        Err(SchemaDomainError::DuplicateField("status".to_owned()))
    );
}

#[rstest]
fn remove_unknown_field_is_rejected(asset_schema: SchemaDefinition) {
    let mut schema = asset_schema;
    let missing = FieldName::new("missing").expect("valid name");
    let result = schema.remove_field(&missing, &DefaultClock);
    assert_eq!(
        result,
        Err(SchemaDomainError::UnknownField("missing".to_owned()))
    );
}

// ── Extension data validation ──────────────────────────────────────

#[rstest]
fn short_id_fails_with_single_length_violation(asset_schema: SchemaDefinition) {
    let report =
        asset_schema.validate_extension_data(&payload(json!({"id": "ab", "status": "OPERATIONAL"})));

    assert_eq!(report.len(), 1);
    assert!(report.mentions("id"));
    assert_eq!(report.message(), "field 'id': length must be at least 3");
}

#[rstest]
fn conforming_payload_passes(asset_schema: SchemaDefinition) {
    let report = asset_schema
        .validate_extension_data(&payload(json!({"id": "abc", "status": "OPERATIONAL"})));
    assert!(report.is_valid());
}

#[rstest]
fn undeclared_keys_are_accepted(asset_schema: SchemaDefinition) {
    let report = asset_schema.validate_extension_data(&payload(json!({
        "id": "abc",
        "status": "OFFLINE",
        "notes": {"anything": [1, 2, 3]}
    })));
    assert!(report.is_valid());
}

#[rstest]
fn every_missing_required_field_is_reported(asset_schema: SchemaDefinition) {
    let report = asset_schema.validate_extension_data(&Map::new());

    assert_eq!(
        report.message(),
        "missing required field: id\nmissing required field: status"
    );
}

#[rstest]
fn missing_and_invalid_fields_are_aggregated(asset_schema: SchemaDefinition) {
    let report = asset_schema.validate_extension_data(&payload(json!({"status": "BROKEN"})));

    let fields: Vec<&str> = report.violations().iter().map(|v| v.field()).collect();
    assert_eq!(fields, vec!["id", "status"]);
}

// ── JSON Schema generation ─────────────────────────────────────────

#[rstest]
fn generated_schema_lists_properties_and_required(asset_schema: SchemaDefinition) {
    let document = asset_schema.generate_json_schema();

    assert_eq!(document["$schema"], json!(JSON_SCHEMA_DRAFT_07));
    assert_eq!(document["type"], json!("object"));
    assert_eq!(document["title"], json!("physicalAsset v1"));
    assert_eq!(document["description"], json!("physicalAsset schema"));
    assert_eq!(document["required"], json!(["id", "status"]));
    assert_eq!(document["properties"]["id"]["minLength"], json!(3));
    assert_eq!(
        document["properties"]["status"]["enum"],
        json!(["OPERATIONAL", "OFFLINE"])
    );
}

#[rstest]
fn generated_schema_omits_empty_required() {
    let schema = empty_schema("note", "v1")
        .with_description("Free-form note")
        .with_fields([field(FieldSpec::new("text", FieldType::String))])
        .expect("single field");
    let document = schema.generate_json_schema();

    assert!(document.get("required").is_none());
    assert_eq!(document["description"], json!("Free-form note"));
}

#[rstest]
fn property_order_follows_field_order() {
    let schema = empty_schema("ordered", "v1")
        .with_fields([
            field(FieldSpec::new("zeta", FieldType::String).with_order(0)),
            field(FieldSpec::new("alpha", FieldType::String).with_order(2)),
            field(FieldSpec::new("mid", FieldType::String).with_order(1)),
        ])
        .expect("distinct fields");
    let document = schema.generate_json_schema();
    let keys: Vec<&str> = document["properties"]
        .as_object()
        .expect("properties object")
        .keys()
        .map(String::as_str)
        .collect();

    assert_eq!(keys, vec!["zeta", "mid", "alpha"]);
}

#[rstest]
fn field_definitions_summarise_constraints(asset_schema: SchemaDefinition) {
    let definitions = asset_schema.field_definitions();

    assert_eq!(definitions.len(), 2);
    let id = definitions.first().expect("id definition");
    assert_eq!(id.name, "id");
    assert_eq!(id.field_type, FieldType::String);
    assert!(id.required);
    assert_eq!(id.constraints, json!({"minLength": 3}));
}
