//! Unit tests for protocol document export and import.

use crate::agent_card::domain::{
    AgentCard, AgentName, AgentVersion, CardCapabilities, CardDocument, CardProfile,
    ExportError, ExtensionDraft, ExtensionRecord, ImportError, METADATA_KEY, NewAgentCard,
    Transport,
};
use crate::namespace::domain::NamespaceId;
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::{Value, json};

fn card_with(name: &str, profile: CardProfile) -> AgentCard {
    AgentCard::new(
        NewAgentCard {
            namespace: NamespaceId::new("lab").expect("valid namespace"),
            name: AgentName::new(name).expect("valid name"),
            version: AgentVersion::new("1.0.0").expect("valid version"),
            profile,
            is_default_version: true,
            is_active: true,
            created_by: Some("alice".to_owned()),
        },
        &DefaultClock,
    )
}

fn complete_profile() -> CardProfile {
    CardProfile::new()
        .with_description("Tracks lab instruments")
        .with_url("https://agents.example.com/a2a")
        .with_modes(["text/plain"], ["application/json"])
        .with_skill(json!({
            "id": "lookup",
            "name": "Lookup",
            "description": "Find an instrument",
            "tags": ["lab"]
        }))
}

fn extension(uri: &str, order: i32) -> ExtensionRecord {
    ExtensionRecord::bind(ExtensionDraft::new(uri).with_order(order), None).expect("valid draft")
}

#[rstest]
fn bare_card_exports_core_members_only() {
    let document = card_with("Bare", CardProfile::new()).to_raw_export(false);

    let keys: Vec<&str> = document
        .as_object()
        .expect("object document")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        keys,
        vec![
            "protocolVersion",
            "name",
            "description",
            "url",
            "preferredTransport",
            "version",
            "capabilities",
            "defaultInputModes",
            "defaultOutputModes",
            "skills",
        ]
    );
    assert_eq!(document["capabilities"], json!({}));
    assert_eq!(document["preferredTransport"], json!("http"));
}

#[rstest]
fn capabilities_carry_only_enabled_flags_and_extensions() {
    let profile = complete_profile()
        .with_capabilities(CardCapabilities::default().with_streaming())
        .with_transport(Transport::JsonRpc);
    let card = card_with("Flags", profile)
        .with_extension(extension("https://b.example/ext", 0))
        .with_extension(extension("https://a.example/ext", 5))
        .with_extension(extension("https://c.example/ext", 0));

    let document = card.to_raw_export(false);

    assert_eq!(
        document["capabilities"],
        json!({
            "streaming": true,
            "extensions": [
                {"uri": "https://b.example/ext"},
                {"uri": "https://c.example/ext"},
                {"uri": "https://a.example/ext"}
            ]
        })
    );
    assert_eq!(document["preferredTransport"], json!("jsonrpc"));
}

#[rstest]
fn optional_members_appear_when_set() {
    let mut profile = complete_profile().with_provider(json!({
        "organization": "Lab Co",
        "url": "https://lab.example"
    }));
    profile.icon_url = Some("https://lab.example/icon.png".to_owned());
    profile.documentation_url = Some("   ".to_owned());
    profile.supports_authenticated_extended_card = true;
    profile
        .security_schemes
        .insert("bearer".to_owned(), json!({"type": "http", "scheme": "bearer"}));

    let document = card_with("Optional", profile).to_raw_export(false);

    assert_eq!(document["provider"]["organization"], json!("Lab Co"));
    assert_eq!(document["iconUrl"], json!("https://lab.example/icon.png"));
    assert!(document.get("documentationUrl").is_none());
    assert_eq!(document["supportsAuthenticatedExtendedCard"], json!(true));
    assert_eq!(document["securitySchemes"]["bearer"]["type"], json!("http"));
    assert!(document.get("security").is_none());
    assert!(document.get("signatures").is_none());
}

#[rstest]
fn metadata_block_is_opt_in() {
    let card = card_with("Meta", complete_profile());

    let without = card.to_raw_export(false);
    let with = card.to_raw_export(true);

    assert!(without.get(METADATA_KEY).is_none());
    let metadata = &with[METADATA_KEY];
    assert_eq!(metadata["namespace"], json!("lab"));
    assert_eq!(metadata["isDefaultVersion"], json!(true));
    assert_eq!(metadata["isActive"], json!(true));
    assert_eq!(metadata["createdBy"], json!("alice"));
    assert!(metadata["createdAt"].is_string());
}

#[rstest]
fn strict_export_names_all_six_missing_members() {
    let card = card_with("", CardProfile::new());

    let Err(ExportError::Incomplete(report)) = card.to_strict_export(false, true) else {
        panic!("expected incomplete export");
    };

    let fields: Vec<&str> = report.violations().iter().map(|v| v.field()).collect();
    assert_eq!(
        fields,
        vec![
            "name",
            "description",
            "url",
            "defaultInputModes",
            "defaultOutputModes",
            "skills"
        ]
    );
}

#[rstest]
fn strict_export_of_complete_card_matches_raw() {
    let card = card_with("Complete", complete_profile());

    assert!(card.completeness_report().is_valid());
    assert_eq!(card.to_strict_export(true, true), Ok(card.to_raw_export(true)));
}

#[rstest]
fn strict_export_without_validation_returns_raw_document() {
    let card = card_with("Draft", CardProfile::new());
    assert_eq!(card.to_strict_export(false, false), Ok(card.to_raw_export(false)));
}

#[rstest]
fn exported_document_parses_back() {
    let card = card_with("Round", complete_profile()).with_extension(
        ExtensionRecord::bind(
            ExtensionDraft::new("https://a.example/ext").with_params(json!({"unit": "g"})),
            None,
        )
        .expect("valid draft"),
    );
    let document = card.to_raw_export(true);

    let parsed = CardDocument::parse(&document).expect("readable document");

    assert_eq!(parsed.name, "Round");
    assert_eq!(parsed.version, "1.0.0");
    assert_eq!(&parsed.profile, card.profile());
    assert_eq!(parsed.extensions.len(), 1);
    let draft = parsed.extensions.first().expect("one draft");
    assert_eq!(draft.uri, "https://a.example/ext");
    assert_eq!(draft.params, json!({"unit": "g"}));
}

#[rstest]
fn legacy_extension_map_is_read_after_listed_extensions() {
    let document = json!({
        "name": "Legacy",
        "version": "0.9",
        "capabilities": {"extensions": [{"uri": "https://listed.example/ext"}]},
        "domainExtensions": {"https://legacy.example/ext": {"serial": "X1"}}
    });

    let parsed = CardDocument::parse(&document).expect("readable document");

    let uris: Vec<&str> = parsed.extensions.iter().map(|d| d.uri.as_str()).collect();
    assert_eq!(
        uris,
        vec!["https://listed.example/ext", "https://legacy.example/ext"]
    );
    let orders: Vec<i32> = parsed.extensions.iter().map(|d| d.order).collect();
    assert_eq!(orders, vec![0, 1]);
}

#[rstest]
#[case(json!([1, 2]), ImportError::NotAnObject)]
#[case(json!({"name": 5}), ImportError::InvalidMember("name must be a string".to_owned()))]
fn malformed_documents_are_rejected(#[case] document: Value, #[case] expected: ImportError) {
    assert_eq!(CardDocument::parse(&document), Err(expected));
}

#[rstest]
fn unknown_transport_in_document_is_rejected() {
    let document = json!({"name": "X", "version": "1", "preferredTransport": "smoke-signal"});
    assert!(matches!(
        CardDocument::parse(&document),
        Err(ImportError::InvalidMember(_))
    ));
}
