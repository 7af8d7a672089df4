//! Unit tests for agent case domain types.

use crate::agent_card::domain::{AgentCardDomainError, AgentCardId};
use crate::agent_case::domain::{
    AgentCase, AgentCaseDomainError, CaseOutcome, CaseQuery, NewAgentCase, VersionSelector,
};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;

fn new_case(name: &str) -> NewAgentCase {
    NewAgentCase {
        name: name.to_owned(),
        agent_card: None,
        agent_version: VersionSelector::Any,
        is_ground_truth: false,
        query: CaseQuery::new("calibration-due"),
        outcome: CaseOutcome::new("answer"),
        route_to: String::new(),
        score: None,
        created_by: Some("alice".to_owned()),
    }
}

#[rstest]
#[case("", "*")]
#[case("   ", "*")]
#[case("*", "*")]
#[case("latest", "latest")]
#[case(" 2.0.0 ", "2.0.0")]
fn selectors_parse_to_their_stored_form(#[case] input: &str, #[case] stored: &str) {
    let selector = VersionSelector::new(input).expect("valid selector");
    assert_eq!(selector.as_str(), stored);
}

#[rstest]
fn overlong_exact_selector_is_rejected() {
    assert!(matches!(
        VersionSelector::new("9".repeat(33)),
        Err(AgentCardDomainError::AgentVersionTooLong(_))
    ));
}

#[rstest]
#[case("*", "1.0.0", true)]
#[case("latest", "1.0.0", true)]
#[case("2.0.0", "2.0.0", true)]
#[case("2.0.0", "1.0.0", false)]
fn selectors_admit_versions(#[case] selector: &str, #[case] version: &str, #[case] admitted: bool) {
    let parsed = VersionSelector::new(selector).expect("valid selector");
    assert_eq!(parsed.admits(version), admitted);
}

#[rstest]
fn selector_serialises_as_string() {
    let selector = VersionSelector::new("latest").expect("valid selector");

    assert_eq!(serde_json::to_value(&selector).expect("serialises"), json!("latest"));
    assert_eq!(
        serde_json::from_value::<VersionSelector>(json!("")).expect("deserialises"),
        VersionSelector::Any
    );
}

#[rstest]
fn new_case_is_trimmed_and_audited() {
    let mut data = new_case("  Calibration question  ");
    data.query = CaseQuery::new("  calibration-due ").with_description(" When is it due? ");
    data.outcome = CaseOutcome::new(" answer ").with_notes(" checked ");

    let case = AgentCase::new(data, &DefaultClock).expect("valid case");

    assert_eq!(case.name(), "Calibration question");
    assert_eq!(case.query().key, "calibration-due");
    assert_eq!(case.query().description, "When is it due?");
    assert_eq!(case.outcome().kind, "answer");
    assert_eq!(case.outcome().notes, "checked");
    assert!(case.is_unassigned());
    assert_eq!(case.created_by(), Some("alice"));
    assert_eq!(case.updated_by(), Some("alice"));
}

#[rstest]
#[case("", AgentCaseDomainError::EmptyCaseName)]
#[case("   ", AgentCaseDomainError::EmptyCaseName)]
fn blank_case_name_is_rejected(#[case] name: &str, #[case] expected: AgentCaseDomainError) {
    assert_eq!(AgentCase::new(new_case(name), &DefaultClock), Err(expected));
}

#[rstest]
#[case(255, true)]
#[case(256, false)]
fn case_name_length_boundary(#[case] length: usize, #[case] expected_ok: bool) {
    let result = AgentCase::new(new_case(&"c".repeat(length)), &DefaultClock);
    assert_eq!(result.is_ok(), expected_ok);
}

#[rstest]
fn overlong_query_key_is_rejected() {
    let mut data = new_case("Long key");
    data.query = CaseQuery::new("k".repeat(256));

    assert!(matches!(
        AgentCase::new(data, &DefaultClock),
        Err(AgentCaseDomainError::QueryKeyTooLong(_))
    ));
}

#[rstest]
#[case(f64::NAN)]
#[case(f64::INFINITY)]
fn non_finite_score_is_rejected(#[case] score: f64) {
    let mut data = new_case("Scored");
    data.score = Some(score);

    assert!(matches!(
        AgentCase::new(data, &DefaultClock),
        Err(AgentCaseDomainError::NonFiniteScore(_))
    ));
}

#[rstest]
fn assign_and_unassign_keep_the_selector() {
    let mut case = AgentCase::new(new_case("Routing"), &DefaultClock).expect("valid case");
    let card = AgentCardId::new();
    let selector = VersionSelector::new("1.2.0").expect("valid selector");

    case.assign(card, selector.clone(), Some("bob"), &DefaultClock);
    assert_eq!(case.agent_card(), Some(card));
    assert_eq!(case.updated_by(), Some("bob"));

    case.unassign(None, &DefaultClock);
    assert!(case.is_unassigned());
    assert_eq!(case.agent_version(), &selector);
    assert_eq!(case.updated_by(), Some("bob"));
}
