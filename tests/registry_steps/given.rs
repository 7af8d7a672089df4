//! Given steps for registry BDD scenarios.

use super::world::{ASSET_URI, RegistryWorld, asset_schema_request, complete_profile, run_async};
use agentcards::agent_card::{domain::ExtensionDraft, services::CreateAgentCardRequest};
use agentcards::namespace::services::CreateNamespaceRequest;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use serde_json::json;

#[given(r#"a namespace "{id}""#)]
fn a_namespace(world: &mut RegistryWorld, id: String) -> Result<(), eyre::Report> {
    let request = CreateNamespaceRequest::new(id.as_str(), format!("{id} agents"));
    run_async(world.namespaces.create(request)).wrap_err("create namespace for scenario")?;
    Ok(())
}

#[given("the physical asset schema is registered")]
fn asset_schema_registered(world: &mut RegistryWorld) -> Result<(), eyre::Report> {
    let schema = run_async(world.schemas.register(asset_schema_request()))
        .wrap_err("register physical asset schema")?;
    world.schema = Some(schema);
    Ok(())
}

#[given(r#"a card "{name}" version "{version}" in "{namespace}" uses the physical asset extension"#)]
fn card_with_asset_extension(
    world: &mut RegistryWorld,
    name: String,
    version: String,
    namespace: String,
) -> Result<(), eyre::Report> {
    let request = CreateAgentCardRequest::new(namespace, name, version)
        .with_profile(complete_profile())
        .with_extension(
            ExtensionDraft::new(ASSET_URI)
                .with_params(json!({"id": "PUMP-7", "status": "OPERATIONAL"})),
        );
    let card = run_async(world.cards.create(request)).wrap_err("create card with extension")?;
    world.card = Some(card);
    Ok(())
}

#[given(r#"a complete card "{name}" version "{version}" in "{namespace}""#)]
fn complete_card(
    world: &mut RegistryWorld,
    name: String,
    version: String,
    namespace: String,
) -> Result<(), eyre::Report> {
    let request =
        CreateAgentCardRequest::new(namespace, name, version).with_profile(complete_profile());
    let card = run_async(world.cards.create(request)).wrap_err("create complete card")?;
    world.card = Some(card);
    Ok(())
}

#[given(r#"a bare card "{name}" version "{version}" in "{namespace}""#)]
fn bare_card(
    world: &mut RegistryWorld,
    name: String,
    version: String,
    namespace: String,
) -> Result<(), eyre::Report> {
    let request = CreateAgentCardRequest::new(namespace, name, version);
    let card = run_async(world.cards.create(request)).wrap_err("create bare card")?;
    world.card = Some(card);
    Ok(())
}

#[given("the physical asset extension is removed from the card")]
fn asset_extension_removed(world: &mut RegistryWorld) -> Result<(), eyre::Report> {
    let id = world.card()?.id();
    let card = run_async(world.cards.remove_extension(id, ASSET_URI, Some("scenario")))
        .wrap_err("remove physical asset extension")?;
    world.card = Some(card);
    Ok(())
}
