//! Then steps for registry BDD scenarios.

use super::world::{ASSET_URI, RegistryWorld, run_async};
use agentcards::agent_card::{
    domain::{ExportError, METADATA_KEY},
    services::AgentCardServiceError,
};
use agentcards::schema::services::SchemaRegistryServiceError;
use rstest_bdd_macros::then;
use serde_json::Value;

fn exported_document(world: &RegistryWorld) -> Result<&Value, eyre::Report> {
    match world.last_export_result.as_ref() {
        Some(Ok(document)) => Ok(document),
        Some(Err(err)) => Err(eyre::eyre!("export failed: {err}")),
        None => Err(eyre::eyre!("missing export result in scenario world")),
    }
}

fn schema_is_registered(world: &RegistryWorld) -> Result<bool, eyre::Report> {
    let found = run_async(world.schemas.find_by_uri(ASSET_URI))
        .map_err(|err| eyre::eyre!("find_by_uri failed: {err}"))?;
    Ok(found.is_some())
}

#[then("deletion is refused naming {count:usize} extension record")]
fn deletion_refused(world: &RegistryWorld, count: usize) -> Result<(), eyre::Report> {
    let result = world
        .last_delete_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing delete result in scenario world"))?;
    match result {
        Err(SchemaRegistryServiceError::InUse { count: found, .. })
            if usize::try_from(*found).is_ok_and(|n| n == count) =>
        {
            Ok(())
        }
        other => Err(eyre::eyre!(
            "expected in-use error naming {count} reference(s), got {other:?}"
        )),
    }
}

#[then("the physical asset schema is still registered")]
fn schema_still_registered(world: &RegistryWorld) -> Result<(), eyre::Report> {
    if !schema_is_registered(world)? {
        return Err(eyre::eyre!("expected '{ASSET_URI}' to remain registered"));
    }
    Ok(())
}

#[then("the physical asset schema is no longer registered")]
fn schema_no_longer_registered(world: &RegistryWorld) -> Result<(), eyre::Report> {
    if let Some(Err(err)) = world.last_delete_result.as_ref() {
        return Err(eyre::eyre!("schema deletion failed: {err}"));
    }
    if schema_is_registered(world)? {
        return Err(eyre::eyre!("expected '{ASSET_URI}' to be deleted"));
    }
    Ok(())
}

#[then(r#"the document member "{member}" is "{expected}""#)]
fn document_member_is(
    world: &RegistryWorld,
    member: String,
    expected: String,
) -> Result<(), eyre::Report> {
    let document = exported_document(world)?;
    let actual = document.get(&member).and_then(Value::as_str);
    if actual != Some(expected.as_str()) {
        return Err(eyre::eyre!(
            "expected '{member}' to be '{expected}', got {actual:?}"
        ));
    }
    Ok(())
}

#[then("the document has no metadata block")]
fn no_metadata_block(world: &RegistryWorld) -> Result<(), eyre::Report> {
    if exported_document(world)?.get(METADATA_KEY).is_some() {
        return Err(eyre::eyre!("expected no '{METADATA_KEY}' member"));
    }
    Ok(())
}

#[then(r#"the document metadata names namespace "{namespace}""#)]
fn metadata_names_namespace(world: &RegistryWorld, namespace: String) -> Result<(), eyre::Report> {
    let actual = exported_document(world)?
        .get(METADATA_KEY)
        .and_then(|metadata| metadata.get("namespace"))
        .and_then(Value::as_str);
    if actual != Some(namespace.as_str()) {
        return Err(eyre::eyre!(
            "expected metadata namespace '{namespace}', got {actual:?}"
        ));
    }
    Ok(())
}

#[then(r#"the export is refused naming "{field}""#)]
fn export_refused_naming(world: &RegistryWorld, field: String) -> Result<(), eyre::Report> {
    let result = world
        .last_export_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing export result in scenario world"))?;
    let Err(AgentCardServiceError::Export(ExportError::Incomplete(report))) = result else {
        return Err(eyre::eyre!("expected incomplete export error, got {result:?}"));
    };
    if !report.mentions(&field) {
        return Err(eyre::eyre!(
            "expected the refusal to name '{field}', got:\n{report}"
        ));
    }
    Ok(())
}
