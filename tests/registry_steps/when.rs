//! When steps for registry BDD scenarios.

use super::world::{RegistryWorld, run_async};
use rstest_bdd_macros::when;

#[when("the physical asset schema is deleted")]
fn delete_asset_schema(world: &mut RegistryWorld) -> Result<(), eyre::Report> {
    let id = world.schema()?.id();
    world.last_delete_result = Some(run_async(world.schemas.delete(id)));
    Ok(())
}

#[when("the card is exported in standard form")]
fn export_standard(world: &mut RegistryWorld) -> Result<(), eyre::Report> {
    let id = world.card()?.id();
    world.last_export_result = Some(run_async(world.cards.standard_export(id, false)));
    Ok(())
}

#[when("the card is exported raw with metadata")]
fn export_raw(world: &mut RegistryWorld) -> Result<(), eyre::Report> {
    let id = world.card()?.id();
    world.last_export_result = Some(run_async(world.cards.raw_export(id, true)));
    Ok(())
}
