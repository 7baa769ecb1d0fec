//! Editor reload event.
//!
//! A hot reload in the editor throws away every runtime material instance.
//! Entries in [`MaterialOverrides`](crate::resources::materialstore::MaterialOverrides)
//! keep pointing at the destroyed materials; the override cache notices this
//! and rebuilds them the next time they are requested.
//!
//! Render archetypes are rebuilt from scratch. Surviving entities whose
//! material is still alive are queued for registration again; entities drawn
//! with a destroyed material lose their archetype and must be converted anew.

use crate::components::spriterender::{RenderArchetypeIndex, SpriteRenderDataToRegister};
use crate::resources::materialstore::MaterialStore;
use crate::resources::renderarchetypes::RenderArchetypes;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::info;

/// Event fired when the host reloads its runtime state.
#[derive(Event, Debug, Clone, Copy)]
pub struct EditorReloadEvent {}

/// Observer that destroys all runtime material instances and resets the
/// render archetypes built from them.
pub fn editor_reload_observer(
    _trigger: On<EditorReloadEvent>,
    mut commands: Commands,
    mut materials: ResMut<MaterialStore>,
    archetypes: Option<ResMut<RenderArchetypes>>,
    registered: Query<(Entity, &RenderArchetypeIndex)>,
) {
    let destroyed = materials.destroy_instances();

    let mut requeued = 0;
    for (entity, index) in registered.iter() {
        let mut entity_commands = commands.entity(entity);
        entity_commands.remove::<RenderArchetypeIndex>();
        // Indices are reassigned after the clear below
        let data = archetypes
            .as_ref()
            .and_then(|a| a.get(index.0))
            .map(|a| a.data.clone())
            .filter(|data| materials.contains(data.material));
        if let Some(data) = data {
            entity_commands.insert(SpriteRenderDataToRegister { data });
            requeued += 1;
        }
    }

    if let Some(mut archetypes) = archetypes {
        archetypes.clear();
    }
    info!(
        "Editor reload: destroyed {} material instances, {} sprites queued for registration",
        destroyed, requeued
    );
}
