//! Render data registration.
//!
//! Drains [`SpriteRenderDataToRegister`] components into
//! [`RenderArchetypes`], leaving each entity with the index of its archetype.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::spriterender::{RenderArchetypeIndex, SpriteRenderDataToRegister};
use crate::resources::renderarchetypes::RenderArchetypes;

pub fn register_sprite_render_data(
    mut commands: Commands,
    query: Query<(Entity, &SpriteRenderDataToRegister)>,
    mut archetypes: ResMut<RenderArchetypes>,
) {
    for (entity, pending) in query.iter() {
        let index = archetypes.register(&pending.data);
        commands
            .entity(entity)
            .insert(RenderArchetypeIndex(index))
            .remove::<SpriteRenderDataToRegister>();
        debug!("Registered {:?} as render archetype {}", entity, index);
    }
}
