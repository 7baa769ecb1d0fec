//! World and schedule setup for the conversion pass.

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;

use crate::components::objectname::ObjectName;
use crate::events::editorreload::{EditorReloadEvent, editor_reload_observer};
use crate::resources::conversionconfig::ConversionConfig;
use crate::resources::conversionstats::ConversionStats;
use crate::resources::materialstore::{MaterialOverrides, MaterialStore};
use crate::resources::renderarchetypes::RenderArchetypes;
use crate::resources::spritestore::SpriteStore;
use crate::resources::texturestore::TextureStore;
use crate::systems::conversion::convert_sprite_authoring;
use crate::systems::registration::register_sprite_render_data;

/// Build a world holding every resource the conversion pass uses, with the
/// editor reload observer registered.
pub fn init_world(config: ConversionConfig) -> World {
    let mut world = World::new();
    world.insert_resource(TextureStore::new());
    world.insert_resource(SpriteStore::new());
    world.insert_resource(MaterialStore::new());
    world.insert_resource(MaterialOverrides::new(config.validate_entries));
    world.insert_resource(RenderArchetypes::new());
    world.insert_resource(ConversionStats::default());
    world.insert_resource(config);

    world.spawn(Observer::new(editor_reload_observer));
    // Ensure the observer is registered before anything triggers a reload.
    world.flush();
    world
}

/// Conversion followed by render data registration.
pub fn conversion_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((convert_sprite_authoring, register_sprite_render_data).chain());
    schedule
}

/// Simulate an editor reload: drop runtime material instances and despawn
/// every converted scene object so the scene can be spawned again.
pub fn reload(world: &mut World) {
    world.trigger(EditorReloadEvent {});
    let objects: Vec<Entity> = {
        let mut q = world.query_filtered::<Entity, With<ObjectName>>();
        q.iter(world).collect()
    };
    for entity in objects {
        world.despawn(entity);
    }
}
