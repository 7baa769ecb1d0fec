//! Spriteforge library.
//!
//! Converts authored sprite renderers into ECS render components and keeps
//! one overridden material per texture.

pub mod components;
pub mod events;
pub mod pipeline;
pub mod resources;
pub mod scene;
pub mod systems;
