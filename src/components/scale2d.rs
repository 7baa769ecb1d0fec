use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Size of a rendered sprite in world units.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Scale2D {
    pub value: Vec2,
}

impl Scale2D {
    pub fn new(sx: f32, sy: f32) -> Self {
        Self {
            value: Vec2::new(sx, sy),
        }
    }
}

impl Default for Scale2D {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}
