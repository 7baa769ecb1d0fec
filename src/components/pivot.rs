use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Pivot of a sprite in normalized sprite space. `(0.5, 0.5)` is the center.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Pivot {
    pub value: Vec2,
}

impl Pivot {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            value: Vec2::new(x, y),
        }
    }
}

impl Default for Pivot {
    fn default() -> Self {
        Self::new(0.5, 0.5)
    }
}
