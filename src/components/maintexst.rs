//! Texture scale/offset components.
//!
//! Both hold the sprite's region inside its texture as `(scale.x, scale.y,
//! offset.x, offset.y)`. [`MainTexSt`] may be rewritten at runtime (for example
//! by sprite-sheet animation); [`MainTexStInitial`] keeps the authored value.

use bevy_ecs::prelude::Component;
use glam::Vec4;

/// Current texture scale/offset.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct MainTexSt {
    pub value: Vec4,
}

/// Texture scale/offset as authored.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct MainTexStInitial {
    pub value: Vec4,
}

impl Default for MainTexSt {
    fn default() -> Self {
        Self {
            value: Vec4::new(1.0, 1.0, 0.0, 0.0),
        }
    }
}

impl Default for MainTexStInitial {
    fn default() -> Self {
        Self {
            value: Vec4::new(1.0, 1.0, 0.0, 0.0),
        }
    }
}
