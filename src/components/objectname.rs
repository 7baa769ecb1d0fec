//! Name of the authored object an entity was created from.

use bevy_ecs::prelude::Component;
use std::sync::Arc;

#[derive(Component, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectName(pub Arc<str>);

impl ObjectName {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
