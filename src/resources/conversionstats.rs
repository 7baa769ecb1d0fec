use bevy_ecs::prelude::Resource;

/// Running totals of the conversion pass.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    /// Authored objects converted into render components.
    pub converted: usize,
    /// Authored objects skipped because conversion failed.
    pub failed: usize,
}
