//! Sorting components for 2D render ordering.
//!
//! The conversion pass only writes these; the sorting system that turns them
//! into a final [`SortingValue`] lives with the renderer.
//!
//! Sprites are ordered by [`SortingLayer`] first and [`SortingIndex`] inside a
//! layer. Higher values are drawn later (on top).

use bevy_ecs::prelude::Component;

/// Marks an entity as taking part in visual sorting.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct VisualSortingTag;

/// Marks an entity whose position, layer and index never change, so its
/// sorting value can be computed once.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct SortingStaticTag;

/// Order of a sprite inside its layer.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortingIndex(pub i32);

/// Layer a sprite is sorted in. Layers are compared before indices.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortingLayer(pub i32);

/// Final sort key written by the sorting system. Starts at zero.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct SortingValue(pub f32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_then_index_ordering() {
        let mut keys = vec![
            (SortingLayer(1), SortingIndex(0)),
            (SortingLayer(0), SortingIndex(5)),
            (SortingLayer(0), SortingIndex(-2)),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                (SortingLayer(0), SortingIndex(-2)),
                (SortingLayer(0), SortingIndex(5)),
                (SortingLayer(1), SortingIndex(0)),
            ]
        );
    }

    #[test]
    fn test_sorting_value_default_is_zero() {
        assert_eq!(SortingValue::default(), SortingValue(0.0));
    }
}
