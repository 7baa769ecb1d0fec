//! ECS components for converted sprites.
//!
//! Submodules overview:
//! - [`authoring`] – authored sprite renderer data, input of the conversion pass
//! - [`maintexst`] – sprite region inside its texture (current and authored)
//! - [`objectname`] – name of the authored object an entity came from
//! - [`pivot`] – normalized pivot of a sprite
//! - [`scale2d`] – sprite size in world units
//! - [`sorting`] – sorting tags, layer, index and final sort value
//! - [`spriterender`] – renderer markers and render data registration

pub mod authoring;
pub mod maintexst;
pub mod objectname;
pub mod pivot;
pub mod scale2d;
pub mod sorting;
pub mod spriterender;
