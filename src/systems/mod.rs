//! ECS systems.
//!
//! - [`conversion`] – turns authoring data into render components
//! - [`registration`] – groups converted sprites into render archetypes

pub mod conversion;
pub mod registration;
