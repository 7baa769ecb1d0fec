//! Event types and observers.
//!
//! Submodules:
//! - [`editorreload`] – host reload that destroys runtime material instances
pub mod editorreload;
