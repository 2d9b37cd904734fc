//! CLI command implementations

pub mod build;
pub mod dev;
pub mod render;
