//! Site configuration (`storefront.toml`)

pub mod consts;
pub mod model;

pub use model::{BuildConfig, Config, PathsConfig, RenderConfig, ServerConfig, WatchConfig};
