//! Dev-reload watcher
//!
//! Watches the template and data files of a site and emits a full-reload
//! signal whenever one of them changes. The subscription lives as long as
//! its [`ReloadSubscription`] handle.

mod error;
mod spec;
mod watcher;

pub use error::WatchError;
pub use spec::{ReloadSignal, WatchSpec, pattern_base, should_reload};
pub use watcher::{ReloadSubscription, is_change, subscribe};
