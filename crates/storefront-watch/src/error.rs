use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("WATCH_INVALID_PATTERN: '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("WATCH_NO_TARGETS: none of the watch patterns resolve to an existing directory")]
    NoTargets,

    #[error("WATCH_BACKEND_ERROR: {0}")]
    Backend(#[from] notify::Error),
}
