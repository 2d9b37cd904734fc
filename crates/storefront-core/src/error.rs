use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorefrontError {
    // Config errors
    #[error("CONFIG_PARSE_ERROR: {0}")]
    ConfigParseError(String),

    #[error("CONFIG_INVALID_VALUE: {field}: {reason}")]
    ConfigInvalidValue { field: String, reason: String },

    // Render input errors
    #[error("TEMPLATE_READ_ERROR: failed to read template '{path}': {reason}")]
    TemplateReadError { path: PathBuf, reason: String },

    #[error("CONTEXT_READ_ERROR: failed to read data file '{path}': {reason}")]
    ContextReadError { path: PathBuf, reason: String },

    #[error("CONTEXT_INVALID: data file '{path}' is not valid JSON: {reason}")]
    ContextInvalid { path: PathBuf, reason: String },

    #[error("CONTEXT_MISSING_TITLE: data has no string value at 'collection.title'")]
    ContextMissingTitle,

    // Template errors
    #[error("TEMPLATE_RENDER_ERROR: {0}")]
    Template(#[from] crate::template::error::TemplateError),

    // Output errors
    #[error("INDEX_READ_ERROR: failed to read base document '{path}': {reason}")]
    IndexReadError { path: PathBuf, reason: String },

    #[error("OUTPUT_WRITE_ERROR: failed to write '{path}': {reason}")]
    OutputWriteError { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
