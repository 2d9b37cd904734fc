//! Template error types

use std::fmt;

/// Template parsing and rendering errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Variable not found in context (strict variables only)
    UndefinedKey {
        /// The variable path that was not found
        key: String,
        /// Line number where the error occurred
        line: usize,
    },

    /// Filter not registered (strict filters only)
    UnknownFilter {
        /// The filter name
        name: String,
        /// Line number where the error occurred
        line: usize,
    },

    /// Tag name not understood by the engine
    UnknownTag {
        /// The tag name
        name: String,
        /// Line number where the error occurred
        line: usize,
    },

    /// Malformed template syntax
    MalformedSyntax {
        /// Error message
        message: String,
        /// Line number where the error occurred
        line: usize,
    },

    /// Array printed directly by an output tag
    ArrayInOutput {
        /// The expression that produced the array
        key: String,
    },

    /// Object printed directly by an output tag
    ObjectInOutput {
        /// The expression that produced the object
        key: String,
    },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::UndefinedKey { key, line } => {
                write!(f, "Undefined variable '{}' at line {}", key, line)
            }
            TemplateError::UnknownFilter { name, line } => {
                write!(f, "Unknown filter '{}' at line {}", name, line)
            }
            TemplateError::UnknownTag { name, line } => {
                write!(f, "Unknown tag '{}' at line {}", name, line)
            }
            TemplateError::MalformedSyntax { message, line } => {
                write!(f, "Malformed syntax at line {}: {}", line, message)
            }
            TemplateError::ArrayInOutput { key } => {
                write!(
                    f,
                    "Array '{}' cannot be printed directly. Use {{% for item in {} %}} ... {{% endfor %}} or the join filter",
                    key, key
                )
            }
            TemplateError::ObjectInOutput { key } => {
                write!(
                    f,
                    "Object '{}' cannot be printed directly. Use nested keys like {}.field",
                    key, key
                )
            }
        }
    }
}

impl std::error::Error for TemplateError {}
