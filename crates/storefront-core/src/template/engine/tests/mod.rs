//! Tests for template engine
//!
//! Organized into focused submodules, one per concern.

use super::*;

// Test helper functions
mod helpers;

// TokenStream tests
mod tokenstream;

mod render_whitespace;
