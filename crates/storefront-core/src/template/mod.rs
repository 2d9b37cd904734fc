//! Template module - Liquid-style template engine
//!
//! This module renders storefront section templates against JSON data.
//!
//! ## Syntax
//!
//! - Output: `{{ collection.title }}`, `{{ product.price | money }}`
//! - Filter arguments: `{{ image | image_tag: alt: 'Hat', class: 'w-full' }}`
//! - Tags: `{% if %}`, `{% unless %}`, `{% for x in xs %}`, `{% assign %}`,
//!   `{% comment %}`, `{% raw %}`
//! - Whitespace control: `{{-`, `-}}`, `{%-`, `-%}`
//!
//! Filters come from an explicit [`FilterRegistry`] owned by the engine.

pub mod engine;
pub mod error;
pub mod filters;
pub mod value;

pub use engine::{render, RenderOptions, TemplateContext, TemplateEngine};
pub use error::TemplateError;
pub use filters::{FilterArgs, FilterFn, FilterRegistry};
