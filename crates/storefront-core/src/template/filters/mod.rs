//! Filter registry
//!
//! A filter is a pure function from an input value plus arguments to an output
//! value. The registry is assembled once and handed to the engine; nothing
//! registers filters after construction.

pub mod shop;
pub mod standard;

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Arguments of a single filter invocation
///
/// `{{ x | f: 'a', key: 'b' }}` yields `positional = ["a"]` and
/// `keyword = [("key", "b")]`, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterArgs {
    pub positional: Vec<Value>,
    pub keyword: Vec<(String, Value)>,
}

impl FilterArgs {
    pub fn from_positional(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            positional: values.into_iter().collect(),
            keyword: Vec::new(),
        }
    }

    pub fn from_keywords(pairs: impl IntoIterator<Item = (&'static str, Value)>) -> Self {
        Self {
            positional: Vec::new(),
            keyword: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    /// Positional argument `index`, if supplied
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }
}

/// Signature shared by every filter
pub type FilterFn = fn(&Value, &FilterArgs) -> Value;

/// Immutable mapping from filter name to filter function
#[derive(Clone)]
pub struct FilterRegistry {
    filters: HashMap<&'static str, FilterFn>,
}

impl FilterRegistry {
    /// Registry with no filters
    pub fn empty() -> Self {
        Self {
            filters: HashMap::new(),
        }
    }

    /// General purpose string and number filters
    pub fn standard() -> Self {
        Self::empty()
            .with("default", standard::default)
            .with("upcase", standard::upcase)
            .with("downcase", standard::downcase)
            .with("capitalize", standard::capitalize)
            .with("escape", standard::escape)
            .with("strip", standard::strip)
            .with("size", standard::size)
            .with("append", standard::append)
            .with("prepend", standard::prepend)
            .with("join", standard::join)
            .with("plus", standard::plus)
            .with("minus", standard::minus)
            .with("times", standard::times)
    }

    /// Standard filters plus the storefront markup filters
    pub fn storefront() -> Self {
        Self::standard()
            .with("money", shop::money)
            .with("image_tag", shop::image_tag)
            .with("img_url", shop::img_url)
    }

    /// Add or replace a filter while assembling the registry
    pub fn with(mut self, name: &'static str, filter: FilterFn) -> Self {
        self.filters.insert(name, filter);
        self
    }

    pub fn get(&self, name: &str) -> Option<FilterFn> {
        self.filters.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Registered filter names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.filters.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::storefront()
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.names())
            .finish()
    }
}
