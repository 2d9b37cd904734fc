//! What to watch and when to reload

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Signal sent to connected pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ReloadSignal {
    /// Reload the whole page
    FullReload,
}

/// Patterns to watch and the path suffixes that trigger a reload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSpec {
    /// Glob patterns relative to the site root
    pub patterns: Vec<String>,
    /// A change to a path ending in one of these triggers a reload
    pub suffixes: Vec<String>,
}

impl Default for WatchSpec {
    fn default() -> Self {
        Self {
            patterns: vec![
                "src/sections/*.liquid".to_string(),
                "collection.json".to_string(),
            ],
            suffixes: vec![".liquid".to_string(), ".json".to_string()],
        }
    }
}

impl WatchSpec {
    pub fn new(patterns: Vec<String>, suffixes: Vec<String>) -> Self {
        Self { patterns, suffixes }
    }

    pub fn should_reload(&self, path: &Path) -> bool {
        should_reload(path, &self.suffixes)
    }
}

/// Whether a changed path ends with one of `suffixes`
pub fn should_reload<S: AsRef<str>>(path: &Path, suffixes: &[S]) -> bool {
    let path = path.to_string_lossy();
    suffixes.iter().any(|suffix| {
        let suffix = suffix.as_ref();
        !suffix.is_empty() && path.ends_with(suffix)
    })
}

fn has_glob_meta(segment: &str) -> bool {
    segment.contains(['*', '?', '[', '{'])
}

/// Directory to watch for a pattern and whether it must be watched recursively
///
/// `src/sections/*.liquid` → (`src/sections`, false),
/// `collection.json` → (``, false), `assets/**/*.css` → (`assets`, true).
pub fn pattern_base(pattern: &str) -> (PathBuf, bool) {
    let path = Path::new(pattern);
    let depth = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .count();
    let mut base = PathBuf::new();
    let mut recursive = false;
    let mut globbed = false;

    for component in path.components() {
        match component {
            Component::Normal(segment) => {
                let segment = segment.to_string_lossy();
                if has_glob_meta(&segment) {
                    globbed = true;
                    recursive =
                        segment.contains("**") || depth > base.components().count() + 1;
                    break;
                }
                base.push(segment.as_ref());
            }
            Component::CurDir => {}
            other => base.push(other.as_os_str()),
        }
    }

    // A literal file path: watch its directory so atomic saves are seen
    if !globbed {
        base.pop();
    }
    (base, recursive)
}
