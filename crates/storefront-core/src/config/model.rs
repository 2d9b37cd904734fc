use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::consts;

/// storefront.toml schema
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub watch: WatchConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub build: BuildConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathsConfig {
    #[serde(default = "default_template")]
    pub template: PathBuf,
    #[serde(default = "default_data")]
    pub data: PathBuf,
    #[serde(default = "default_index")]
    pub index: PathBuf,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            data: default_data(),
            index: default_index(),
            out_dir: default_out_dir(),
        }
    }
}

fn default_template() -> PathBuf {
    PathBuf::from(consts::paths::TEMPLATE)
}

fn default_data() -> PathBuf {
    PathBuf::from(consts::paths::DATA)
}

fn default_index() -> PathBuf {
    PathBuf::from(consts::paths::INDEX)
}

fn default_out_dir() -> PathBuf {
    PathBuf::from(consts::paths::OUT_DIR)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    consts::dev::DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    consts::dev::DEFAULT_PORT
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchConfig {
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,
    #[serde(default = "default_reload_suffixes")]
    pub reload_suffixes: Vec<String>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
            reload_suffixes: default_reload_suffixes(),
        }
    }
}

fn default_patterns() -> Vec<String> {
    vec![
        "src/sections/*.liquid".to_string(),
        "collection.json".to_string(),
    ]
}

fn default_reload_suffixes() -> Vec<String> {
    vec![".liquid".to_string(), ".json".to_string()]
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderConfig {
    /// Undefined variables become errors instead of empty output
    #[serde(default)]
    pub strict_variables: bool,
    /// Unknown filters become errors instead of passing the value through
    #[serde(default)]
    pub strict_filters: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildConfig {
    #[serde(default = "default_true")]
    pub empty_out_dir: bool,
    #[serde(default = "default_true")]
    pub inline_assets: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            empty_out_dir: true,
            inline_assets: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Read storefront.toml
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| crate::error::StorefrontError::ConfigParseError(e.to_string()))?;

        Self::from_toml_str(&content)
    }

    /// Parse and validate a storefront.toml document
    pub fn from_toml_str(content: &str) -> crate::error::Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| crate::error::StorefrontError::ConfigParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.server.port == 0 {
            return Err(crate::error::StorefrontError::ConfigInvalidValue {
                field: "server.port".to_string(),
                reason: "port must be non-zero".to_string(),
            });
        }

        if let Some(suffix) = self.watch.reload_suffixes.iter().find(|s| s.is_empty()) {
            return Err(crate::error::StorefrontError::ConfigInvalidValue {
                field: "watch.reload_suffixes".to_string(),
                reason: format!("empty suffix '{}' would match every file", suffix),
            });
        }

        Ok(())
    }
}
