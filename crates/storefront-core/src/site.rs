//! Site root discovery and path resolution

use crate::config::{consts::CONFIG_FILE_NAME, Config};
use crate::error::Result;
use std::path::{Path, PathBuf};

/// A storefront site: its root directory and its configuration
#[derive(Debug, Clone)]
pub struct Site {
    pub root: PathBuf,
    config: Config,
}

impl Site {
    /// Find the site root by searching for storefront.toml in `start` and its ancestors
    ///
    /// Falls back to `start` with the default configuration when no config
    /// file exists anywhere up the tree.
    pub fn discover(start: &Path) -> Result<Self> {
        match Self::find_root(start) {
            Some(root) => Self::open(&root),
            None => Ok(Self {
                root: start.to_path_buf(),
                config: Config::default(),
            }),
        }
    }

    /// Open a site rooted at `root`, reading storefront.toml if present
    pub fn open(root: &Path) -> Result<Self> {
        let config_path = root.join(CONFIG_FILE_NAME);
        let config = if config_path.is_file() {
            Config::from_file(&config_path)?
        } else {
            Config::default()
        };

        Ok(Self {
            root: root.to_path_buf(),
            config,
        })
    }

    /// Build a site from an explicit configuration
    pub fn with_config(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    fn find_root(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| dir.join(CONFIG_FILE_NAME).is_file())
            .map(Path::to_path_buf)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn template_path(&self) -> PathBuf {
        self.root.join(&self.config.paths.template)
    }

    pub fn data_path(&self) -> PathBuf {
        self.root.join(&self.config.paths.data)
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(&self.config.paths.index)
    }

    pub fn out_dir(&self) -> PathBuf {
        self.root.join(&self.config.paths.out_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use storefront_testkit::temp_dir_in_workspace;

    #[test]
    fn test_discover_without_config_uses_start_dir() {
        let temp = temp_dir_in_workspace();
        let site = Site::discover(temp.path()).unwrap();
        assert_eq!(site.root, temp.path());
        assert_eq!(site.config(), &Config::default());
    }

    #[test]
    fn test_discover_finds_config_in_ancestor() {
        let temp = temp_dir_in_workspace();
        fs::write(
            temp.path().join("storefront.toml"),
            "[paths]\ndata = \"data.json\"\n",
        )
        .unwrap();
        let nested = temp.path().join("src/sections");
        fs::create_dir_all(&nested).unwrap();

        let site = Site::discover(&nested).unwrap();
        assert_eq!(site.root, temp.path());
        assert_eq!(site.data_path(), temp.path().join("data.json"));
    }

    #[test]
    fn test_open_propagates_invalid_config() {
        let temp = temp_dir_in_workspace();
        fs::write(temp.path().join("storefront.toml"), "[server]\nport = \"x\"").unwrap();
        assert!(Site::open(temp.path()).is_err());
    }
}
