//! Global context for CLI commands

use anyhow::{Result, anyhow};
use std::env;
use storefront_core::{Preview, Site};

/// Global context containing the site being worked on
pub struct Context {
    pub site: Site,
    pub verbose: bool,
}

impl Context {
    /// Create a new context for the site containing the current directory
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The current directory cannot be determined
    /// - storefront.toml cannot be read or parsed
    pub fn new(verbose: bool) -> Result<Self> {
        let current_dir = env::current_dir()?;
        let site = Site::discover(&current_dir)
            .map_err(|e| anyhow!("Failed to load site: {}", e))?;

        Ok(Self { site, verbose })
    }

    pub fn preview(&self) -> Preview {
        Preview::new(self.site.clone())
    }
}
