//! Page rendering: template + context data, injected into the base document

use crate::config::consts::paths;
use crate::error::{Result, StorefrontError};
use crate::inject::{inject, Injection};
use crate::site::Site;
use crate::template::{RenderOptions, TemplateContext, TemplateEngine};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// A successful render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedPage {
    /// `collection.title` from the context data
    pub title: String,
    /// Rendered template output
    pub fragment: String,
}

/// Renders a site's section template
///
/// The engine and its filter registry are built once per preview.
#[derive(Debug, Clone)]
pub struct Preview {
    site: Site,
    engine: TemplateEngine,
}

impl Preview {
    pub fn new(site: Site) -> Self {
        let options = RenderOptions::from(site.config().render);
        let engine = TemplateEngine::default().with_options(options);
        Self { site, engine }
    }

    /// Use a custom engine (e.g. a different filter registry)
    pub fn with_engine(site: Site, engine: TemplateEngine) -> Self {
        Self { site, engine }
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    /// Read the template and context data from disk and render them
    pub fn render_page(&self) -> Result<RenderedPage> {
        let template_path = self.site.template_path();
        let template = std::fs::read_to_string(&template_path).map_err(|e| {
            StorefrontError::TemplateReadError {
                path: template_path.clone(),
                reason: e.to_string(),
            }
        })?;
        let data = read_context(&self.site.data_path())?;
        self.render_source(&template, data)
    }

    /// Render template text against already-loaded context data
    pub fn render_source(&self, template: &str, data: Value) -> Result<RenderedPage> {
        let title = collection_title(&data)?;
        let fragment = self.engine.render(template, &TemplateContext::new(data))?;
        debug!(title = %title, bytes = fragment.len(), "rendered template");
        Ok(RenderedPage { title, fragment })
    }

    /// Render and inject into `html`, recovering from render failures
    ///
    /// On failure the content placeholder shows the error and the title is
    /// left untouched.
    pub fn transform_index_html(&self, html: &str) -> String {
        inject(html, &self.injection())
    }

    /// Render the page and turn the outcome into an [`Injection`]
    ///
    /// Failures are logged and become [`Injection::Failed`].
    pub fn injection(&self) -> Injection {
        match self.render_page() {
            Ok(page) => Injection::rendered(page.title, page.fragment),
            Err(err) => {
                error!("Liquid rendering error: {}", err);
                Injection::failed(err)
            }
        }
    }

    /// Read the base document and transform it
    pub fn build_index(&self) -> Result<String> {
        let index_path = self.site.index_path();
        let html = std::fs::read_to_string(&index_path).map_err(|e| {
            StorefrontError::IndexReadError {
                path: index_path.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(self.transform_index_html(&html))
    }
}

/// Write `html` as the `index.html` of `out_dir`, creating the directory
pub fn write_page(out_dir: &Path, html: &str) -> Result<PathBuf> {
    let output_path = out_dir.join(paths::INDEX);
    let write_error = |path: &Path, e: std::io::Error| StorefrontError::OutputWriteError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };
    std::fs::create_dir_all(out_dir).map_err(|e| write_error(out_dir, e))?;
    std::fs::write(&output_path, html).map_err(|e| write_error(&output_path, e))?;
    Ok(output_path)
}

/// Load and parse the JSON context file
pub fn read_context(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|e| StorefrontError::ContextReadError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| StorefrontError::ContextInvalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn collection_title(data: &Value) -> Result<String> {
    data.pointer("/collection/title")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(StorefrontError::ContextMissingTitle)
}
