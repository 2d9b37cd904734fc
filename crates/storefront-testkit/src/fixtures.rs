//! Fixture sites for testing
//!
//! A fixture site is a throwaway site root with a template, a data file and
//! a base document carrying both placeholders.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Section template exercising the storefront filters
pub const SAMPLE_TEMPLATE: &str = r#"<section class="collection">
  <h2>{{ collection.title }}</h2>
  {%- for product in collection.products %}
  <article class="product">
    {{ product.featured_image | img_url: '600x600' | image_tag: alt: product.title, class: 'product__image' }}
    <h3>{{ product.title }}</h3>
    <span class="price">{{ product.price | money }}</span>
  </article>
  {%- endfor %}
</section>
"#;

/// Context document with a two-product collection
pub const SAMPLE_COLLECTION: &str = r#"{
  "collection": {
    "title": "Summer Sale",
    "products": [
      { "title": "Straw Hat", "price": 2500, "featured_image": "/images/hat.jpg" },
      { "title": "Beach Towel", "price": 1250, "featured_image": "/images/towel.jpg" }
    ]
  }
}
"#;

/// Base document carrying the title and content placeholders
pub const SAMPLE_INDEX: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <title>Shopify Developer Test</title>
    <link rel="stylesheet" href="src/styles.css" />
  </head>
  <body>
    <div id="liquid-content"></div>
    <script type="module" src="src/main.js"></script>
  </body>
</html>
"#;

/// A temporary site root populated with fixture files
pub struct FixtureSite {
    dir: TempDir,
}

impl FixtureSite {
    /// Site root
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of a file inside the site
    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Write (or overwrite) a file, creating parent directories
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write(&self, relative: &str, contents: &str) -> &Self {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
        }
        std::fs::write(&path, contents)
            .unwrap_or_else(|e| panic!("Failed to write {}: {}", path.display(), e));
        self
    }

    /// Remove a file from the site
    pub fn remove(&self, relative: &str) -> &Self {
        let _ = std::fs::remove_file(self.path(relative));
        self
    }

    /// Read a file from the site
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be read.
    pub fn read(&self, relative: &str) -> String {
        let path = self.path(relative);
        std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
    }
}

/// Creates a fixture site under `.tmp/` with the sample template, data,
/// base document, stylesheet and script
pub fn fixture_site() -> FixtureSite {
    let site = FixtureSite {
        dir: crate::temp_dir_in_workspace(),
    };
    site.write("src/sections/template.liquid", SAMPLE_TEMPLATE)
        .write("collection.json", SAMPLE_COLLECTION)
        .write("index.html", SAMPLE_INDEX)
        .write("src/styles.css", ".product { display: grid; }\n")
        .write("src/main.js", "console.log(\"storefront\");\n");
    site
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_site_has_all_inputs() {
        let site = fixture_site();
        assert!(site.path("src/sections/template.liquid").exists());
        assert!(site.path("collection.json").exists());
        assert!(site.read("index.html").contains("<div id=\"liquid-content\"></div>"));
    }

    #[test]
    fn test_fixture_site_write_and_remove() {
        let site = fixture_site();
        site.write("nested/dir/file.txt", "hello");
        assert_eq!(site.read("nested/dir/file.txt"), "hello");
        site.remove("nested/dir/file.txt");
        assert!(!site.path("nested/dir/file.txt").exists());
    }
}
