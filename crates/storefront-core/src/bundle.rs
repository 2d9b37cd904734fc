//! Single-file bundling: inline local stylesheets, scripts and module imports
//!
//! Module scripts have their relative `import ... from "./x.js"` specifiers
//! replaced by `data:` URLs of the imported file (recursively), and
//! `new URL("x.wasm", import.meta.url)` asset references replaced by `data:`
//! URLs of the asset bytes.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

static LINK_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<link\b([^>]*)>").unwrap());

static SCRIPT_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b([^>]*)>(.*?)</script>").unwrap());

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .unwrap()
});

static MODULE_SPECIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(\b(?:from|import)\s*)["']([^"'\r\n]+)["']"#).unwrap());

static ASSET_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"new\s+URL\(\s*["']([^"'\r\n]+)["']\s*,\s*import\.meta\.url\s*\)"#).unwrap()
});

/// Nested module imports followed before giving up
const MAX_IMPORT_DEPTH: usize = 8;

/// Bundled document plus what happened to each referenced asset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bundle {
    pub html: String,
    /// Files whose contents were inlined
    pub inlined: Vec<PathBuf>,
    /// Local references with no file behind them
    pub missing: Vec<String>,
}

/// Where an `href`/`src` points
#[derive(Debug, Clone, PartialEq, Eq)]
enum AssetRef {
    Remote,
    Local(PathBuf),
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Attribute {
    name: String,
    value: Option<String>,
}

fn parse_attributes(source: &str) -> Vec<Attribute> {
    ATTRIBUTE
        .captures_iter(source)
        .map(|caps| Attribute {
            name: caps[1].to_string(),
            value: caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().to_string()),
        })
        .collect()
}

fn attribute<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|a| a.name.eq_ignore_ascii_case(name))
        .and_then(|a| a.value.as_deref())
}

fn render_attributes(attributes: &[Attribute]) -> String {
    attributes
        .iter()
        .map(|a| match &a.value {
            Some(value) => format!(r#" {}="{}""#, a.name, value),
            None => format!(" {}", a.name),
        })
        .collect()
}

fn is_remote(reference: &str) -> bool {
    reference.starts_with("//") || reference.starts_with("data:") || reference.contains("://")
}

/// Module specifiers naming a file rather than a package
fn is_relative_specifier(specifier: &str) -> bool {
    specifier.starts_with("./")
        || specifier.starts_with("../")
        || (specifier.starts_with('/') && !specifier.starts_with("//"))
}

fn mime_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("js" | "mjs") => "text/javascript",
        Some("wasm") => "application/wasm",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

fn data_url(path: &Path, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type(path), STANDARD.encode(bytes))
}

/// Resolve a reference against `base`, refusing paths that escape `root`
///
/// A leading `/` is relative to `root`.
fn resolve(root: &Path, base: &Path, reference: &str) -> AssetRef {
    if is_remote(reference) {
        return AssetRef::Remote;
    }
    let path_part = reference.split(['?', '#']).next().unwrap_or_default();
    let candidate = match path_part.strip_prefix('/') {
        Some(rooted) => root.join(rooted),
        None => base.join(path_part),
    };
    if path_part.trim_start_matches(['.', '/']).is_empty() {
        return AssetRef::Missing;
    }

    let (Ok(root), Ok(file)) = (root.canonicalize(), candidate.canonicalize()) else {
        return AssetRef::Missing;
    };
    if file.starts_with(&root) && file.is_file() {
        AssetRef::Local(file)
    } else {
        AssetRef::Missing
    }
}

struct Inliner<'a> {
    root: &'a Path,
    inlined: Vec<PathBuf>,
    missing: Vec<String>,
}

impl Inliner<'_> {
    /// Bytes of a local asset, or `None` to leave the reference alone
    fn read(&mut self, base: &Path, reference: &str) -> Option<(PathBuf, Vec<u8>)> {
        match resolve(self.root, base, reference) {
            AssetRef::Remote => None,
            AssetRef::Missing => {
                warn!("asset '{}' not found under {}, leaving it linked", reference, self.root.display());
                self.missing.push(reference.to_string());
                None
            }
            AssetRef::Local(path) => match std::fs::read(&path) {
                Ok(bytes) => {
                    debug!("inlining {}", path.display());
                    self.inlined.push(path.clone());
                    Some((path, bytes))
                }
                Err(e) => {
                    warn!("failed to read asset '{}': {}", path.display(), e);
                    self.missing.push(reference.to_string());
                    None
                }
            },
        }
    }

    fn read_text(&mut self, base: &Path, reference: &str) -> Option<(PathBuf, String)> {
        let (path, bytes) = self.read(base, reference)?;
        match String::from_utf8(bytes) {
            Ok(text) => Some((path, text)),
            Err(_) => {
                warn!("asset '{}' is not UTF-8 text, leaving it linked", path.display());
                self.inlined.pop();
                self.missing.push(reference.to_string());
                None
            }
        }
    }

    fn link(&mut self, caps: &Captures) -> String {
        let attributes = parse_attributes(&caps[1]);
        let is_stylesheet = attribute(&attributes, "rel").is_some_and(|rel| {
            rel.split_whitespace()
                .any(|token| token.eq_ignore_ascii_case("stylesheet"))
        });
        let href = attribute(&attributes, "href");
        let root = self.root;
        match href {
            Some(href) if is_stylesheet => match self.read_text(root, href) {
                Some((_, css)) => format!("<style>{}</style>", css),
                None => caps[0].to_string(),
            },
            _ => caps[0].to_string(),
        }
    }

    fn script(&mut self, caps: &Captures) -> String {
        let attributes = parse_attributes(&caps[1]);
        let is_module = attribute(&attributes, "type")
            .is_some_and(|kind| kind.trim().eq_ignore_ascii_case("module"));
        let root = self.root;

        let Some(src) = attribute(&attributes, "src") else {
            if !is_module {
                return caps[0].to_string();
            }
            return format!("<script{}>{}</script>", &caps[1], self.module(&caps[2], root, 0));
        };

        match self.read_text(root, src) {
            Some((path, js)) => {
                let js = match (is_module, path.parent()) {
                    (true, Some(dir)) => self.module(&js, dir, 0),
                    _ => js,
                };
                let rest: Vec<Attribute> = attributes
                    .into_iter()
                    .filter(|a| !a.name.eq_ignore_ascii_case("src"))
                    .collect();
                format!("<script{}>{}</script>", render_attributes(&rest), js)
            }
            None => caps[0].to_string(),
        }
    }

    /// Rewrite the local imports and asset URLs of module source found in `base`
    fn module(&mut self, source: &str, base: &Path, depth: usize) -> String {
        let source = ASSET_URL.replace_all(source, |caps: &Captures| {
            match self.read(base, &caps[1]) {
                Some((path, bytes)) => format!(r#"new URL("{}")"#, data_url(&path, &bytes)),
                None => caps[0].to_string(),
            }
        });

        MODULE_SPECIFIER
            .replace_all(&source, |caps: &Captures| {
                let specifier = &caps[2];
                if !is_relative_specifier(specifier) {
                    return caps[0].to_string();
                }
                if depth >= MAX_IMPORT_DEPTH {
                    warn!("import '{}' nested too deeply, leaving it linked", specifier);
                    self.missing.push(specifier.to_string());
                    return caps[0].to_string();
                }
                match self.read_text(base, specifier) {
                    Some((path, js)) => {
                        let dir = path.parent().unwrap_or(base).to_path_buf();
                        let js = self.module(&js, &dir, depth + 1);
                        format!(r#"{}"{}""#, &caps[1], data_url(&path, js.as_bytes()))
                    }
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

/// Inline every local stylesheet link, external script and module import
/// found in `html`
///
/// References are resolved relative to `root`. Remote URLs and package
/// specifiers are left alone; missing local files are left alone and reported.
pub fn inline_assets(html: &str, root: &Path) -> Bundle {
    let mut inliner = Inliner {
        root,
        inlined: Vec::new(),
        missing: Vec::new(),
    };

    let html = LINK_TAG
        .replace_all(html, |caps: &Captures| inliner.link(caps))
        .into_owned();
    let html = SCRIPT_TAG
        .replace_all(&html, |caps: &Captures| inliner.script(caps))
        .into_owned();

    Bundle {
        html,
        inlined: inliner.inlined,
        missing: inliner.missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_testkit::temp_dir_in_workspace;

    fn site_with_assets() -> tempfile::TempDir {
        let temp = temp_dir_in_workspace();
        std::fs::create_dir_all(temp.path().join("src")).unwrap();
        std::fs::write(temp.path().join("src/styles.css"), "body { margin: 0; }").unwrap();
        std::fs::write(temp.path().join("src/main.js"), "init();").unwrap();
        temp
    }

    #[test]
    fn test_parse_attributes_handles_quoting_styles() {
        let attributes = parse_attributes(r#" rel="stylesheet" href='a.css' media=all defer"#);
        assert_eq!(attribute(&attributes, "rel"), Some("stylesheet"));
        assert_eq!(attribute(&attributes, "href"), Some("a.css"));
        assert_eq!(attribute(&attributes, "media"), Some("all"));
        assert!(attributes.iter().any(|a| a.name == "defer" && a.value.is_none()));
    }

    #[test]
    fn test_inline_stylesheet() {
        let temp = site_with_assets();
        let bundle = inline_assets(
            r#"<head><link rel="stylesheet" href="/src/styles.css" /></head>"#,
            temp.path(),
        );
        assert_eq!(bundle.html, "<head><style>body { margin: 0; }</style></head>");
        assert_eq!(bundle.inlined.len(), 1);
    }

    #[test]
    fn test_inline_script_keeps_other_attributes() {
        let temp = site_with_assets();
        let bundle = inline_assets(
            r#"<script type="module" src="./src/main.js"></script>"#,
            temp.path(),
        );
        assert_eq!(bundle.html, r#"<script type="module">init();</script>"#);
    }

    #[test]
    fn test_remote_assets_are_untouched() {
        let temp = site_with_assets();
        let html = r#"<link rel="stylesheet" href="https://cdn.example.com/swiper.css"><script src="//cdn.example.com/swiper.js"></script>"#;
        let bundle = inline_assets(html, temp.path());
        assert_eq!(bundle.html, html);
        assert!(bundle.missing.is_empty());
    }

    #[test]
    fn test_missing_assets_are_reported() {
        let temp = site_with_assets();
        let html = r#"<link rel="stylesheet" href="gone.css">"#;
        let bundle = inline_assets(html, temp.path());
        assert_eq!(bundle.html, html);
        assert_eq!(bundle.missing, vec!["gone.css".to_string()]);
    }

    #[test]
    fn test_non_stylesheet_links_are_untouched() {
        let temp = site_with_assets();
        let html = r#"<link rel="icon" href="src/styles.css">"#;
        assert_eq!(inline_assets(html, temp.path()).html, html);
    }

    #[test]
    fn test_inline_scripts_are_untouched() {
        let temp = site_with_assets();
        let html = "<script>window.x = 1;</script>";
        assert_eq!(inline_assets(html, temp.path()).html, html);
    }

    #[test]
    fn test_module_import_becomes_data_url() {
        let temp = site_with_assets();
        std::fs::create_dir_all(temp.path().join("pkg")).unwrap();
        std::fs::write(temp.path().join("pkg/app.js"), "export default function init() {}").unwrap();

        let html = "<script type=\"module\">\n  import init from \"./pkg/app.js\";\n  init();\n</script>";
        let bundle = inline_assets(html, temp.path());

        let expected = data_url(Path::new("app.js"), b"export default function init() {}");
        assert!(bundle.html.contains(&format!(r#"import init from "{}";"#, expected)));
        assert!(!bundle.html.contains("./pkg/"));
        assert!(bundle.missing.is_empty());
    }

    #[test]
    fn test_nested_imports_are_rewritten_relative_to_importer() {
        let temp = site_with_assets();
        std::fs::create_dir_all(temp.path().join("pkg")).unwrap();
        std::fs::write(temp.path().join("pkg/b.js"), "export const b = 1;").unwrap();
        std::fs::write(temp.path().join("pkg/a.js"), "import { b } from './b.js';").unwrap();

        let bundle = inline_assets(
            r#"<script type="module">import "./pkg/a.js";</script>"#,
            temp.path(),
        );

        let inner = data_url(Path::new("b.js"), b"export const b = 1;");
        let outer = format!(r#"import {{ b }} from "{}";"#, inner);
        let expected = data_url(Path::new("a.js"), outer.as_bytes());
        assert_eq!(
            bundle.html,
            format!(r#"<script type="module">import "{}";</script>"#, expected)
        );
        assert_eq!(bundle.inlined.len(), 2);
    }

    #[test]
    fn test_wasm_asset_url_becomes_data_url() {
        let temp = site_with_assets();
        std::fs::create_dir_all(temp.path().join("pkg")).unwrap();
        std::fs::write(temp.path().join("pkg/client_bg.wasm"), b"\0asm").unwrap();
        std::fs::write(
            temp.path().join("pkg/client.js"),
            "const url = new URL('client_bg.wasm', import.meta.url);",
        )
        .unwrap();

        let bundle = inline_assets(
            r#"<script type="module" src="pkg/client.js"></script>"#,
            temp.path(),
        );

        assert_eq!(
            bundle.html,
            r#"<script type="module">const url = new URL("data:application/wasm;base64,AGFzbQ==");</script>"#
        );
    }

    #[test]
    fn test_package_specifiers_are_untouched() {
        let temp = site_with_assets();
        let html = r#"<script type="module">import { Swiper } from "swiper";</script>"#;
        let bundle = inline_assets(html, temp.path());
        assert_eq!(bundle.html, html);
        assert!(bundle.missing.is_empty());
    }

    #[test]
    fn test_missing_module_import_is_reported() {
        let temp = site_with_assets();
        let html = r#"<script type="module">import init from "./pkg/gone.js";</script>"#;
        let bundle = inline_assets(html, temp.path());
        assert_eq!(bundle.html, html);
        assert_eq!(bundle.missing, vec!["./pkg/gone.js".to_string()]);
    }

    #[test]
    fn test_paths_outside_root_are_not_inlined() {
        let temp = site_with_assets();
        let site = temp.path().join("site");
        std::fs::create_dir_all(&site).unwrap();
        let html = r#"<link rel="stylesheet" href="../src/styles.css">"#;
        let bundle = inline_assets(html, &site);
        assert_eq!(bundle.html, html);
        assert_eq!(bundle.missing.len(), 1);
    }
}
