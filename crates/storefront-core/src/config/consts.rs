//! Fixed values shared across the workspace

/// Config file name looked up when locating the site root
pub const CONFIG_FILE_NAME: &str = "storefront.toml";

/// Literal markers replaced in the base document
pub mod placeholder {
    /// Title element replaced with the collection title
    pub const TITLE: &str = "<title>Shopify Developer Test</title>";

    /// Element replaced with the rendered fragment
    pub const CONTENT: &str = r#"<div id="liquid-content"></div>"#;
}

/// Currency formatting
pub mod money {
    /// Prefix used by the `money` filter
    pub const CURRENCY_SYMBOL: &str = "£";

    /// Minor units per major unit (cents per pound)
    pub const MINOR_UNITS: f64 = 100.0;
}

/// Dev server conventions
pub mod dev {
    /// Server-sent-events endpoint streaming reload signals
    pub const RELOAD_ENDPOINT: &str = "/__storefront/reload";

    pub const DEFAULT_HOST: &str = "127.0.0.1";

    pub const DEFAULT_PORT: u16 = 5173;
}

/// Default paths, relative to the site root
pub mod paths {
    pub const TEMPLATE: &str = "src/sections/template.liquid";
    pub const DATA: &str = "collection.json";
    pub const INDEX: &str = "index.html";
    pub const OUT_DIR: &str = "dist";
}
