//! Placeholder injection into the base HTML document

use crate::config::consts::placeholder;

/// Outcome of rendering, as seen by the injector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Injection {
    /// Rendered fragment plus the collection title
    Rendered { title: String, fragment: String },
    /// Render failed; only the content placeholder is replaced
    Failed { message: String },
}

impl Injection {
    pub fn rendered(title: impl Into<String>, fragment: impl Into<String>) -> Self {
        Injection::Rendered {
            title: title.into(),
            fragment: fragment.into(),
        }
    }

    pub fn failed(message: impl ToString) -> Self {
        Injection::Failed {
            message: message.to_string(),
        }
    }
}

/// Markup shown in place of the fragment when rendering fails
pub fn error_block(message: &str) -> String {
    format!("<pre>Error: {}</pre>", message)
}

/// Replace the first title and content placeholders in `html`
///
/// A missing placeholder is left alone. Replacement text is inserted as-is.
pub fn inject(html: &str, injection: &Injection) -> String {
    match injection {
        Injection::Rendered { title, fragment } => {
            let titled = html.replacen(placeholder::TITLE, &format!("<title>{}</title>", title), 1);
            titled.replacen(placeholder::CONTENT, fragment, 1)
        }
        Injection::Failed { message } => {
            html.replacen(placeholder::CONTENT, &error_block(message), 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "<html><head><title>Shopify Developer Test</title></head>\
<body><div id=\"liquid-content\"></div></body></html>";

    #[test]
    fn test_inject_replaces_both_placeholders() {
        let html = inject(BASE, &Injection::rendered("Summer Sale", "<h2>Hats</h2>"));
        assert_eq!(
            html,
            "<html><head><title>Summer Sale</title></head><body><h2>Hats</h2></body></html>"
        );
    }

    #[test]
    fn test_inject_only_first_occurrence() {
        let doubled = format!("{}{}", BASE, BASE);
        let html = inject(&doubled, &Injection::rendered("T", "F"));
        assert_eq!(html.matches("<title>T</title>").count(), 1);
        assert_eq!(html.matches(placeholder::TITLE).count(), 1);
        assert_eq!(html.matches(placeholder::CONTENT).count(), 1);
    }

    #[test]
    fn test_inject_missing_title_placeholder_still_replaces_content() {
        let base = "<title>Other</title><div id=\"liquid-content\"></div>";
        let html = inject(base, &Injection::rendered("Summer Sale", "<p>ok</p>"));
        assert_eq!(html, "<title>Other</title><p>ok</p>");
    }

    #[test]
    fn test_inject_missing_content_placeholder_still_replaces_title() {
        let base = "<title>Shopify Developer Test</title><main></main>";
        let html = inject(base, &Injection::rendered("Summer Sale", "<p>ok</p>"));
        assert_eq!(html, "<title>Summer Sale</title><main></main>");
    }

    #[test]
    fn test_inject_failure_leaves_title() {
        let html = inject(BASE, &Injection::failed("boom"));
        assert!(html.contains(placeholder::TITLE));
        assert!(html.contains("<pre>Error: boom</pre>"));
        assert!(!html.contains(placeholder::CONTENT));
    }

    #[test]
    fn test_inject_inserts_replacement_literally() {
        let html = inject(BASE, &Injection::rendered("$& $1", "$$"));
        assert!(html.contains("<title>$& $1</title>"));
        assert!(html.contains("<body>$$</body>"));
    }

    #[test]
    fn test_inject_without_placeholders_is_identity() {
        let base = "<html><body>static</body></html>";
        assert_eq!(inject(base, &Injection::rendered("T", "F")), base);
    }
}
