//! Shared test helpers for template engine tests

use crate::template::engine::TemplateContext;
use serde_json::json;

/// Create a simple test context with basic scalar values
pub(super) fn simple_context() -> TemplateContext {
    TemplateContext::new(json!({
        "title": "My Title",
        "count": 42,
        "price": 9.99,
        "enabled": true,
        "nothing": null,
    }))
}

/// Create a collection context shaped like collection.json
pub(super) fn collection_context() -> TemplateContext {
    TemplateContext::new(json!({
        "collection": {
            "title": "Summer Sale",
            "products": [
                {
                    "title": "Straw Hat",
                    "price": 2500,
                    "compare_at_price": 3000,
                    "featured_image": "/images/hat.jpg",
                    "tags": ["sale", "summer"],
                    "available": true
                },
                {
                    "title": "Beach Towel",
                    "price": 1250,
                    "compare_at_price": null,
                    "featured_image": "/images/towel.jpg",
                    "tags": ["summer"],
                    "available": false
                },
                {
                    "title": "Sunglasses",
                    "price": 4999,
                    "featured_image": null,
                    "tags": [],
                    "available": true
                }
            ]
        }
    }))
}
