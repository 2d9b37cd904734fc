//! Whitespace control tests

use super::helpers::simple_context;
use super::*;
use serde_json::json;

#[test]
fn test_trim_left_of_output() {
    let context = simple_context();
    let result = render("<h1>   \n  {{- title }}</h1>", &context).unwrap();
    assert_eq!(result, "<h1>My Title</h1>");
}

#[test]
fn test_trim_right_of_output() {
    let context = simple_context();
    let result = render("<h1>{{ title -}}  \n </h1>", &context).unwrap();
    assert_eq!(result, "<h1>My Title</h1>");
}

#[test]
fn test_trim_around_tags() {
    let context = TemplateContext::new(json!({"xs": ["a", "b"]}));
    let template = "<ul>\n  {%- for x in xs %}\n  <li>{{ x }}</li>\n  {%- endfor %}\n</ul>";
    let result = render(template, &context).unwrap();
    assert_eq!(result, "<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>");
}

#[test]
fn test_without_trim_whitespace_is_kept() {
    let context = simple_context();
    let result = render("<h1> {{ title }} </h1>", &context).unwrap();
    assert_eq!(result, "<h1> My Title </h1>");
}
