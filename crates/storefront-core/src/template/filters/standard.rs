//! General purpose filters

use super::FilterArgs;
use crate::template::value::{is_empty, is_truthy, number_value, to_number, to_text};
use serde_json::Value;

fn text(s: String) -> Value {
    Value::String(s)
}

fn arg_text(args: &FilterArgs, index: usize) -> String {
    args.arg(index).map(to_text).unwrap_or_default()
}

/// Fallback for `nil`, `false` and empty values
pub fn default(value: &Value, args: &FilterArgs) -> Value {
    if !is_truthy(value) || is_empty(value) {
        args.arg(0).cloned().unwrap_or(Value::Null)
    } else {
        value.clone()
    }
}

pub fn upcase(value: &Value, _args: &FilterArgs) -> Value {
    text(to_text(value).to_uppercase())
}

pub fn downcase(value: &Value, _args: &FilterArgs) -> Value {
    text(to_text(value).to_lowercase())
}

/// Upper-case the first character, lower-case the rest
pub fn capitalize(value: &Value, _args: &FilterArgs) -> Value {
    let s = to_text(value);
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => text(first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()),
        None => text(String::new()),
    }
}

/// HTML-escape `& < > " '`
pub fn escape(value: &Value, _args: &FilterArgs) -> Value {
    let s = to_text(value);
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    text(out)
}

pub fn strip(value: &Value, _args: &FilterArgs) -> Value {
    text(to_text(value).trim().to_string())
}

/// Character count of strings, element count of arrays and objects
pub fn size(value: &Value, _args: &FilterArgs) -> Value {
    let len = match value {
        Value::String(s) => s.chars().count(),
        Value::Array(a) => a.len(),
        Value::Object(o) => o.len(),
        _ => 0,
    };
    Value::from(len)
}

pub fn append(value: &Value, args: &FilterArgs) -> Value {
    text(to_text(value) + &arg_text(args, 0))
}

pub fn prepend(value: &Value, args: &FilterArgs) -> Value {
    text(arg_text(args, 0) + &to_text(value))
}

/// Join array items with a separator (default: one space)
pub fn join(value: &Value, args: &FilterArgs) -> Value {
    let separator = args.arg(0).map(to_text).unwrap_or_else(|| " ".to_string());
    match value {
        Value::Array(items) => text(
            items
                .iter()
                .map(to_text)
                .collect::<Vec<_>>()
                .join(&separator),
        ),
        other => text(to_text(other)),
    }
}

fn arithmetic(value: &Value, args: &FilterArgs, op: fn(f64, f64) -> f64) -> Value {
    let rhs = args.arg(0).map(to_number).unwrap_or(0.0);
    number_value(op(to_number(value), rhs))
}

pub fn plus(value: &Value, args: &FilterArgs) -> Value {
    arithmetic(value, args, |a, b| a + b)
}

pub fn minus(value: &Value, args: &FilterArgs) -> Value {
    arithmetic(value, args, |a, b| a - b)
}

pub fn times(value: &Value, args: &FilterArgs) -> Value {
    arithmetic(value, args, |a, b| a * b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn one(arg: Value) -> FilterArgs {
        FilterArgs::from_positional([arg])
    }

    #[test]
    fn test_default_replaces_nil_false_and_empty() {
        let args = one(json!("n/a"));
        assert_eq!(default(&Value::Null, &args), json!("n/a"));
        assert_eq!(default(&json!(false), &args), json!("n/a"));
        assert_eq!(default(&json!(""), &args), json!("n/a"));
        assert_eq!(default(&json!([]), &args), json!("n/a"));
        assert_eq!(default(&json!("Hat"), &args), json!("Hat"));
        assert_eq!(default(&json!(0), &args), json!(0));
    }

    #[test]
    fn test_case_filters() {
        let none = FilterArgs::default();
        assert_eq!(upcase(&json!("sale"), &none), json!("SALE"));
        assert_eq!(downcase(&json!("SALE"), &none), json!("sale"));
        assert_eq!(capitalize(&json!("summer SALE"), &none), json!("Summer sale"));
        assert_eq!(capitalize(&json!(""), &none), json!(""));
    }

    #[test]
    fn test_escape_html() {
        let escaped = escape(&json!(r#"<a href="x">Tom & 'Jerry'</a>"#), &FilterArgs::default());
        assert_eq!(
            escaped,
            json!("&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;")
        );
    }

    #[test]
    fn test_size_counts() {
        let none = FilterArgs::default();
        assert_eq!(size(&json!("héllo"), &none), json!(5));
        assert_eq!(size(&json!([1, 2, 3]), &none), json!(3));
        assert_eq!(size(&Value::Null, &none), json!(0));
    }

    #[test]
    fn test_append_prepend_join() {
        assert_eq!(append(&json!("hat"), &one(json!(".jpg"))), json!("hat.jpg"));
        assert_eq!(prepend(&json!("hat"), &one(json!("/img/"))), json!("/img/hat"));
        assert_eq!(join(&json!(["a", "b"]), &one(json!(", "))), json!("a, b"));
        assert_eq!(join(&json!(["a", "b"]), &FilterArgs::default()), json!("a b"));
    }

    #[test]
    fn test_arithmetic_keeps_integers() {
        assert_eq!(plus(&json!(2), &one(json!(3))), json!(5));
        assert_eq!(minus(&json!("10"), &one(json!(4))), json!(6));
        assert_eq!(times(&json!(1.5), &one(json!(3))), json!(4.5));
    }
}
