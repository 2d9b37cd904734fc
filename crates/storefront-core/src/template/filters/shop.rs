//! Storefront markup filters: `money`, `image_tag`, `img_url`

use super::FilterArgs;
use crate::config::consts::money::{CURRENCY_SYMBOL, MINOR_UNITS};
use crate::template::value::{is_present, to_number, to_text};
use serde_json::Value;

/// `{{ product.price | money }}` → `£12.50` for a price of 1250 minor units
pub fn money(value: &Value, _args: &FilterArgs) -> Value {
    if value.is_null() {
        return Value::String(String::new());
    }
    Value::String(format_money(to_number(value)))
}

/// Format an amount given in minor units with two decimals and the currency symbol
pub fn format_money(minor_units: f64) -> String {
    let amount = minor_units / MINOR_UNITS;
    if amount.is_nan() {
        return format!("{}NaN", CURRENCY_SYMBOL);
    }
    if amount.is_infinite() {
        let sign = if amount < 0.0 { "-" } else { "" };
        return format!("{}{}Infinity", CURRENCY_SYMBOL, sign);
    }
    format!("{}{}", CURRENCY_SYMBOL, to_fixed_2(amount))
}

/// Two-decimal rendering of a finite amount
///
/// Rounds the exact binary value, ties going away from zero, so `0.125`
/// gives `0.13` while `1.005` (stored just below) gives `1.00`. Magnitudes
/// from `1e21` up use exponent notation.
fn to_fixed_2(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let magnitude = amount.abs();
    if magnitude >= 1e21 {
        return format!("{}{}", sign, format!("{:e}", magnitude).replace('e', "e+"));
    }

    // 1074 fractional digits spell out any f64 exactly
    let exact = format!("{:.1074}", magnitude);
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let fraction = fraction.as_bytes();

    let mut digits: Vec<u8> = whole.bytes().collect();
    digits.extend((0..2).map(|i| fraction.get(i).copied().unwrap_or(b'0')));
    if fraction.get(2).is_some_and(|d| *d >= b'5') {
        increment(&mut digits);
    }

    let split = digits.len() - 2;
    let text: String = digits.iter().map(|&d| char::from(d)).collect();
    format!("{}{}.{}", sign, &text[..split], &text[split..])
}

/// Add one to a string of ASCII digits
fn increment(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// Optional attributes accepted by `image_tag`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageTagOptions {
    pub alt: Option<String>,
    pub class: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
}

impl ImageTagOptions {
    /// Fold `[key, value]` pairs into options; later pairs win, unknown keys are ignored
    ///
    /// `alt` counts as supplied unless it is `nil`. The other attributes are
    /// only kept when their value is present (non-empty, non-zero).
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a Value)>,
    {
        let mut options = Self::default();
        for (key, value) in pairs {
            match key {
                "alt" if !value.is_null() => options.alt = Some(to_text(value)),
                "alt" => options.alt = None,
                "class" => options.class = present_text(value),
                "width" => options.width = present_text(value),
                "height" => options.height = present_text(value),
                _ => {}
            }
        }
        options
    }
}

fn present_text(value: &Value) -> Option<String> {
    is_present(value).then(|| to_text(value))
}

/// `{{ image | image_tag: alt: 'Hat', class: 'w-full' }}`
pub fn image_tag(value: &Value, args: &FilterArgs) -> Value {
    if !is_present(value) {
        return Value::String(String::new());
    }
    let options =
        ImageTagOptions::from_pairs(args.keyword.iter().map(|(k, v)| (k.as_str(), v)));
    Value::String(render_image_tag(&to_text(value), &options))
}

/// Assemble `<img>` markup with the fixed attribute order
/// src, alt, class, width, height, loading
pub fn render_image_tag(url: &str, options: &ImageTagOptions) -> String {
    let mut attributes = vec![
        format!(r#"src="{}""#, url),
        format!(r#"alt="{}""#, options.alt.as_deref().unwrap_or("")),
    ];

    if let Some(class) = &options.class {
        attributes.push(format!(r#"class="{}""#, class));
    }
    if let Some(width) = &options.width {
        attributes.push(format!(r#"width="{}""#, width));
    }
    if let Some(height) = &options.height {
        attributes.push(format!(r#"height="{}""#, height));
    }

    attributes.push(r#"loading="lazy""#.to_string());

    format!("<img {}>", attributes.join(" "))
}

/// `{{ product.featured_image | img_url: '100x100' }}`
///
/// Sizes are not applied; the URL comes back unchanged.
pub fn img_url(value: &Value, _args: &FilterArgs) -> Value {
    if !is_present(value) {
        return Value::String(String::new());
    }
    value.clone()
}
