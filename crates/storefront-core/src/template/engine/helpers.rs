//! Helper functions for template rendering

use crate::template::error::TemplateError;
use crate::template::value::display_number;
use serde_json::{Map, Value};

use super::expr::{CompareOp, Segment, VariablePath};

/// Variable lookup chain: loop frames (innermost first), then assigns, then context data
pub(crate) struct Scope<'a> {
    data: &'a Value,
    assigns: Map<String, Value>,
    frames: Vec<Map<String, Value>>,
}

impl<'a> Scope<'a> {
    pub fn new(data: &'a Value) -> Self {
        Self {
            data,
            assigns: Map::new(),
            frames: Vec::new(),
        }
    }

    pub fn push_frame(&mut self, frame: Map<String, Value>) {
        self.frames.push(frame);
    }

    pub fn pop_frame(&mut self) {
        self.frames.pop();
    }

    /// `assign` writes to the outermost scope so values survive loops
    pub fn assign(&mut self, name: &str, value: Value) {
        self.assigns.insert(name.to_string(), value);
    }

    fn lookup_root(&self, name: &str) -> Option<&Value> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name))
            .or_else(|| self.assigns.get(name))
            .or_else(|| match self.data {
                Value::Object(map) => map.get(name),
                _ => None,
            })
    }

    /// Resolve a variable path, `None` when any step is missing
    pub fn resolve(&self, path: &VariablePath) -> Option<Value> {
        let mut current = self.lookup_root(&path.root)?.clone();
        for segment in &path.segments {
            current = step(&current, segment)?;
        }
        Some(current)
    }
}

/// Follow one path segment, including the virtual `size`, `first` and `last` properties
fn step(value: &Value, segment: &Segment) -> Option<Value> {
    match (value, segment) {
        (Value::Object(map), Segment::Key(key)) => match map.get(key) {
            Some(v) => Some(v.clone()),
            None if key == "size" => Some(Value::from(map.len())),
            None => None,
        },
        (Value::Array(items), Segment::Key(key)) => match key.as_str() {
            "size" => Some(Value::from(items.len())),
            "first" => items.first().cloned(),
            "last" => items.last().cloned(),
            _ => None,
        },
        (Value::String(s), Segment::Key(key)) if key == "size" => {
            Some(Value::from(s.chars().count()))
        }
        (Value::Array(items), Segment::Index(index)) => {
            let len = items.len() as i64;
            let resolved = if *index < 0 { len + index } else { *index };
            usize::try_from(resolved)
                .ok()
                .and_then(|i| items.get(i))
                .cloned()
        }
        _ => None,
    }
}

/// Stringify a value for an output tag
pub(crate) fn stringify_value(value: &Value, key: &str) -> Result<String, TemplateError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(match n.as_i64() {
            Some(i) => i.to_string(),
            None => display_number(n.as_f64().unwrap_or(f64::NAN)),
        }),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Array(_) => Err(TemplateError::ArrayInOutput {
            key: key.to_string(),
        }),
        Value::Object(_) => Err(TemplateError::ObjectInOutput {
            key: key.to_string(),
        }),
    }
}

/// Evaluate a comparison between two resolved operands
pub(crate) fn compare(left: &Value, op: CompareOp, right: &Value) -> bool {
    match op {
        CompareOp::Eq => values_equal(left, right),
        CompareOp::Ne => !values_equal(left, right),
        CompareOp::Lt => numeric_pair(left, right).is_some_and(|(a, b)| a < b),
        CompareOp::Le => numeric_pair(left, right).is_some_and(|(a, b)| a <= b),
        CompareOp::Gt => numeric_pair(left, right).is_some_and(|(a, b)| a > b),
        CompareOp::Ge => numeric_pair(left, right).is_some_and(|(a, b)| a >= b),
        CompareOp::Contains => match (left, right) {
            (Value::String(haystack), Value::String(needle)) => haystack.contains(needle.as_str()),
            (Value::Array(items), needle) => items.iter().any(|item| values_equal(item, needle)),
            (Value::Object(map), Value::String(key)) => map.contains_key(key),
            _ => false,
        },
    }
}

/// Equality where numbers compare by value (`1 == 1.0`)
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => left == right,
    }
}

fn numeric_pair(left: &Value, right: &Value) -> Option<(f64, f64)> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Some((a.as_f64()?, b.as_f64()?)),
        (Value::String(a), Value::String(b)) => {
            // Strings order lexicographically; map to a comparable pair
            Some(match a.cmp(b) {
                std::cmp::Ordering::Less => (0.0, 1.0),
                std::cmp::Ordering::Equal => (0.0, 0.0),
                std::cmp::Ordering::Greater => (1.0, 0.0),
            })
        }
        _ => None,
    }
}

/// Turn a for-loop subject into its items
pub(crate) fn iterable_items(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| Value::Array(vec![Value::String(k.clone()), v.clone()]))
            .collect(),
        Value::Null => Vec::new(),
        other => vec![other.clone()],
    }
}

/// `forloop` object exposed inside for-loop bodies
pub(crate) fn forloop_object(index0: usize, length: usize) -> Value {
    let mut map = Map::new();
    map.insert("index".into(), Value::from(index0 + 1));
    map.insert("index0".into(), Value::from(index0));
    map.insert("rindex".into(), Value::from(length - index0));
    map.insert("first".into(), Value::Bool(index0 == 0));
    map.insert("last".into(), Value::Bool(index0 + 1 == length));
    map.insert("length".into(), Value::from(length));
    Value::Object(map)
}
