//! Field value classifier
//!
//! Every CSV field becomes exactly one [`Value`]. Quoted fields are unescaped
//! first and then go through the same ordered heuristic as unquoted ones:
//!
//! 1. empty after trimming, or `null` (any case) → `Null`
//! 2. `true` / `false` (any case) → `Boolean`
//! 3. `-?digits` → `Integer`, `-?digits.digits` → `Float`
//! 4. anything else → `String` (trimmed)
//!
//! Classification is total; it never fails.

use serde::Serialize;

use crate::parser::ast::FieldNode;

/// Classified field value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to serde_json::Value. Non-finite floats become null.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Integer(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

/// Classify the text of a field
pub fn classify(text: &str) -> Value {
    let text = text.trim();

    if text.is_empty() || text.eq_ignore_ascii_case("null") {
        return Value::Null;
    }
    if text.eq_ignore_ascii_case("true") {
        return Value::Boolean(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return Value::Boolean(false);
    }

    match numeric_shape(text) {
        Some(NumericShape::Integer) => match text.parse::<i64>() {
            Ok(n) => Value::Integer(n),
            // out of i64 range; keep it numeric
            Err(_) => text
                .parse::<f64>()
                .map(Value::Float)
                .unwrap_or_else(|_| Value::String(text.to_string())),
        },
        Some(NumericShape::Float) => text
            .parse::<f64>()
            .map(Value::Float)
            .unwrap_or_else(|_| Value::String(text.to_string())),
        None => Value::String(text.to_string()),
    }
}

enum NumericShape {
    Integer,
    Float,
}

/// `-?digits` or `-?digits.digits`, ASCII digits only
fn numeric_shape(text: &str) -> Option<NumericShape> {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    match unsigned.split_once('.') {
        None if all_digits(unsigned) => Some(NumericShape::Integer),
        Some((whole, fraction)) if all_digits(whole) && all_digits(fraction) => {
            Some(NumericShape::Float)
        }
        _ => None,
    }
}

/// Literal text of a quoted field: outer quotes stripped, `""` → `"`
pub fn unescape_quoted(raw: &str) -> String {
    let inner = raw.strip_prefix('"').unwrap_or(raw);
    let inner = inner.strip_suffix('"').unwrap_or(inner);
    inner.replace("\"\"", "\"")
}

/// Quoted-field form of a literal: inner `"` doubled, outer quotes added
pub fn escape_quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// Classify a parsed field node
pub fn field_value(field: &FieldNode) -> Value {
    match field {
        FieldNode::Quoted(raw) => classify(&unescape_quoted(&raw.value)),
        FieldNode::Unquoted(text) => classify(&text.value),
        FieldNode::Empty(_) => Value::Null,
    }
}
