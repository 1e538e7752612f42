//! Scoring API response types.
//!
//! Only the fields a bulk run consumes are modelled. Both the company and the
//! person endpoints wrap their result in
//! `{"properties": {"customer_fit": {...}}}`; anything else in the body is
//! ignored.

use serde::Deserialize;
use serde_json::Value;

/// Top-level response body for `companies` and `persons` lookups.
#[derive(Debug, Deserialize)]
pub struct ScoreResponse {
    pub properties: Properties,
}

#[derive(Debug, Deserialize)]
pub struct Properties {
    pub customer_fit: CustomerFit,
}

/// Segment, score, and top signals for one domain or person.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomerFit {
    pub segment: String,
    /// Kept as a JSON number so it renders exactly as the API sent it.
    pub score: serde_json::Number,
    #[serde(default)]
    pub top_signals: Option<Vec<Signal>>,
}

impl CustomerFit {
    /// Top signals in API order; empty when the field is absent or `null`.
    #[must_use]
    pub fn signals(&self) -> &[Signal] {
        self.top_signals.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Positive,
    Negative,
    #[serde(other)]
    Other,
}

/// A named factor that pushed the score up or down.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Signal {
    #[serde(rename = "type")]
    pub kind: SignalKind,
    pub name: String,
    #[serde(default)]
    pub value: Option<Value>,
}

impl Signal {
    /// Plain-text value, or `None` when the value is absent or falsy
    /// (`null`, `""`, `0`, `false`, empty array or object).
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn value_text(&self) -> Option<String> {
        match self.value.as_ref()? {
            Value::Null | Value::Bool(false) => None,
            Value::Bool(true) => Some("true".to_string()),
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::Number(n) => Some(n.to_string()),
            Value::Array(items) if items.is_empty() => None,
            Value::Object(map) if map.is_empty() => None,
            other => Some(other.to_string()),
        }
    }
}
