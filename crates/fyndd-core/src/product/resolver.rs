//! Ordered candidate-list field resolution.
//!
//! Backend payloads name the same field in several ways (`id`, `_id`,
//! `productId`, ...). A [`FieldResolver`] holds the candidate keys for one
//! field in priority order and returns the first one that is present with a
//! usable value. "Present" means the key exists and is not `null`; each
//! typed accessor additionally skips values it cannot interpret, so a blank
//! string under `id` falls through to `_id`.

use serde_json::{Map, Value};

/// Candidate keys for a single logical field, highest priority first.
#[derive(Debug, Clone, Copy)]
pub struct FieldResolver {
    candidates: &'static [&'static str],
}

impl FieldResolver {
    pub const fn new(candidates: &'static [&'static str]) -> Self {
        Self { candidates }
    }

    pub fn candidates(&self) -> &'static [&'static str] {
        self.candidates
    }

    /// Returns the first raw value that is present and not null.
    pub fn raw<'a>(&self, object: &'a Map<String, Value>) -> Option<&'a Value> {
        self.candidates
            .iter()
            .filter_map(|key| object.get(*key))
            .find(|value| !value.is_null())
    }

    /// First candidate that yields a non-blank string.
    ///
    /// Numbers are accepted and stringified, which is how numeric ids arrive
    /// from some endpoints. Objects with a `name` field (e.g. `brand: {name}`)
    /// resolve to that name.
    pub fn string(&self, object: &Map<String, Value>) -> Option<String> {
        self.first_map(object, as_text)
    }

    /// First candidate that yields a finite number (numeric strings allowed).
    pub fn number(&self, object: &Map<String, Value>) -> Option<f64> {
        self.first_map(object, as_number)
    }

    /// First candidate that yields a whole, non-negative count.
    pub fn count(&self, object: &Map<String, Value>) -> Option<u64> {
        self.first_map(object, |value| {
            as_number(value).filter(|n| *n >= 0.0).map(|n| n.round() as u64)
        })
    }

    /// First candidate that yields a boolean (`"true"`/`"false"` and 0/1 allowed).
    pub fn boolean(&self, object: &Map<String, Value>) -> Option<bool> {
        self.first_map(object, as_bool)
    }

    /// First candidate that yields a non-empty list of non-blank strings.
    pub fn string_list(&self, object: &Map<String, Value>) -> Option<Vec<String>> {
        self.first_map(object, |value| {
            let list: Vec<String> = value.as_array()?.iter().filter_map(as_text).collect();
            (!list.is_empty()).then_some(list)
        })
    }

    fn first_map<T>(
        &self,
        object: &Map<String, Value>,
        f: impl Fn(&Value) -> Option<T>,
    ) -> Option<T> {
        self.candidates
            .iter()
            .filter_map(|key| object.get(*key))
            .find_map(f)
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(inner) => inner.get("name").and_then(as_text),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        Value::Object(inner) => inner.get("rate").and_then(as_number),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
