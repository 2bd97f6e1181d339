//! Tolerant field access over untyped JSON documents.
//!
//! Server responses routinely omit optional fields or send them as `null`.
//! `Fields` treats both the same way and hands back the caller's default,
//! so each record mapper reads as a flat list of `field -> default` lines.

use serde_json::{Map, Value};

pub type JsonObject = Map<String, Value>;

/// Read-only view over one JSON object. A non-object document behaves like
/// an empty object.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    map: Option<&'a JsonObject>,
}

impl<'a> Fields<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self {
            map: value.as_object(),
        }
    }

    /// The value under `key`, with `null` treated as absent.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map?.get(key).filter(|v| !v.is_null())
    }

    /// First present key among `keys`.
    pub fn first(&self, keys: &[&str]) -> Option<&'a Value> {
        keys.iter().find_map(|key| self.get(key))
    }

    pub fn opt_str(&self, key: &str) -> Option<String> {
        self.get(key).and_then(Value::as_str).map(str::to_string)
    }

    pub fn str_or(&self, key: &str, default: &str) -> String {
        self.opt_str(key).unwrap_or_else(|| default.to_string())
    }

    /// String field defaulting to empty.
    pub fn string(&self, key: &str) -> String {
        self.str_or(key, "")
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    pub fn opt_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| {
            v.as_i64()
                .or_else(|| v.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
        })
    }

    pub fn i64_or(&self, key: &str, default: i64) -> i64 {
        self.opt_i64(key).unwrap_or(default)
    }

    pub fn opt_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn f64_or(&self, key: &str, default: f64) -> f64 {
        self.opt_f64(key).unwrap_or(default)
    }

    pub fn opt_object(&self, key: &str) -> Option<JsonObject> {
        self.get(key).and_then(Value::as_object).cloned()
    }

    /// Object field defaulting to empty.
    pub fn object(&self, key: &str) -> JsonObject {
        self.opt_object(key).unwrap_or_default()
    }

    /// Any present value, cloned as-is.
    pub fn raw(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }

    pub fn opt_strings(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
    }

    /// String array defaulting to empty.
    pub fn strings(&self, key: &str) -> Vec<String> {
        self.opt_strings(key).unwrap_or_default()
    }

    pub fn opt_objects(&self, key: &str) -> Option<Vec<JsonObject>> {
        self.get(key).and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(Value::as_object)
                .cloned()
                .collect()
        })
    }

    /// Array of nested records, mapped with `f`. Defaults to empty.
    pub fn records<T>(&self, key: &str, f: impl Fn(&Value) -> T) -> Vec<T> {
        self.get(key)
            .and_then(Value::as_array)
            .map(|items| items.iter().map(f).collect())
            .unwrap_or_default()
    }
}

/// Map a top-level array response; anything else yields an empty list.
pub fn list<T>(value: &Value, f: impl Fn(&Value) -> T) -> Vec<T> {
    value
        .as_array()
        .map(|items| items.iter().map(f).collect())
        .unwrap_or_default()
}
