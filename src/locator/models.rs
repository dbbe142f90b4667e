//! Data models for store-locator markers and API payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Marker field holding the store identifier.
pub const ID_FIELD: &str = "id";
/// Marker field holding the ISO country code.
pub const COUNTRY_FIELD: &str = "country";
/// Marker field holding the store's profile markup.
pub const STORE_HTML_FIELD: &str = "store_html";
pub const WEBSITE_URL_FIELD: &str = "website_url";
pub const MAPS_URL_FIELD: &str = "maps_url";
pub const AFFILIATE_FIELD: &str = "has_enabled_affiliate";

/// One store location as returned by the map search, enriched in place.
///
/// The key set is open: whatever the locator sends is kept, and detail
/// payloads are merged on top without overwriting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Marker(Map<String, Value>);

impl Marker {
    /// Creates an empty marker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the identifier, accepting both string and numeric ids.
    pub fn id(&self) -> Option<String> {
        match self.0.get(ID_FIELD)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Returns the country code if present as a string.
    pub fn country(&self) -> Option<&str> {
        self.0.get(COUNTRY_FIELD).and_then(Value::as_str)
    }

    /// Returns the embedded profile markup, empty if absent.
    pub fn store_html(&self) -> &str {
        self.0.get(STORE_HTML_FIELD).and_then(Value::as_str).unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Sets a field, replacing any existing value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Copies every field of `detail` that the marker does not already have.
    ///
    /// Returns the number of fields added.
    pub fn fill_missing(&mut self, detail: Map<String, Value>) -> usize {
        let mut added = 0;
        for (key, value) in detail {
            if !self.0.contains_key(&key) {
                self.0.insert(key, value);
                added += 1;
            }
        }
        added
    }

    /// Renders a field as a flat text cell; missing and null fields are empty.
    pub fn cell(&self, key: &str) -> String {
        match self.0.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => other.to_string(),
        }
    }
}

impl From<Map<String, Value>> for Marker {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Body of the map search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkersResponse {
    pub markers: Vec<Marker>,
}

/// Links pulled out of a store's profile markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreLinks {
    pub website_url: String,
    pub maps_url: String,
}
