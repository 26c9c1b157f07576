//! Relay list input definitions

use std::fmt;

use serde::de::{
    MapAccess,
    Visitor,
};
use serde::{
    Deserialize,
    Deserializer,
};
use serde_json::Value;

/// Location key -> raw location object, in document order.
///
/// Repeated keys are kept so that duplicates can be reported instead of
/// silently overwritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawLocations(Vec<(String, Value)>);

impl RawLocations {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, key: impl Into<String>, value: Value) {
        self.0.push((key.into(), value));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for RawLocations {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(key, value)| (key.into(), value)).collect())
    }
}

impl<'de> Deserialize<'de> for RawLocations {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawLocations;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of location keys to locations")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or_default());
                while let Some(entry) = map.next_entry::<String, Value>()? {
                    entries.push(entry);
                }
                Ok(RawLocations(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Relay list API response. Only `locations` is used.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayList {
    pub locations: RawLocations,
}

/// A single entry of `locations`. Other fields (coordinates) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawLocation {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl RawLocation {
    /// Parse a raw entry; `None` when it is not an object of the expected shape.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        Self::deserialize(value).ok()
    }
}
