//! Immutable header collection of the internal message model.
//!
//! # Design
//! `Headers` is a value type: `put` and `without` return a new collection and
//! leave the receiver untouched, so a `Headers` handed to a request can never
//! change under it. Storage is an `Arc<IndexMap>` cloned on write, which keeps
//! plain clones cheap and preserves insertion order for iteration.
//!
//! Names are matched ASCII-case-insensitively. The first spelling seen for a
//! name is kept as its representative; later `put`s with a different spelling
//! replace only the value.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    value: String,
}

#[derive(Clone, Default)]
pub struct Headers {
    entries: Arc<IndexMap<String, Entry>>,
}

fn normalize(name: &str) -> String {
    name.to_ascii_lowercase()
}

impl Headers {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Return a copy of `self` with `name` set to `value`.
    pub fn put(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.insert(name.into(), value.into());
        next
    }

    /// Return a copy of `self` without `name`. Removal keeps the order of the
    /// remaining entries.
    pub fn without(&self, name: &str) -> Self {
        let key = normalize(name);
        if !self.entries.contains_key(&key) {
            return self.clone();
        }
        let mut next = self.clone();
        Arc::make_mut(&mut next.entries).shift_remove(&key);
        next
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(&normalize(name)).map(|e| e.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&normalize(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .map(|e| (e.name.as_str(), e.value.as_str()))
    }

    pub fn to_map(&self) -> HashMap<String, String> {
        self.iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    // Only used while a collection is still private to its builder.
    fn insert(&mut self, name: String, value: String) {
        let key = normalize(&name);
        let entries = Arc::make_mut(&mut self.entries);
        match entries.get_mut(&key) {
            Some(entry) => entry.value = value,
            None => {
                entries.insert(key, Entry { name, value });
            }
        }
    }
}

impl PartialEq for Headers {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(key, e)| other.entries.get(key).is_some_and(|o| o.value == e.value))
    }
}

impl Eq for Headers {}

impl fmt::Debug for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl From<HashMap<String, String>> for Headers {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::empty();
        for (name, value) in iter {
            headers.insert(name.into(), value.into());
        }
        headers
    }
}

impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HeadersVisitor;

        impl<'de> Visitor<'de> for HeadersVisitor {
            type Value = Headers;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of header names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Headers, A::Error> {
                let mut headers = Headers::empty();
                while let Some((name, value)) = access.next_entry::<String, String>()? {
                    headers.insert(name, value);
                }
                Ok(headers)
            }
        }

        deserializer.deserialize_map(HeadersVisitor)
    }
}
