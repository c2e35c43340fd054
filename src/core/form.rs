//! Untyped form input
//!
//! Form submissions arrive as a flat mapping of field names to strings. A
//! field that was not submitted at all is absent, which is distinct from a
//! field submitted empty. When a field name repeats, the first value wins.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

/// Raw field values of a submitted form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormData {
    fields: HashMap<String, String>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly useful in tests and demos
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a field, replacing any previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Set a field unless it is already present; returns whether it was set
    fn insert_first(&mut self, name: String, value: String) -> bool {
        match self.fields.entry(name) {
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Get a field value, `None` when the field was not submitted
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<HashMap<String, String>> for FormData {
    fn from(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }
}

impl<K, V> FromIterator<(K, V)> for FormData
where
    K: Into<String>,
    V: Into<String>,
{
    /// Repeated names keep their first value
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = Self::new();
        for (name, value) in iter {
            form.insert_first(name.into(), value.into());
        }
        form
    }
}

struct FormDataVisitor;

impl<'de> Visitor<'de> for FormDataVisitor {
    type Value = FormData;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of form field names to string values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FormData, A::Error> {
        let mut form = FormData::new();
        while let Some((name, value)) = access.next_entry::<String, String>()? {
            if !form.insert_first(name, value) {
                tracing::debug!("Ignoring repeated form field");
            }
        }
        Ok(form)
    }
}

impl<'de> Deserialize<'de> for FormData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FormDataVisitor)
    }
}
