//! Typed lookup over an event's ordered key/value attribute list.

use std::collections::HashMap;

use super::EventAttribute;

/// Key/value view of an event's attributes. Later duplicates overwrite earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    values: HashMap<String, String>,
}

impl Attributes {
    /// Fold the attribute list left to right.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let values = pairs
            .into_iter()
            .fold(HashMap::new(), |mut acc, (key, value)| {
                acc.insert(key.to_string(), value.to_string());
                acc
            });
        Attributes { values }
    }

    pub fn from_event_attributes(attributes: &[EventAttribute]) -> Self {
        Self::from_pairs(
            attributes
                .iter()
                .map(|attr| (attr.key.as_str(), attr.value.as_str())),
        )
    }

    /// Raw lookup. `Some("")` means the key was present with an empty value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Lookup that treats an empty value as absent.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
