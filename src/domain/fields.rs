//! Ordered attribute storage shared by value objects and entities.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use super::value::AttrValue;

/// Attribute values of one instance, in declaration order.
///
/// Equality, hashing and ordering walk the entries in declaration order, so
/// two instances of the same type compare field by field like a tuple.
#[derive(Debug, Clone, Default)]
pub struct Fields(IndexMap<String, AttrValue>);

impl Fields {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity(capacity))
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: AttrValue) {
        self.0.insert(name.into(), value);
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut AttrValue> {
        self.0.get_mut(name)
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &AttrValue> {
        self.0.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect(),
        )
    }
}

impl PartialEq for Fields {
    fn eq(&self, other: &Self) -> bool {
        self.0.iter().eq(other.0.iter())
    }
}

impl Eq for Fields {}

impl Hash for Fields {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.0.len());
        for (name, value) in &self.0 {
            name.hash(state);
            value.hash(state);
        }
    }
}

impl PartialOrd for Fields {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fields {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.iter().cmp(other.0.iter())
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = (&'a String, &'a AttrValue);
    type IntoIter = indexmap::map::Iter<'a, String, AttrValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, i64)]) -> Fields {
        let mut fields = Fields::with_capacity(pairs.len());
        for (name, value) in pairs {
            fields.insert(*name, AttrValue::Integer(*value));
        }
        fields
    }

    #[test]
    fn test_declaration_order_preserved() {
        let f = fields(&[("y", 1), ("x", 2)]);
        assert_eq!(f.names().collect::<Vec<_>>(), vec!["y", "x"]);
        assert_eq!(serde_json::to_string(&f).unwrap(), "{\"y\":1,\"x\":2}");
    }

    #[test]
    fn test_tuple_like_ordering() {
        assert!(fields(&[("x", 1), ("y", 9)]) < fields(&[("x", 2), ("y", 0)]));
        assert!(fields(&[("x", 1), ("y", 1)]) < fields(&[("x", 1), ("y", 2)]));
        assert_eq!(
            fields(&[("x", 1)]).cmp(&fields(&[("x", 1)])),
            Ordering::Equal
        );
    }
}
