//! Bounded attribute values and their type hints.
//!
//! Attributes of domain objects hold an [`AttrValue`]: text, integers,
//! booleans, or arbitrary structured objects built from those. There are no
//! floats; every value has total equality, hashing and ordering.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Value stored in a domain object attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Integer(i64),
    Text(String),
    List(Vec<AttrValue>),
    Object(BTreeMap<String, AttrValue>),
}

impl AttrValue {
    /// Name of the concrete kind, as used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            AttrValue::Null => "null",
            AttrValue::Bool(_) => "bool",
            AttrValue::Integer(_) => "integer",
            AttrValue::Text(_) => "text",
            AttrValue::List(_) => "list",
            AttrValue::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttrValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AttrValue]> {
        match self {
            AttrValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, AttrValue>> {
        match self {
            AttrValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Converts into a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            AttrValue::Null => serde_json::Value::Null,
            AttrValue::Bool(value) => serde_json::Value::Bool(*value),
            AttrValue::Integer(value) => serde_json::Value::from(*value),
            AttrValue::Text(text) => serde_json::Value::String(text.clone()),
            AttrValue::List(items) => {
                serde_json::Value::Array(items.iter().map(AttrValue::to_json).collect())
            }
            AttrValue::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Null => write!(f, "null"),
            AttrValue::Bool(value) => write!(f, "{value}"),
            AttrValue::Integer(value) => write!(f, "{value}"),
            AttrValue::Text(text) => write!(f, "{text:?}"),
            AttrValue::List(items) => {
                write!(f, "[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            AttrValue::Object(map) => {
                write!(f, "{{")?;
                for (idx, (key, value)) in map.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key:?}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Integer(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Integer(i64::from(value))
    }
}

impl From<u32> for AttrValue {
    fn from(value: u32) -> Self {
        AttrValue::Integer(i64::from(value))
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl<T: Into<AttrValue>> From<Vec<T>> for AttrValue {
    fn from(values: Vec<T>) -> Self {
        AttrValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(AttrValue::Null)
    }
}

impl From<BTreeMap<String, AttrValue>> for AttrValue {
    fn from(map: BTreeMap<String, AttrValue>) -> Self {
        AttrValue::Object(map)
    }
}

impl TryFrom<serde_json::Value> for AttrValue {
    type Error = String;

    /// Fails on numbers that are not representable as `i64`.
    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Ok(match value {
            serde_json::Value::Null => AttrValue::Null,
            serde_json::Value::Bool(value) => AttrValue::Bool(value),
            serde_json::Value::Number(number) => number
                .as_i64()
                .map(AttrValue::Integer)
                .ok_or_else(|| format!("number {number} is not an integer"))?,
            serde_json::Value::String(text) => AttrValue::Text(text),
            serde_json::Value::Array(items) => AttrValue::List(
                items
                    .into_iter()
                    .map(AttrValue::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            serde_json::Value::Object(map) => AttrValue::Object(
                map.into_iter()
                    .map(|(key, value)| AttrValue::try_from(value).map(|value| (key, value)))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }
}

/// Declared kind of an attribute (its type hint).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrKind {
    Any,
    Bool,
    Integer,
    Text,
    List,
    Object,
}

impl AttrKind {
    /// Whether a non-null value satisfies this kind.
    ///
    /// `Null` is never accepted here; optionality is decided per attribute.
    pub fn accepts(&self, value: &AttrValue) -> bool {
        match (self, value) {
            (_, AttrValue::Null) => false,
            (AttrKind::Any, _) => true,
            (AttrKind::Bool, AttrValue::Bool(_))
            | (AttrKind::Integer, AttrValue::Integer(_))
            | (AttrKind::Text, AttrValue::Text(_))
            | (AttrKind::List, AttrValue::List(_))
            | (AttrKind::Object, AttrValue::Object(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for AttrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttrKind::Any => "any",
            AttrKind::Bool => "bool",
            AttrKind::Integer => "integer",
            AttrKind::Text => "text",
            AttrKind::List => "list",
            AttrKind::Object => "object",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_acceptance() {
        assert!(AttrKind::Integer.accepts(&AttrValue::Integer(3)));
        assert!(!AttrKind::Integer.accepts(&AttrValue::from("3")));
        assert!(AttrKind::Any.accepts(&AttrValue::from(vec![1, 2])));
        assert!(!AttrKind::Any.accepts(&AttrValue::Null));
        assert!(AttrKind::Object.accepts(&AttrValue::Object(BTreeMap::new())));
    }

    #[test]
    fn test_display_quotes_text() {
        assert_eq!(AttrValue::from("EUR").to_string(), "\"EUR\"");
        assert_eq!(AttrValue::from(vec![1, 2]).to_string(), "[1, 2]");
        assert_eq!(AttrValue::from(None::<i64>).to_string(), "null");
    }

    #[test]
    fn test_json_conversion() {
        let value = AttrValue::try_from(json!({"tags": ["a", "b"], "count": 2, "live": true}))
            .unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map["count"], AttrValue::Integer(2));
        assert_eq!(map["live"], AttrValue::Bool(true));
        assert_eq!(value.to_json(), json!({"tags": ["a", "b"], "count": 2, "live": true}));

        assert!(AttrValue::try_from(json!(1.5)).is_err());
    }

    #[test]
    fn test_serde_untagged() {
        let json = serde_json::to_string(&AttrValue::from(vec!["x"])).unwrap();
        assert_eq!(json, "[\"x\"]");

        let parsed: AttrValue = serde_json::from_str("{\"n\": null}").unwrap();
        assert_eq!(parsed.as_object().unwrap()["n"], AttrValue::Null);
    }

    #[test]
    fn test_total_order() {
        let mut values = vec![AttrValue::from(3), AttrValue::from(1), AttrValue::from(2)];
        values.sort();
        assert_eq!(values, vec![AttrValue::from(1), AttrValue::from(2), AttrValue::from(3)]);
    }
}
