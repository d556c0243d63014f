//! Recursive configuration namespaces
//!
//! A [`NestedNamespace`] is what a YAML or JSON document becomes when a task
//! asks for structured configuration: every mapping is a namespace, every
//! sequence is a `Vec` of decoded elements and scalars keep their natural type.
//! Values are reached either one level at a time ([`NestedNamespace::get`]) or
//! through a dotted path (`"trips.origin"`).

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A single value inside a namespace
#[derive(Debug, Clone, PartialEq)]
pub enum NamespaceValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<NamespaceValue>),
    Namespace(NestedNamespace),
}

impl NamespaceValue {
    /// Name of the value's kind, used in log lines and error messages
    pub fn kind(&self) -> &'static str {
        match self {
            NamespaceValue::Null => "null",
            NamespaceValue::Bool(_) => "boolean",
            NamespaceValue::Integer(_) => "integer",
            NamespaceValue::Float(_) => "float",
            NamespaceValue::String(_) => "string",
            NamespaceValue::Sequence(_) => "sequence",
            NamespaceValue::Namespace(_) => "namespace",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, NamespaceValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            NamespaceValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            NamespaceValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Integers widen to floats; nothing else converts
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NamespaceValue::Float(value) => Some(*value),
            NamespaceValue::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NamespaceValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[NamespaceValue]> {
        match self {
            NamespaceValue::Sequence(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_namespace(&self) -> Option<&NestedNamespace> {
        match self {
            NamespaceValue::Namespace(namespace) => Some(namespace),
            _ => None,
        }
    }

    /// Plain JSON view of this value
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            NamespaceValue::Null => serde_json::Value::Null,
            NamespaceValue::Bool(value) => serde_json::Value::Bool(*value),
            NamespaceValue::Integer(value) => serde_json::Value::from(*value),
            NamespaceValue::Float(value) => serde_json::Number::from_f64(*value)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            NamespaceValue::String(value) => serde_json::Value::String(value.clone()),
            NamespaceValue::Sequence(values) => {
                serde_json::Value::Array(values.iter().map(NamespaceValue::to_json).collect())
            }
            NamespaceValue::Namespace(namespace) => namespace.to_json(),
        }
    }
}

impl From<bool> for NamespaceValue {
    fn from(value: bool) -> Self {
        NamespaceValue::Bool(value)
    }
}

impl From<i64> for NamespaceValue {
    fn from(value: i64) -> Self {
        NamespaceValue::Integer(value)
    }
}

impl From<i32> for NamespaceValue {
    fn from(value: i32) -> Self {
        NamespaceValue::Integer(value.into())
    }
}

impl From<f64> for NamespaceValue {
    fn from(value: f64) -> Self {
        NamespaceValue::Float(value)
    }
}

impl From<&str> for NamespaceValue {
    fn from(value: &str) -> Self {
        NamespaceValue::String(value.to_string())
    }
}

impl From<String> for NamespaceValue {
    fn from(value: String) -> Self {
        NamespaceValue::String(value)
    }
}

impl From<NestedNamespace> for NamespaceValue {
    fn from(value: NestedNamespace) -> Self {
        NamespaceValue::Namespace(value)
    }
}

impl<T: Into<NamespaceValue>> From<Vec<T>> for NamespaceValue {
    fn from(values: Vec<T>) -> Self {
        NamespaceValue::Sequence(values.into_iter().map(Into::into).collect())
    }
}

/// Schema-less nested configuration object
///
/// Key order is not preserved; nesting is.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NestedNamespace {
    entries: BTreeMap<String, NamespaceValue>,
}

impl NestedNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<NamespaceValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Insert or replace a direct child, returning the previous value
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<NamespaceValue>,
    ) -> Option<NamespaceValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<NamespaceValue> {
        self.entries.remove(key)
    }

    /// Direct child lookup, no path splitting
    pub fn get(&self, key: &str) -> Option<&NamespaceValue> {
        self.entries.get(key)
    }

    /// Dotted path lookup: `"trips.origin"` descends through `trips`
    pub fn get_path(&self, path: &str) -> Option<&NamespaceValue> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.entries.get(first)?;
        for segment in segments {
            current = current.as_namespace()?.entries.get(segment)?;
        }
        Some(current)
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get_path(path).and_then(NamespaceValue::as_bool)
    }

    pub fn get_i64(&self, path: &str) -> Option<i64> {
        self.get_path(path).and_then(NamespaceValue::as_i64)
    }

    pub fn get_f64(&self, path: &str) -> Option<f64> {
        self.get_path(path).and_then(NamespaceValue::as_f64)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get_path(path).and_then(NamespaceValue::as_str)
    }

    pub fn get_sequence(&self, path: &str) -> Option<&[NamespaceValue]> {
        self.get_path(path).and_then(NamespaceValue::as_sequence)
    }

    pub fn get_namespace(&self, path: &str) -> Option<&NestedNamespace> {
        self.get_path(path).and_then(NamespaceValue::as_namespace)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NamespaceValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Plain nested-map view, sub-namespaces included
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect(),
        )
    }

    /// Convert into the underlying map, sub-namespaces stay namespaces
    pub fn into_map(self) -> BTreeMap<String, NamespaceValue> {
        self.entries
    }
}

impl FromIterator<(String, NamespaceValue)> for NestedNamespace {
    fn from_iter<I: IntoIterator<Item = (String, NamespaceValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Serialize for NamespaceValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NamespaceValue::Null => serializer.serialize_unit(),
            NamespaceValue::Bool(value) => serializer.serialize_bool(*value),
            NamespaceValue::Integer(value) => serializer.serialize_i64(*value),
            NamespaceValue::Float(value) => serializer.serialize_f64(*value),
            NamespaceValue::String(value) => serializer.serialize_str(value),
            NamespaceValue::Sequence(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            NamespaceValue::Namespace(namespace) => namespace.serialize(serializer),
        }
    }
}

impl Serialize for NestedNamespace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = NamespaceValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar, sequence or mapping")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(NamespaceValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(NamespaceValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        NamespaceValue::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
        Ok(NamespaceValue::Bool(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(NamespaceValue::Integer(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        // Values past i64::MAX cannot be an Integer
        Ok(i64::try_from(value)
            .map(NamespaceValue::Integer)
            .unwrap_or(NamespaceValue::Float(value as f64)))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Ok(NamespaceValue::Float(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(NamespaceValue::String(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(NamespaceValue::String(value))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(value) = seq.next_element()? {
            values.push(value);
        }
        Ok(NamespaceValue::Sequence(values))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
        NamespaceVisitor.visit_map(map).map(NamespaceValue::Namespace)
    }
}

impl<'de> Deserialize<'de> for NamespaceValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct NamespaceVisitor;

impl<'de> Visitor<'de> for NamespaceVisitor {
    type Value = NestedNamespace;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = BTreeMap::new();
        while let Some((ScalarKey(key), value)) = map.next_entry::<ScalarKey, NamespaceValue>()? {
            entries.insert(key, value);
        }
        Ok(NestedNamespace { entries })
    }
}

impl<'de> Deserialize<'de> for NestedNamespace {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(NamespaceVisitor)
    }
}

/// Mapping key; YAML allows scalar keys of any type, they are kept as text
struct ScalarKey(String);

impl<'de> Deserialize<'de> for ScalarKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeyVisitor;

        impl Visitor<'_> for KeyVisitor {
            type Value = ScalarKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a scalar mapping key")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<ScalarKey, E> {
                Ok(ScalarKey(value.to_string()))
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<ScalarKey, E> {
                Ok(ScalarKey(value))
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<ScalarKey, E> {
                Ok(ScalarKey(value.to_string()))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<ScalarKey, E> {
                Ok(ScalarKey(value.to_string()))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<ScalarKey, E> {
                Ok(ScalarKey(value.to_string()))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<ScalarKey, E> {
                Ok(ScalarKey(value.to_string()))
            }
        }

        deserializer.deserialize_any(KeyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NestedNamespace {
        NestedNamespace::new()
            .with("budget", 700)
            .with("ratio", 0.5)
            .with("tags", vec!["a", "b"])
            .with("trips", NestedNamespace::new().with("origin", "BUE"))
    }

    #[test]
    fn test_dotted_path_access() {
        let ns = sample();
        assert_eq!(ns.get_i64("budget"), Some(700));
        assert_eq!(ns.get_str("trips.origin"), Some("BUE"));
        assert_eq!(ns.get_path("trips.missing"), None);
        assert_eq!(ns.get_path("budget.origin"), None);
    }

    #[test]
    fn test_integer_widens_to_float_only_one_way() {
        let ns = sample();
        assert_eq!(ns.get_f64("budget"), Some(700.0));
        assert_eq!(ns.get_i64("ratio"), None);
    }

    #[test]
    fn test_to_json_is_recursive() {
        let json = sample().to_json();
        assert_eq!(json["trips"]["origin"], "BUE");
        assert_eq!(json["tags"][1], "b");
        assert_eq!(json["budget"], 700);
    }

    #[test]
    fn test_deserialize_json_scalars() {
        let ns: NestedNamespace = serde_json::from_str(
            r#"{"a": null, "b": true, "c": -3, "d": 2.5, "e": "x", "f": [1, {"g": 2}]}"#,
        )
        .unwrap();

        assert!(ns.get("a").unwrap().is_null());
        assert_eq!(ns.get_bool("b"), Some(true));
        assert_eq!(ns.get_i64("c"), Some(-3));
        assert_eq!(ns.get_f64("d"), Some(2.5));
        assert_eq!(ns.get_str("e"), Some("x"));
        let seq = ns.get_sequence("f").unwrap();
        assert_eq!(seq[0], NamespaceValue::Integer(1));
        assert_eq!(seq[1].as_namespace().unwrap().get_i64("g"), Some(2));
    }

    #[test]
    fn test_yaml_scalar_keys_become_text() {
        let ns: NestedNamespace = serde_yaml_ng::from_str("1: one\ntrue: yes\n").unwrap();
        assert_eq!(ns.get_str("1"), Some("one"));
        assert!(ns.contains_key("true"));
    }

    #[test]
    fn test_top_level_must_be_mapping() {
        let result: Result<NestedNamespace, _> = serde_json::from_str("[1, 2]");
        assert!(result.is_err());
    }

    #[test]
    fn test_huge_unsigned_becomes_float() {
        let ns: NestedNamespace = serde_json::from_str(r#"{"n": 18446744073709551615}"#).unwrap();
        assert_eq!(ns.get("n").unwrap().kind(), "float");
    }
}
