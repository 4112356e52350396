//! The opaque attribute bag carried by every field instance.
//!
//! The registry never looks inside a bag. Each field kind decodes it into its
//! own typed attribute struct inside its render and validate functions.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{FieldsError, Result};

/// A type-specific key/value bag.
///
/// Cloning a bag is a deep copy, so a bag handed out as a template can never
/// alias the bag of a constructed instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeBag(Map<String, Value>);

impl AttributeBag {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Encode a typed attribute struct into a bag.
    ///
    /// The struct must serialize to a JSON object.
    pub fn from_typed<T: Serialize>(type_tag: &str, attrs: &T) -> Result<Self> {
        match serde_json::to_value(attrs)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(FieldsError::InvalidAttributes {
                type_tag: type_tag.to_string(),
                message: format!("expected an object, got {other}"),
            }),
        }
    }

    /// Decode the bag into the typed attribute struct of `type_tag`.
    pub fn decode<T: DeserializeOwned>(&self, type_tag: &str) -> Result<T> {
        serde_json::from_value(Value::Object(self.0.clone())).map_err(|e| {
            FieldsError::InvalidAttributes {
                type_tag: type_tag.to_string(),
                message: e.to_string(),
            }
        })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value of `key`, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Boolean value of `key`, if present and a bool.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the bag into a plain JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for AttributeBag {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for AttributeBag {
    type Error = FieldsError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(FieldsError::InvalidAttributes {
                type_tag: String::new(),
                message: format!("expected an object, got {other}"),
            }),
        }
    }
}
