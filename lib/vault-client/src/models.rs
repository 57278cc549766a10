use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single value stored under a secret key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SecretValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<SecretValue>),
    Object(SecretEntry),
}

impl fmt::Display for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => f.write_str(s),
            Self::List(_) | Self::Object(_) => {
                let compact = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&compact)
            }
        }
    }
}

impl From<&str> for SecretValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for SecretValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Key/value payload of a KV v2 secret.
///
/// Keys keep the order in which the store returned them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecretEntry {
    fields: Vec<(String, SecretValue)>,
}

impl SecretEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payload holding exactly one key, as built by the write actions
    pub fn single(key: impl Into<String>, value: impl Into<SecretValue>) -> Self {
        let mut entry = Self::new();
        entry.insert(key, value);
        entry
    }

    /// Insert or replace a key, keeping the position of an existing key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SecretValue>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&SecretValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SecretValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<SecretValue>> FromIterator<(K, V)> for SecretEntry {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut entry = Self::new();
        for (k, v) in iter {
            entry.insert(k, v);
        }
        entry
    }
}

impl Serialize for SecretEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SecretEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntryVisitor;

        impl<'de> Visitor<'de> for EntryVisitor {
            type Value = SecretEntry;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object of secret fields")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entry = SecretEntry::new();
                while let Some((key, value)) = access.next_entry::<String, SecretValue>()? {
                    entry.insert(key, value);
                }
                Ok(entry)
            }
        }

        deserializer.deserialize_map(EntryVisitor)
    }
}

/// `LIST .../metadata/{path}` response envelope
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse {
    pub data: ListData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListData {
    pub keys: Vec<String>,
}

/// `GET .../data/{path}` response envelope
#[derive(Debug, Deserialize)]
pub(crate) struct ReadResponse {
    pub data: ReadData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReadData {
    pub data: SecretEntry,
}

#[derive(Debug, Serialize)]
pub(crate) struct WriteRequest<'a> {
    pub data: &'a SecretEntry,
}

/// Body of the `errors` array Vault attaches to failed requests
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub errors: Vec<String>,
}
