// Lenient decoding of backend-reported values
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A status or severity as the backend sent it. Values no variant of `T`
/// covers are kept verbatim in `Other`, so one odd record never fails the
/// whole list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reported<T> {
    Known(T),
    Other(String),
}

impl<T> Reported<T> {
    pub fn known(&self) -> Option<&T> {
        match self {
            Reported::Known(value) => Some(value),
            Reported::Other(_) => None,
        }
    }
}

impl<T: PartialEq> Reported<T> {
    pub fn is(&self, value: T) -> bool {
        self.known() == Some(&value)
    }
}

impl<T: FromStr> Reported<T> {
    /// Matching is case-insensitive through each enum's `FromStr`
    pub fn parse(raw: &str) -> Self {
        raw.trim()
            .parse()
            .map(Reported::Known)
            .unwrap_or_else(|_| Reported::Other(raw.to_string()))
    }
}

/// A missing status decodes as an empty `Other`
impl<T> Default for Reported<T> {
    fn default() -> Self {
        Reported::Other(String::new())
    }
}

impl<T> From<T> for Reported<T> {
    fn from(value: T) -> Self {
        Reported::Known(value)
    }
}

impl<T: fmt::Display> fmt::Display for Reported<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reported::Known(value) => fmt::Display::fmt(value, f),
            Reported::Other(raw) => f.write_str(raw),
        }
    }
}

impl<'de, T: FromStr> Deserialize<'de> for Reported<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Reported::<T>::parse).unwrap_or_default())
    }
}

impl<T: fmt::Display> Serialize for Reported<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

/// Record ids arrive as strings from most endpoints and as integers from
/// some; both are kept as text.
pub fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}
