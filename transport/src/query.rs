use serde::Serialize;
use serde_json::Value;

/// Query parameters with the canonical filtering policy applied on insert:
/// `None`, JSON null and empty strings never become a `key=` segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds params from any serializable object (typically a filter struct).
    /// Keys come out in serializer order; arrays are joined with commas.
    pub fn from_serializable<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        let mut params = Self::new();
        if let Value::Object(map) = serde_json::to_value(value)? {
            for (key, value) in map {
                params.push_value(&key, &value);
            }
        }
        Ok(params)
    }

    pub fn with(mut self, key: &str, value: impl QueryValue) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: &str, value: impl QueryValue) {
        if let Some(value) = value.into_query_value() {
            if !value.is_empty() {
                self.pairs.push((key.to_string(), value));
            }
        }
    }

    /// Appends every pair of `other`, skipping keys already present.
    pub fn merge(&mut self, other: QueryParams) {
        for (key, value) in other.pairs {
            if !self.contains(&key) {
                self.pairs.push((key, value));
            }
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    fn push_value(&mut self, key: &str, value: &Value) {
        match value {
            Value::Null => {}
            Value::String(s) => self.push(key, s.as_str()),
            Value::Bool(b) => self.push(key, *b),
            Value::Number(n) => self.push(key, n.to_string()),
            Value::Array(items) => {
                let joined = items
                    .iter()
                    .filter_map(|item| match item {
                        Value::Null => None,
                        Value::String(s) if s.is_empty() => None,
                        Value::String(s) => Some(s.clone()),
                        other => Some(other.to_string()),
                    })
                    .collect::<Vec<_>>()
                    .join(",");
                self.push(key, joined);
            }
            Value::Object(_) => self.push(key, value.to_string()),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// `key=encodeURIComponent(value)` pairs joined by `&`, without a leading `?`.
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", encode_uri_component(k), encode_uri_component(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Values that can appear in a query string. `None` means "omit".
pub trait QueryValue {
    fn into_query_value(self) -> Option<String>;
}

impl QueryValue for &str {
    fn into_query_value(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl QueryValue for String {
    fn into_query_value(self) -> Option<String> {
        Some(self)
    }
}

impl QueryValue for &String {
    fn into_query_value(self) -> Option<String> {
        Some(self.clone())
    }
}

macro_rules! display_query_value {
    ($($t:ty),*) => {
        $(impl QueryValue for $t {
            fn into_query_value(self) -> Option<String> {
                Some(self.to_string())
            }
        })*
    };
}

display_query_value!(i32, i64, u32, u64, usize, f64, bool);

impl<T: QueryValue> QueryValue for Option<T> {
    fn into_query_value(self) -> Option<String> {
        self.and_then(QueryValue::into_query_value)
    }
}

/// Percent-encodes everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`,
/// matching the browser's `encodeURIComponent`.
pub fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            other => out.push_str(&format!("%{:02X}", other)),
        }
    }
    out
}
