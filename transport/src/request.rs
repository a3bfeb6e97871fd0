use http::Method;
use serde::Serialize;
use serde_json::Value;

use crate::query::QueryParams;

/// One field of a multipart form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormPart {
    pub name: String,
    pub value: PartValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PartValue {
    Text(String),
    File {
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

impl FormPart {
    pub fn text(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: PartValue::Text(value.into()),
        }
    }

    pub fn file(name: &str, file_name: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            value: PartValue::File {
                file_name: file_name.to_string(),
                content_type: content_type.to_string(),
                bytes,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(Vec<FormPart>),
}

impl RequestBody {
    /// Stable textual form used in the dedup key. File contents are
    /// represented by name and length so large uploads are not copied.
    pub fn fingerprint(&self) -> String {
        match self {
            RequestBody::Empty => String::new(),
            RequestBody::Json(value) => value.to_string(),
            RequestBody::Multipart(parts) => parts
                .iter()
                .map(|part| match &part.value {
                    PartValue::Text(text) => format!("{}={}", part.name, text),
                    PartValue::File { file_name, bytes, .. } => {
                        format!("{}=@{}:{}", part.name, file_name, bytes.len())
                    }
                })
                .collect::<Vec<_>>()
                .join(";"),
        }
    }
}

/// A request as described by a service: relative path plus policy flags.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: QueryParams,
    pub body: RequestBody,
    /// Whether the bearer token should be attached.
    pub authenticated: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryParams::new(),
            body: RequestBody::Empty,
            authenticated: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, serde_json::Error> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    /// Marks the request as not needing a bearer token (login, register, ...).
    pub fn anonymous(mut self) -> Self {
        self.authenticated = false;
        self
    }

    /// Path plus serialized query, relative to the base URL.
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query.to_query_string())
        }
    }

    /// Identity of the request for in-flight deduplication.
    pub fn dedup_key(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.method,
            self.path,
            self.query.to_query_string(),
            self.body.fingerprint()
        )
    }
}

/// What actually goes to the backend for one attempt.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub bearer: Option<String>,
    pub body: RequestBody,
}
