use http::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::backend::TransportFailure;
use crate::messages::{
    DECODE_MESSAGE, GENERIC_FALLBACK, NETWORK_MESSAGE, TIMEOUT_MESSAGE, constraint_message,
    status_message,
};

/// Error payload shapes the backend is known to return. Every field is
/// optional; an unparseable body yields the default.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ServerErrorBody {
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub errors: Option<Value>,
    #[serde(default)]
    pub code: Option<Value>,
}

impl ServerErrorBody {
    pub fn parse(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// Server-supplied human readable message, if it is a plain string.
    pub fn message(&self) -> Option<&str> {
        match &self.message {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<String> {
        match &self.code {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Flattens array- or map-shaped validation errors into one line.
    pub fn validation_summary(&self) -> Option<String> {
        let mut lines = Vec::new();
        if let Some(Value::Array(items)) = &self.message {
            collect_array(items, &mut lines);
        }
        match &self.errors {
            Some(Value::Array(items)) => collect_array(items, &mut lines),
            Some(Value::Object(fields)) => {
                for (field, value) in fields {
                    match value {
                        Value::String(msg) => lines.push(format!("{}: {}", field, msg)),
                        Value::Array(msgs) => {
                            let joined = msgs
                                .iter()
                                .filter_map(Value::as_str)
                                .collect::<Vec<_>>()
                                .join(", ");
                            if !joined.is_empty() {
                                lines.push(format!("{}: {}", field, joined));
                            }
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
        if lines.is_empty() { None } else { Some(lines.join("; ")) }
    }
}

fn collect_array(items: &[Value], lines: &mut Vec<String>) {
    for item in items {
        match item {
            Value::String(s) if !s.is_empty() => lines.push(s.clone()),
            Value::Object(obj) => {
                let message = obj
                    .get("message")
                    .or_else(|| obj.get("msg"))
                    .and_then(Value::as_str);
                let field = obj
                    .get("field")
                    .or_else(|| obj.get("path"))
                    .and_then(Value::as_str);
                match (field, message) {
                    (Some(field), Some(message)) => lines.push(format!("{}: {}", field, message)),
                    (None, Some(message)) => lines.push(message.to_string()),
                    _ => {}
                }
            }
            _ => {}
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("request failed with status {status}")]
    Status {
        status: StatusCode,
        body: ServerErrorBody,
    },

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("request was cancelled")]
    Cancelled,

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("failed to encode request: {0}")]
    Encode(String),
}

impl From<TransportFailure> for ApiError {
    fn from(value: TransportFailure) -> Self {
        match value {
            TransportFailure::Timeout => ApiError::Timeout,
            TransportFailure::Network(msg) => ApiError::Network(msg),
            TransportFailure::Encode(msg) => ApiError::Encode(msg),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        ApiError::Encode(value.to_string())
    }
}

impl ApiError {
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        ApiError::Status {
            status,
            body: ServerErrorBody::parse(body),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Structured server error code (e.g. a database constraint code).
    pub fn code(&self) -> Option<String> {
        match self {
            ApiError::Status { body, .. } => body.code(),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// 5xx except 504, or a connectivity failure. Timeouts and cancellations
    /// are terminal.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Status { status, .. } => {
                status.is_server_error() && *status != StatusCode::GATEWAY_TIMEOUT
            }
            ApiError::Network(_) => true,
            _ => false,
        }
    }

    /// Text for the user-facing notification, `None` for cancellations.
    pub fn user_message(&self) -> Option<String> {
        let message = match self {
            ApiError::Cancelled => return None,
            ApiError::Timeout => TIMEOUT_MESSAGE.to_string(),
            ApiError::Network(_) => NETWORK_MESSAGE.to_string(),
            ApiError::Decode(_) => DECODE_MESSAGE.to_string(),
            ApiError::Encode(_) => GENERIC_FALLBACK.to_string(),
            ApiError::Status { status, body } => body
                .message()
                .map(str::to_string)
                .or_else(|| body.validation_summary())
                .or_else(|| {
                    body.code()
                        .and_then(|code| constraint_message(&code))
                        .map(str::to_string)
                })
                .or_else(|| status_message(*status).map(str::to_string))
                .unwrap_or_else(|| GENERIC_FALLBACK.to_string()),
        };
        Some(message)
    }
}
