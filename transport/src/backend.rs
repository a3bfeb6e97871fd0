use async_trait::async_trait;
use http::StatusCode;
use reqwest::multipart::{Form, Part};
use std::time::Duration;

use crate::request::{PartValue, PreparedRequest, RequestBody};

/// A response that reached us, successful or not.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json(status: StatusCode, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Failure before any response arrived.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportFailure {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    /// The request could not be built locally; nothing was sent.
    #[error("failed to encode request: {0}")]
    Encode(String),
}

#[async_trait]
pub trait HttpBackend: Send + Sync {
    async fn execute(&self, request: PreparedRequest) -> Result<RawResponse, TransportFailure>;
}

pub struct ReqwestBackend {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn build_form(parts: Vec<crate::request::FormPart>) -> Result<Form, TransportFailure> {
        let mut form = Form::new();
        for part in parts {
            form = match part.value {
                PartValue::Text(text) => form.text(part.name, text),
                PartValue::File {
                    file_name,
                    content_type,
                    bytes,
                } => {
                    let file = Part::bytes(bytes)
                        .file_name(file_name)
                        .mime_str(&content_type)
                        .map_err(|e| TransportFailure::Encode(e.to_string()))?;
                    form.part(part.name, file)
                }
            };
        }
        Ok(form)
    }
}

fn classify(error: reqwest::Error) -> TransportFailure {
    if error.is_timeout() {
        TransportFailure::Timeout
    } else {
        TransportFailure::Network(error.to_string())
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn execute(&self, request: PreparedRequest) -> Result<RawResponse, TransportFailure> {
        let url = format!("{}{}", self.base_url, request.url);
        let mut builder = self.client.request(request.method, url);
        if let Some(token) = request.bearer {
            builder = builder.bearer_auth(token);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(parts) => builder.multipart(Self::build_form(parts)?),
        };

        let response = builder.send().await.map_err(classify)?;
        let status = response.status();
        let body = response.bytes().await.map_err(classify)?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}
