//! Test doubles for the transport seams, shared with the `bakery` crate's tests.

use async_trait::async_trait;
use http::StatusCode;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::backend::{HttpBackend, RawResponse, TransportFailure};
use crate::notify::{Navigator, Notifier};
use crate::request::PreparedRequest;

#[derive(Default)]
pub struct RecordingNotifier {
    errors: Mutex<Vec<String>>,
    successes: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_string());
    }
}

pub struct RecordingNavigator {
    route: Mutex<String>,
    redirects: AtomicUsize,
}

impl RecordingNavigator {
    pub fn at(route: &str) -> Self {
        Self {
            route: Mutex::new(route.to_string()),
            redirects: AtomicUsize::new(0),
        }
    }

    pub fn redirects(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }

    pub fn route(&self) -> String {
        self.route.lock().unwrap().clone()
    }
}

impl Default for RecordingNavigator {
    fn default() -> Self {
        Self::at("/admin")
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    fn current_route(&self) -> String {
        self.route()
    }

    async fn redirect_to_login(&self) {
        // Yield so concurrent 401 handlers genuinely interleave in tests.
        tokio::task::yield_now().await;
        self.redirects.fetch_add(1, Ordering::SeqCst);
        *self.route.lock().unwrap() = crate::notify::LOGIN_ROUTE.to_string();
    }
}

/// One scripted backend reply.
#[derive(Clone)]
pub struct Scripted {
    pub delay: Duration,
    pub result: Result<RawResponse, TransportFailure>,
}

impl Scripted {
    pub fn ok(value: serde_json::Value) -> Self {
        Self::status(StatusCode::OK, value)
    }

    pub fn status(status: StatusCode, value: serde_json::Value) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(RawResponse::json(status, &value)),
        }
    }

    pub fn bytes(body: &[u8]) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(RawResponse::new(StatusCode::OK, body.to_vec())),
        }
    }

    pub fn failure(failure: TransportFailure) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(failure),
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Replies from a queue in order and records every request it saw. When the
/// queue runs dry it keeps returning the fallback reply.
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Scripted>>,
    fallback: Scripted,
    requests: Mutex<Vec<PreparedRequest>>,
    completed: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<Scripted>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            fallback: Scripted::ok(serde_json::Value::Null),
            requests: Mutex::new(Vec::new()),
            completed: AtomicUsize::new(0),
        }
    }

    pub fn always(reply: Scripted) -> Self {
        Self {
            fallback: reply,
            ..Self::new(Vec::new())
        }
    }

    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Requests whose reply was actually delivered (not aborted mid-delay).
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpBackend for ScriptedBackend {
    async fn execute(&self, request: PreparedRequest) -> Result<RawResponse, TransportFailure> {
        self.requests.lock().unwrap().push(request);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
        reply.result
    }
}
