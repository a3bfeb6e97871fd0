//! HTTP transport for the bakery admin client.
//!
//! Services describe requests declaratively ([`ApiRequest`]); [`ApiClient`]
//! applies the cross-cutting policy: bearer injection, in-flight dedup,
//! backoff retry, user-facing error mapping and centralized 401 handling.

pub mod backend;
pub mod client;
pub mod dedup;
pub mod error;
pub mod messages;
pub mod notify;
pub mod query;
pub mod request;
pub mod retry;
pub mod session;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use backend::{HttpBackend, RawResponse, ReqwestBackend, TransportFailure};
pub use client::ApiClient;
pub use error::{ApiError, ServerErrorBody};
pub use notify::{
    LOGIN_ROUTE, Navigator, Notifier, TracingNotifier, UnauthorizedHandler, UnauthorizedOutcome,
};
pub use query::QueryParams;
pub use request::{ApiRequest, FormPart, PartValue, PreparedRequest, RequestBody};
pub use retry::RetryPolicy;
pub use session::{FileTokenStore, MemoryTokenStore, SessionHandle, TokenStore};
