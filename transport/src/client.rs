use futures::future::Abortable;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use common::config::Config;

use crate::backend::{HttpBackend, RawResponse, ReqwestBackend};
use crate::dedup::InFlightRegistry;
use crate::error::ApiError;
use crate::notify::{Navigator, Notifier, UnauthorizedHandler, UnauthorizedOutcome};
use crate::query::QueryParams;
use crate::request::{ApiRequest, PreparedRequest};
use crate::retry::RetryPolicy;
use crate::session::SessionHandle;

/// Single point of contact with the backend.
///
/// Every request goes through the same lifecycle: dedup registration, bearer
/// injection per attempt, bounded retry with backoff, then one notification
/// and (for 401) the unauthorized handler on terminal failure.
pub struct ApiClient {
    backend: Arc<dyn HttpBackend>,
    session: SessionHandle,
    in_flight: InFlightRegistry,
    retry: RetryPolicy,
    notifier: Arc<dyn Notifier>,
    unauthorized: UnauthorizedHandler,
    debug_logging: bool,
}

impl ApiClient {
    pub fn new(
        backend: Arc<dyn HttpBackend>,
        session: SessionHandle,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let unauthorized = UnauthorizedHandler::new(session.clone(), navigator, notifier.clone());
        Self {
            backend,
            session,
            in_flight: InFlightRegistry::new(),
            retry: RetryPolicy::default(),
            notifier,
            unauthorized,
            debug_logging: false,
        }
    }

    /// Production wiring: reqwest backend with the environment's timeout and
    /// retry settings taken from config.
    pub fn from_config(
        config: &Config,
        session: SessionHandle,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, reqwest::Error> {
        let backend = ReqwestBackend::new(&config.common.api_base_url, config.request_timeout())?;
        Ok(Self::new(Arc::new(backend), session, notifier, navigator)
            .with_retry(RetryPolicy::from(&config.transport.retry))
            .with_debug_logging(
                config.transport.debug_logging && config.common.environment.is_development(),
            ))
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug_logging = enabled;
        self
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Aborts every in-flight request (logout, navigation away).
    pub fn cancel_all(&self) -> usize {
        let cancelled = self.in_flight.cancel_all();
        if self.debug_logging && cancelled > 0 {
            tracing::debug!(cancelled, "Cancelled in-flight requests");
        }
        cancelled
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.in_flight()
    }

    pub async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let key = request.dedup_key();
        let (_guard, registration, superseded) = self.in_flight.register(&key);
        if superseded && self.debug_logging {
            tracing::debug!(key = %key, "Superseded identical in-flight request");
        }

        let result = match Abortable::new(self.dispatch_with_retry(&request), registration).await {
            Ok(result) => result,
            Err(_aborted) => Err(ApiError::Cancelled),
        };

        if let Err(error) = &result {
            self.report_failure(&request, error).await;
        }
        result
    }

    fn prepare(&self, request: &ApiRequest) -> PreparedRequest {
        PreparedRequest {
            method: request.method.clone(),
            url: request.url(),
            bearer: if request.authenticated {
                self.session.bearer()
            } else {
                None
            },
            body: request.body.clone(),
        }
    }

    async fn dispatch_with_retry(&self, request: &ApiRequest) -> Result<RawResponse, ApiError> {
        let mut retries = 0;
        loop {
            let prepared = self.prepare(request);
            if self.debug_logging {
                tracing::debug!(
                    method = %prepared.method,
                    url = %prepared.url,
                    attempt = retries + 1,
                    authenticated = prepared.bearer.is_some(),
                    "Dispatching request"
                );
            }

            let error = match self.backend.execute(prepared).await {
                Ok(response) if response.status.is_success() => {
                    if self.debug_logging {
                        tracing::debug!(
                            method = %request.method,
                            url = %request.path,
                            status = %response.status,
                            "Request succeeded"
                        );
                    }
                    return Ok(response);
                }
                Ok(response) => ApiError::from_response(response.status, &response.body),
                Err(failure) => ApiError::from(failure),
            };

            if !self.retry.should_retry(&error, retries) {
                return Err(error);
            }

            let delay = self.retry.delay_for(retries);
            retries += 1;
            if self.debug_logging {
                tracing::debug!(
                    method = %request.method,
                    url = %request.path,
                    error = %error,
                    retry = retries,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying request"
                );
            }
            tokio::time::sleep(delay).await;
        }
    }

    async fn report_failure(&self, request: &ApiRequest, error: &ApiError) {
        if error.is_cancelled() {
            if self.debug_logging {
                tracing::debug!(method = %request.method, url = %request.path, "Request cancelled");
            }
            return;
        }

        if self.debug_logging {
            tracing::debug!(
                method = %request.method,
                url = %request.path,
                error = %error,
                "Request failed"
            );
        }

        // Anonymous calls (login, password reset) report a 401 like any other failure.
        if error.is_unauthorized() && request.authenticated {
            match self.unauthorized.handle().await {
                UnauthorizedOutcome::Redirected | UnauthorizedOutcome::AlreadyHandled => return,
                UnauthorizedOutcome::OnLoginRoute => {}
            }
        }

        if let Some(message) = error.user_message() {
            self.notifier.error(&message);
        }
    }

    fn decode<T: DeserializeOwned>(&self, response: &RawResponse) -> Result<T, ApiError> {
        let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &response.body
        };
        serde_json::from_slice(body).map_err(|e| {
            let error = ApiError::Decode(e.to_string());
            if let Some(message) = error.user_message() {
                self.notifier.error(&message);
            }
            error
        })
    }

    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        self.decode(&response)
    }

    /// Sends and ignores the response body.
    pub async fn send_unit(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.send(request).await.map(|_| ())
    }

    /// Raw bytes of a successful response (invoices, exports).
    pub async fn get_blob(&self, path: &str, query: QueryParams) -> Result<Vec<u8>, ApiError> {
        let response = self.send(ApiRequest::get(path).query(query)).await?;
        Ok(response.body)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: QueryParams,
    ) -> Result<T, ApiError> {
        self.send_json(ApiRequest::get(path).query(query)).await
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send_json(ApiRequest::post(path).json(body)?).await
    }

    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send_json(ApiRequest::put(path).json(body)?).await
    }

    pub async fn patch_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send_json(ApiRequest::patch(path).json(body)?).await
    }

    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send_json(ApiRequest::delete(path)).await
    }
}
