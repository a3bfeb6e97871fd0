use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::session::SessionHandle;

pub const LOGIN_ROUTE: &str = "/login";

/// Sink for transient user notifications (toasts).
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
    fn success(&self, message: &str);
}

/// Writes toasts to the log; used by the command-line front end.
#[derive(Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::error!(toast = message);
    }

    fn success(&self, message: &str) {
        tracing::info!(toast = message);
    }
}

#[async_trait]
pub trait Navigator: Send + Sync {
    fn current_route(&self) -> String;
    async fn redirect_to_login(&self);
}

/// What [`UnauthorizedHandler::handle`] did with a 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthorizedOutcome {
    /// Notified and sent the user to the login screen.
    Redirected,
    /// Another failure of the same session epoch already redirected.
    AlreadyHandled,
    /// The user is on the login screen; the caller reports the error itself.
    OnLoginRoute,
}

/// Clears the session on 401 and sends the user to the login screen, at most
/// once per session epoch no matter how many requests fail concurrently.
pub struct UnauthorizedHandler {
    session: SessionHandle,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    redirected_epoch: AtomicU64,
}

impl UnauthorizedHandler {
    pub fn new(
        session: SessionHandle,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            session,
            navigator,
            notifier,
            redirected_epoch: AtomicU64::new(u64::MAX),
        }
    }

    pub async fn handle(&self) -> UnauthorizedOutcome {
        let epoch = self.session.epoch();
        if let Err(e) = self.session.clear().await {
            tracing::warn!(error = %e, "Failed to clear persisted session");
        }

        if self.redirected_epoch.swap(epoch, Ordering::SeqCst) == epoch {
            return UnauthorizedOutcome::AlreadyHandled;
        }
        if self.navigator.current_route() == LOGIN_ROUTE {
            return UnauthorizedOutcome::OnLoginRoute;
        }

        if let Some(message) = crate::messages::status_message(http::StatusCode::UNAUTHORIZED) {
            self.notifier.error(message);
        }
        self.navigator.redirect_to_login().await;
        UnauthorizedOutcome::Redirected
    }
}
