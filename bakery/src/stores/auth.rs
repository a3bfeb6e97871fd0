use std::sync::Arc;

use transport::Notifier;
use transport::session::SessionSnapshot;

use crate::errors::Result;
use crate::services::AuthService;

/// Session-facing actions of the login screen and the account menu.
pub struct AuthStore {
    service: Arc<AuthService>,
    client: Arc<transport::ApiClient>,
    notifier: Arc<dyn Notifier>,
}

impl AuthStore {
    pub fn new(client: Arc<transport::ApiClient>) -> Self {
        Self {
            service: Arc::new(AuthService::new(client.clone())),
            notifier: client.notifier().clone(),
            client,
        }
    }

    pub fn service(&self) -> &Arc<AuthService> {
        &self.service
    }

    /// Restores the persisted session, if any.
    pub async fn rehydrate(&self) -> Result<bool> {
        Ok(self.client.session().rehydrate().await?)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        self.service.login(email, password).await?;
        self.notifier.success("Logged in successfully");
        Ok(())
    }

    pub async fn logout(&self) -> Result<()> {
        self.service.logout().await?;
        self.notifier.success("Logged out");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.session().is_authenticated()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.client.session().snapshot()
    }
}
