use serde_json::Value;
use std::sync::Arc;

use transport::{ApiClient, ApiRequest};

use super::logged;
use crate::errors::Result;
use crate::model::auth::{ForgotPasswordRequest, ResetPasswordRequest};
use crate::model::{AuthResponse, LoginRequest, RegisterRequest};

const RESOURCE: &str = "auth";

pub struct AuthService {
    client: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    async fn establish(&self, response: &AuthResponse) -> Result<()> {
        self.client.session().establish(&response.token).await?;
        tracing::info!("Session established");
        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let request = ApiRequest::post("/auth/login").anonymous().json(&LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        })?;
        let response: AuthResponse =
            logged(RESOURCE, "login", self.client.send_json(request)).await?;
        self.establish(&response).await?;
        Ok(response)
    }

    /// Some deployments log the new account straight in, others expect a
    /// separate login; a token in the reply is honoured when present.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Option<AuthResponse>> {
        let request = ApiRequest::post("/auth/register").anonymous().json(request)?;
        let body: Value = logged(RESOURCE, "register", self.client.send_json(request)).await?;
        match serde_json::from_value::<AuthResponse>(body) {
            Ok(response) => {
                self.establish(&response).await?;
                Ok(Some(response))
            }
            Err(_) => Ok(None),
        }
    }

    pub async fn refresh_token(&self) -> Result<AuthResponse> {
        let response: AuthResponse = logged(
            RESOURCE,
            "refresh_token",
            self.client.send_json(ApiRequest::post("/auth/refresh-token")),
        )
        .await?;
        self.establish(&response).await?;
        Ok(response)
    }

    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let request = ApiRequest::post("/auth/forgot-password")
            .anonymous()
            .json(&ForgotPasswordRequest {
                email: email.trim().to_string(),
            })?;
        logged(RESOURCE, "forgot_password", self.client.send_unit(request)).await
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        let request = ApiRequest::post("/auth/reset-password")
            .anonymous()
            .json(&ResetPasswordRequest {
                token: token.to_string(),
                new_password: new_password.to_string(),
            })?;
        logged(RESOURCE, "reset_password", self.client.send_unit(request)).await
    }

    /// Aborts whatever is still in flight, then drops the session.
    pub async fn logout(&self) -> Result<()> {
        let cancelled = self.client.cancel_all();
        self.client.session().clear().await?;
        tracing::info!(cancelled, "Logged out");
        Ok(())
    }
}
