//! Authentication API client.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;

use fyndd_core::auth::{
    AuthApi, AuthSession, Credentials, OtpVerification, PasswordReset, SignupRequest,
};
use fyndd_core::friend::UserSummary;
use fyndd_core::{FynddError, Result};

use super::api_client::{Access, ApiClient};

const AUTH_BASE: &str = "/auth/user";

/// [`AuthApi`] over `/auth/user`.
#[derive(Clone)]
pub struct HttpAuthApi {
    api: Arc<ApiClient>,
}

impl HttpAuthApi {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    async fn post<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<Value> {
        let builder = self
            .api
            .request(Method::POST, &format!("{}/{}", AUTH_BASE, endpoint))
            .json(body);
        self.api.send(builder, Access::Public).await
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn signup(&self, request: &SignupRequest) -> Result<String> {
        let response = self.post("signup", request).await?;
        Ok(response
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("A verification code was sent to {}.", request.email)))
    }

    async fn verify_otp(&self, verification: &OtpVerification) -> Result<AuthSession> {
        let response = self.post("verify-otp", verification).await?;
        AuthSession::from_response(&response)
    }

    async fn resend_otp(&self, email: &str) -> Result<()> {
        self.post("resend-otp", &json!({ "email": email })).await?;
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthSession> {
        let response = self.post("login", credentials).await?;
        AuthSession::from_response(&response)
    }

    async fn forgot_password(&self, email: &str) -> Result<()> {
        self.post("forgot-password", &json!({ "email": email })).await?;
        Ok(())
    }

    async fn verify_reset_otp(&self, verification: &OtpVerification) -> Result<()> {
        self.post("verify-reset-otp", verification).await?;
        Ok(())
    }

    async fn reset_password(&self, reset: &PasswordReset) -> Result<()> {
        self.post("reset-password", reset).await?;
        Ok(())
    }

    async fn profile(&self) -> Result<UserSummary> {
        let builder = self
            .api
            .request(Method::GET, &format!("{}/profile", AUTH_BASE));
        let response = self.api.send(builder, Access::User).await?;
        profile_from_response(&response)
    }
}

fn profile_from_response(response: &Value) -> Result<UserSummary> {
    ["user", "data"]
        .iter()
        .filter_map(|key| response.get(*key))
        .chain(std::iter::once(response))
        .find_map(UserSummary::from_payload)
        .ok_or_else(|| FynddError::Serialization {
            format: "JSON".to_string(),
            message: "profile response carried no user".to_string(),
        })
}
