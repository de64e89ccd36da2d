//! Authentication API and session store traits.

use async_trait::async_trait;

use crate::auth::{
    AuthSession, Credentials, OtpVerification, PasswordReset, RedirectIntent, SignupRequest,
};
use crate::error::Result;
use crate::friend::UserSummary;

/// Backend `/auth/user` operations.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Registers an account; the backend emails an OTP. Returns the server message.
    async fn signup(&self, request: &SignupRequest) -> Result<String>;

    async fn verify_otp(&self, verification: &OtpVerification) -> Result<AuthSession>;

    async fn resend_otp(&self, email: &str) -> Result<()>;

    async fn login(&self, credentials: &Credentials) -> Result<AuthSession>;

    async fn forgot_password(&self, email: &str) -> Result<()>;

    async fn verify_reset_otp(&self, verification: &OtpVerification) -> Result<()>;

    async fn reset_password(&self, reset: &PasswordReset) -> Result<()>;

    async fn profile(&self) -> Result<UserSummary>;
}

/// Client-local authentication state (token, cached user, login redirect).
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Current bearer token, checking the current key then the legacy one.
    async fn token(&self) -> Option<String>;

    /// Persists a fresh session under the current key.
    async fn save_session(&self, session: &AuthSession) -> Result<()>;

    async fn cached_user(&self) -> Option<UserSummary>;

    /// Removes the token under every key plus the cached user.
    async fn clear_session(&self) -> Result<()>;

    async fn save_redirect(&self, intent: &RedirectIntent) -> Result<()>;

    /// Returns and removes the stored redirect intent.
    async fn take_redirect(&self) -> Option<RedirectIntent>;
}
