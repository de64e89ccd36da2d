//! Authentication use case.
//!
//! Forms are validated before any request. A successful login or OTP
//! verification persists the session and hands back the redirect intent
//! saved when the user was sent to log in.

use std::sync::Arc;

use fyndd_core::auth::{
    AuthApi, AuthSession, Credentials, OtpVerification, PasswordReset, PendingAction, RedirectIntent,
    SessionStore, SignupRequest, validate_email,
};
use fyndd_core::Result;
use fyndd_core::friend::UserSummary;

pub const LOGIN_PATH: &str = "/login";

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user: Option<UserSummary>,
    /// Where the user was headed, plus any action to replay.
    pub redirect: Option<RedirectIntent>,
}

/// Route to the login view, carrying where the user came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRoute {
    pub path: &'static str,
    pub redirect: RedirectIntent,
}

pub struct AuthUseCase {
    api: Arc<dyn AuthApi>,
    session: Arc<dyn SessionStore>,
}

impl AuthUseCase {
    pub fn new(api: Arc<dyn AuthApi>, session: Arc<dyn SessionStore>) -> Self {
        Self { api, session }
    }

    pub async fn is_logged_in(&self) -> bool {
        self.session.token().await.is_some()
    }

    pub async fn cached_user(&self) -> Option<UserSummary> {
        self.session.cached_user().await
    }

    /// Registers an account. Returns the server's confirmation message.
    pub async fn signup(&self, request: &SignupRequest) -> Result<String> {
        request.validate()?;
        self.api.signup(request).await
    }

    pub async fn verify_otp(&self, verification: &OtpVerification) -> Result<LoginOutcome> {
        verification.validate()?;
        let session = self.api.verify_otp(verification).await?;
        self.complete_login(session).await
    }

    pub async fn resend_otp(&self, email: &str) -> Result<()> {
        validate_email(email)?;
        self.api.resend_otp(email.trim()).await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome> {
        credentials.validate()?;
        let session = self.api.login(credentials).await?;
        self.complete_login(session).await
    }

    pub async fn logout(&self) -> Result<()> {
        self.session.clear_session().await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        validate_email(email)?;
        self.api.forgot_password(email.trim()).await
    }

    pub async fn verify_reset_otp(&self, verification: &OtpVerification) -> Result<()> {
        verification.validate()?;
        self.api.verify_reset_otp(verification).await
    }

    pub async fn reset_password(&self, reset: &PasswordReset) -> Result<()> {
        reset.validate()?;
        self.api.reset_password(reset).await
    }

    pub async fn profile(&self) -> Result<UserSummary> {
        self.api.profile().await
    }

    /// Reacts to a 401: drops the session and remembers where to return.
    pub async fn handle_unauthenticated(
        &self,
        from_path: &str,
        pending_action: Option<PendingAction>,
    ) -> Result<LoginRoute> {
        self.session.clear_session().await?;
        let mut redirect = RedirectIntent::new(from_path);
        redirect.pending_action = pending_action;
        self.session.save_redirect(&redirect).await?;
        tracing::info!("[Auth] Redirecting to login from {}", from_path);
        Ok(LoginRoute {
            path: LOGIN_PATH,
            redirect,
        })
    }

    async fn complete_login(&self, session: AuthSession) -> Result<LoginOutcome> {
        self.session.save_session(&session).await?;
        tracing::info!("[Auth] Logged in");
        Ok(LoginOutcome {
            user: session.user,
            redirect: self.session.take_redirect().await,
        })
    }
}
