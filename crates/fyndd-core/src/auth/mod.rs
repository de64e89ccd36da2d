//! Authentication domain module.

mod model;
mod service;

pub use model::{
    AuthSession, Credentials, MIN_PASSWORD_LEN, OTP_LEN, OtpVerification, PasswordReset,
    PendingAction, RedirectIntent, SignupRequest, validate_email, validate_otp,
};
pub use service::{AuthApi, SessionStore};
