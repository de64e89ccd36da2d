//! Authentication domain models and client-side form validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FynddError, Result};
use crate::friend::UserSummary;
use crate::product::{FieldResolver, ProductId};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const OTP_LEN: usize = 6;

const TOKEN: FieldResolver = FieldResolver::new(&["token", "accessToken", "authToken"]);

/// Token plus the user it belongs to, as returned by login / OTP verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub user: Option<UserSummary>,
}

impl AuthSession {
    /// Extracts the session from a login-style response (`token` at top level
    /// or under `data`; user under `user` or `data.user`).
    pub fn from_response(response: &Value) -> Result<Self> {
        let scopes = [Some(response), response.get("data")];
        let token = scopes
            .iter()
            .flatten()
            .filter_map(|scope| scope.as_object())
            .find_map(|scope| TOKEN.string(scope))
            .ok_or_else(|| FynddError::Serialization {
                format: "JSON".to_string(),
                message: "authentication response carried no token".to_string(),
            })?;
        let user = scopes
            .iter()
            .flatten()
            .find_map(|scope| scope.get("user"))
            .and_then(UserSummary::from_payload);
        Ok(Self { token, user })
    }
}

/// Something the user tried to do before being sent to the login view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PendingAction {
    #[serde(rename_all = "camelCase")]
    AddToCart { product_id: ProductId, quantity: u32 },
}

/// Where to go (and what to replay) once the user has logged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectIntent {
    pub from_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_action: Option<PendingAction>,
}

impl RedirectIntent {
    pub fn new(from_path: impl Into<String>) -> Self {
        Self {
            from_path: from_path.into(),
            pending_action: None,
        }
    }

    pub fn with_action(mut self, action: PendingAction) -> Self {
        self.pending_action = Some(action);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err(FynddError::validation("password", "Please enter your password."));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip)]
    pub confirm_password: String,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(FynddError::validation("name", "Please enter your name."));
        }
        validate_email(&self.email)?;
        validate_new_password(&self.password, &self.confirm_password)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtpVerification {
    pub email: String,
    pub otp: String,
}

impl OtpVerification {
    pub fn new(email: impl Into<String>, otp: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            otp: otp.into().trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_email(&self.email)?;
        validate_otp(&self.otp)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    pub email: String,
    pub otp: String,
    pub new_password: String,
    #[serde(skip)]
    pub confirm_password: String,
}

impl PasswordReset {
    pub fn validate(&self) -> Result<()> {
        validate_email(&self.email)?;
        validate_otp(&self.otp)?;
        validate_new_password(&self.new_password, &self.confirm_password)
    }
}

/// Loose `local@domain.tld` shape check; the backend has the final word.
pub fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !email.contains(char::is_whitespace)
                && domain
                    .rsplit_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && tld.len() >= 2)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(FynddError::validation(
            "email",
            "Please enter a valid email address.",
        ))
    }
}

pub fn validate_otp(otp: &str) -> Result<()> {
    if otp.len() == OTP_LEN && otp.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(FynddError::validation(
            "otp",
            format!("The code must be {} digits.", OTP_LEN),
        ))
    }
}

fn validate_new_password(password: &str, confirmation: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(FynddError::validation(
            "password",
            format!("Password must be at least {} characters.", MIN_PASSWORD_LEN),
        ));
    }
    if password != confirmation {
        return Err(FynddError::validation(
            "confirmPassword",
            "Passwords do not match.",
        ));
    }
    Ok(())
}
