use anyhow::Result;
use clap::Subcommand;

use fyndd_application::{FynddApp, LoginOutcome};
use fyndd_core::auth::{Credentials, OtpVerification, PasswordReset, SignupRequest};

use super::Output;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Create an account; a verification code is emailed to you
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Verify your email with the emailed code and log in
    VerifyOtp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        otp: String,
    },
    /// Send the verification code again
    ResendOtp {
        #[arg(long)]
        email: String,
    },
    /// Log in
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log out and forget the stored token
    Logout,
    /// Request a password reset code
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    /// Check a password reset code
    VerifyResetOtp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        otp: String,
    },
    /// Set a new password
    ResetPassword {
        #[arg(long)]
        email: String,
        #[arg(long)]
        otp: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Show the logged-in user
    Profile,
}

pub async fn run(app: &FynddApp, out: &Output, action: AuthAction) -> Result<()> {
    match action {
        AuthAction::Signup {
            name,
            email,
            password,
            confirm_password,
        } => {
            let request = SignupRequest {
                name: name.trim().to_string(),
                email: email.trim().to_string(),
                password,
                confirm_password,
            };
            let message = app.auth.signup(&request).await?;
            out.success(&message);
        }
        AuthAction::VerifyOtp { email, otp } => {
            let outcome = app
                .auth
                .verify_otp(&OtpVerification::new(email, otp))
                .await?;
            finish_login(app, out, outcome).await?;
        }
        AuthAction::ResendOtp { email } => {
            app.auth.resend_otp(&email).await?;
            out.success("A new code is on its way.");
        }
        AuthAction::Login { email, password } => {
            let outcome = app.auth.login(&Credentials::new(email, password)).await?;
            finish_login(app, out, outcome).await?;
        }
        AuthAction::Logout => {
            app.auth.logout().await?;
            out.success("Logged out.");
        }
        AuthAction::ForgotPassword { email } => {
            app.auth.forgot_password(&email).await?;
            out.success("If the account exists, a reset code has been sent.");
        }
        AuthAction::VerifyResetOtp { email, otp } => {
            app.auth
                .verify_reset_otp(&OtpVerification::new(email, otp))
                .await?;
            out.success("Code verified. You can now set a new password.");
        }
        AuthAction::ResetPassword {
            email,
            otp,
            password,
            confirm_password,
        } => {
            let reset = PasswordReset {
                email: email.trim().to_string(),
                otp: otp.trim().to_string(),
                new_password: password,
                confirm_password,
            };
            app.auth.reset_password(&reset).await?;
            out.success("Password updated. Log in with your new password.");
        }
        AuthAction::Profile => {
            let user = app.auth.profile().await?;
            out.users(std::slice::from_ref(&user))?;
        }
    }
    Ok(())
}

async fn finish_login(app: &FynddApp, out: &Output, outcome: LoginOutcome) -> Result<()> {
    let name = outcome
        .user
        .as_ref()
        .map(|user| user.name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "there".to_string());
    out.success(&format!("Welcome, {}!", name));

    if let Some(replayed) = app.replay_after_login(&outcome).await {
        let cart = replayed?;
        out.success("Added the item you picked before logging in.");
        out.cart(&cart)?;
    } else if let Some(redirect) = &outcome.redirect {
        out.notice(&format!("You were at {}.", redirect.from_path));
    }
    Ok(())
}
