//! Email service for sending one-time codes.
//!
//! Uses `lettre` for SMTP transport. Bodies are rendered from plain text
//! templates so they can be checked without a mail server.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor, message::header::ContentType,
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;

use crate::config::EmailConfig;

/// Subject of the account verification email.
pub const VERIFICATION_SUBJECT: &str = "Account Verification OTP";

/// Subject of the password reset email.
pub const RESET_SUBJECT: &str = "Forgot your password?";

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Email service for sending transactional emails.
#[derive(Debug, Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new email service.
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Creates an SMTP transport.
    ///
    /// Without credentials the relay is treated as a local development
    /// catcher and spoken to in plain text.
    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        if self.config.smtp_username.is_empty() {
            return Ok(
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.smtp_host)
                    .port(self.config.smtp_port)
                    .build(),
            );
        }

        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        Ok(
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
                .map_err(|e| EmailError::SendError(e.to_string()))?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build(),
        )
    }

    /// Sends the account verification code.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be sent.
    pub async fn send_verification_otp(&self, to_email: &str, otp: &str) -> Result<(), EmailError> {
        let body = verification_otp_body(to_email, otp);
        self.send_email(to_email, VERIFICATION_SUBJECT, &body).await
    }

    /// Sends the password reset code.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be sent.
    pub async fn send_reset_otp(&self, to_email: &str, otp: &str) -> Result<(), EmailError> {
        let body = reset_otp_body(to_email, otp);
        self.send_email(to_email, RESET_SUBJECT, &body).await
    }

    /// Sends a generic email.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be sent.
    pub async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailError> {
        let email = self.build_message(to_email, subject, body)?;

        let transport = self.create_transport()?;
        transport
            .send(email)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        Ok(())
    }

    fn build_message(&self, to_email: &str, subject: &str, body: &str) -> Result<Message, EmailError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        Message::builder()
            .from(
                from.parse()
                    .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| EmailError::BuildError(e.to_string()))
    }
}

/// Renders the account verification email body.
#[must_use]
pub fn verification_otp_body(email: &str, otp: &str) -> String {
    format!(
        r"Hi {email},

Use the code below to verify your Shipsy account:

    {otp}

The code can be used once and expires after a day.

If you didn't create a Shipsy account, you can safely ignore this email.

The Shipsy Team"
    )
}

/// Renders the password reset email body.
#[must_use]
pub fn reset_otp_body(email: &str, otp: &str) -> String {
    format!(
        r"Hi {email},

We received a request to reset the password of your Shipsy account.
Use the code below to choose a new password:

    {otp}

The code can be used once and expires after a few minutes.

If you didn't ask for a reset, your password stays unchanged.

The Shipsy Team"
    )
}

#[cfg(test)]
#[path = "email_tests.rs"]
mod tests;
