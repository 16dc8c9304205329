//! Out-of-band delivery of one-time codes.

use std::future::Future;

use shipsy_shared::EmailService;

use super::error::ProfileError;

/// Delivers one-time codes to the account holder.
pub trait OtpNotifier: Send + Sync {
    /// Send an account verification code.
    fn send_verification_code(
        &self,
        email: &str,
        code: &str,
    ) -> impl Future<Output = Result<(), ProfileError>> + Send;

    /// Send a password reset code.
    fn send_reset_code(
        &self,
        email: &str,
        code: &str,
    ) -> impl Future<Output = Result<(), ProfileError>> + Send;
}

impl OtpNotifier for EmailService {
    async fn send_verification_code(&self, email: &str, code: &str) -> Result<(), ProfileError> {
        self.send_verification_otp(email, code)
            .await
            .map_err(|e| ProfileError::Notification(e.to_string()))
    }

    async fn send_reset_code(&self, email: &str, code: &str) -> Result<(), ProfileError> {
        self.send_reset_otp(email, code)
            .await
            .map_err(|e| ProfileError::Notification(e.to_string()))
    }
}
