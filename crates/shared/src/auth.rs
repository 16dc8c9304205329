//! Authentication types for JWT and the login/OTP payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::UserId;

/// JWT claims for session tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Email the user logged in with.
    pub email: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, email: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        UserId::from_uuid(self.sub)
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    /// Authenticated email.
    pub email: String,
    /// Session token, also set as the `jwt` cookie.
    pub token: String,
}

/// Account verification request.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyOtpRequest {
    /// The code from the verification email.
    pub otp: Option<String>,
}

/// Query string of the reset code request.
#[derive(Debug, Clone, Deserialize)]
pub struct ResetOtpQuery {
    /// Email of the account to recover.
    pub email: String,
}

/// Password reset request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    /// Email of the account to recover.
    pub email: String,
    /// The code from the reset email.
    pub otp: String,
    /// The replacement password.
    pub new_password: String,
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
