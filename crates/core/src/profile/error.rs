//! Profile error types.

use shipsy_shared::AppError;
use thiserror::Error;

use crate::auth::OtpError;

/// Profile operation errors.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Request failed validation.
    #[error("{0}")]
    Validation(String),

    /// An account already uses this email.
    #[error("email already registered: {0}")]
    EmailTaken(String),

    /// Unknown email or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account has been deactivated.
    #[error("account disabled")]
    AccountDisabled,

    /// Credentials could not be checked.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// No such account.
    #[error("user not found")]
    NotFound,

    /// A one-time code was refused.
    #[error(transparent)]
    Otp(#[from] OtpError),

    /// The code could not be delivered.
    #[error("notification failed: {0}")]
    Notification(String),

    /// Password hashing failed.
    #[error("internal error: {0}")]
    Internal(String),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl ProfileError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

impl From<ProfileError> for AppError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::Validation(msg) => Self::Validation(msg),
            ProfileError::EmailTaken(_) => Self::Conflict("Email already exists".to_string()),
            ProfileError::InvalidCredentials => {
                Self::InvalidCredentials("Email or password is incorrect".to_string())
            }
            ProfileError::AccountDisabled => {
                Self::AccountDisabled("Account is disabled".to_string())
            }
            ProfileError::AuthenticationFailed(_) => {
                Self::Unauthorized("Authentication failed".to_string())
            }
            ProfileError::NotFound => Self::NotFound("User not found".to_string()),
            ProfileError::Otp(e) => Self::Validation(e.to_string()),
            ProfileError::Notification(msg) => Self::ExternalService(msg),
            ProfileError::Internal(msg) => Self::Internal(msg),
            ProfileError::Repository(msg) => Self::Database(msg),
        }
    }
}
