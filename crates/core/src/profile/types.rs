//! Profile domain types.

use serde::{Deserialize, Serialize};
use shipsy_shared::types::UserId;
use validator::{Validate, ValidationError};

use crate::auth::OtpChallenge;
use crate::validation::invalid;

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// Account id, also the owner id of the user's shipments.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email, lowercased.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// False blocks login.
    pub is_active: bool,
    /// Set once a verification code has been accepted.
    pub is_account_verified: bool,
    /// Outstanding verification code, if any.
    pub verify_otp: Option<OtpChallenge>,
    /// Outstanding password reset code, if any.
    pub reset_otp: Option<OtpChallenge>,
}

/// Input for creating an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserAccount {
    /// Display name.
    pub name: String,
    /// Login email, lowercased.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
}

/// Registration payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name.
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    /// Login email.
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    /// Plain password.
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(invalid("blank", "Name is required"));
    }
    Ok(())
}

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Account id.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Whether the email has been verified.
    pub is_account_verified: bool,
}

impl From<&UserAccount> for Profile {
    fn from(account: &UserAccount) -> Self {
        Self {
            user_id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            is_account_verified: account.is_account_verified,
        }
    }
}

/// Canonical form of an email used for storage and lookup.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
