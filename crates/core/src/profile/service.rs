//! Profile service implementation.

use std::future::Future;
use std::sync::Arc;

use chrono::{Duration, Utc};
use shipsy_shared::config::OtpConfig;
use shipsy_shared::types::UserId;
use tracing::{error, info, warn};
use validator::Validate;

use super::error::ProfileError;
use super::notifier::OtpNotifier;
use super::types::{NewUserAccount, Profile, RegisterRequest, UserAccount, normalize_email};
use crate::auth::{
    OtpChallenge, OtpError, check_length, hash_password, redeem, verify_password,
};
use crate::validation::describe_validation;

/// Repository trait for user accounts.
///
/// This trait is implemented by the db crate.
pub trait CredentialStore: Send + Sync {
    /// Find an account by its normalized email.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<UserAccount>, ProfileError>> + Send;

    /// Find an account by id.
    fn find_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<UserAccount>, ProfileError>> + Send;

    /// Create an unverified, active account.
    ///
    /// Fails with `ProfileError::EmailTaken` if the email is already used.
    fn create(
        &self,
        account: NewUserAccount,
    ) -> impl Future<Output = Result<UserAccount, ProfileError>> + Send;

    /// Persist password, verification state and outstanding codes.
    fn save(&self, account: &UserAccount) -> impl Future<Output = Result<(), ProfileError>> + Send;
}

/// Lifetimes of the two kinds of one-time code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpPolicy {
    /// Verification code lifetime.
    pub verify_ttl: Duration,
    /// Reset code lifetime.
    pub reset_ttl: Duration,
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self::from(&OtpConfig::default())
    }
}

impl From<&OtpConfig> for OtpPolicy {
    fn from(config: &OtpConfig) -> Self {
        let secs = |v: u64| {
            i64::try_from(v)
                .ok()
                .and_then(Duration::try_seconds)
                .unwrap_or(Duration::MAX)
        };
        Self {
            verify_ttl: secs(config.verify_ttl_secs),
            reset_ttl: secs(config.reset_ttl_secs),
        }
    }
}

/// Registration, login checks and code-based account recovery.
pub struct ProfileService<S: CredentialStore, N: OtpNotifier> {
    store: Arc<S>,
    notifier: Arc<N>,
    policy: OtpPolicy,
}

impl<S: CredentialStore, N: OtpNotifier> ProfileService<S, N> {
    /// Create a new profile service.
    #[must_use]
    pub fn new(store: Arc<S>, notifier: Arc<N>, policy: OtpPolicy) -> Self {
        Self {
            store,
            notifier,
            policy,
        }
    }

    /// Register a new, unverified account.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a bad payload and `EmailTaken` for a
    /// duplicate email.
    pub async fn register(&self, request: RegisterRequest) -> Result<Profile, ProfileError> {
        request
            .validate()
            .map_err(|e| ProfileError::Validation(describe_validation(&e)))?;

        let email = normalize_email(&request.email);
        if self.store.find_by_email(&email).await?.is_some() {
            return Err(ProfileError::EmailTaken(email));
        }

        let password_hash =
            hash_password(&request.password).map_err(|e| ProfileError::Internal(e.to_string()))?;

        let account = self
            .store
            .create(NewUserAccount {
                name: request.name.trim().to_string(),
                email,
                password_hash,
            })
            .await?;

        info!(user_id = %account.id, "account registered");
        Ok(Profile::from(&account))
    }

    /// Public view of an account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account no longer exists.
    pub async fn profile(&self, user_id: UserId) -> Result<Profile, ProfileError> {
        let account = self.account(user_id).await?;
        Ok(Profile::from(&account))
    }

    /// Check login credentials.
    ///
    /// The password is checked before the account state, so a disabled
    /// account is only reported to someone who knows its password.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` for an unknown email or wrong password,
    /// `AccountDisabled` for a deactivated account and `AuthenticationFailed`
    /// if the stored hash cannot be checked.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserAccount, ProfileError> {
        let email = normalize_email(email);
        let Some(account) = self.store.find_by_email(&email).await? else {
            warn!("login rejected: unknown email");
            return Err(ProfileError::InvalidCredentials);
        };

        let matches = verify_password(password, &account.password_hash).map_err(|e| {
            error!(user_id = %account.id, error = %e, "password check failed");
            ProfileError::AuthenticationFailed(e.to_string())
        })?;
        if !matches {
            warn!(user_id = %account.id, "login rejected: wrong password");
            return Err(ProfileError::InvalidCredentials);
        }

        if !account.is_active {
            warn!(user_id = %account.id, "login rejected: account disabled");
            return Err(ProfileError::AccountDisabled);
        }

        info!(user_id = %account.id, "login succeeded");
        Ok(account)
    }

    /// Email a fresh verification code. Does nothing for a verified account.
    ///
    /// The code is stored before sending, so a failed send can be retried
    /// and simply replaces it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown account and `Notification` if the
    /// email cannot be sent.
    pub async fn send_verification_code(&self, user_id: UserId) -> Result<(), ProfileError> {
        let mut account = self.account(user_id).await?;
        if account.is_account_verified {
            return Ok(());
        }

        let (code, challenge) = OtpChallenge::issue(self.policy.verify_ttl, Utc::now());
        account.verify_otp = Some(challenge);
        self.store.save(&account).await?;

        self.notifier
            .send_verification_code(&account.email, &code)
            .await
            .inspect_err(|e| error!(user_id = %user_id, error = %e, "verification email failed"))?;

        info!(user_id = %user_id, "verification code sent");
        Ok(())
    }

    /// Accept a verification code and mark the account verified.
    ///
    /// # Errors
    ///
    /// Returns `Otp(Invalid)` for a missing, blank or wrong code and
    /// `Otp(Expired)` for a late one. Wrong codes are counted and the stored
    /// code is discarded after too many of them.
    pub async fn verify_code(
        &self,
        user_id: UserId,
        code: Option<&str>,
    ) -> Result<(), ProfileError> {
        let mut account = self.account(user_id).await?;

        let had_code = account.verify_otp.is_some();
        let outcome = redeem(&mut account.verify_otp, code.unwrap_or_default(), Utc::now());
        if had_code && outcome == Err(OtpError::Invalid) {
            self.record_miss(&account, account.verify_otp.is_none()).await?;
        }
        outcome?;

        account.is_account_verified = true;
        account.verify_otp = None;
        self.store.save(&account).await?;

        info!(user_id = %user_id, "account verified");
        Ok(())
    }

    /// Email a password reset code.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown email and `Notification` if the
    /// email cannot be sent.
    pub async fn send_reset_code(&self, email: &str) -> Result<(), ProfileError> {
        let email = normalize_email(email);
        let mut account = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(ProfileError::NotFound)?;

        let (code, challenge) = OtpChallenge::issue(self.policy.reset_ttl, Utc::now());
        account.reset_otp = Some(challenge);
        self.store.save(&account).await?;

        self.notifier
            .send_reset_code(&account.email, &code)
            .await
            .inspect_err(|e| error!(user_id = %account.id, error = %e, "reset email failed"))?;

        info!(user_id = %account.id, "reset code sent");
        Ok(())
    }

    /// Replace the password after checking a reset code.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown email, `Validation` for a short
    /// password and `Otp(..)` for a refused code. Wrong codes are counted and
    /// the stored code is discarded after too many of them.
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), ProfileError> {
        let email = normalize_email(email);
        let mut account = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(ProfileError::NotFound)?;

        let had_code = account.reset_otp.is_some();
        let outcome = redeem(&mut account.reset_otp, code, Utc::now());
        if had_code && outcome == Err(OtpError::Invalid) {
            self.record_miss(&account, account.reset_otp.is_none()).await?;
        }
        outcome?;

        check_length(new_password).map_err(|e| ProfileError::Validation(e.to_string()))?;

        account.password_hash =
            hash_password(new_password).map_err(|e| ProfileError::Internal(e.to_string()))?;
        account.reset_otp = None;
        self.store.save(&account).await?;

        info!(user_id = %account.id, "password reset");
        Ok(())
    }

    /// Persists the miss counter after a wrong code.
    async fn record_miss(&self, account: &UserAccount, discarded: bool) -> Result<(), ProfileError> {
        if discarded {
            warn!(user_id = %account.id, "one-time code discarded after repeated misses");
        }
        self.store.save(account).await
    }

    async fn account(&self, user_id: UserId) -> Result<UserAccount, ProfileError> {
        self.store
            .find_by_id(user_id)
            .await?
            .ok_or(ProfileError::NotFound)
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
