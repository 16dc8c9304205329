//! One-time codes delivered by email.
//!
//! Only the SHA-256 hash of a code is ever stored. A challenge is consumed by
//! the caller clearing it after a successful check, and discarded after
//! `MAX_OTP_ATTEMPTS` wrong guesses.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Number of digits in a code.
pub const OTP_LENGTH: usize = 6;

/// Wrong guesses a challenge survives before it is discarded.
pub const MAX_OTP_ATTEMPTS: u32 = 5;

/// Reasons a presented code is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OtpError {
    /// Code missing, blank, or not the one issued.
    #[error("Invalid OTP")]
    Invalid,
    /// Code matched but its lifetime has passed.
    #[error("OTP Expired")]
    Expired,
}

/// A stored, not yet used code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpChallenge {
    /// Hex SHA-256 of the code.
    pub code_hash: String,
    /// Instant after which the code is refused.
    pub expires_at: DateTime<Utc>,
    /// Wrong codes presented so far.
    pub failed_attempts: u32,
}

impl OtpChallenge {
    /// Issues a fresh code valid for `ttl` from `now`.
    ///
    /// Returns the plain code (to be emailed) and the challenge to store.
    #[must_use]
    pub fn issue(ttl: Duration, now: DateTime<Utc>) -> (String, Self) {
        let code = generate_code();
        let challenge = Self {
            code_hash: hash_code(&code),
            expires_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
            failed_attempts: 0,
        };
        (code, challenge)
    }

    /// Checks a presented code against this challenge.
    ///
    /// # Errors
    ///
    /// Returns `OtpError::Invalid` for a blank or wrong code and
    /// `OtpError::Expired` for a correct code presented too late.
    pub fn check(&self, presented: &str, now: DateTime<Utc>) -> Result<(), OtpError> {
        let presented = presented.trim();
        if presented.is_empty() || hash_code(presented) != self.code_hash {
            return Err(OtpError::Invalid);
        }
        if now > self.expires_at {
            return Err(OtpError::Expired);
        }
        Ok(())
    }
}

/// Checks a presented code against the challenge held in `slot`.
///
/// A wrong code is counted on the challenge; the challenge is dropped from
/// `slot` once it reaches `MAX_OTP_ATTEMPTS` misses. An empty slot refuses
/// every code.
///
/// # Errors
///
/// Same as [`OtpChallenge::check`].
pub fn redeem(
    slot: &mut Option<OtpChallenge>,
    presented: &str,
    now: DateTime<Utc>,
) -> Result<(), OtpError> {
    let challenge = slot.as_mut().ok_or(OtpError::Invalid)?;
    let outcome = challenge.check(presented, now);

    if outcome == Err(OtpError::Invalid) {
        challenge.failed_attempts = challenge.failed_attempts.saturating_add(1);
        if challenge.failed_attempts >= MAX_OTP_ATTEMPTS {
            *slot = None;
        }
    }
    outcome
}

/// Generates a zero-padded numeric code of `OTP_LENGTH` digits.
#[must_use]
pub fn generate_code() -> String {
    let value: u32 = rand::rng().random_range(0..1_000_000);
    format!("{value:06}")
}

/// Hashes a code for storage.
#[must_use]
pub fn hash_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    format!("{:x}", hasher.finalize())
}
