//! Authentication primitives.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification and the minimum length rule
//! - One-time codes for account verification and password reset

mod otp;
mod password;

pub use otp::{
    MAX_OTP_ATTEMPTS, OTP_LENGTH, OtpChallenge, OtpError, generate_code, hash_code, redeem,
};
pub use password::{MIN_PASSWORD_LEN, PasswordError, check_length, hash_password, verify_password};
