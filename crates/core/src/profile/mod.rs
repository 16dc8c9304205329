//! User profiles and account recovery.
//!
//! This module provides business logic for:
//! - Registration
//! - Login credential checks
//! - Email verification with one-time codes
//! - Password reset with one-time codes

mod error;
mod notifier;
mod service;
mod types;

pub use error::ProfileError;
pub use notifier::OtpNotifier;
pub use service::{CredentialStore, OtpPolicy, ProfileService};
pub use types::{NewUserAccount, Profile, RegisterRequest, UserAccount};
