//! User repository for database operations.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    SqlErr,
};
use shipsy_core::auth::OtpChallenge;
use shipsy_core::profile::{CredentialStore, NewUserAccount, ProfileError, UserAccount};
use shipsy_shared::types::UserId;

use crate::entities::users;

/// User repository implementation.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl CredentialStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, ProfileError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| ProfileError::repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserAccount>, ProfileError> {
        let model = users::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| ProfileError::repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn create(&self, account: NewUserAccount) -> Result<UserAccount, ProfileError> {
        let now = Utc::now().into();
        let email = account.email.clone();
        let user = users::ActiveModel {
            id: Set(UserId::new().into_inner()),
            name: Set(account.name),
            email: Set(account.email),
            password_hash: Set(account.password_hash),
            is_active: Set(true),
            is_account_verified: Set(false),
            verify_otp_hash: Set(None),
            verify_otp_expires_at: Set(None),
            verify_otp_attempts: Set(0),
            reset_otp_hash: Set(None),
            reset_otp_expires_at: Set(None),
            reset_otp_attempts: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = user.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => ProfileError::EmailTaken(email),
            _ => ProfileError::repository(e.to_string()),
        })?;

        Ok(to_domain(model))
    }

    async fn save(&self, account: &UserAccount) -> Result<(), ProfileError> {
        let (verify_hash, verify_expires, verify_attempts) =
            split_challenge(account.verify_otp.as_ref());
        let (reset_hash, reset_expires, reset_attempts) =
            split_challenge(account.reset_otp.as_ref());

        let user = users::ActiveModel {
            id: Set(account.id.into_inner()),
            password_hash: Set(account.password_hash.clone()),
            is_active: Set(account.is_active),
            is_account_verified: Set(account.is_account_verified),
            verify_otp_hash: Set(verify_hash),
            verify_otp_expires_at: Set(verify_expires),
            verify_otp_attempts: Set(verify_attempts),
            reset_otp_hash: Set(reset_hash),
            reset_otp_expires_at: Set(reset_expires),
            reset_otp_attempts: Set(reset_attempts),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };

        match user.update(&self.db).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(ProfileError::NotFound),
            Err(e) => Err(ProfileError::repository(e.to_string())),
        }
    }
}

type StoredChallenge = (
    Option<String>,
    Option<sea_orm::prelude::DateTimeWithTimeZone>,
    i32,
);

fn split_challenge(challenge: Option<&OtpChallenge>) -> StoredChallenge {
    challenge.map_or((None, None, 0), |c| {
        (
            Some(c.code_hash.clone()),
            Some(c.expires_at.into()),
            i32::try_from(c.failed_attempts).unwrap_or(i32::MAX),
        )
    })
}

fn join_challenge(
    hash: Option<String>,
    expires_at: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    attempts: i32,
) -> Option<OtpChallenge> {
    match (hash, expires_at) {
        (Some(code_hash), Some(expires_at)) => Some(OtpChallenge {
            code_hash,
            expires_at: DateTime::<Utc>::from(expires_at),
            failed_attempts: u32::try_from(attempts).unwrap_or_default(),
        }),
        _ => None,
    }
}

fn to_domain(model: users::Model) -> UserAccount {
    UserAccount {
        id: UserId::from_uuid(model.id),
        name: model.name,
        email: model.email,
        password_hash: model.password_hash,
        is_active: model.is_active,
        is_account_verified: model.is_account_verified,
        verify_otp: join_challenge(
            model.verify_otp_hash,
            model.verify_otp_expires_at,
            model.verify_otp_attempts,
        ),
        reset_otp: join_challenge(
            model.reset_otp_hash,
            model.reset_otp_expires_at,
            model.reset_otp_attempts,
        ),
    }
}
