//! Integration tests for the user repository.
//!
//! Need a live PostgreSQL at `DATABASE_URL`; run with `cargo test -- --ignored`.

mod common;

use chrono::{Duration, Utc};
use shipsy_core::auth::{OtpChallenge, hash_code};
use shipsy_core::profile::{CredentialStore, NewUserAccount, ProfileError};
use shipsy_db::UserRepository;
use shipsy_shared::types::UserId;

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_user_create_and_find() {
    let db = common::connect().await;
    let repo = UserRepository::new(db.clone());
    let user = common::new_user(&db).await;

    assert!(user.is_active);
    assert!(!user.is_account_verified);

    let by_id = repo.find_by_id(user.id).await.unwrap().unwrap();
    let by_email = repo.find_by_email(&user.email).await.unwrap().unwrap();

    assert_eq!(by_id, user);
    assert_eq!(by_email, user);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_duplicate_email_is_taken() {
    let db = common::connect().await;
    let repo = UserRepository::new(db.clone());
    let user = common::new_user(&db).await;

    let result = repo
        .create(NewUserAccount {
            name: "Copy".to_string(),
            email: user.email.clone(),
            password_hash: "$argon2id$other".to_string(),
        })
        .await;

    assert!(matches!(result, Err(ProfileError::EmailTaken(_))));
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_save_persists_codes_and_verification() {
    let db = common::connect().await;
    let repo = UserRepository::new(db.clone());
    let mut user = common::new_user(&db).await;

    let expires_at = Utc::now() + Duration::minutes(15);
    user.reset_otp = Some(OtpChallenge {
        code_hash: hash_code("123456"),
        expires_at,
        failed_attempts: 2,
    });
    user.is_account_verified = true;
    repo.save(&user).await.unwrap();

    let stored = repo.find_by_id(user.id).await.unwrap().unwrap();
    let challenge = stored.reset_otp.unwrap();
    assert!(stored.is_account_verified);
    assert_eq!(challenge.code_hash, hash_code("123456"));
    assert_eq!(challenge.expires_at.timestamp(), expires_at.timestamp());
    assert_eq!(challenge.failed_attempts, 2);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_save_unknown_user_is_not_found() {
    let db = common::connect().await;
    let repo = UserRepository::new(db.clone());
    let mut user = common::new_user(&db).await;
    user.id = UserId::new();

    assert!(matches!(repo.save(&user).await, Err(ProfileError::NotFound)));
}
