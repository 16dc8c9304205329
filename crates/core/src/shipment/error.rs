//! Shipment error types.

use shipsy_shared::AppError;
use thiserror::Error;

/// Shipment operation errors.
#[derive(Debug, Error)]
pub enum ShipmentError {
    /// Request failed validation.
    #[error("{0}")]
    Validation(String),

    /// No shipment with this id exists.
    #[error("Shipment not found: {0}")]
    NotFound(i64),

    /// The shipment belongs to another user.
    #[error("Not allowed to access shipment {0}")]
    Forbidden(i64),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl ShipmentError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

impl From<ShipmentError> for AppError {
    fn from(err: ShipmentError) -> Self {
        match err {
            ShipmentError::Validation(msg) => Self::Validation(msg),
            ShipmentError::NotFound(_) => Self::NotFound("Shipment not found".to_string()),
            ShipmentError::Forbidden(_) => {
                Self::Forbidden("You are not allowed to access this shipment".to_string())
            }
            ShipmentError::Repository(msg) => Self::Database(msg),
        }
    }
}
