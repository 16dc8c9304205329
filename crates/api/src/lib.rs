//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST routes for shipments, sessions and account recovery
//! - Authentication middleware and the `AuthUser` extractor
//! - Mapping of domain errors to HTTP responses

pub mod error;
pub mod middleware;
pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use shipsy_core::profile::{OtpPolicy, ProfileService};
use shipsy_core::shipment::ShipmentService;
use shipsy_db::{ShipmentRepository, UserRepository};
use shipsy_shared::{EmailService, JwtService};

pub use error::{ApiError, ApiResult};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Email service for one-time codes.
    pub email_service: Arc<EmailService>,
    /// Lifetimes of one-time codes.
    pub otp_policy: OtpPolicy,
    /// Whether the session cookie is marked `Secure`.
    pub secure_cookies: bool,
}

impl AppState {
    /// Shipment service backed by the database.
    #[must_use]
    pub fn shipment_service(&self) -> ShipmentService<ShipmentRepository> {
        ShipmentService::new(Arc::new(ShipmentRepository::new((*self.db).clone())))
    }

    /// Profile service backed by the database and SMTP.
    #[must_use]
    pub fn profile_service(&self) -> ProfileService<UserRepository, EmailService> {
        ProfileService::new(
            Arc::new(UserRepository::new((*self.db).clone())),
            Arc::clone(&self.email_service),
            self.otp_policy,
        )
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
