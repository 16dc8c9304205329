//! Authentication middleware for protected routes.
//!
//! A session token is read from `Authorization: Bearer <token>` or, failing
//! that, from the `jwt` cookie set at login.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use tracing::warn;

use crate::{AppState, error::ApiError};
use shipsy_shared::types::UserId;
use shipsy_shared::{AppError, Claims, JwtError, JwtService};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "jwt";

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// The presented token, header first, then cookie.
fn presented_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer_token);

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Validates whatever token the request carries.
pub(crate) fn resolve_claims(jwt: &JwtService, headers: &HeaderMap) -> Result<Claims, AppError> {
    let token = presented_token(headers)
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    jwt.validate_token(&token).map_err(|e| {
        warn!(error = %e, "rejected session token");
        match e {
            JwtError::Expired => AppError::Unauthorized("Session has expired".to_string()),
            _ => AppError::Unauthorized("Invalid session token".to_string()),
        }
    })
}

/// Authentication middleware that validates session tokens.
///
/// Valid claims are stored in request extensions for `AuthUser`.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match resolve_claims(&state.jwt_service, request.headers()) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => ApiError(e).into_response(),
    }
}

/// Extractor for the authenticated principal.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.0.user_id()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError(AppError::Unauthorized("Authentication required".to_string())))
    }
}
