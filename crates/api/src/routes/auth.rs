//! Session, registration and account recovery routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::{
    CookieJar, WithRejection,
    cookie::{Cookie, SameSite},
};
use tracing::{error, info};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::{AuthUser, SESSION_COOKIE, auth::resolve_claims};
use shipsy_core::profile::{Profile, RegisterRequest};
use shipsy_shared::AppError;
use shipsy_shared::auth::{
    AuthResponse, LoginRequest, ResetOtpQuery, ResetPasswordRequest, VerifyOtpRequest,
};

/// Routes that work without a session.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/is-authenticated", get(is_authenticated))
        .route("/register", post(register))
        .route("/send-reset-otp", post(send_reset_otp))
        .route("/reset-password", post(reset_password))
}

/// Routes that act on the signed-in account.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile))
        .route("/send-otp", post(send_otp))
        .route("/verify-otp", post(verify_otp))
}

fn session_cookie(value: String, max_age: time::Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(max_age)
        .build()
}

/// POST /login - Check credentials and start a session.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> ApiResult<(CookieJar, Json<AuthResponse>)> {
    let account = state
        .profile_service()
        .authenticate(&payload.email, &payload.password)
        .await?;

    let token = state
        .jwt_service
        .generate_token(account.id.into_inner(), &account.email)
        .map_err(|e| {
            error!(error = %e, "failed to sign session token");
            AppError::Internal(e.to_string())
        })?;

    let cookie = session_cookie(
        token.clone(),
        time::Duration::seconds(state.jwt_service.token_expires_in()),
        state.secure_cookies,
    );

    Ok((
        jar.add(cookie),
        Json(AuthResponse {
            email: account.email,
            token,
        }),
    ))
}

/// POST /logout - Expire the session cookie.
async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let cookie = session_cookie(String::new(), time::Duration::ZERO, state.secure_cookies);
    (jar.add(cookie), "Logged out successfully!")
}

/// GET /is-authenticated - Whether the request carries a valid session.
async fn is_authenticated(State(state): State<AppState>, headers: HeaderMap) -> Json<bool> {
    Json(resolve_claims(&state.jwt_service, &headers).is_ok())
}

/// POST /register - Create an unverified account.
async fn register(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<Profile>)> {
    let profile = state.profile_service().register(payload).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// POST /send-reset-otp?email= - Email a password reset code.
async fn send_reset_otp(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<ResetOtpQuery>, ApiError>,
) -> ApiResult<StatusCode> {
    state.profile_service().send_reset_code(&query.email).await?;
    Ok(StatusCode::OK)
}

/// POST /reset-password - Replace the password using a reset code.
async fn reset_password(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<ResetPasswordRequest>, ApiError>,
) -> ApiResult<StatusCode> {
    state
        .profile_service()
        .reset_password(&payload.email, &payload.otp, &payload.new_password)
        .await?;

    info!("password reset completed");
    Ok(StatusCode::OK)
}

/// GET /profile - The signed-in account.
async fn profile(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Profile>> {
    let profile = state.profile_service().profile(auth.user_id()).await?;
    Ok(Json(profile))
}

/// POST /send-otp - Email a verification code to the signed-in account.
async fn send_otp(State(state): State<AppState>, auth: AuthUser) -> ApiResult<StatusCode> {
    state
        .profile_service()
        .send_verification_code(auth.user_id())
        .await?;
    Ok(StatusCode::OK)
}

/// POST /verify-otp - Confirm the signed-in account's email.
async fn verify_otp(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Json(payload), _): WithRejection<Json<VerifyOtpRequest>, ApiError>,
) -> ApiResult<StatusCode> {
    state
        .profile_service()
        .verify_code(auth.user_id(), payload.otp.as_deref())
        .await?;
    Ok(StatusCode::OK)
}
