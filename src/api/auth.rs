use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::convert::Infallible;
use std::sync::Arc;
use tower_sessions::Session;

use super::types::{
    ApiKeyResponse, ChangePasswordRequest, LoginRequest, MessageResponse, ResetPasswordRequest,
    ResetRequest, SignupRequest, UserResponse,
};
use super::validation::{optional, require, validate_email};
use super::{ApiError, AppState};
use crate::domain::{UserId, Viewer};
use crate::services::{LoginResult, Signup};

const SESSION_USER_KEY: &str = "user";

const RESET_REQUESTED: &str = "If your email exists, you'll receive a reset link.";

// ============================================================================
// Middleware
// ============================================================================

/// Resolves the caller into a [`Viewer`] and stores it in the request
/// extensions. Checks, in order:
/// 1. Session cookie (from login)
/// 2. `X-Api-Key` header
/// 3. `Authorization: Bearer <api_key>` header
///
/// Requests without valid credentials continue anonymously.
pub async fn resolve_viewer(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    let mut viewer = None;

    if let Ok(Some(user_id)) = session.get::<String>(SESSION_USER_KEY).await {
        match state
            .auth_service()
            .viewer_for_user(&UserId::from(user_id))
            .await
        {
            Ok(found) => viewer = found,
            Err(e) => tracing::warn!(error = %e, "Failed to resolve session user"),
        }
    }

    if viewer.is_none()
        && let Some(key) = extract_api_key(&headers)
    {
        match state.auth_service().viewer_for_api_key(&key).await {
            Ok(found) => viewer = found,
            Err(e) => tracing::warn!(error = %e, "Failed to verify API key"),
        }
    }

    if let Some(viewer) = viewer {
        tracing::Span::current().record("user_id", viewer.user_id.as_str());
        request.extensions_mut().insert(viewer);
    }

    next.run(request).await
}

/// Rejects anonymous callers with 401.
pub async fn require_viewer(request: Request, next: Next) -> Result<Response, ApiError> {
    if request.extensions().get::<Viewer>().is_none() {
        return Err(ApiError::unauthorized());
    }
    Ok(next.run(request).await)
}

/// Rejects anonymous callers with 401 and non-admins with 403.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    match request.extensions().get::<Viewer>() {
        None => Err(ApiError::unauthorized()),
        Some(viewer) if !viewer.is_admin() => {
            Err(ApiError::Forbidden("Admin access required".to_string()))
        }
        Some(_) => Ok(next.run(request).await),
    }
}

fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    if let Some(api_key) = headers.get("X-Api-Key")
        && let Ok(key_str) = api_key.to_str()
    {
        return Some(key_str.trim().to_string());
    }

    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

// ============================================================================
// Extractors
// ============================================================================

/// The authenticated caller; 401 when there is none.
pub struct CurrentViewer(pub Viewer);

impl<S: Send + Sync> FromRequestParts<S> for CurrentViewer {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Viewer>()
            .cloned()
            .map(Self)
            .ok_or_else(ApiError::unauthorized)
    }
}

/// The caller, if authenticated.
pub struct MaybeViewer(pub Option<Viewer>);

impl<S: Send + Sync> FromRequestParts<S> for MaybeViewer {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<Viewer>().cloned()))
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = require(payload.name.as_deref(), "name")?;
    let email = validate_email(require(payload.email.as_deref(), "email")?)?;
    let password = require(payload.password.as_deref(), "password")?;

    let user = state
        .auth_service()
        .signup(Signup {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            phone: optional(payload.phone),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

/// POST /auth/login
/// Authenticate with email and password; starts a session and returns the
/// API key.
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResult>, ApiError> {
    if payload.email.trim().is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let result = state
        .auth_service()
        .login(&payload.email, &payload.password)
        .await?;

    session.cycle_id().await.ok();
    if let Err(e) = session
        .insert(SESSION_USER_KEY, result.viewer.user_id.as_str())
        .await
    {
        return Err(ApiError::internal(format!("Failed to create session: {e}")));
    }

    tracing::info!(user_id = %result.viewer.user_id, "User logged in");
    Ok(Json(result))
}

/// POST /auth/logout
pub async fn logout(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    (StatusCode::OK, "Logged out")
}

/// GET /auth/me
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    CurrentViewer(viewer): CurrentViewer,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.auth_service().get_user_info(&viewer.user_id).await?;
    Ok(Json(UserResponse { user }))
}

/// PUT /auth/password
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    CurrentViewer(viewer): CurrentViewer,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .auth_service()
        .change_password(
            &viewer.user_id,
            &payload.current_password,
            &payload.new_password,
        )
        .await?;

    tracing::info!(user_id = %viewer.user_id, "Password changed");

    Ok(Json(MessageResponse {
        message: "Password updated successfully".to_string(),
    }))
}

/// GET /auth/api-key
pub async fn get_api_key(
    State(state): State<Arc<AppState>>,
    CurrentViewer(viewer): CurrentViewer,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    let api_key = state.auth_service().get_api_key(&viewer.user_id).await?;
    Ok(Json(ApiKeyResponse { api_key }))
}

/// POST /auth/api-key/regenerate
pub async fn regenerate_api_key(
    State(state): State<Arc<AppState>>,
    CurrentViewer(viewer): CurrentViewer,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    let api_key = state
        .auth_service()
        .regenerate_api_key(&viewer.user_id)
        .await?;

    tracing::info!(user_id = %viewer.user_id, "API key regenerated");
    Ok(Json(ApiKeyResponse { api_key }))
}

/// POST /auth/request-reset
/// Replies identically whether or not the email has an account.
pub async fn request_reset(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ResetRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = require(payload.email.as_deref(), "email")?;

    state.auth_service().request_password_reset(email).await?;

    Ok(Json(MessageResponse {
        message: RESET_REQUESTED.to_string(),
    }))
}

/// POST /auth/reset-password
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let (Some(token), Some(password)) = (
        optional(payload.token),
        payload.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::validation("Invalid request"));
    };

    state
        .auth_service()
        .reset_password(&token, &password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password reset successful".to_string(),
    }))
}
