use super::{ApiJson, AppState};
use crate::auth::{token_from_headers, verify_password};
use crate::error::{AppError, Result};
use crate::validation::Checks;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/session", get(session))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
}

#[instrument(skip_all)]
async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse> {
    Checks::new()
        .required(body.email.as_deref(), "Email is required")
        .email(body.email.as_deref())
        .required(body.password.as_deref(), "Password is required")
        .finish()?;

    let email = body.email.unwrap_or_default().trim().to_string();
    let password = body.password.unwrap_or_default();
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let user = match state.storage.get_user_by_email(&email).await? {
        Some(user) => user,
        None => {
            warn!("Login attempt for unknown user {}", email);
            return Err(invalid());
        }
    };
    if !verify_password(&password, &user.password_hash) {
        warn!("Wrong password for {}", email);
        return Err(invalid());
    }

    let token = state.auth.issue(&user)?;
    info!("Admin {} logged in", user.email);
    Ok((
        [(SET_COOKIE, state.auth.login_cookie(&token))],
        Json(json!({
            "success": true,
            "user": SessionUser { id: user.id, email: user.email },
        })),
    ))
}

async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(SET_COOKIE, state.auth.logout_cookie())],
        Json(json!({ "success": true, "message": "Logged out successfully" })),
    )
}

async fn session(State(state): State<AppState>, headers: HeaderMap) -> Result<impl IntoResponse> {
    let token = token_from_headers(&headers)
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))?;
    let claims = state
        .auth
        .verify(&token)
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;
    let user_not_found = || AppError::Unauthorized("User not found".to_string());
    let id = Uuid::parse_str(&claims.sub).map_err(|_| user_not_found())?;
    let user = state.storage.get_user(id).await?.ok_or_else(user_not_found)?;

    Ok(Json(json!({
        "authenticated": true,
        "user": SessionUser { id: user.id, email: user.email },
    })))
}
