use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::{AuthUser, TokenResponse};
use shared_models::error::AppError;
use shared_utils::jwt::validate_token;

use crate::models::{ClientMeta, LoginRequest, SignupRequest, UpdateProfileRequest};
use crate::services::account::AccountService;

fn client_meta(headers: &HeaderMap) -> ClientMeta {
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let browser = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.chars().take(100).collect())
        .unwrap_or_else(|| "Unknown".to_string());

    ClientMeta {
        ip_address,
        browser,
    }
}

#[axum::debug_handler]
pub async fn signup(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = AccountService::new(&state);
    let (token, user) = service.signup(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Signup successful! You are now logged in.",
            "token": token,
            "user": user,
        })),
    ))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppConfig>>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AccountService::new(&state);
    let meta = client_meta(&headers);
    let (token, user) = service.login(request, &meta).await?;

    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        "user": user,
    })))
}

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let service = AccountService::new(&state);
    let profile = service.profile(&user.email).await?;

    Ok(Json(json!({ "user": profile })))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AccountService::new(&state);
    service.update_profile(&user.email, request).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully",
    })))
}

/// Public token introspection. Never errors on a bad token; the caller
/// gets `valid: false` instead.
#[axum::debug_handler]
pub async fn validate(
    State(state): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Json<TokenResponse> {
    let token = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let response = match token.map(|t| validate_token(t, &state.jwt_secret)) {
        Some(Ok(user)) => TokenResponse {
            valid: true,
            email: Some(user.email),
            role: Some(user.role),
        },
        other => {
            if let Some(Err(err)) = other {
                debug!("Token introspection rejected a credential: {}", err);
            }
            TokenResponse {
                valid: false,
                email: None,
                role: None,
            }
        }
    };

    Json(response)
}
