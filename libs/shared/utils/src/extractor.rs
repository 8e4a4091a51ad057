use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::jwt::{validate_token, AuthError};

fn bearer_token(request: &Request<Body>) -> Result<&str, AuthError> {
    let auth_value = request
        .headers()
        .get("Authorization")
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::Malformed)?;

    auth_value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::Malformed)
}

/// Token gate: validates the bearer credential and attaches the identity
/// and role to the request for downstream handlers.
pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request)?;
    let user = validate_token(token, &config.jwt_secret)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Admin-only variant, layered after `auth_middleware`. Rejects any
/// authenticated caller whose stored role is not `admin`.
pub async fn require_admin(request: Request<Body>, next: Next) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| AppError::Unauthenticated("Authentication required".to_string()))?;

    if !user.is_admin() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    Ok(next.run(request).await)
}
