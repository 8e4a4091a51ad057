use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::SendMessageRequest;
use crate::services::reports::AdminService;

#[axum::debug_handler]
pub async fn dashboard_stats(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = AdminService::new(&state);
    let stats = service.dashboard().await?;

    Ok(Json(json!({ "stats": stats })))
}

#[axum::debug_handler]
pub async fn patients(State(state): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let service = AdminService::new(&state);
    let patients = service.patients().await?;
    let count = patients.len();

    Ok(Json(json!({ "patients": patients, "count": count })))
}

#[axum::debug_handler]
pub async fn messages(State(state): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let service = AdminService::new(&state);
    let messages = service.messages().await?;
    let count = messages.len();

    Ok(Json(json!({ "messages": messages, "count": count })))
}

#[axum::debug_handler]
pub async fn send_message(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AdminService::new(&state);
    service.send_message(request).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Message sent successfully!",
    })))
}

#[axum::debug_handler]
pub async fn login_activity(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = AdminService::new(&state);
    let activity = service.login_activity().await?;
    let count = activity.len();

    Ok(Json(json!({ "login_activity": activity, "count": count })))
}
