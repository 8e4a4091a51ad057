use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::services::invoices::BillingService;

#[axum::debug_handler]
pub async fn invoices(State(state): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let service = BillingService::new(&state);
    let invoices = service.invoices().await?;
    let count = invoices.len();

    Ok(Json(json!({ "invoices": invoices, "count": count })))
}

#[axum::debug_handler]
pub async fn summary(State(state): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let service = BillingService::new(&state);
    let summary = service.summary().await?;

    Ok(Json(json!({ "summary": summary })))
}

#[axum::debug_handler]
pub async fn download_invoice(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<String>,
) -> Result<Html<String>, AppError> {
    let service = BillingService::new(&state);
    Ok(Html(service.render_invoice(&appointment_id).await?))
}
