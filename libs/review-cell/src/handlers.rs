use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{AddReviewRequest, ContactRequest, ReviewBoard};
use crate::services::feedback::FeedbackService;

#[axum::debug_handler]
pub async fn get_reviews(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<ReviewBoard>, AppError> {
    let service = FeedbackService::new(&state);
    Ok(Json(service.board().await?))
}

#[axum::debug_handler]
pub async fn add_review(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<AddReviewRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = FeedbackService::new(&state);
    let review = service.add_review(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Thank you for your review!",
            "review": review,
        })),
    ))
}

#[axum::debug_handler]
pub async fn contact(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<ContactRequest>,
) -> Result<Json<Value>, AppError> {
    let service = FeedbackService::new(&state);
    service.add_contact_message(request).await?;

    Ok(Json(json!({
        "message": "Thank you for contacting us! We will get back to you soon.",
    })))
}
