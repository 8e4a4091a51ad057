use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::models::{BookAppointmentRequest, VerifyPaymentRequest};
use crate::services::booking::BookingService;

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = BookingService::new(&state);
    let (appointment, payment) = service.book(&user, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Appointment created! Please proceed with payment.",
            "appointment": appointment,
            "payment": payment,
        })),
    ))
}

#[axum::debug_handler]
pub async fn verify_payment(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<VerifyPaymentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state);
    service.verify_payment(request).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Payment successful! Your appointment is confirmed.",
    })))
}

#[axum::debug_handler]
pub async fn my_appointments(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state);
    let appointments = service.list_for_patient(&user.email).await?;

    Ok(Json(json!({ "appointments": appointments })))
}

#[axum::debug_handler]
pub async fn all_appointments(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state);
    let (appointments, total_patients) = service.list_all().await?;
    let count = appointments.len();

    Ok(Json(json!({
        "appointments": appointments,
        "count": count,
        "total_patients": total_patients,
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state);
    let appointment = service.get(&appointment_id).await?;

    Ok(Json(json!({ "appointment": appointment })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state);
    service.cancel(&appointment_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment cancelled successfully",
    })))
}
