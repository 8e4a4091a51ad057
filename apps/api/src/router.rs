use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use admin_cell::router::admin_routes;
use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use billing_cell::router::billing_routes;
use review_cell::router::{contact_routes, review_routes};
use shared_config::AppConfig;

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Hospital Management System",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Public settings the booking frontend needs before any login.
async fn public_config(State(state): State<Arc<AppConfig>>) -> Json<Value> {
    Json(json!({
        "hospital_name": state.hospital_name,
        "departments": state.departments,
        "consultation_modes": state.consultation_modes,
        "currency": state.currency,
        "tax_rate": state.tax_rate_percent(),
        "payment_gateway_key": state.payment_gateway_key,
    }))
}

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Hospital API is running!" }))
        .route("/api/health", get(health))
        .route(
            "/api/config",
            get(public_config).with_state(state.clone()),
        )
        .nest("/api/auth", auth_routes(state.clone()))
        .nest("/api/appointments", appointment_routes(state.clone()))
        .nest("/api/billing", billing_routes(state.clone()))
        .nest("/api/admin", admin_routes(state.clone()))
        .nest("/api/reviews", review_routes(state.clone()))
        .nest("/api/contact", contact_routes(state))
}
