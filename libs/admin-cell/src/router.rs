use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::{auth_middleware, require_admin};

use crate::handlers;

/// Everything here requires an authenticated admin.
pub fn admin_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/reports/dashboard", get(handlers::dashboard_stats))
        .route("/patients", get(handlers::patients))
        .route("/messages", get(handlers::messages))
        .route("/send-message", post(handlers::send_message))
        .route("/login-activity", get(handlers::login_activity))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}
