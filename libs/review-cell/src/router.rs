use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

/// Public feedback surface: reviews listing/creation.
pub fn review_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::get_reviews).post(handlers::add_review))
        .with_state(state)
}

/// Public contact form.
pub fn contact_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::contact))
        .with_state(state)
}
