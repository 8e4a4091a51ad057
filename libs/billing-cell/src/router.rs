use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_config::AppConfig;
use shared_utils::extractor::{auth_middleware, require_admin};

use crate::handlers;

/// Billing is an admin surface end to end.
pub fn billing_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/invoices", get(handlers::invoices))
        .route(
            "/invoices/{appointment_id}/download",
            get(handlers::download_invoice),
        )
        .route("/summary", get(handlers::summary))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}
