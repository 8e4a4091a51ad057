use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::{auth_middleware, require_admin};

use crate::handlers;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new()
        .route("/verify-payment", post(handlers::verify_payment))
        .route("/{appointment_id}", get(handlers::get_appointment));

    let protected_routes = Router::new()
        .route("/book", post(handlers::book_appointment))
        .route("/my", get(handlers::my_appointments))
        .route("/{appointment_id}", delete(handlers::cancel_appointment))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin_routes = Router::new()
        .route("/all", get(handlers::all_appointments))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .with_state(state)
}
