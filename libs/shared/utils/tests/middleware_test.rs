use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    routing::get,
    Extension, Router,
};
use tower::ServiceExt;

use shared_models::auth::AuthUser;
use shared_utils::extractor::{auth_middleware, require_admin};
use shared_utils::test_utils::{test_config, TestUser, TEST_JWT_SECRET};

async fn whoami(Extension(user): Extension<AuthUser>) -> String {
    format!("{} ({})", user.email, user.role)
}

fn patient_router() -> Router {
    let state = Arc::new(test_config());
    Router::new()
        .route("/me", get(whoami))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn admin_router() -> Router {
    let state = Arc::new(test_config());
    Router::new()
        .route("/admin", get(whoami))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn get_with_token(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn valid_patient_token_passes_the_gate() {
    let token = TestUser::patient("jane@gmail.com").token(TEST_JWT_SECRET);
    let response = patient_router()
        .oneshot(get_with_token("/me", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_token_is_unauthenticated() {
    let response = patient_router()
        .oneshot(get_with_token("/me", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_unauthenticated() {
    let token = TestUser::patient("jane@gmail.com").expired_token(TEST_JWT_SECRET);
    let response = patient_router()
        .oneshot(get_with_token("/me", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn forged_signature_is_unauthenticated() {
    let token = TestUser::patient("jane@gmail.com").token("some-other-secret");
    let response = patient_router()
        .oneshot(get_with_token("/me", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn patient_role_is_forbidden_on_admin_routes() {
    let token = TestUser::patient("jane@gmail.com").token(TEST_JWT_SECRET);
    let response = admin_router()
        .oneshot(get_with_token("/admin", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_role_passes_admin_routes() {
    let token = TestUser::admin("ops@hospital.com").token(TEST_JWT_SECRET);
    let response = admin_router()
        .oneshot(get_with_token("/admin", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
