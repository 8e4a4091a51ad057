use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_cell::models::{AccountError, LoginRequest, SignupRequest, UpdateProfileRequest};
use auth_cell::services::account::AccountService;
use auth_cell::services::password::hash_password;
use shared_utils::jwt::validate_token;
use shared_utils::test_utils::{test_config_with_store, TEST_JWT_SECRET};

fn signup_request(email: &str) -> SignupRequest {
    SignupRequest {
        name: Some("Jane Doe".to_string()),
        email: email.to_string(),
        password: "s3cret-pass".to_string(),
    }
}

fn stored_user(email: &str, role: &str, password_hash: &str) -> serde_json::Value {
    json!({
        "id": 1,
        "name": "Jane Doe",
        "email": email,
        "password": password_hash,
        "phone": "+1234567890",
        "role": role,
        "is_active": true,
        "created_at": "2026-01-01T00:00:00+00:00"
    })
}

#[tokio::test]
async fn signup_stores_a_patient_and_issues_a_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .and(body_partial_json(json!({"role": "patient"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            stored_user("jane@gmail.com", "patient", "$argon2id$stub")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config_with_store(&server.uri());
    let service = AccountService::new(&config);

    let (token, profile) = service
        .signup(signup_request("jane@gmail.com"))
        .await
        .expect("signup should succeed");

    assert_eq!(profile.email, "jane@gmail.com");
    assert_eq!(profile.role, "patient");

    let claims = validate_token(&token, TEST_JWT_SECRET).unwrap();
    assert_eq!(claims.email, "jane@gmail.com");
    assert_eq!(claims.role, "patient");
}

#[tokio::test]
async fn signup_rejects_a_duplicate_email() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            stored_user("jane@gmail.com", "patient", "$argon2id$stub")
        ])))
        .mount(&server)
        .await;

    let config = test_config_with_store(&server.uri());
    let service = AccountService::new(&config);

    let err = service
        .signup(signup_request("jane@gmail.com"))
        .await
        .unwrap_err();
    assert_matches!(err, AccountError::EmailTaken);
}

#[tokio::test]
async fn signup_rejects_a_malformed_email() {
    let server = MockServer::start().await;
    let config = test_config_with_store(&server.uri());
    let service = AccountService::new(&config);

    let err = service
        .signup(signup_request("not-an-email"))
        .await
        .unwrap_err();
    assert_matches!(err, AccountError::InvalidEmail);
}

#[tokio::test]
async fn login_uses_the_stored_role_and_records_the_attempt() {
    let server = MockServer::start().await;
    let hash = hash_password("s3cret-pass").unwrap();

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("email", "eq.ops@clinic.org"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            stored_user("ops@clinic.org", "admin", &hash)
        ])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/login_history"))
        .and(body_partial_json(json!({"status": "success"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{}])))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config_with_store(&server.uri());
    let service = AccountService::new(&config);

    let (token, profile) = service
        .login(
            LoginRequest {
                email: "ops@clinic.org".to_string(),
                password: "s3cret-pass".to_string(),
            },
            &Default::default(),
        )
        .await
        .expect("login should succeed");

    assert_eq!(profile.role, "admin");
    let claims = validate_token(&token, TEST_JWT_SECRET).unwrap();
    assert_eq!(claims.role, "admin");
}

#[tokio::test]
async fn login_with_a_wrong_password_fails_and_is_recorded() {
    let server = MockServer::start().await;
    let hash = hash_password("s3cret-pass").unwrap();

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            stored_user("jane@gmail.com", "patient", &hash)
        ])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/login_history"))
        .and(body_partial_json(json!({"status": "failed"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{}])))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config_with_store(&server.uri());
    let service = AccountService::new(&config);

    let err = service
        .login(
            LoginRequest {
                email: "jane@gmail.com".to_string(),
                password: "wrong-pass".to_string(),
            },
            &Default::default(),
        )
        .await
        .unwrap_err();
    assert_matches!(err, AccountError::InvalidCredentials);
}

#[tokio::test]
async fn login_for_an_unknown_user_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/login_history"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{}])))
        .mount(&server)
        .await;

    let config = test_config_with_store(&server.uri());
    let service = AccountService::new(&config);

    let err = service
        .login(
            LoginRequest {
                email: "ghost@gmail.com".to_string(),
                password: "whatever".to_string(),
            },
            &Default::default(),
        )
        .await
        .unwrap_err();
    assert_matches!(err, AccountError::InvalidCredentials);
}

#[tokio::test]
async fn profile_update_patches_only_the_given_fields() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/users"))
        .and(query_param("email", "eq.jane@gmail.com"))
        .and(body_partial_json(json!({"phone": "+1987654321"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            stored_user("jane@gmail.com", "patient", "$argon2id$stub")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config_with_store(&server.uri());
    let service = AccountService::new(&config);

    service
        .update_profile(
            "jane@gmail.com",
            UpdateProfileRequest {
                name: None,
                phone: Some("+1987654321".to_string()),
                password: None,
            },
        )
        .await
        .expect("update should succeed");
}

#[tokio::test]
async fn empty_profile_update_is_rejected() {
    let server = MockServer::start().await;
    let config = test_config_with_store(&server.uri());
    let service = AccountService::new(&config);

    let err = service
        .update_profile(
            "jane@gmail.com",
            UpdateProfileRequest {
                name: None,
                phone: None,
                password: None,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, AccountError::EmptyUpdate);
}
