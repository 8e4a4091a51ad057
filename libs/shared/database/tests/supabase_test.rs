use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_config::AppConfig;
use shared_database::supabase::{DbError, SupabaseClient};

fn config_for(server: &MockServer) -> AppConfig {
    let mut config = AppConfig::from_env();
    config.supabase_url = server.uri();
    config.supabase_anon_key = "test-anon-key".to_string();
    config.jwt_secret = "test-secret".to_string();
    config
}

#[tokio::test]
async fn select_builds_filtered_path_and_sends_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("email", "eq.jane@gmail.com"))
        .and(header("apikey", "test-anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"email": "jane@gmail.com"}])))
        .mount(&server)
        .await;

    let client = SupabaseClient::new(&config_for(&server));
    let rows = client
        .select("users", "email=eq.jane@gmail.com")
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["email"], "jane@gmail.com");
}

#[tokio::test]
async fn insert_requests_representation() {
    let server = MockServer::start().await;
    let record = json!({"name": "Jane", "rating": 5});

    Mock::given(method("POST"))
        .and(path("/rest/v1/reviews"))
        .and(header("Prefer", "return=representation"))
        .and(body_json(record.clone()))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{"id": 1, "name": "Jane"}])))
        .mount(&server)
        .await;

    let client = SupabaseClient::new(&config_for(&server));
    let rows = client.insert("reviews", record).await.unwrap();

    assert_eq!(rows[0]["id"], 1);
}

#[tokio::test]
async fn conflict_status_maps_to_db_conflict() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(409).set_body_string(
            r#"{"code":"23505","message":"duplicate key value violates unique constraint"}"#,
        ))
        .mount(&server)
        .await;

    let client = SupabaseClient::new(&config_for(&server));
    let result = client
        .insert("appointments", json!({"date": "2026-09-01", "time": "10:00"}))
        .await;

    assert_matches!(result, Err(DbError::Conflict(_)));
}

#[tokio::test]
async fn transport_failure_maps_to_unavailable() {
    // A dedicated listener (instead of the pooled `MockServer::start`) so that
    // dropping the server actually closes the socket and the request fails at
    // the transport layer rather than hitting a still-pooled live server.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let server = MockServer::builder().listener(listener).start().await;
    let client = SupabaseClient::new(&config_for(&server));
    drop(server);

    let result = client.select("users", "").await;
    assert_matches!(result, Err(DbError::Unavailable(_)));
}
