use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use admin_cell::models::SendMessageRequest;
use admin_cell::services::reports::AdminService;
use shared_utils::test_utils::{test_config_with_store, MockSupabaseRows};

#[tokio::test]
async fn dashboard_reads_the_full_booking_history() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::appointment(
                "APT1001",
                "jane@gmail.com",
                "2026-08-27",
                "10:00",
                "confirmed",
                "completed",
            ),
            MockSupabaseRows::appointment(
                "APT1002",
                "bob@gmail.com",
                "2026-08-27",
                "11:00",
                "cancelled",
                "cancelled",
            ),
        ])))
        .mount(&server)
        .await;

    let config = test_config_with_store(&server.uri());
    let service = AdminService::new(&config);

    let stats = service.dashboard().await.expect("stats should load");
    assert_eq!(stats.total_patients, 1);
    assert_eq!(stats.total_appointments, 1);
    assert_eq!(stats.completed_appointments, 1);
}

#[tokio::test]
async fn roster_counts_visits_per_patient() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::appointment(
                "APT1001",
                "jane@gmail.com",
                "2026-08-10",
                "10:00",
                "confirmed",
                "completed",
            ),
            MockSupabaseRows::appointment(
                "APT1002",
                "jane@gmail.com",
                "2026-08-20",
                "11:00",
                "pending",
                "pending",
            ),
        ])))
        .mount(&server)
        .await;

    let config = test_config_with_store(&server.uri());
    let service = AdminService::new(&config);

    let roster = service.patients().await.expect("roster should load");
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].total_appointments, 2);
    assert_eq!(roster[0].last_visit.to_string(), "2026-08-20");
}

#[tokio::test]
async fn admin_messages_are_stamped_and_stored() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/admin_messages"))
        .and(body_partial_json(json!({
            "recipient_email": "jane@gmail.com",
            "sent_by": "admin",
            "status": "sent"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{}])))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config_with_store(&server.uri());
    let service = AdminService::new(&config);

    service
        .send_message(SendMessageRequest {
            recipient_email: "jane@gmail.com".to_string(),
            recipient_name: Some("Jane".to_string()),
            message: "Your results are ready.".to_string(),
        })
        .await
        .expect("message should be stored");
}

#[tokio::test]
async fn login_activity_requests_the_newest_fifty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/login_history"))
        .and(query_param("order", "timestamp.desc"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::login_activity("jane@gmail.com", "patient", "success"),
        ])))
        .mount(&server)
        .await;

    let config = test_config_with_store(&server.uri());
    let service = AdminService::new(&config);

    let activity = service.login_activity().await.expect("activity should load");
    assert_eq!(activity.len(), 1);
}
