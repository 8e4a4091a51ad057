use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::models::PaymentStatus;
use billing_cell::services::invoices::BillingService;
use shared_utils::test_utils::{test_config_with_store, MockSupabaseRows};

async fn mock_billed(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("payment_status", "in.(completed,refunded)"))
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
                "bob@gmail.com",
                "2026-08-12",
                "11:00",
                "cancelled",
                "refunded",
            ),
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn invoices_are_derived_from_billed_appointments() {
    let server = MockServer::start().await;
    mock_billed(&server).await;

    let config = test_config_with_store(&server.uri());
    let service = BillingService::new(&config);

    let invoices = service.invoices().await.expect("invoices should load");
    assert_eq!(invoices.len(), 2);
    assert_eq!(invoices[0].invoice_no, "INV-APT1001");
    assert_eq!(invoices[0].total, 590.0);
    assert_eq!(invoices[1].payment_status, PaymentStatus::Refunded);
}

#[tokio::test]
async fn summary_splits_collected_and_refunded() {
    let server = MockServer::start().await;
    mock_billed(&server).await;

    let config = test_config_with_store(&server.uri());
    let service = BillingService::new(&config);

    let summary = service.summary().await.expect("summary should load");
    assert_eq!(summary.collected, 590.0);
    assert_eq!(summary.refunded, 590.0);
    assert_eq!(summary.total_invoices, 2);
}

#[tokio::test]
async fn invoice_download_renders_the_appointment() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("appointment_id", "eq.APT1001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::appointment(
                "APT1001",
                "jane@gmail.com",
                "2026-08-10",
                "10:00",
                "confirmed",
                "completed",
            ),
        ])))
        .mount(&server)
        .await;

    let config = test_config_with_store(&server.uri());
    let service = BillingService::new(&config);

    let html = service
        .render_invoice("APT1001")
        .await
        .expect("invoice should render");
    assert!(html.contains("INV-APT1001"));
    assert!(html.contains("590.00"));
    assert!(html.contains("PAID"));
}

#[tokio::test]
async fn missing_appointment_has_no_invoice() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let config = test_config_with_store(&server.uri());
    let service = BillingService::new(&config);

    assert!(service.render_invoice("APT9999").await.is_err());
}
