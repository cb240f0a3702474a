//! Rate synchronizer against a mock exchange-rate endpoint.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use unit_converter_lib::core::catalog;
use unit_converter_lib::core::features::currency::{
    HttpRateSource, RateProvenance, RateSource, RateSynchronizer,
};
use unit_converter_lib::core::features::unit_converter::convert;
use unit_converter_lib::shared::error::AppError;
use unit_converter_lib::shared::types::{Category, OFFLINE_RATES_LABEL};

const LATEST_PATH: &str = "/v6/latest/TWD";

fn synchronizer_for(server: &MockServer) -> RateSynchronizer {
    let source = HttpRateSource::new(format!("{}{}", server.uri(), LATEST_PATH), "unit-converter/test")
        .expect("client builds");
    RateSynchronizer::new(source)
}

async fn mount(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(LATEST_PATH))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

fn assert_offline_fallback(sync: &RateSynchronizer) {
    let state = sync.snapshot();
    assert!(!state.is_fetching());
    assert_eq!(state.last_update_label(), Some(OFFLINE_RATES_LABEL));
    assert_eq!(state.current_rates(), Some(&catalog::fallback_rates()));
}

#[tokio::test]
async fn test_success_payload_becomes_live_table() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "result": "success",
            "base_code": "TWD",
            "time_last_update_unix": 1760832001,
            "rates": { "TWD": 1, "USD": 0.0325, "JPY": 4.92, "EUR": 0.028 }
        })),
    )
    .await;

    let sync = synchronizer_for(&server);
    let table = sync.refresh().await;

    assert_eq!(table.provenance(), RateProvenance::Live);
    assert_eq!(table.get("USD"), Some(0.0325));
    assert!(!sync.is_fetching());
    assert_ne!(sync.snapshot().last_update_label(), Some(OFFLINE_RATES_LABEL));

    let usd = convert(Category::Currency, "TWD", "USD", "1000", Some(&table)).unwrap();
    assert!((usd - 32.5).abs() < 1e-9);

    // KRW and HKD are absent from the payload and convert 1:1 against the base
    let krw = convert(Category::Currency, "TWD", "KRW", "10", Some(&table)).unwrap();
    assert_eq!(krw, 10.0);
}

#[tokio::test]
async fn test_failure_indicator_falls_back() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "result": "error",
            "error-type": "unsupported-code"
        })),
    )
    .await;

    let sync = synchronizer_for(&server);
    let table = sync.refresh().await;

    assert_eq!(table.provenance(), RateProvenance::Fallback);
    assert_offline_fallback(&sync);
}

#[tokio::test]
async fn test_http_error_falls_back() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(500)).await;

    let sync = synchronizer_for(&server);
    sync.refresh().await;

    assert_offline_fallback(&sync);
}

#[tokio::test]
async fn test_malformed_body_falls_back() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_string("<html>busy</html>")).await;

    let sync = synchronizer_for(&server);
    sync.refresh().await;

    assert_offline_fallback(&sync);
}

#[tokio::test]
async fn test_success_without_rates_falls_back() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_json(json!({ "result": "success" }))).await;

    let sync = synchronizer_for(&server);
    sync.refresh().await;

    assert_offline_fallback(&sync);
}

#[tokio::test]
async fn test_unreachable_endpoint_falls_back() {
    // Bind then release a port so the connection is refused
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let source =
        HttpRateSource::new(format!("http://127.0.0.1:{}{}", port, LATEST_PATH), "unit-converter/test").unwrap();

    let err = source.fetch_rates().await.unwrap_err();
    assert!(matches!(err, AppError::Network(_)));

    let sync = RateSynchronizer::new(source);
    sync.refresh().await;
    assert_offline_fallback(&sync);
}

#[tokio::test]
async fn test_source_reports_api_failure_reason() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "result": "error",
            "error-type": "quota-reached"
        })),
    )
    .await;

    let source = HttpRateSource::new(format!("{}{}", server.uri(), LATEST_PATH), "unit-converter/test").unwrap();
    let err = source.fetch_rates().await.unwrap_err();
    assert_eq!(err, AppError::Network("API reported failure: quota-reached".to_string()));
}
