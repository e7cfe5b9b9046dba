//! End-to-end envelope contract tests for the population gateway.

use std::net::SocketAddr;
use std::time::Duration;

use population_gateway::config::GatewayConfig;
use population_gateway::http::HttpServer;
use population_gateway::lifecycle::Shutdown;
use serde_json::Value;

mod common;

/// Five rows for 20240101: two in 중구 (one under each schema version),
/// three elsewhere.
const DAILY_SUM_FIXTURE: &str = r#"{
  "SPOP_DAILYSUM_JACHI": {
    "list_total_count": 5,
    "RESULT": { "CODE": "INFO-000", "MESSAGE": "정상 처리되었습니다" },
    "row": [
      { "BASE_DATE": "20240101", "GU_NM": "중구", "TIME_SLOT": "14", "TOT_LVPOP_CO": "125000.5" },
      { "STDR_DE_ID": "20240101", "SIGNGU_NM": "중구일원", "LVPOP_CO": 98000 },
      { "BASE_DATE": "20240101", "GU_NM": "강남구", "TOT_LVPOP_CO": "510000" },
      { "BASE_DATE": "20240101", "GU_NM": "송파구", "TOT_LVPOP_CO": "430000" },
      { "STDR_DE_ID": "20240101", "SIGNGU_NM": "동대문구", "LVPOP_CO": "210000" }
    ]
  }
}"#;

const EMPTY_FIXTURE: &str = r#"{
  "SPOP_DAILYSUM_JACHI": {
    "list_total_count": 0,
    "RESULT": { "CODE": "INFO-000", "MESSAGE": "정상 처리되었습니다" },
    "row": []
  }
}"#;

/// Upstream error payload: no dataset key, different nesting entirely.
const MALFORMED_FIXTURE: &str =
    r#"{ "RESULT": { "CODE": "INFO-200", "MESSAGE": "해당하는 데이터가 없습니다." } }"#;

/// Start a gateway pointed at the given upstream, returning its address.
async fn start_gateway(upstream: SocketAddr) -> (SocketAddr, Shutdown) {
    let mut config = GatewayConfig::default();
    config.upstream.base_url = format!("http://{upstream}");
    config.listener.bind_address = "127.0.0.1:0".to_string();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config).unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}

fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_error_envelope_on_unreachable_upstream() {
    let upstream = common::unreachable_addr().await;
    let (addr, shutdown) = start_gateway(upstream).await;

    let res = test_client()
        .get(format!("http://{addr}/population?startIndex=1&endIndex=5"))
        .send()
        .await
        .expect("Gateway unreachable");

    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], "ERROR");
    assert!(
        !body["detail"].as_str().unwrap_or("").is_empty(),
        "ERROR envelope must carry the underlying error text"
    );
    assert_eq!(body["result"].as_array().unwrap().len(), 0);

    shutdown.trigger();
}

#[tokio::test]
async fn test_no_data_is_http_200() {
    let upstream = common::start_mock_upstream(EMPTY_FIXTURE).await;
    let (addr, shutdown) = start_gateway(upstream).await;

    let res = test_client()
        .get(format!(
            "http://{addr}/population?startIndex=1&endIndex=5&baseDate=20240101"
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200, "NO_DATA is a successful call, not an error");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], "NO_DATA");
    assert_eq!(body["result"].as_array().unwrap().len(), 0);
    assert!(body.get("detail").is_none());

    shutdown.trigger();
}

#[tokio::test]
async fn test_malformed_upstream_shape_degrades_to_no_data() {
    let upstream = common::start_mock_upstream(MALFORMED_FIXTURE).await;
    let (addr, shutdown) = start_gateway(upstream).await;

    let res = test_client()
        .get(format!("http://{addr}/population"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "NO_DATA");

    shutdown.trigger();
}

#[tokio::test]
async fn test_upstream_http_error_becomes_error_envelope() {
    let upstream = common::start_mock_upstream_with_status(503, "busy").await;
    let (addr, shutdown) = start_gateway(upstream).await;

    let res = test_client()
        .get(format!("http://{addr}/population"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ERROR");
    assert!(body["detail"].as_str().unwrap().contains("503"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_end_to_end_district_filtering() {
    let upstream = common::start_mock_upstream(DAILY_SUM_FIXTURE).await;
    let (addr, shutdown) = start_gateway(upstream).await;

    let res = test_client()
        .get(format!(
            "http://{addr}/population?startIndex=1&endIndex=5&baseDate=20240101&GU_NM=중구"
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "OK");

    let result = body["result"].as_array().unwrap();
    assert_eq!(result.len(), 2, "2 of 5 fixture rows are in 중구");

    // First row comes from the primary-alias schema.
    assert_eq!(result[0]["baseDate"], "20240101");
    assert_eq!(result[0]["districtName"], "중구");
    assert_eq!(result[0]["timeSlot"], "14");
    assert_eq!(result[0]["populationCount"], 125000.5);

    // Second row exercises every secondary alias plus substring matching.
    assert_eq!(result[1]["baseDate"], "20240101");
    assert_eq!(result[1]["districtName"], "중구일원");
    assert!(result[1]["timeSlot"].is_null());
    assert_eq!(result[1]["populationCount"], 98000.0);

    assert!(!body["message"].as_str().unwrap().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_bare_district_stem_gets_suffix() {
    let upstream = common::start_mock_upstream(DAILY_SUM_FIXTURE).await;
    let (addr, shutdown) = start_gateway(upstream).await;

    // "동대문" must match the 동대문구 row, not nothing.
    let res = test_client()
        .get(format!(
            "http://{addr}/population?startIndex=1&endIndex=5&GU_NM=동대문"
        ))
        .send()
        .await
        .unwrap();

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "OK");
    let result = body["result"].as_array().unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0]["districtName"], "동대문구");

    shutdown.trigger();
}

#[tokio::test]
async fn test_time_slot_must_match_exactly() {
    let upstream = common::start_mock_upstream(DAILY_SUM_FIXTURE).await;
    let (addr, shutdown) = start_gateway(upstream).await;
    let client = test_client();

    let res = client
        .get(format!("http://{addr}/population?TIME_SLOT=14"))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "OK");
    assert_eq!(body["result"].as_array().unwrap().len(), 1);

    let res = client
        .get(format!("http://{addr}/population?TIME_SLOT=13"))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "NO_DATA");

    shutdown.trigger();
}

#[tokio::test]
async fn test_empty_filter_params_mean_no_filter() {
    let upstream = common::start_mock_upstream(DAILY_SUM_FIXTURE).await;
    let (addr, shutdown) = start_gateway(upstream).await;

    // `GU_NM=` and `TIME_SLOT=` are absent filters, not empty-string ones.
    let res = test_client()
        .get(format!(
            "http://{addr}/population?startIndex=1&endIndex=5&GU_NM=&TIME_SLOT="
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "OK");
    assert_eq!(
        body["result"].as_array().unwrap().len(),
        5,
        "empty filters must keep every fixture row"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_identical_requests_yield_identical_envelopes() {
    let upstream = common::start_mock_upstream(DAILY_SUM_FIXTURE).await;
    let (addr, shutdown) = start_gateway(upstream).await;
    let client = test_client();
    let url = format!("http://{addr}/population?startIndex=1&endIndex=5&GU_NM=중구");

    let first = client.get(&url).send().await.unwrap().bytes().await.unwrap();
    let second = client.get(&url).send().await.unwrap().bytes().await.unwrap();
    assert_eq!(first, second, "no hidden state between calls");

    shutdown.trigger();
}

#[tokio::test]
async fn test_seoul_living_passthrough_returns_raw_body() {
    let upstream = common::start_mock_upstream(DAILY_SUM_FIXTURE).await;
    let (addr, shutdown) = start_gateway(upstream).await;

    let res = test_client()
        .get(format!(
            "http://{addr}/seoul-living?startIndex=1&endIndex=100&startDate=20240101"
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    let expected: Value = serde_json::from_str(DAILY_SUM_FIXTURE).unwrap();
    assert_eq!(body, expected, "passthrough must not reshape the payload");

    shutdown.trigger();
}

#[tokio::test]
async fn test_seoul_living_error_shape() {
    let upstream = common::unreachable_addr().await;
    let (addr, shutdown) = start_gateway(upstream).await;

    let res = test_client()
        .get(format!("http://{addr}/seoul-living"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Failed to fetch data from Seoul API");

    shutdown.trigger();
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let upstream = common::start_mock_upstream(EMPTY_FIXTURE).await;
    let (addr, shutdown) = start_gateway(upstream).await;

    let res = test_client()
        .get(format!("http://{addr}/population"))
        .header("Origin", "https://example.com")
        .send()
        .await
        .unwrap();

    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_health_probe() {
    let upstream = common::unreachable_addr().await;
    let (addr, shutdown) = start_gateway(upstream).await;

    let res = test_client()
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "ok");

    shutdown.trigger();
}
