// file: tests/server_test.rs
// description: router tests for /generate, /download and the static page

mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use golden_mile::{Advisor, AppState, create_router};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{header as header_matcher, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BODY_LIMIT: usize = 16 * 1024 * 1024;

async fn mock_llm() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header_matcher("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "## Budget Feasibility\n**Baner** and **Wakad** fit the budget.\n- Rental yield near 3%."
                }
            }]
        })))
        .mount(&server)
        .await;
    server
}

async fn test_state(temp: &TempDir, llm_url: String) -> AppState {
    let mut config = common::temp_config(temp);
    config.llm.base_url = llm_url;
    config.llm.api_key = Some("test-key".to_string());
    common::prepare_model(&config);

    let advisor = Advisor::from_config(&config).unwrap();
    AppState::new(advisor, config.report.download_name.clone())
}

fn generate_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_index_page() {
    let temp = TempDir::new().unwrap();
    let llm = mock_llm().await;
    let app = create_router(test_state(&temp, llm.uri()).await);

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Golden Mile"));
}

#[tokio::test]
async fn test_download_before_generate_is_bad_request() {
    let temp = TempDir::new().unwrap();
    let llm = mock_llm().await;
    let app = create_router(test_state(&temp, llm.uri()).await);

    let response = app.oneshot(get("/download")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("No report"));
}

#[tokio::test]
async fn test_generate_then_download() {
    let temp = TempDir::new().unwrap();
    let llm = mock_llm().await;
    let app = create_router(test_state(&temp, llm.uri()).await);

    let response = app
        .clone()
        .oneshot(generate_request(json!({
            "city": "Pune",
            "budget": "2.5",
            "size": 1200,
            "metro": false
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let analysis = body["analysis"].as_str().unwrap();
    assert!(!analysis.is_empty());
    assert!(!analysis.contains("**"));
    assert!(analysis.contains("Baner"));

    // No index was built, so retrieval degrades to nothing.
    assert_eq!(body["documents"].as_array().unwrap().len(), 0);
    assert!(body["recommendations"].as_array().unwrap().len() <= 10);

    let pdf_path = body["pdf_path"].as_str().unwrap();
    assert!(std::path::Path::new(pdf_path).is_file());
    assert!(std::path::Path::new(body["report_path"].as_str().unwrap()).is_file());

    let response = app.oneshot(get("/download")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );
    assert!(
        response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("Golden_Mile_Advisory_Report.pdf")
    );

    let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_download_missing_file_is_not_found() {
    let temp = TempDir::new().unwrap();
    let llm = mock_llm().await;
    let state = test_state(&temp, llm.uri()).await;
    state
        .set_last_pdf(temp.path().join("reports/gone.pdf"))
        .await;

    let response = create_router(state).oneshot(get("/download")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_generate_rejects_invalid_input() {
    let temp = TempDir::new().unwrap();
    let llm = mock_llm().await;
    let app = create_router(test_state(&temp, llm.uri()).await);

    let response = app
        .clone()
        .oneshot(generate_request(json!({"city": "Pune", "budget": "plenty"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(generate_request(json!({"budget": 1.0})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(generate_request(json!({"city": "Pune", "budget": 0})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_llm_failure_maps_to_bad_gateway() {
    let temp = TempDir::new().unwrap();
    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&llm)
        .await;

    let app = create_router(test_state(&temp, llm.uri()).await);
    let response = app
        .oneshot(generate_request(json!({"city": "Hyderabad", "budget": 1.5})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_health_reports_components() {
    let temp = TempDir::new().unwrap();
    let llm = mock_llm().await;
    let app = create_router(test_state(&temp, llm.uri()).await);

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let components: Vec<&str> = body["checks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["component"].as_str().unwrap())
        .collect();
    assert!(components.contains(&"price_model"));
    assert!(components.contains(&"llm"));
}
