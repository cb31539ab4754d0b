/// Integration tests for the HTTP API, driven through the full router
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use home_price_estimator::{
    artifacts::ArtifactStore,
    config::{ArtifactsConfig, SiteConfig},
    handlers::AppState,
    server::create_router,
};
use serde_json::{json, Value};
use std::{fs, sync::Arc};
use tempfile::TempDir;
use tower::ServiceExt;

const COLUMNS: &str = r#"{"data_columns": ["total_sqft", "bath", "bhk", "1st phase jp nagar", "hebbal", "whitefield"]}"#;
const MODEL: &str = r#"{
    "format_version": 2,
    "coef": [0.05, 2.0, 3.0, 40.0, -15.0, 25.0],
    "intercept": 10.0,
    "positive": false,
    "fit_intercept": true
}"#;

/// Project root with artifacts/ and a one-page site
fn fixture() -> TempDir {
    let root = TempDir::new().unwrap();
    let artifacts = root.path().join("artifacts");
    fs::create_dir(&artifacts).unwrap();
    fs::write(artifacts.join("columns.json"), COLUMNS).unwrap();
    fs::write(artifacts.join("banglore_home_prices_model.json"), MODEL).unwrap();
    fs::write(root.path().join("real.html"), "<html>estimator</html>").unwrap();
    root
}

fn app(root: &TempDir) -> Router {
    let store = ArtifactStore::open(ArtifactsConfig::with_root(root.path())).unwrap();
    let site = SiteConfig {
        dir: root.path().to_path_buf(),
        index_page: "real.html".to_string(),
    };
    create_router(AppState::new(Arc::new(store)), &site, None)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

fn post_json(body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/predict_home_price")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_form(body: &'static str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/predict_home_price")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_location_names_in_file_order() {
    let root = fixture();
    let (status, body) = send(app(&root), get("/api/get_location_names")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"locations": ["1st phase jp nagar", "hebbal", "whitefield"]})
    );
}

#[tokio::test]
async fn test_predict_with_json_body() {
    let root = fixture();
    let (status, body) = send(
        app(&root),
        post_json(json!({"total_sqft": 1000, "location": "Hebbal", "bhk": 2, "bath": 3})),
    )
    .await;

    // 0.05*1000 + 2*3 + 3*2 - 15 + 10
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"estimated_price": 57.0}));
}

#[tokio::test]
async fn test_predict_with_json_string_values() {
    let root = fixture();
    let (status, body) = send(
        app(&root),
        post_json(json!({"total_sqft": "1000", "location": "Whitefield", "bhk": "2", "bath": "3"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["estimated_price"], 97.0);
}

#[tokio::test]
async fn test_predict_with_form_body() {
    let root = fixture();
    let (status, body) = send(
        app(&root),
        post_form("total_sqft=1000&location=1st+Phase+JP+Nagar&bhk=2&bath=3"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["estimated_price"], 112.0);
}

#[tokio::test]
async fn test_predict_with_query_string() {
    let root = fixture();
    let (status, body) = send(
        app(&root),
        get("/api/predict_home_price?total_sqft=1000&location=hebbal&bhk=2&bath=3"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["estimated_price"], 57.0);
}

#[tokio::test]
async fn test_location_lookup_is_case_insensitive() {
    let root = fixture();
    let mut prices = Vec::new();
    for location in ["hebbal", "HEBBAL", "HeBbAl"] {
        let (_, body) = send(
            app(&root),
            post_json(json!({"total_sqft": 1000, "location": location, "bhk": 2, "bath": 3})),
        )
        .await;
        prices.push(body["estimated_price"].clone());
    }

    assert!(prices.iter().all(|p| *p == prices[0]));
}

#[tokio::test]
async fn test_unknown_location_estimates_without_location() {
    let root = fixture();
    let (status, body) = send(
        app(&root),
        post_json(json!({"total_sqft": 1000, "location": "Atlantis", "bhk": 2, "bath": 3})),
    )
    .await;

    // Only the numeric features and the intercept contribute
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["estimated_price"], 72.0);
}

#[tokio::test]
async fn test_estimates_are_rounded_to_two_decimals() {
    let root = fixture();
    let (status, body) = send(
        app(&root),
        post_json(json!({"total_sqft": 1234.567, "location": "Hebbal", "bhk": 2, "bath": 2})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let price = body["estimated_price"].as_f64().unwrap();
    let cents = price * 100.0;
    assert!((cents - cents.round()).abs() < 1e-6, "not rounded: {}", price);
}

#[tokio::test]
async fn test_huge_area_still_returns_a_number() {
    let root = fixture();
    let (status, body) = send(
        app(&root),
        post_json(json!({"total_sqft": 1e308, "location": "hebbal", "bhk": 2, "bath": 2})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let price = body["estimated_price"].as_f64().expect("estimated_price is a number");
    assert!(price.is_finite());
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_missing_location_is_bad_request() {
    let root = fixture();
    let (status, body) = send(
        app(&root),
        post_json(json!({"total_sqft": 1000, "bhk": 2, "bath": 3})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required parameter: location");
    assert!(body["estimated_price"].is_null());
}

#[tokio::test]
async fn test_empty_location_is_bad_request() {
    let root = fixture();
    let (status, body) =
        send(app(&root), post_form("total_sqft=1000&location=&bhk=2&bath=3")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Location is required");
    assert!(body["estimated_price"].is_null());
}

#[tokio::test]
async fn test_unparsable_number_is_bad_request() {
    let root = fixture();
    let (status, body) = send(
        app(&root),
        post_form("total_sqft=large&location=Hebbal&bhk=2&bath=3"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("total_sqft"));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let root = fixture();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/predict_home_price")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"total_sqft\": "))
        .unwrap();
    let (status, body) = send(app(&root), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["estimated_price"].is_null());
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let root = fixture();
    let request = Request::builder()
        .uri("/api/get_location_names")
        .header(header::ORIGIN, "http://localhost:8080")
        .body(Body::empty())
        .unwrap();
    let response = app(&root).oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_index_page_served_at_root() {
    let root = fixture();
    let response = app(&root).oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"<html>estimator</html>");
}

#[tokio::test]
async fn test_path_traversal_is_refused() {
    let root = fixture();
    let response = app(&root)
        .oneshot(get("/../artifacts/columns.json"))
        .await
        .unwrap();
    assert_ne!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_readiness_reports_loaded_artifacts() {
    let root = fixture();
    let (status, body) = send(app(&root), get("/ready")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["columns"], 6);
    assert_eq!(body["locations"], 3);
    assert_eq!(body["model_format_version"], 2);
}
