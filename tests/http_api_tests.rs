#![cfg(feature = "http_api")]

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use construction_schedule::{EngineConfig, http_api};
use serde_json::{Value, json};
use tower::util::ServiceExt;

fn new_router() -> axum::Router {
    http_api::router(http_api::AppState::new(EngineConfig::default()))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn diamond_tasks() -> Value {
    json!([
        {"task_id": "A", "name": "Site prep", "duration_days": 2.0, "predecessors": []},
        {"task_id": "B", "name": "Foundations", "duration_days": 3.0, "predecessors": ["A"],
         "optimistic_days": 2.0, "likely_days": 3.0, "pessimistic_days": 6.0},
        {"task_id": "C", "name": "Utilities", "duration_days": 5.0, "predecessors": ["A"]},
        {"task_id": "D", "name": "Framing", "duration_days": 1.0, "predecessors": ["B", "C"]}
    ])
}

#[tokio::test]
async fn health_reports_ok() {
    let response = new_router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!({"status": "ok"}));
}

#[tokio::test]
async fn cpm_endpoint_returns_timings_and_summary() {
    let response = new_router()
        .oneshot(json_request("POST", "/cpm", json!({"tasks": diamond_tasks()})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["result"]["project_duration_days"], 8.0);
    assert_eq!(body["summary"]["critical_tasks"], json!(["A", "C", "D"]));
}

#[tokio::test]
async fn simulate_endpoint_is_reproducible() {
    let app = new_router();
    let payload = json!({"tasks": diamond_tasks(), "trials": 300, "seed": 11, "percentiles": [50, 90]});

    let first = app
        .clone()
        .oneshot(json_request("POST", "/simulate", payload.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let first = read_json(first).await;

    let second = read_json(
        app.oneshot(json_request("POST", "/simulate", payload))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(first, second);
    assert_eq!(first["trials"], 300);
    assert_eq!(first["percentiles"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn cycle_maps_to_bad_request() {
    let tasks = json!([
        {"task_id": "A", "name": "A", "duration_days": 1.0, "predecessors": ["B"]},
        {"task_id": "B", "name": "B", "duration_days": 1.0, "predecessors": ["A"]}
    ]);
    let response = new_router()
        .oneshot(json_request("POST", "/cpm", json!({"tasks": tasks})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "cycle_error");
}

#[tokio::test]
async fn missing_field_maps_to_schema_error() {
    let tasks = json!([{"task_id": "A", "name": "A", "predecessors": []}]);
    let response = new_router()
        .oneshot(json_request("POST", "/cpm", json!({"tasks": tasks})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "schema_error");
    assert_eq!(body["message"], "missing required field: duration_days");
}

#[tokio::test]
async fn config_update_changes_simulation_defaults() {
    let app = new_router();
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/config",
            json!({"simulation": {"trials": 50, "seed": 5, "percentiles": [70]}}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/config").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let config = read_json(response).await;
    assert_eq!(config["simulation"]["trials"], 50);

    let report = read_json(
        app.oneshot(json_request("POST", "/simulate", json!({"tasks": diamond_tasks()})))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(report["seed"], 5);
    assert_eq!(report["percentiles"][0]["percentile"], 70.0);
}

#[tokio::test]
async fn invalid_config_is_rejected() {
    let response = new_router()
        .oneshot(json_request("PUT", "/config", json!({"simulation": {"trials": 0}})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "invalid_request");
}
