use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use patient_cell::router::patient_routes;
use patient_cell::services::{InMemoryPatientRepository, PatientService};
use shared_utils::test_utils::clinic_time;

fn create_test_app() -> Router {
    let service = PatientService::new(Arc::new(InMemoryPatientRepository::new()), clinic_time());
    patient_routes(Arc::new(service))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

#[tokio::test]
async fn test_patient_crud_over_http() {
    let app = create_test_app();

    let (status, created) = send(&app, "POST", "/", Some(json!({
        "surname": "Lima",
        "name": "Bruno",
        "identity_number": "P-200",
        "created_at": "10/01/2025 09:30:15"
    }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["created_at"], "10/01/2025 09:30");

    let (status, patched) = send(&app, "PATCH", "/1", Some(json!({ "name": "Carla" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["name"], "Carla");
    assert_eq!(patched["identity_number"], "P-200");

    let (status, listed) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, deleted) = send(&app, "DELETE", "/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["message"], "patient deleted");

    let (status, _) = send(&app, "GET", "/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_created_at_is_bad_request() {
    let app = create_test_app();

    let (status, body) = send(&app, "POST", "/", Some(json!({
        "surname": "Lima",
        "name": "Bruno",
        "identity_number": "P-200",
        "created_at": "32/01/2025 09:30"
    }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("day"));
}
