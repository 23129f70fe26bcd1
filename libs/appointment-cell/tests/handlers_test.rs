use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use appointment_cell::router::appointment_routes;
use appointment_cell::services::{AppointmentBookingService, InMemoryAppointmentRepository};
use dentist_cell::{DentistRepository, InMemoryDentistRepository, NewDentist};
use patient_cell::{InMemoryPatientRepository, NewPatient, PatientRepository};
use shared_utils::test_utils::{clinic_time, clock_at};

async fn create_test_app() -> Router {
    let dentists = Arc::new(InMemoryDentistRepository::new());
    dentists.save(&NewDentist {
        surname: "Souza".to_string(),
        name: "Ana".to_string(),
        license_number: "D-100".to_string(),
    }).await.unwrap();

    let patients = Arc::new(InMemoryPatientRepository::new());
    patients.save(&NewPatient {
        surname: "Lima".to_string(),
        name: "Bruno".to_string(),
        identity_number: "P-200".to_string(),
        created_at: clinic_time().parse("10/01/2025 09:00").unwrap(),
    }).await.unwrap();

    let repository = Arc::new(InMemoryAppointmentRepository::new(dentists, patients));
    let service = AppointmentBookingService::new(
        repository,
        Arc::new(clock_at("19/06/2025 09:00")),
        clinic_time(),
    );
    appointment_routes(Arc::new(service))
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

fn cleaning(date_and_time: &str, dentist: &str, patient: &str) -> Value {
    json!({
        "description": "cleaning",
        "date_and_time": date_and_time,
        "dentist_license": dentist,
        "patient_identity": patient
    })
}

#[tokio::test]
async fn test_appointment_lifecycle_over_http() {
    let app = create_test_app().await;

    let (status, created) = send(&app, "POST", "/", Some(cleaning("20/06/2025 10:00", "D-100", "P-200"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["date_and_time"], "20/06/2025 10:00");

    let (status, details) = send(&app, "GET", "/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details["dentist"]["surname"], "Souza");
    assert_eq!(details["patient"]["identity_number"], "P-200");

    let (status, patched) = send(&app, "PATCH", "/1", Some(json!({ "description": "x-ray" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["description"], "x-ray");

    let (status, replaced) = send(&app, "PUT", "/1", Some(cleaning("20/06/2025 11:00", "D-100", "P-200"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["date_and_time"], "20/06/2025 11:00");

    let (status, by_patient) = send(&app, "GET", "/patient/P-200", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_patient.as_array().unwrap().len(), 1);

    let (status, by_dentist) = send(&app, "GET", "/dentist/D-100", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_dentist[0]["description"], "cleaning");

    let (status, deleted) = send(&app, "DELETE", "/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["message"], "appointment deleted");

    let (status, error) = send(&app, "GET", "/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"], "appointment not found");
}

#[tokio::test]
async fn test_error_statuses() {
    let app = create_test_app().await;
    send(&app, "POST", "/", Some(cleaning("20/06/2025 10:00", "D-100", "P-200"))).await;

    let (status, body) = send(&app, "POST", "/", Some(cleaning("20/06/2025 10:00", "D-100", "P-300"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("dentist"));

    let (status, _) = send(&app, "POST", "/", Some(cleaning("19/06/2025 09:30", "D-100", "P-200"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "POST", "/", Some(json!({ "description": "cleaning" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("date_and_time"));

    let (status, _) = send(&app, "GET", "/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "DELETE", "/77", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_conflict_check_endpoint() {
    let app = create_test_app().await;
    send(&app, "POST", "/", Some(cleaning("20/06/2025 10:00", "D-100", "P-200"))).await;

    let uri = "/conflicts/check?date_and_time=20%2F06%2F2025%2010%3A00&dentist_license=D-999&patient_identity=P-200";
    let (status, body) = send(&app, "GET", uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], false);
    assert_eq!(body["slot_end"], "20/06/2025 11:00");
    assert_eq!(body["conflicts"][0]["party"], "patient");
    assert_eq!(body["conflicts"][0]["appointment"]["id"], 1);
}
