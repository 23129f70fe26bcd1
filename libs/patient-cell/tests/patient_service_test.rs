use std::sync::Arc;

use assert_matches::assert_matches;

use patient_cell::models::{CreatePatientRequest, PatchPatientRequest, PatientError};
use patient_cell::services::{InMemoryPatientRepository, PatientService};
use shared_utils::test_utils::clinic_time;
use shared_utils::DateTimeFormatError;

fn service() -> PatientService {
    PatientService::new(Arc::new(InMemoryPatientRepository::new()), clinic_time())
}

fn request(identity: &str) -> CreatePatientRequest {
    CreatePatientRequest {
        surname: "Lima".to_string(),
        name: "Bruno".to_string(),
        identity_number: identity.to_string(),
        created_at: "10/01/2025 09:30".to_string(),
    }
}

#[tokio::test]
async fn test_create_patient_round_trips_created_at_in_clinic_time() {
    let service = service();

    let created = service.create_patient(request("P-200")).await.unwrap();

    assert_eq!(created.id, 1);
    assert_eq!(created.created_at, "10/01/2025 09:30");
    assert_eq!(service.get_patient(1).await.unwrap(), created);
}

#[tokio::test]
async fn test_create_patient_rejects_malformed_created_at() {
    let mut bad = request("P-200");
    bad.created_at = "2025-01-10 09:30".to_string();

    let result = service().create_patient(bad).await;

    assert_matches!(result, Err(PatientError::InvalidFormat(DateTimeFormatError::Shape(_))));
}

#[tokio::test]
async fn test_create_patient_rejects_blank_fields() {
    let result = service().create_patient(CreatePatientRequest::default()).await;
    assert_matches!(result, Err(PatientError::EmptyField(fields)) if fields.contains("created_at"));
}

#[tokio::test]
async fn test_duplicate_identity_is_a_conflict() {
    let service = service();
    service.create_patient(request("P-200")).await.unwrap();

    assert_matches!(service.create_patient(request("P-200")).await, Err(PatientError::Conflict(_)));
}

#[tokio::test]
async fn test_patch_validates_supplied_created_at() {
    let service = service();
    let created = service.create_patient(request("P-200")).await.unwrap();

    let result = service
        .patch_patient(created.id, PatchPatientRequest {
            created_at: Some("10/13/2025 09:30".to_string()),
            ..Default::default()
        })
        .await;
    assert_matches!(result, Err(PatientError::InvalidFormat(DateTimeFormatError::OutOfRange { field: "month", .. })));

    let patched = service
        .patch_patient(created.id, PatchPatientRequest {
            surname: Some("Costa".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(patched.surname, "Costa");
    assert_eq!(patched.created_at, "10/01/2025 09:30");
}

#[tokio::test]
async fn test_delete_unknown_patient_is_not_found() {
    assert_matches!(service().delete_patient(1).await, Err(PatientError::NotFound));
}
