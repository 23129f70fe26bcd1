use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_models::error::AppError;
use shared_utils::extractor::EntityId;

use crate::models::{CreatePatientRequest, PatchPatientRequest};
use crate::services::PatientService;

#[axum::debug_handler]
pub async fn get_patients(
    State(service): State<Arc<PatientService>>,
) -> Result<Json<Value>, AppError> {
    let patients = service.get_patients().await?;
    Ok(Json(json!(patients)))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(service): State<Arc<PatientService>>,
    EntityId(id): EntityId,
) -> Result<Json<Value>, AppError> {
    let patient = service.get_patient(id).await?;
    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn create_patient(
    State(service): State<Arc<PatientService>>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let patient = service.create_patient(request).await?;
    Ok((StatusCode::CREATED, Json(json!(patient))))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(service): State<Arc<PatientService>>,
    EntityId(id): EntityId,
    Json(request): Json<CreatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    let patient = service.update_patient(id, request).await?;
    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn patch_patient(
    State(service): State<Arc<PatientService>>,
    EntityId(id): EntityId,
    Json(request): Json<PatchPatientRequest>,
) -> Result<Json<Value>, AppError> {
    let patient = service.patch_patient(id, request).await?;
    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(service): State<Arc<PatientService>>,
    EntityId(id): EntityId,
) -> Result<Json<Value>, AppError> {
    service.delete_patient(id).await?;
    Ok(Json(json!({ "message": "patient deleted" })))
}
