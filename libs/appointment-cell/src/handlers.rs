// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_models::error::AppError;
use shared_utils::extractor::EntityId;

use crate::models::{AppointmentRequest, ConflictCheckQuery, PatchAppointmentRequest};
use crate::services::AppointmentBookingService;

// ==============================================================================
// APPOINTMENT WRITES
// ==============================================================================

#[axum::debug_handler]
pub async fn create_appointment(
    State(service): State<Arc<AppointmentBookingService>>,
    Json(request): Json<AppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let appointment = service.create_appointment(request).await?;
    Ok((StatusCode::CREATED, Json(json!(appointment))))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(service): State<Arc<AppointmentBookingService>>,
    EntityId(id): EntityId,
    Json(request): Json<AppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = service.update_appointment(id, request).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn patch_appointment(
    State(service): State<Arc<AppointmentBookingService>>,
    EntityId(id): EntityId,
    Json(request): Json<PatchAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = service.patch_appointment(id, request).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(service): State<Arc<AppointmentBookingService>>,
    EntityId(id): EntityId,
) -> Result<Json<Value>, AppError> {
    service.delete_appointment(id).await?;
    Ok(Json(json!({ "message": "appointment deleted" })))
}

// ==============================================================================
// APPOINTMENT LISTINGS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_appointments(
    State(service): State<Arc<AppointmentBookingService>>,
) -> Result<Json<Value>, AppError> {
    let appointments = service.get_appointments().await?;
    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(service): State<Arc<AppointmentBookingService>>,
    EntityId(id): EntityId,
) -> Result<Json<Value>, AppError> {
    let appointment = service.get_appointment(id).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn get_patient_appointments(
    State(service): State<Arc<AppointmentBookingService>>,
    Path(identity_number): Path<String>,
) -> Result<Json<Value>, AppError> {
    let appointments = service.get_patient_appointments(&identity_number).await?;
    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn get_dentist_appointments(
    State(service): State<Arc<AppointmentBookingService>>,
    Path(license_number): Path<String>,
) -> Result<Json<Value>, AppError> {
    let appointments = service.get_dentist_appointments(&license_number).await?;
    Ok(Json(json!(appointments)))
}

// ==============================================================================
// UTILITY
// ==============================================================================

#[axum::debug_handler]
pub async fn check_appointment_conflicts(
    State(service): State<Arc<AppointmentBookingService>>,
    Query(query): Query<ConflictCheckQuery>,
) -> Result<Json<Value>, AppError> {
    let result = service.check_conflicts(query).await?;
    Ok(Json(json!(result)))
}
