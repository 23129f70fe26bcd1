use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_models::error::AppError;
use shared_utils::extractor::EntityId;

use crate::models::{CreateDentistRequest, PatchDentistRequest};
use crate::services::DentistService;

#[axum::debug_handler]
pub async fn get_dentists(
    State(service): State<Arc<DentistService>>,
) -> Result<Json<Value>, AppError> {
    let dentists = service.get_dentists().await?;
    Ok(Json(json!(dentists)))
}

#[axum::debug_handler]
pub async fn get_dentist(
    State(service): State<Arc<DentistService>>,
    EntityId(id): EntityId,
) -> Result<Json<Value>, AppError> {
    let dentist = service.get_dentist(id).await?;
    Ok(Json(json!(dentist)))
}

#[axum::debug_handler]
pub async fn create_dentist(
    State(service): State<Arc<DentistService>>,
    Json(request): Json<CreateDentistRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let dentist = service.create_dentist(request).await?;
    Ok((StatusCode::CREATED, Json(json!(dentist))))
}

#[axum::debug_handler]
pub async fn update_dentist(
    State(service): State<Arc<DentistService>>,
    EntityId(id): EntityId,
    Json(request): Json<CreateDentistRequest>,
) -> Result<Json<Value>, AppError> {
    let dentist = service.update_dentist(id, request).await?;
    Ok(Json(json!(dentist)))
}

#[axum::debug_handler]
pub async fn patch_dentist(
    State(service): State<Arc<DentistService>>,
    EntityId(id): EntityId,
    Json(request): Json<PatchDentistRequest>,
) -> Result<Json<Value>, AppError> {
    let dentist = service.patch_dentist(id, request).await?;
    Ok(Json(json!(dentist)))
}

#[axum::debug_handler]
pub async fn delete_dentist(
    State(service): State<Arc<DentistService>>,
    EntityId(id): EntityId,
) -> Result<Json<Value>, AppError> {
    service.delete_dentist(id).await?;
    Ok(Json(json!({ "message": "dentist deleted" })))
}
