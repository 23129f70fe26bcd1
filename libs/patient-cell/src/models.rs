use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::DatabaseError;
use shared_models::error::AppError;
use shared_utils::{ClinicTime, DateTimeFormatError};

/// Stored patient row. `created_at` is kept in UTC.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Patient {
    pub id: i64,
    pub surname: String,
    pub name: String,
    pub identity_number: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewPatient {
    pub surname: String,
    pub name: String,
    pub identity_number: String,
    pub created_at: DateTime<Utc>,
}

/// Patient as returned to clients, with `created_at` in clinic time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientResponse {
    pub id: i64,
    pub surname: String,
    pub name: String,
    pub identity_number: String,
    pub created_at: String,
}

impl PatientResponse {
    pub fn from_patient(patient: Patient, clinic_time: &ClinicTime) -> Self {
        Self {
            id: patient.id,
            surname: patient.surname,
            name: patient.name,
            identity_number: patient.identity_number,
            created_at: clinic_time.format(patient.created_at),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatePatientRequest {
    pub surname: String,
    pub name: String,
    pub identity_number: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatchPatientRequest {
    pub surname: Option<String>,
    pub name: Option<String>,
    pub identity_number: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("patient fields can't be empty: {0}")]
    EmptyField(String),

    #[error("invalid created_at: {0}")]
    InvalidFormat(#[from] DateTimeFormatError),

    #[error("Patient identity number already registered: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<DatabaseError> for PatientError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Conflict(msg) => PatientError::Conflict(msg),
            DatabaseError::NotFound(_) => PatientError::NotFound,
            other => PatientError::Database(other.to_string()),
        }
    }
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound => AppError::NotFound("patient not found".to_string()),
            PatientError::EmptyField(_) | PatientError::InvalidFormat(_) => {
                AppError::ValidationError(err.to_string())
            }
            PatientError::Conflict(_) => AppError::Conflict(err.to_string()),
            PatientError::Database(msg) => AppError::Database(msg),
        }
    }
}
