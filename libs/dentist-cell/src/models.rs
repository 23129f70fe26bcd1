use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::DatabaseError;
use shared_models::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dentist {
    pub id: i64,
    pub surname: String,
    pub name: String,
    pub license_number: String,
}

/// Column values written on insert and full replace.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewDentist {
    pub surname: String,
    pub name: String,
    pub license_number: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateDentistRequest {
    pub surname: String,
    pub name: String,
    pub license_number: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatchDentistRequest {
    pub surname: Option<String>,
    pub name: Option<String>,
    pub license_number: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DentistError {
    #[error("Dentist not found")]
    NotFound,

    #[error("fields can't be empty: {0}")]
    EmptyField(String),

    #[error("Dentist license number already registered: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<DatabaseError> for DentistError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Conflict(msg) => DentistError::Conflict(msg),
            DatabaseError::NotFound(_) => DentistError::NotFound,
            other => DentistError::Database(other.to_string()),
        }
    }
}

impl From<DentistError> for AppError {
    fn from(err: DentistError) -> Self {
        match err {
            DentistError::NotFound => AppError::NotFound("dentist not found".to_string()),
            DentistError::EmptyField(_) => AppError::ValidationError(err.to_string()),
            DentistError::Conflict(_) => AppError::Conflict(err.to_string()),
            DentistError::Database(msg) => AppError::Database(msg),
        }
    }
}
