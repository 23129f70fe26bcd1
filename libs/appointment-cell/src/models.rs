// libs/appointment-cell/src/models.rs
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dentist_cell::models::Dentist;
use patient_cell::models::{Patient, PatientResponse};
use shared_database::DatabaseError;
use shared_models::error::AppError;
use shared_utils::{ClinicTime, DateTimeFormatError};

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// Stored appointment row. Parties are referenced by natural key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Appointment {
    pub id: i64,
    pub description: String,
    pub date_and_time: DateTime<Utc>,
    pub dentist_license: String,
    pub patient_identity: String,
}

/// Column values written on insert and full replace.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewAppointment {
    pub description: String,
    pub date_and_time: DateTime<Utc>,
    pub dentist_license: String,
    pub patient_identity: String,
}

/// Appointment joined with its dentist (by license) and patient (by identity).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppointmentDetails {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub dentist: Dentist,
    pub patient: Patient,
}

/// Half-open interval `[start, end)` occupied by one appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Slot {
    pub fn starting_at(start: DateTime<Utc>, length: Duration) -> Self {
        Self { start, end: start + length }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulingRules {
    pub slot_length: Duration,
    pub min_lead_time: Duration,
}

impl Default for SchedulingRules {
    fn default() -> Self {
        Self {
            slot_length: Duration::hours(1),
            min_lead_time: Duration::hours(1),
        }
    }
}

// ==============================================================================
// CONFLICT MODELS
// ==============================================================================

/// Which of the candidate's parties is already booked in the slot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConflictParty {
    Dentist,
    Patient,
    Both,
}

impl ConflictParty {
    /// `None` when the existing appointment shares neither party with the candidate.
    pub fn classify(existing: &Appointment, dentist_license: &str, patient_identity: &str) -> Option<Self> {
        let same_dentist = existing.dentist_license == dentist_license;
        let same_patient = existing.patient_identity == patient_identity;

        match (same_dentist, same_patient) {
            (true, true) => Some(ConflictParty::Both),
            (true, false) => Some(ConflictParty::Dentist),
            (false, true) => Some(ConflictParty::Patient),
            (false, false) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotConflict {
    pub appointment: Appointment,
    pub party: ConflictParty,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

/// Body of create and full-replace requests. Missing fields decode as blank
/// so they surface as empty-field errors rather than decode failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppointmentRequest {
    pub description: String,
    pub date_and_time: String,
    pub dentist_license: String,
    pub patient_identity: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatchAppointmentRequest {
    pub description: Option<String>,
    pub date_and_time: Option<String>,
    pub dentist_license: Option<String>,
    pub patient_identity: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConflictCheckQuery {
    pub date_and_time: String,
    pub dentist_license: String,
    pub patient_identity: String,
    pub exclude_appointment_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppointmentResponse {
    pub id: i64,
    pub description: String,
    pub date_and_time: String,
    pub dentist_license: String,
    pub patient_identity: String,
}

impl AppointmentResponse {
    pub fn from_appointment(appointment: Appointment, clinic_time: &ClinicTime) -> Self {
        Self {
            id: appointment.id,
            description: appointment.description,
            date_and_time: clinic_time.format(appointment.date_and_time),
            dentist_license: appointment.dentist_license,
            patient_identity: appointment.patient_identity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppointmentDetailsResponse {
    #[serde(flatten)]
    pub appointment: AppointmentResponse,
    pub dentist: Dentist,
    pub patient: PatientResponse,
}

impl AppointmentDetailsResponse {
    pub fn from_details(details: AppointmentDetails, clinic_time: &ClinicTime) -> Self {
        Self {
            appointment: AppointmentResponse::from_appointment(details.appointment, clinic_time),
            dentist: details.dentist,
            patient: PatientResponse::from_patient(details.patient, clinic_time),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConflictingAppointment {
    pub appointment: AppointmentResponse,
    pub party: ConflictParty,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConflictCheckResponse {
    pub available: bool,
    pub slot_start: String,
    pub slot_end: String,
    pub conflicts: Vec<ConflictingAppointment>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppointmentError {
    #[error("appointment not found")]
    NotFound,

    #[error("fields can't be empty: {0}")]
    EmptyField(String),

    #[error("{0}")]
    InvalidFormat(#[from] DateTimeFormatError),

    #[error("the appointment must be at least {min_lead_minutes} minutes from now")]
    LeadTime { min_lead_minutes: i64 },

    #[error("the date and time selected aren't available for the {party} ({detail})")]
    Conflict { party: String, detail: String },

    #[error("Database error: {0}")]
    Database(String),
}

impl AppointmentError {
    pub fn conflict(party: ConflictParty, detail: impl Into<String>) -> Self {
        let party = match party {
            ConflictParty::Dentist => "dentist",
            ConflictParty::Patient => "patient",
            ConflictParty::Both => "dentist and patient",
        };
        AppointmentError::Conflict { party: party.to_string(), detail: detail.into() }
    }
}

impl From<DatabaseError> for AppointmentError {
    fn from(err: DatabaseError) -> Self {
        match err {
            // A uniqueness constraint lost the race against a concurrent booking.
            DatabaseError::Conflict(msg) => AppointmentError::Conflict {
                party: "dentist or patient".to_string(),
                detail: msg,
            },
            DatabaseError::NotFound(_) => AppointmentError::NotFound,
            other => AppointmentError::Database(other.to_string()),
        }
    }
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound => AppError::NotFound(err.to_string()),
            AppointmentError::EmptyField(_)
            | AppointmentError::InvalidFormat(_)
            | AppointmentError::LeadTime { .. } => AppError::ValidationError(err.to_string()),
            AppointmentError::Conflict { .. } => AppError::Conflict(err.to_string()),
            AppointmentError::Database(msg) => AppError::Database(msg),
        }
    }
}
