use std::sync::Arc;

use tracing::{debug, info, warn};

use shared_utils::ClinicTime;

use crate::models::{
    CreatePatientRequest, NewPatient, PatchPatientRequest, PatientError, PatientResponse,
};
use crate::services::repository::PatientRepository;

pub struct PatientService {
    repository: Arc<dyn PatientRepository>,
    clinic_time: ClinicTime,
}

impl PatientService {
    pub fn new(repository: Arc<dyn PatientRepository>, clinic_time: ClinicTime) -> Self {
        Self { repository, clinic_time }
    }

    pub async fn create_patient(&self, request: CreatePatientRequest) -> Result<PatientResponse, PatientError> {
        let patient = self.validate_patient(request)?;
        debug!("Creating patient with identity {}", patient.identity_number);

        let stored = self.repository.save(&patient).await?;
        info!("Patient {} created", stored.id);
        Ok(PatientResponse::from_patient(stored, &self.clinic_time))
    }

    pub async fn get_patients(&self) -> Result<Vec<PatientResponse>, PatientError> {
        let patients = self.repository.get_all().await?;
        Ok(patients
            .into_iter()
            .map(|p| PatientResponse::from_patient(p, &self.clinic_time))
            .collect())
    }

    pub async fn get_patient(&self, id: i64) -> Result<PatientResponse, PatientError> {
        let patient = self.repository.get_by_id(id).await?.ok_or(PatientError::NotFound)?;
        Ok(PatientResponse::from_patient(patient, &self.clinic_time))
    }

    /// Full replace; every field is required.
    pub async fn update_patient(&self, id: i64, request: CreatePatientRequest) -> Result<PatientResponse, PatientError> {
        let patient = self.validate_patient(request)?;
        self.repository.get_by_id(id).await?.ok_or(PatientError::NotFound)?;

        let stored = self.repository.update(id, &patient).await?.ok_or(PatientError::NotFound)?;
        info!("Patient {} updated", id);
        Ok(PatientResponse::from_patient(stored, &self.clinic_time))
    }

    /// Partial update; a supplied `created_at` must still be a valid clinic date-time.
    pub async fn patch_patient(&self, id: i64, request: PatchPatientRequest) -> Result<PatientResponse, PatientError> {
        let current = self.repository.get_by_id(id).await?.ok_or(PatientError::NotFound)?;

        let created_at = match request.created_at.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => self.clinic_time.parse(value).map_err(|e| {
                warn!("Rejected created_at '{}' for patient {}: {}", value, id, e);
                e
            })?,
            _ => current.created_at,
        };

        let merged = NewPatient {
            surname: pick(request.surname, current.surname),
            name: pick(request.name, current.name),
            identity_number: pick(request.identity_number, current.identity_number),
            created_at,
        };

        let stored = self.repository.update(id, &merged).await?.ok_or(PatientError::NotFound)?;
        info!("Patient {} patched", id);
        Ok(PatientResponse::from_patient(stored, &self.clinic_time))
    }

    pub async fn delete_patient(&self, id: i64) -> Result<(), PatientError> {
        if !self.repository.delete_by_id(id).await? {
            return Err(PatientError::NotFound);
        }
        info!("Patient {} deleted", id);
        Ok(())
    }

    fn validate_patient(&self, request: CreatePatientRequest) -> Result<NewPatient, PatientError> {
        let mut missing = Vec::new();
        if request.surname.trim().is_empty() {
            missing.push("surname");
        }
        if request.name.trim().is_empty() {
            missing.push("name");
        }
        if request.identity_number.trim().is_empty() {
            missing.push("identity_number");
        }
        if request.created_at.trim().is_empty() {
            missing.push("created_at");
        }
        if !missing.is_empty() {
            return Err(PatientError::EmptyField(missing.join(", ")));
        }

        let created_at = self.clinic_time.parse(request.created_at.trim())?;

        Ok(NewPatient {
            surname: request.surname.trim().to_string(),
            name: request.name.trim().to_string(),
            identity_number: request.identity_number.trim().to_string(),
            created_at,
        })
    }
}

fn pick(update: Option<String>, current: String) -> String {
    match update {
        Some(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => current,
    }
}
