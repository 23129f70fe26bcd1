// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use shared_utils::{ClinicTime, Clock};

use crate::models::{
    AppointmentDetails, AppointmentDetailsResponse, AppointmentError, AppointmentRequest, AppointmentResponse,
    ConflictCheckQuery, ConflictCheckResponse, ConflictingAppointment, NewAppointment,
    PatchAppointmentRequest, SchedulingRules,
};
use crate::services::conflict::ConflictDetectionService;
use crate::services::lead_time::LeadTimeRule;
use crate::services::repository::AppointmentRepository;

/// Appointment lifecycle: validation, lead-time and availability checks
/// ahead of every write, and the denormalized reads.
pub struct AppointmentBookingService {
    repository: Arc<dyn AppointmentRepository>,
    conflict_service: ConflictDetectionService,
    lead_time: LeadTimeRule,
    clock: Arc<dyn Clock>,
    clinic_time: ClinicTime,
    // Held from the availability check until the write lands.
    admission: Mutex<()>,
}

impl AppointmentBookingService {
    pub fn new(
        repository: Arc<dyn AppointmentRepository>,
        clock: Arc<dyn Clock>,
        clinic_time: ClinicTime,
    ) -> Self {
        Self::with_rules(repository, clock, clinic_time, SchedulingRules::default())
    }

    pub fn with_rules(
        repository: Arc<dyn AppointmentRepository>,
        clock: Arc<dyn Clock>,
        clinic_time: ClinicTime,
        rules: SchedulingRules,
    ) -> Self {
        Self {
            conflict_service: ConflictDetectionService::new(Arc::clone(&repository), rules.slot_length),
            lead_time: LeadTimeRule::new(rules.min_lead_time),
            repository,
            clock,
            clinic_time,
            admission: Mutex::new(()),
        }
    }

    // ==========================================================================
    // WRITES
    // ==========================================================================

    pub async fn create_appointment(
        &self,
        request: AppointmentRequest,
    ) -> Result<AppointmentResponse, AppointmentError> {
        validate_appointment(&request)?;
        let date_and_time = self.parse_schedulable(request.date_and_time.trim())?;

        let candidate = NewAppointment {
            description: request.description.trim().to_string(),
            date_and_time,
            dentist_license: request.dentist_license.trim().to_string(),
            patient_identity: request.patient_identity.trim().to_string(),
        };

        let _admission = self.admission.lock().await;
        self.conflict_service
            .ensure_available(date_and_time, &candidate.dentist_license, &candidate.patient_identity, None)
            .await?;

        let appointment = self.repository.save(&candidate).await?;

        info!("Booked appointment {} at {} for dentist {} and patient {}",
              appointment.id, appointment.date_and_time,
              appointment.dentist_license, appointment.patient_identity);

        Ok(AppointmentResponse::from_appointment(appointment, &self.clinic_time))
    }

    /// Full replace. Every field is required and re-validated.
    pub async fn update_appointment(
        &self,
        id: i64,
        request: AppointmentRequest,
    ) -> Result<AppointmentResponse, AppointmentError> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        validate_appointment(&request)?;
        let date_and_time = self.parse_schedulable(request.date_and_time.trim())?;

        let replacement = NewAppointment {
            description: request.description.trim().to_string(),
            date_and_time,
            dentist_license: request.dentist_license.trim().to_string(),
            patient_identity: request.patient_identity.trim().to_string(),
        };

        self.admit_and_store(id, replacement, true).await
    }

    /// Partial update. Blank or missing fields keep their stored value. The
    /// lead-time rule applies only to a supplied date; availability is
    /// re-checked when the date or either party is supplied.
    pub async fn patch_appointment(
        &self,
        id: i64,
        request: PatchAppointmentRequest,
    ) -> Result<AppointmentResponse, AppointmentError> {
        let current = self.repository
            .get_by_id(id)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        let new_date = supplied(request.date_and_time);
        let new_dentist = supplied(request.dentist_license);
        let new_patient = supplied(request.patient_identity);
        let reschedules = new_date.is_some() || new_dentist.is_some() || new_patient.is_some();

        let date_and_time = match new_date {
            Some(raw) => self.parse_schedulable(&raw)?,
            None => current.date_and_time,
        };

        let merged = NewAppointment {
            description: supplied(request.description).unwrap_or(current.description),
            date_and_time,
            dentist_license: new_dentist.unwrap_or(current.dentist_license),
            patient_identity: new_patient.unwrap_or(current.patient_identity),
        };

        self.admit_and_store(id, merged, reschedules).await
    }

    pub async fn delete_appointment(&self, id: i64) -> Result<(), AppointmentError> {
        if !self.repository.delete_by_id(id).await? {
            return Err(AppointmentError::NotFound);
        }
        info!("Deleted appointment {}", id);
        Ok(())
    }

    // ==========================================================================
    // READS
    // ==========================================================================

    pub async fn get_appointments(&self) -> Result<Vec<AppointmentDetailsResponse>, AppointmentError> {
        let rows = self.repository.get_all_details().await?;
        Ok(self.to_details_responses(rows))
    }

    pub async fn get_appointment(&self, id: i64) -> Result<AppointmentDetailsResponse, AppointmentError> {
        let details = self.repository
            .get_details_by_id(id)
            .await?
            .ok_or(AppointmentError::NotFound)?;
        Ok(AppointmentDetailsResponse::from_details(details, &self.clinic_time))
    }

    pub async fn get_patient_appointments(
        &self,
        identity_number: &str,
    ) -> Result<Vec<AppointmentDetailsResponse>, AppointmentError> {
        let rows = self.repository.get_all_details_by_patient(identity_number).await?;
        Ok(self.to_details_responses(rows))
    }

    pub async fn get_dentist_appointments(
        &self,
        license_number: &str,
    ) -> Result<Vec<AppointmentDetailsResponse>, AppointmentError> {
        let rows = self.repository.get_all_details_by_dentist(license_number).await?;
        Ok(self.to_details_responses(rows))
    }

    /// Read-only availability check. Keys are trimmed exactly as on create so
    /// the answer matches what a booking would get. Does not apply the
    /// lead-time rule.
    pub async fn check_conflicts(
        &self,
        query: ConflictCheckQuery,
    ) -> Result<ConflictCheckResponse, AppointmentError> {
        let date_and_time = query.date_and_time.trim();
        let dentist_license = query.dentist_license.trim();
        let patient_identity = query.patient_identity.trim();

        let mut missing = Vec::new();
        if date_and_time.is_empty() { missing.push("date_and_time"); }
        if dentist_license.is_empty() { missing.push("dentist_license"); }
        if patient_identity.is_empty() { missing.push("patient_identity"); }
        if !missing.is_empty() {
            return Err(AppointmentError::EmptyField(missing.join(", ")));
        }

        let start = self.clinic_time.parse(date_and_time)?;
        let slot = self.conflict_service.slot_for(start);

        let conflicts = self.conflict_service
            .find_conflicts(start, dentist_license, patient_identity, query.exclude_appointment_id)
            .await?;

        Ok(ConflictCheckResponse {
            available: conflicts.is_empty(),
            slot_start: self.clinic_time.format(slot.start),
            slot_end: self.clinic_time.format(slot.end),
            conflicts: conflicts
                .into_iter()
                .map(|conflict| ConflictingAppointment {
                    appointment: AppointmentResponse::from_appointment(conflict.appointment, &self.clinic_time),
                    party: conflict.party,
                })
                .collect(),
        })
    }

    // ==========================================================================
    // HELPERS
    // ==========================================================================

    /// Parses a clinic date-time and applies the lead-time rule against the clock.
    fn parse_schedulable(&self, raw: &str) -> Result<DateTime<Utc>, AppointmentError> {
        let date_and_time = self.clinic_time.parse(raw).map_err(|e| {
            warn!("Rejected date and time '{}': {}", raw, e);
            e
        })?;
        self.lead_time.check(date_and_time, self.clock.now())?;
        Ok(date_and_time)
    }

    async fn admit_and_store(
        &self,
        id: i64,
        appointment: NewAppointment,
        check_availability: bool,
    ) -> Result<AppointmentResponse, AppointmentError> {
        let _admission = self.admission.lock().await;

        if check_availability {
            self.conflict_service
                .ensure_available(
                    appointment.date_and_time,
                    &appointment.dentist_license,
                    &appointment.patient_identity,
                    Some(id),
                )
                .await?;
        } else {
            debug!("Appointment {} keeps its slot, skipping availability check", id);
        }

        let updated = self.repository
            .update(id, &appointment)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        info!("Updated appointment {} (now {} with dentist {})",
              updated.id, updated.date_and_time, updated.dentist_license);

        Ok(AppointmentResponse::from_appointment(updated, &self.clinic_time))
    }

    fn to_details_responses(
        &self,
        rows: Vec<AppointmentDetails>,
    ) -> Vec<AppointmentDetailsResponse> {
        rows.into_iter()
            .map(|details| AppointmentDetailsResponse::from_details(details, &self.clinic_time))
            .collect()
    }
}

/// Lists every blank field, e.g. `"description, dentist_license"`.
pub fn validate_appointment(request: &AppointmentRequest) -> Result<(), AppointmentError> {
    let fields = [
        ("description", &request.description),
        ("date_and_time", &request.date_and_time),
        ("dentist_license", &request.dentist_license),
        ("patient_identity", &request.patient_identity),
    ];

    let empty: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if empty.is_empty() {
        Ok(())
    } else {
        Err(AppointmentError::EmptyField(empty.join(", ")))
    }
}

fn supplied(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn request(date_and_time: &str) -> AppointmentRequest {
        AppointmentRequest {
            description: "cleaning".to_string(),
            date_and_time: date_and_time.to_string(),
            dentist_license: "D-100".to_string(),
            patient_identity: "P-200".to_string(),
        }
    }

    #[test]
    fn test_validate_lists_every_blank_field() {
        assert!(validate_appointment(&request("20/06/2025 10:00")).is_ok());

        let mut blank = request(" ");
        blank.dentist_license.clear();
        assert_matches!(
            validate_appointment(&blank),
            Err(AppointmentError::EmptyField(fields)) if fields == "date_and_time, dentist_license"
        );
    }

    #[test]
    fn test_supplied_ignores_blank_values() {
        assert_eq!(supplied(Some(" x ".into())), Some("x".to_string()));
        assert_eq!(supplied(Some("  ".into())), None);
        assert_eq!(supplied(None), None);
    }
}
