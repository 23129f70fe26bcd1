// libs/appointment-cell/src/services/conflict.rs
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::models::{AppointmentError, ConflictParty, Slot, SlotConflict};
use crate::services::repository::AppointmentRepository;

/// Decides whether a dentist and a patient are both free for the slot
/// starting at a given instant.
pub struct ConflictDetectionService {
    repository: Arc<dyn AppointmentRepository>,
    slot_length: Duration,
}

impl ConflictDetectionService {
    pub fn new(repository: Arc<dyn AppointmentRepository>, slot_length: Duration) -> Self {
        Self { repository, slot_length }
    }

    pub fn slot_for(&self, start: DateTime<Utc>) -> Slot {
        Slot::starting_at(start, self.slot_length)
    }

    /// Every appointment in the candidate's slot that shares its dentist or
    /// its patient. `exclude_appointment_id` drops the appointment being
    /// rescheduled so it never conflicts with itself.
    ///
    /// Only appointments that *start* inside `[start, start + slot_length)`
    /// are fetched. One that starts earlier and runs into the candidate's
    /// slot does not block it, so admission depends on booking order
    /// (10:00 then 10:30 is admitted, 10:30 then 10:00 is not). Kept as is
    /// until product signs off on treating slots as overlapping intervals.
    pub async fn find_conflicts(
        &self,
        start: DateTime<Utc>,
        dentist_license: &str,
        patient_identity: &str,
        exclude_appointment_id: Option<i64>,
    ) -> Result<Vec<SlotConflict>, AppointmentError> {
        let slot = self.slot_for(start);
        debug!("Checking slot [{}, {}) for dentist {} and patient {}",
               slot.start, slot.end, dentist_license, patient_identity);

        let existing = self.repository
            .get_all_in_interval(slot.start, slot.end)
            .await?;

        let conflicts: Vec<SlotConflict> = existing
            .into_iter()
            .filter(|appointment| Some(appointment.id) != exclude_appointment_id)
            .filter_map(|appointment| {
                ConflictParty::classify(&appointment, dentist_license, patient_identity)
                    .map(|party| SlotConflict { appointment, party })
            })
            .collect();

        if !conflicts.is_empty() {
            warn!("Slot starting {} has {} conflicting appointment(s)", start, conflicts.len());
        }

        Ok(conflicts)
    }

    pub async fn is_available(
        &self,
        start: DateTime<Utc>,
        dentist_license: &str,
        patient_identity: &str,
        exclude_appointment_id: Option<i64>,
    ) -> Result<bool, AppointmentError> {
        let conflicts = self
            .find_conflicts(start, dentist_license, patient_identity, exclude_appointment_id)
            .await?;
        Ok(conflicts.is_empty())
    }

    /// Like `is_available`, but reports the first conflict as an error.
    pub async fn ensure_available(
        &self,
        start: DateTime<Utc>,
        dentist_license: &str,
        patient_identity: &str,
        exclude_appointment_id: Option<i64>,
    ) -> Result<(), AppointmentError> {
        let conflicts = self
            .find_conflicts(start, dentist_license, patient_identity, exclude_appointment_id)
            .await?;

        match conflicts.into_iter().next() {
            Some(conflict) => Err(AppointmentError::conflict(
                conflict.party,
                format!("appointment {} is booked at that time", conflict.appointment.id),
            )),
            None => Ok(()),
        }
    }
}
