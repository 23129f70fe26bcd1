// libs/appointment-cell/src/services/memory.rs
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use dentist_cell::DentistRepository;
use patient_cell::PatientRepository;
use shared_database::DatabaseError;

use crate::models::{Appointment, AppointmentDetails, NewAppointment, SchedulingRules, Slot};
use crate::services::repository::AppointmentRepository;

/// Process-local appointment table. Resolves details against the dentist and
/// patient repositories it was built with.
///
/// Writes are rejected when the same dentist or patient already has an
/// appointment starting inside the candidate's slot, the same window the
/// availability checker reads. The schema's slot guard trigger enforces the
/// identical rule in Postgres.
pub struct InMemoryAppointmentRepository {
    table: RwLock<AppointmentTable>,
    slot_length: Duration,
    dentists: Arc<dyn DentistRepository>,
    patients: Arc<dyn PatientRepository>,
}

#[derive(Default)]
struct AppointmentTable {
    last_id: i64,
    rows: BTreeMap<i64, Appointment>,
}

impl AppointmentTable {
    fn check_slot_free(
        &self,
        candidate: &NewAppointment,
        slot_length: Duration,
        except: Option<i64>,
    ) -> Result<(), DatabaseError> {
        let slot = Slot::starting_at(candidate.date_and_time, slot_length);
        let clash = self.rows.values().find(|existing| {
            Some(existing.id) != except
                && slot.contains(existing.date_and_time)
                && (existing.dentist_license == candidate.dentist_license
                    || existing.patient_identity == candidate.patient_identity)
        });

        match clash {
            Some(existing) => Err(DatabaseError::Conflict(format!(
                "appointment {} already holds {} for dentist {} / patient {}",
                existing.id, existing.date_and_time, existing.dentist_license, existing.patient_identity
            ))),
            None => Ok(()),
        }
    }

    fn sorted(&self, keep: impl Fn(&Appointment) -> bool) -> Vec<Appointment> {
        let mut rows: Vec<Appointment> = self.rows.values().filter(|a| keep(a)).cloned().collect();
        rows.sort_by(|a, b| a.date_and_time.cmp(&b.date_and_time).then(a.id.cmp(&b.id)));
        rows
    }
}

fn stored(id: i64, appointment: &NewAppointment) -> Appointment {
    Appointment {
        id,
        description: appointment.description.clone(),
        date_and_time: appointment.date_and_time,
        dentist_license: appointment.dentist_license.clone(),
        patient_identity: appointment.patient_identity.clone(),
    }
}

impl InMemoryAppointmentRepository {
    pub fn new(dentists: Arc<dyn DentistRepository>, patients: Arc<dyn PatientRepository>) -> Self {
        Self::with_slot_length(dentists, patients, SchedulingRules::default().slot_length)
    }

    pub fn with_slot_length(
        dentists: Arc<dyn DentistRepository>,
        patients: Arc<dyn PatientRepository>,
        slot_length: Duration,
    ) -> Self {
        Self {
            table: RwLock::new(AppointmentTable::default()),
            slot_length,
            dentists,
            patients,
        }
    }

    async fn join(&self, appointments: Vec<Appointment>) -> Result<Vec<AppointmentDetails>, DatabaseError> {
        let mut details = Vec::with_capacity(appointments.len());
        for appointment in appointments {
            let dentist = self.dentists.get_by_license(&appointment.dentist_license).await?;
            let patient = self.patients.get_by_identity(&appointment.patient_identity).await?;

            if let (Some(dentist), Some(patient)) = (dentist, patient) {
                details.push(AppointmentDetails { appointment, dentist, patient });
            }
        }
        Ok(details)
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn save(&self, appointment: &NewAppointment) -> Result<Appointment, DatabaseError> {
        let mut table = self.table.write().await;
        table.check_slot_free(appointment, self.slot_length, None)?;

        table.last_id += 1;
        let row = stored(table.last_id, appointment);
        table.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: i64, appointment: &NewAppointment) -> Result<Option<Appointment>, DatabaseError> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&id) {
            return Ok(None);
        }
        table.check_slot_free(appointment, self.slot_length, Some(id))?;

        let row = stored(id, appointment);
        table.rows.insert(id, row.clone());
        Ok(Some(row))
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, DatabaseError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Appointment>, DatabaseError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Appointment>, DatabaseError> {
        Ok(self.table.read().await.sorted(|_| true))
    }

    async fn get_all_in_interval(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, DatabaseError> {
        let window = Slot { start, end };
        Ok(self.table.read().await.sorted(|a| window.contains(a.date_and_time)))
    }

    async fn get_details_by_id(&self, id: i64) -> Result<Option<AppointmentDetails>, DatabaseError> {
        let appointment = self.table.read().await.rows.get(&id).cloned();
        match appointment {
            Some(appointment) => Ok(self.join(vec![appointment]).await?.into_iter().next()),
            None => Ok(None),
        }
    }

    async fn get_all_details(&self) -> Result<Vec<AppointmentDetails>, DatabaseError> {
        let rows = self.table.read().await.sorted(|_| true);
        self.join(rows).await
    }

    async fn get_all_details_by_patient(&self, identity_number: &str) -> Result<Vec<AppointmentDetails>, DatabaseError> {
        let rows = self.table.read().await.sorted(|a| a.patient_identity == identity_number);
        self.join(rows).await
    }

    async fn get_all_details_by_dentist(&self, license_number: &str) -> Result<Vec<AppointmentDetails>, DatabaseError> {
        let rows = self.table.read().await.sorted(|a| a.dentist_license == license_number);
        self.join(rows).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone};
    use dentist_cell::{InMemoryDentistRepository, NewDentist};
    use patient_cell::{InMemoryPatientRepository, NewPatient};

    fn at(hour: u32) -> DateTime<Utc> {
        at_minute(hour, 0)
    }

    fn at_minute(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 20, hour, minute, 0).unwrap()
    }

    fn new_appointment(hour: u32, dentist: &str, patient: &str) -> NewAppointment {
        new_appointment_at(at(hour), dentist, patient)
    }

    fn new_appointment_at(date_and_time: DateTime<Utc>, dentist: &str, patient: &str) -> NewAppointment {
        NewAppointment {
            description: "cleaning".to_string(),
            date_and_time,
            dentist_license: dentist.to_string(),
            patient_identity: patient.to_string(),
        }
    }

    async fn repository() -> InMemoryAppointmentRepository {
        let dentists = Arc::new(InMemoryDentistRepository::new());
        dentists.save(&NewDentist {
            surname: "Souza".into(),
            name: "Ana".into(),
            license_number: "D-100".into(),
        }).await.unwrap();

        let patients = Arc::new(InMemoryPatientRepository::new());
        patients.save(&NewPatient {
            surname: "Lima".into(),
            name: "Bruno".into(),
            identity_number: "P-200".into(),
            created_at: at(9),
        }).await.unwrap();

        InMemoryAppointmentRepository::new(dentists, patients)
    }

    #[tokio::test]
    async fn test_unique_party_instant() {
        let repo = repository().await;
        repo.save(&new_appointment(13, "D-100", "P-200")).await.unwrap();

        assert_matches!(
            repo.save(&new_appointment(13, "D-100", "P-999")).await,
            Err(DatabaseError::Conflict(_))
        );
        assert_matches!(
            repo.save(&new_appointment(13, "D-999", "P-200")).await,
            Err(DatabaseError::Conflict(_))
        );
        assert!(repo.save(&new_appointment(13, "D-999", "P-999")).await.is_ok());
    }

    #[tokio::test]
    async fn test_write_rejected_when_party_starts_inside_slot() {
        let repo = repository().await;
        repo.save(&new_appointment_at(at_minute(10, 30), "D-100", "P-200")).await.unwrap();

        // A racing writer whose own availability check passed before 10:30 landed.
        assert_matches!(
            repo.save(&new_appointment_at(at_minute(10, 0), "D-100", "P-300")).await,
            Err(DatabaseError::Conflict(_))
        );
        assert_matches!(
            repo.save(&new_appointment_at(at_minute(10, 0), "D-400", "P-200")).await,
            Err(DatabaseError::Conflict(_))
        );

        // A slot ending exactly at 10:30 is still free.
        assert!(repo.save(&new_appointment_at(at_minute(9, 30), "D-100", "P-300")).await.is_ok());
        assert!(repo.save(&new_appointment_at(at_minute(10, 0), "D-400", "P-400")).await.is_ok());
    }

    #[tokio::test]
    async fn test_later_start_inside_earlier_slot_is_admitted() {
        let repo = repository().await;
        repo.save(&new_appointment_at(at_minute(10, 0), "D-100", "P-200")).await.unwrap();

        // Only starts inside the candidate's own slot block it.
        assert!(repo.save(&new_appointment_at(at_minute(10, 30), "D-100", "P-300")).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_cannot_move_into_party_slot() {
        let repo = repository().await;
        repo.save(&new_appointment_at(at_minute(10, 30), "D-100", "P-200")).await.unwrap();
        let other = repo.save(&new_appointment_at(at_minute(14, 0), "D-100", "P-300")).await.unwrap();

        assert_matches!(
            repo.update(other.id, &new_appointment_at(at_minute(10, 0), "D-100", "P-300")).await,
            Err(DatabaseError::Conflict(_))
        );
    }

    #[tokio::test]
    async fn test_update_may_keep_its_own_instant() {
        let repo = repository().await;
        let saved = repo.save(&new_appointment(13, "D-100", "P-200")).await.unwrap();

        let mut changed = new_appointment(13, "D-100", "P-200");
        changed.description = "filling".to_string();
        let updated = repo.update(saved.id, &changed).await.unwrap().unwrap();

        assert_eq!(updated.description, "filling");
        assert!(repo.update(99, &changed).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_interval_is_half_open() {
        let repo = repository().await;
        repo.save(&new_appointment(12, "D-1", "P-1")).await.unwrap();
        repo.save(&new_appointment(13, "D-2", "P-2")).await.unwrap();
        repo.save(&new_appointment(14, "D-3", "P-3")).await.unwrap();

        let rows = repo.get_all_in_interval(at(13), at(13) + Duration::hours(1)).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].dentist_license, "D-2");
    }

    #[tokio::test]
    async fn test_details_are_inner_joined() {
        let repo = repository().await;
        repo.save(&new_appointment(14, "D-100", "P-200")).await.unwrap();
        repo.save(&new_appointment(13, "D-100", "P-unknown")).await.unwrap();

        let all = repo.get_all_details().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].patient.identity_number, "P-200");

        assert!(repo.get_details_by_id(2).await.unwrap().is_none());
        assert_eq!(repo.get_all().await.unwrap().len(), 2);
        assert_eq!(repo.get_all_details_by_dentist("D-100").await.unwrap().len(), 1);
        assert!(repo.get_all_details_by_patient("P-unknown").await.unwrap().is_empty());
    }
}
