use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use appointment_cell::{
    AppointmentBookingService, AppointmentRepository, InMemoryAppointmentRepository,
    SupabaseAppointmentRepository,
};
use dentist_cell::{DentistRepository, DentistService, InMemoryDentistRepository, SupabaseDentistRepository};
use patient_cell::{InMemoryPatientRepository, PatientRepository, PatientService, SupabasePatientRepository};
use shared_config::{AppConfig, StorageBackend};
use shared_database::supabase::SupabaseClient;
use shared_utils::{ClinicTime, Clock, SystemClock};

/// The services behind every route, wired to one storage backend.
#[derive(Clone)]
pub struct AppServices {
    pub dentists: Arc<DentistService>,
    pub patients: Arc<PatientService>,
    pub appointments: Arc<AppointmentBookingService>,
}

impl AppServices {
    /// Builds the storage collaborators once. A Supabase backend that is not
    /// configured or not reachable is a startup failure.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let clinic_time = ClinicTime::new(config.clinic_utc_offset);

        let services = match config.storage_backend {
            StorageBackend::Supabase => {
                if !config.is_configured() {
                    bail!("SUPABASE_URL and SUPABASE_ANON_PUBLIC_KEY must be set for the supabase storage backend");
                }

                let supabase = Arc::new(SupabaseClient::new(config));
                supabase
                    .health_check()
                    .await
                    .with_context(|| format!("Supabase at {} is not reachable", supabase.get_base_url()))?;
                info!("Connected to Supabase at {}", supabase.get_base_url());

                Self::with_repositories(
                    Arc::new(SupabaseDentistRepository::new(Arc::clone(&supabase))),
                    Arc::new(SupabasePatientRepository::new(Arc::clone(&supabase))),
                    Arc::new(SupabaseAppointmentRepository::new(supabase)),
                    Arc::new(SystemClock),
                    clinic_time,
                )
            }
            StorageBackend::Memory => {
                warn!("Using in-memory storage, data will not survive a restart");
                Self::in_memory(Arc::new(SystemClock), clinic_time)
            }
        };

        Ok(services)
    }

    pub fn in_memory(clock: Arc<dyn Clock>, clinic_time: ClinicTime) -> Self {
        let dentists: Arc<dyn DentistRepository> = Arc::new(InMemoryDentistRepository::new());
        let patients: Arc<dyn PatientRepository> = Arc::new(InMemoryPatientRepository::new());
        let appointments = Arc::new(InMemoryAppointmentRepository::new(
            Arc::clone(&dentists),
            Arc::clone(&patients),
        ));

        Self::with_repositories(dentists, patients, appointments, clock, clinic_time)
    }

    pub fn with_repositories(
        dentists: Arc<dyn DentistRepository>,
        patients: Arc<dyn PatientRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        clock: Arc<dyn Clock>,
        clinic_time: ClinicTime,
    ) -> Self {
        Self {
            dentists: Arc::new(DentistService::new(dentists)),
            patients: Arc::new(PatientService::new(patients, clinic_time)),
            appointments: Arc::new(AppointmentBookingService::new(appointments, clock, clinic_time)),
        }
    }
}
