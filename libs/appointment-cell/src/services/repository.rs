// libs/appointment-cell/src/services/repository.rs
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;
use tracing::debug;

use shared_database::{supabase::SupabaseClient, DatabaseError, Table};

use crate::models::{Appointment, AppointmentDetails, NewAppointment};

/// Storage for appointments.
///
/// Implementations must reject a second appointment for the same dentist or
/// the same patient at the same instant with `DatabaseError::Conflict`.
/// The `*_details` reads are inner joins: appointments whose dentist or
/// patient no longer exists are left out.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn save(&self, appointment: &NewAppointment) -> Result<Appointment, DatabaseError>;

    async fn update(&self, id: i64, appointment: &NewAppointment) -> Result<Option<Appointment>, DatabaseError>;

    /// Returns whether a row was removed.
    async fn delete_by_id(&self, id: i64) -> Result<bool, DatabaseError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Appointment>, DatabaseError>;

    async fn get_all(&self) -> Result<Vec<Appointment>, DatabaseError>;

    /// Appointments starting in `[start, end)`, ordered by start.
    async fn get_all_in_interval(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, DatabaseError>;

    async fn get_details_by_id(&self, id: i64) -> Result<Option<AppointmentDetails>, DatabaseError>;

    async fn get_all_details(&self) -> Result<Vec<AppointmentDetails>, DatabaseError>;

    async fn get_all_details_by_patient(&self, identity_number: &str) -> Result<Vec<AppointmentDetails>, DatabaseError>;

    async fn get_all_details_by_dentist(&self, license_number: &str) -> Result<Vec<AppointmentDetails>, DatabaseError>;
}

/// PostgREST embedding of both parties through the natural-key foreign keys.
const DETAILS_SELECT: &str =
    "select=*,dentist:dentists!inner(*),patient:patients!inner(*)";

pub struct SupabaseAppointmentRepository {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseAppointmentRepository {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    async fn select_details(&self, filter: Option<String>) -> Result<Vec<AppointmentDetails>, DatabaseError> {
        let mut query = DETAILS_SELECT.to_string();
        if let Some(filter) = filter {
            query.push('&');
            query.push_str(&filter);
        }
        query.push_str("&order=date_and_time.asc,id.asc");

        self.supabase.select(Table::Appointments, &query).await
    }
}

fn timestamp_param(instant: DateTime<Utc>) -> String {
    urlencoding::encode(&instant.to_rfc3339_opts(SecondsFormat::Secs, true)).into_owned()
}

#[async_trait]
impl AppointmentRepository for SupabaseAppointmentRepository {
    async fn save(&self, appointment: &NewAppointment) -> Result<Appointment, DatabaseError> {
        self.supabase.insert(Table::Appointments, json!(appointment)).await
    }

    async fn update(&self, id: i64, appointment: &NewAppointment) -> Result<Option<Appointment>, DatabaseError> {
        let rows: Vec<Appointment> = self.supabase
            .update_where(Table::Appointments, &format!("id=eq.{}", id), json!(appointment))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, DatabaseError> {
        let removed = self.supabase
            .delete_where(Table::Appointments, &format!("id=eq.{}", id))
            .await?;
        Ok(removed > 0)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Appointment>, DatabaseError> {
        let rows: Vec<Appointment> = self.supabase
            .select(Table::Appointments, &format!("id=eq.{}", id))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn get_all(&self) -> Result<Vec<Appointment>, DatabaseError> {
        self.supabase
            .select(Table::Appointments, "order=date_and_time.asc,id.asc")
            .await
    }

    async fn get_all_in_interval(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, DatabaseError> {
        debug!("Fetching appointments in [{}, {})", start, end);

        let query = format!(
            "date_and_time=gte.{}&date_and_time=lt.{}&order=date_and_time.asc",
            timestamp_param(start),
            timestamp_param(end),
        );
        self.supabase.select(Table::Appointments, &query).await
    }

    async fn get_details_by_id(&self, id: i64) -> Result<Option<AppointmentDetails>, DatabaseError> {
        let rows = self.select_details(Some(format!("id=eq.{}", id))).await?;
        Ok(rows.into_iter().next())
    }

    async fn get_all_details(&self) -> Result<Vec<AppointmentDetails>, DatabaseError> {
        self.select_details(None).await
    }

    async fn get_all_details_by_patient(&self, identity_number: &str) -> Result<Vec<AppointmentDetails>, DatabaseError> {
        let filter = format!("patient_identity=eq.{}", urlencoding::encode(identity_number));
        self.select_details(Some(filter)).await
    }

    async fn get_all_details_by_dentist(&self, license_number: &str) -> Result<Vec<AppointmentDetails>, DatabaseError> {
        let filter = format!("dentist_license=eq.{}", urlencoding::encode(license_number));
        self.select_details(Some(filter)).await
    }
}
