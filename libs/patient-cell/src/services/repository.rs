use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use shared_database::{supabase::SupabaseClient, DatabaseError, Table};

use crate::models::{NewPatient, Patient};

#[async_trait]
pub trait PatientRepository: Send + Sync {
    async fn get_all(&self) -> Result<Vec<Patient>, DatabaseError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Patient>, DatabaseError>;

    async fn get_by_identity(&self, identity_number: &str) -> Result<Option<Patient>, DatabaseError>;

    async fn save(&self, patient: &NewPatient) -> Result<Patient, DatabaseError>;

    async fn update(&self, id: i64, patient: &NewPatient) -> Result<Option<Patient>, DatabaseError>;

    async fn delete_by_id(&self, id: i64) -> Result<bool, DatabaseError>;
}

pub struct SupabasePatientRepository {
    supabase: Arc<SupabaseClient>,
}

impl SupabasePatientRepository {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl PatientRepository for SupabasePatientRepository {
    async fn get_all(&self) -> Result<Vec<Patient>, DatabaseError> {
        self.supabase.select(Table::Patients, "order=id.asc").await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Patient>, DatabaseError> {
        let rows: Vec<Patient> = self.supabase
            .select(Table::Patients, &format!("id=eq.{}", id))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn get_by_identity(&self, identity_number: &str) -> Result<Option<Patient>, DatabaseError> {
        debug!("Looking up patient by identity {}", identity_number);
        let query = format!("identity_number=eq.{}", urlencoding::encode(identity_number));
        let rows: Vec<Patient> = self.supabase.select(Table::Patients, &query).await?;
        Ok(rows.into_iter().next())
    }

    async fn save(&self, patient: &NewPatient) -> Result<Patient, DatabaseError> {
        self.supabase.insert(Table::Patients, json!(patient)).await
    }

    async fn update(&self, id: i64, patient: &NewPatient) -> Result<Option<Patient>, DatabaseError> {
        let rows: Vec<Patient> = self.supabase
            .update_where(Table::Patients, &format!("id=eq.{}", id), json!(patient))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, DatabaseError> {
        let removed = self.supabase
            .delete_where(Table::Patients, &format!("id=eq.{}", id))
            .await?;
        Ok(removed > 0)
    }
}
