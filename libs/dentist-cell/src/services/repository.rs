use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use shared_database::{supabase::SupabaseClient, DatabaseError, Table};

use crate::models::{Dentist, NewDentist};

/// Storage for dentists. `update` and `get_*` return `None` when no row matches.
#[async_trait]
pub trait DentistRepository: Send + Sync {
    async fn get_all(&self) -> Result<Vec<Dentist>, DatabaseError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Dentist>, DatabaseError>;

    async fn get_by_license(&self, license_number: &str) -> Result<Option<Dentist>, DatabaseError>;

    async fn save(&self, dentist: &NewDentist) -> Result<Dentist, DatabaseError>;

    async fn update(&self, id: i64, dentist: &NewDentist) -> Result<Option<Dentist>, DatabaseError>;

    /// Returns whether a row was removed.
    async fn delete_by_id(&self, id: i64) -> Result<bool, DatabaseError>;
}

pub struct SupabaseDentistRepository {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseDentistRepository {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl DentistRepository for SupabaseDentistRepository {
    async fn get_all(&self) -> Result<Vec<Dentist>, DatabaseError> {
        self.supabase.select(Table::Dentists, "order=id.asc").await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Dentist>, DatabaseError> {
        let rows: Vec<Dentist> = self.supabase
            .select(Table::Dentists, &format!("id=eq.{}", id))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn get_by_license(&self, license_number: &str) -> Result<Option<Dentist>, DatabaseError> {
        debug!("Looking up dentist by license {}", license_number);
        let query = format!("license_number=eq.{}", urlencoding::encode(license_number));
        let rows: Vec<Dentist> = self.supabase.select(Table::Dentists, &query).await?;
        Ok(rows.into_iter().next())
    }

    async fn save(&self, dentist: &NewDentist) -> Result<Dentist, DatabaseError> {
        self.supabase.insert(Table::Dentists, json!(dentist)).await
    }

    async fn update(&self, id: i64, dentist: &NewDentist) -> Result<Option<Dentist>, DatabaseError> {
        let rows: Vec<Dentist> = self.supabase
            .update_where(Table::Dentists, &format!("id=eq.{}", id), json!(dentist))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, DatabaseError> {
        let removed = self.supabase
            .delete_where(Table::Dentists, &format!("id=eq.{}", id))
            .await?;
        Ok(removed > 0)
    }
}
