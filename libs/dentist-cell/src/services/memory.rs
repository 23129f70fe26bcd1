use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use shared_database::DatabaseError;

use crate::models::{Dentist, NewDentist};
use crate::services::repository::DentistRepository;

/// Process-local dentist table with the same unique license constraint as the schema.
#[derive(Default)]
pub struct InMemoryDentistRepository {
    table: RwLock<DentistTable>,
}

#[derive(Default)]
struct DentistTable {
    last_id: i64,
    rows: BTreeMap<i64, Dentist>,
}

impl DentistTable {
    fn license_taken(&self, license_number: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|d| d.license_number == license_number && Some(d.id) != except)
    }
}

impl InMemoryDentistRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DentistRepository for InMemoryDentistRepository {
    async fn get_all(&self) -> Result<Vec<Dentist>, DatabaseError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Dentist>, DatabaseError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn get_by_license(&self, license_number: &str) -> Result<Option<Dentist>, DatabaseError> {
        Ok(self.table.read().await
            .rows
            .values()
            .find(|d| d.license_number == license_number)
            .cloned())
    }

    async fn save(&self, dentist: &NewDentist) -> Result<Dentist, DatabaseError> {
        let mut table = self.table.write().await;
        if table.license_taken(&dentist.license_number, None) {
            return Err(DatabaseError::Conflict(format!(
                "license_number {} already exists", dentist.license_number
            )));
        }

        table.last_id += 1;
        let stored = Dentist {
            id: table.last_id,
            surname: dentist.surname.clone(),
            name: dentist.name.clone(),
            license_number: dentist.license_number.clone(),
        };
        table.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: i64, dentist: &NewDentist) -> Result<Option<Dentist>, DatabaseError> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&id) {
            return Ok(None);
        }
        if table.license_taken(&dentist.license_number, Some(id)) {
            return Err(DatabaseError::Conflict(format!(
                "license_number {} already exists", dentist.license_number
            )));
        }

        let stored = Dentist {
            id,
            surname: dentist.surname.clone(),
            name: dentist.name.clone(),
            license_number: dentist.license_number.clone(),
        };
        table.rows.insert(id, stored.clone());
        Ok(Some(stored))
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, DatabaseError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}
