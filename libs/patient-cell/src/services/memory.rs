use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use shared_database::DatabaseError;

use crate::models::{NewPatient, Patient};
use crate::services::repository::PatientRepository;

/// Process-local patient table; identity numbers are unique as in the schema.
#[derive(Default)]
pub struct InMemoryPatientRepository {
    table: RwLock<PatientTable>,
}

#[derive(Default)]
struct PatientTable {
    last_id: i64,
    rows: BTreeMap<i64, Patient>,
}

impl PatientTable {
    fn identity_taken(&self, identity_number: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|p| p.identity_number == identity_number && Some(p.id) != except)
    }

    fn store(&mut self, id: i64, patient: &NewPatient) -> Patient {
        let stored = Patient {
            id,
            surname: patient.surname.clone(),
            name: patient.name.clone(),
            identity_number: patient.identity_number.clone(),
            created_at: patient.created_at,
        };
        self.rows.insert(id, stored.clone());
        stored
    }
}

impl InMemoryPatientRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PatientRepository for InMemoryPatientRepository {
    async fn get_all(&self) -> Result<Vec<Patient>, DatabaseError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Patient>, DatabaseError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn get_by_identity(&self, identity_number: &str) -> Result<Option<Patient>, DatabaseError> {
        Ok(self.table.read().await
            .rows
            .values()
            .find(|p| p.identity_number == identity_number)
            .cloned())
    }

    async fn save(&self, patient: &NewPatient) -> Result<Patient, DatabaseError> {
        let mut table = self.table.write().await;
        if table.identity_taken(&patient.identity_number, None) {
            return Err(DatabaseError::Conflict(format!(
                "identity_number {} already exists", patient.identity_number
            )));
        }

        table.last_id += 1;
        let id = table.last_id;
        Ok(table.store(id, patient))
    }

    async fn update(&self, id: i64, patient: &NewPatient) -> Result<Option<Patient>, DatabaseError> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&id) {
            return Ok(None);
        }
        if table.identity_taken(&patient.identity_number, Some(id)) {
            return Err(DatabaseError::Conflict(format!(
                "identity_number {} already exists", patient.identity_number
            )));
        }
        Ok(Some(table.store(id, patient)))
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, DatabaseError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}
