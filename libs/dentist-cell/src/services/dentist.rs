use std::sync::Arc;

use tracing::{debug, info};

use crate::models::{CreateDentistRequest, Dentist, DentistError, NewDentist, PatchDentistRequest};
use crate::services::repository::DentistRepository;

pub struct DentistService {
    repository: Arc<dyn DentistRepository>,
}

impl DentistService {
    pub fn new(repository: Arc<dyn DentistRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_dentist(&self, request: CreateDentistRequest) -> Result<Dentist, DentistError> {
        let dentist = validate_dentist(request)?;
        debug!("Creating dentist with license {}", dentist.license_number);

        let stored = self.repository.save(&dentist).await?;
        info!("Dentist {} created with license {}", stored.id, stored.license_number);
        Ok(stored)
    }

    pub async fn get_dentists(&self) -> Result<Vec<Dentist>, DentistError> {
        Ok(self.repository.get_all().await?)
    }

    pub async fn get_dentist(&self, id: i64) -> Result<Dentist, DentistError> {
        self.repository.get_by_id(id).await?.ok_or(DentistError::NotFound)
    }

    /// Full replace; every field is required.
    pub async fn update_dentist(&self, id: i64, request: CreateDentistRequest) -> Result<Dentist, DentistError> {
        let dentist = validate_dentist(request)?;
        self.get_dentist(id).await?;

        let stored = self.repository.update(id, &dentist).await?.ok_or(DentistError::NotFound)?;
        info!("Dentist {} updated", id);
        Ok(stored)
    }

    /// Partial update; omitted or blank fields keep their stored values.
    pub async fn patch_dentist(&self, id: i64, request: PatchDentistRequest) -> Result<Dentist, DentistError> {
        let current = self.get_dentist(id).await?;

        let merged = NewDentist {
            surname: pick(request.surname, current.surname),
            name: pick(request.name, current.name),
            license_number: pick(request.license_number, current.license_number),
        };

        let stored = self.repository.update(id, &merged).await?.ok_or(DentistError::NotFound)?;
        info!("Dentist {} patched", id);
        Ok(stored)
    }

    pub async fn delete_dentist(&self, id: i64) -> Result<(), DentistError> {
        if !self.repository.delete_by_id(id).await? {
            return Err(DentistError::NotFound);
        }
        info!("Dentist {} deleted", id);
        Ok(())
    }
}

fn validate_dentist(request: CreateDentistRequest) -> Result<NewDentist, DentistError> {
    let mut missing = Vec::new();
    if request.surname.trim().is_empty() {
        missing.push("surname");
    }
    if request.name.trim().is_empty() {
        missing.push("name");
    }
    if request.license_number.trim().is_empty() {
        missing.push("license_number");
    }
    if !missing.is_empty() {
        return Err(DentistError::EmptyField(missing.join(", ")));
    }

    Ok(NewDentist {
        surname: request.surname.trim().to_string(),
        name: request.name.trim().to_string(),
        license_number: request.license_number.trim().to_string(),
    })
}

fn pick(update: Option<String>, current: String) -> String {
    match update {
        Some(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => current,
    }
}
