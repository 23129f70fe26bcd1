pub mod models;
pub mod handlers;
pub mod router;
pub mod services;

pub use models::*;
pub use router::patient_routes;
pub use services::{InMemoryPatientRepository, PatientRepository, PatientService, SupabasePatientRepository};
