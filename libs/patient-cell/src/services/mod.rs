pub mod memory;
pub mod patient;
pub mod repository;

pub use memory::InMemoryPatientRepository;
pub use patient::PatientService;
pub use repository::{PatientRepository, SupabasePatientRepository};
