pub mod dentist;
pub mod memory;
pub mod repository;

pub use dentist::DentistService;
pub use memory::InMemoryDentistRepository;
pub use repository::{DentistRepository, SupabaseDentistRepository};
