pub mod models;
pub mod handlers;
pub mod router;
pub mod services;

pub use models::*;
pub use router::dentist_routes;
pub use services::{DentistRepository, DentistService, InMemoryDentistRepository, SupabaseDentistRepository};
