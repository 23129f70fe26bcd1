pub mod booking;
pub mod conflict;
pub mod lead_time;
pub mod memory;
pub mod repository;

pub use booking::AppointmentBookingService;
pub use conflict::ConflictDetectionService;
pub use lead_time::LeadTimeRule;
pub use memory::InMemoryAppointmentRepository;
pub use repository::{AppointmentRepository, SupabaseAppointmentRepository};
