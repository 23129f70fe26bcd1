pub mod error;
pub mod supabase;
pub mod table;

pub use error::DatabaseError;
pub use table::Table;
