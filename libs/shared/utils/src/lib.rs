pub mod clock;
pub mod datetime;
pub mod extractor;
pub mod test_utils;

pub use clock::{Clock, FixedClock, SystemClock};
pub use datetime::{ClinicTime, DateTimeFormatError};
