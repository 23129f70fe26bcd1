//! Clinic date-time strings: `DD/MM/YYYY hh:mm` or `DD/MM/YYYY hh:mm:ss`,
//! wall-clock time in the clinic's configured offset.
//!
//! Parsing checks the token shape and the range of each field. It does not
//! check the day against the length of the month: `31/02/2023 10:00` is
//! accepted and rolls forward into March, the same way an out-of-range day
//! is normalised by most calendar arithmetic. Tightening this would reject
//! inputs the clinic has always accepted.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use thiserror::Error;

/// Output format for dates handed back to clients.
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateTimeFormatError {
    #[error("date and time must be in format DD/MM/YYYY hh:mm or DD/MM/YYYY hh:mm:ss, got '{0}'")]
    Shape(String),

    #[error("'{0}' is not a whole number")]
    NotANumber(String),

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

/// The fields of a clinic date-time string, range-checked but not yet
/// resolved to a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeParts {
    pub day: u32,
    pub month: u32,
    pub year: i32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl DateTimeParts {
    /// Resolves the parts to a naive date-time. Days past the end of the
    /// month carry into the following month.
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        let first_of_month = NaiveDate::from_ymd_opt(self.year, self.month, 1)?;
        let date = first_of_month.checked_add_days(Days::new(u64::from(self.day - 1)))?;
        let time = NaiveTime::from_hms_opt(self.hour, self.minute, self.second)?;
        Some(date.and_time(time))
    }
}

pub fn parse_parts(input: &str) -> Result<DateTimeParts, DateTimeFormatError> {
    let shape_error = || DateTimeFormatError::Shape(input.to_string());

    let tokens: Vec<&str> = input.split(' ').collect();
    if tokens.len() != 2 {
        return Err(shape_error());
    }

    let date: Vec<&str> = tokens[0].split('/').collect();
    if date.len() != 3 {
        return Err(shape_error());
    }

    let time: Vec<&str> = tokens[1].split(':').collect();
    if time.len() != 2 && time.len() != 3 {
        return Err(shape_error());
    }

    let day = ranged("day", date[0], 1, 31)?;
    let month = ranged("month", date[1], 1, 12)?;
    let year = ranged("year", date[2], 1, 9999)?;
    let hour = ranged("hour", time[0], 0, 23)?;
    let minute = ranged("minute", time[1], 0, 59)?;
    let second = match time.get(2) {
        Some(token) => ranged("second", token, 0, 59)?,
        None => 0,
    };

    Ok(DateTimeParts {
        day: day as u32,
        month: month as u32,
        year: year as i32,
        hour: hour as u32,
        minute: minute as u32,
        second: second as u32,
    })
}

fn ranged(field: &'static str, token: &str, min: i64, max: i64) -> Result<i64, DateTimeFormatError> {
    let value: i64 = token
        .parse()
        .map_err(|_| DateTimeFormatError::NotANumber(token.to_string()))?;

    if value < min || value > max {
        return Err(DateTimeFormatError::OutOfRange { field, value, min, max });
    }
    Ok(value)
}

/// Converts between clinic wall-clock strings and UTC instants.
#[derive(Debug, Clone, Copy)]
pub struct ClinicTime {
    offset: FixedOffset,
}

impl ClinicTime {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    pub fn parse(&self, input: &str) -> Result<DateTime<Utc>, DateTimeFormatError> {
        let naive = parse_parts(input)?
            .to_naive()
            .ok_or_else(|| DateTimeFormatError::Shape(input.to_string()))?;

        self.offset
            .from_local_datetime(&naive)
            .single()
            .map(|local| local.with_timezone(&Utc))
            .ok_or_else(|| DateTimeFormatError::Shape(input.to_string()))
    }

    pub fn format(&self, instant: DateTime<Utc>) -> String {
        instant.with_timezone(&self.offset).format(DISPLAY_FORMAT).to_string()
    }
}
