// libs/appointment-cell/src/services/lead_time.rs
use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use crate::models::AppointmentError;

/// Minimum gap between "now" and the start of a new or rescheduled appointment.
#[derive(Debug, Clone, Copy)]
pub struct LeadTimeRule {
    min_lead_time: Duration,
}

impl LeadTimeRule {
    pub fn new(min_lead_time: Duration) -> Self {
        Self { min_lead_time }
    }

    pub fn earliest_admissible(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + self.min_lead_time
    }

    /// Admits `candidate` iff it is at or after `now + min_lead_time`.
    pub fn check(&self, candidate: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), AppointmentError> {
        let earliest = self.earliest_admissible(now);
        if candidate < earliest {
            warn!("Rejected {} - earliest admissible start is {}", candidate, earliest);
            return Err(AppointmentError::LeadTime {
                min_lead_minutes: self.min_lead_time.num_minutes(),
            });
        }
        Ok(())
    }
}
