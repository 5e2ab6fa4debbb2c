// libs/booking-cell/src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shared_models::BookedEvent;

/// Outcome of a committed booking request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BookingReport {
    Single(BookedEvent),
    Recurring(RecurringOutcome),
}

impl BookingReport {
    /// Every event this booking created, in series order.
    pub fn created_events(&self) -> Vec<&BookedEvent> {
        match self {
            BookingReport::Single(event) => vec![event],
            BookingReport::Recurring(outcome) => outcome.booked.iter().collect(),
        }
    }
}

/// Partial-success report for a recurring series: occurrences that could
/// not be booked are enumerated instead of silently double-booked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringOutcome {
    pub booked: Vec<BookedEvent>,
    pub skipped: Vec<SkippedOccurrence>,
}

impl RecurringOutcome {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedOccurrence {
    pub ordinal: u32,
    pub date: NaiveDate,
    pub reason: String,
}
