// libs/shared/models/src/scheduling.rs
use chrono::{DateTime, Duration, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// PROVIDER DIRECTORY MODELS
// ==============================================================================

/// A clinical resource (physician) to whom appointments are assigned.
/// Loaded once from the directory and never mutated at runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Provider {
    pub id: Uuid,
    pub display_name: String,
    pub specialty: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentType {
    Consultation,
    Hemodialysis,
    FollowUp,
}

impl AppointmentType {
    pub const ALL: [AppointmentType; 3] = [
        AppointmentType::Consultation,
        AppointmentType::Hemodialysis,
        AppointmentType::FollowUp,
    ];
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentType::Consultation => write!(f, "consultation"),
            AppointmentType::Hemodialysis => write!(f, "hemodialysis"),
            AppointmentType::FollowUp => write!(f, "follow-up"),
        }
    }
}

/// Canonical duration and descriptive text for one appointment type.
///
/// The slot generator and the booking engine must agree on durations, so
/// this table is owned by the provider directory and injected into both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentTypeSpec {
    pub label: String,
    pub duration_minutes: i32,
    pub description: String,
}

// ==============================================================================
// AVAILABILITY MODELS
// ==============================================================================

/// A candidate bookable window for a provider and appointment type.
///
/// Slots are recomputed from policy + event store state on every load and
/// are never persisted; their lifetime is the current availability view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvailableSlot {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub provider_id: Uuid,
    pub appointment_type: AppointmentType,
    pub duration_minutes: i32,
}

impl AvailableSlot {
    pub fn start_instant(&self) -> DateTime<Utc> {
        self.date.and_time(self.time).and_utc()
    }

    pub fn end_instant(&self) -> DateTime<Utc> {
        self.start_instant() + Duration::minutes(self.duration_minutes as i64)
    }
}

/// An externally held busy interval not yet reflected in the event store.
/// `provider_id == None` blocks every provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusyHold {
    pub provider_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

// ==============================================================================
// CALENDAR EVENT MODELS
// ==============================================================================

/// A committed calendar entry in the event store.
///
/// `provider_id == None` is the provider wildcard: a clinic-wide block that
/// conflicts with candidates for every provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedEvent {
    pub id: Uuid,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub appointment_type: AppointmentType,
    pub status: EventStatus,
    pub provider_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub room: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BookedEvent {
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Scheduled,
    Completed,
    Cancelled,
    Rescheduled,
}

impl EventStatus {
    /// Whether an event in this status occupies its provider's calendar.
    /// Cancelled and rescheduled events release their window; a reschedule
    /// produces a new request rather than an in-place time mutation.
    pub fn blocks_calendar(&self) -> bool {
        matches!(self, EventStatus::Scheduled)
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, EventStatus::Scheduled)
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventStatus::Scheduled => write!(f, "scheduled"),
            EventStatus::Completed => write!(f, "completed"),
            EventStatus::Cancelled => write!(f, "cancelled"),
            EventStatus::Rescheduled => write!(f, "rescheduled"),
        }
    }
}

// ==============================================================================
// BOOKING REQUEST MODELS
// ==============================================================================

/// The intent submitted by a caller; once committed it yields one or more
/// `BookedEvent`s sharing the same patient, provider and type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentRequest {
    pub patient_id: Uuid,
    pub patient_name: String,
    pub provider_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub appointment_type: AppointmentType,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub recurrence: Option<Recurrence>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recurrence {
    pub frequency: RecurrenceFrequency,
    pub occurrence_count: u32,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceFrequency {
    Weekly,
    Biweekly,
    Monthly,
}

impl RecurrenceFrequency {
    /// Date of the occurrence following `date`, or `None` on calendar
    /// overflow. Monthly advances by one calendar month, not 30 days.
    pub fn advance(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            RecurrenceFrequency::Weekly => date.checked_add_days(chrono::Days::new(7)),
            RecurrenceFrequency::Biweekly => date.checked_add_days(chrono::Days::new(14)),
            RecurrenceFrequency::Monthly => date.checked_add_months(Months::new(1)),
        }
    }
}

impl fmt::Display for RecurrenceFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrenceFrequency::Weekly => write!(f, "weekly"),
            RecurrenceFrequency::Biweekly => write!(f, "biweekly"),
            RecurrenceFrequency::Monthly => write!(f, "monthly"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekly_advance_moves_seven_days() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 5).unwrap();
        assert_eq!(
            RecurrenceFrequency::Weekly.advance(start),
            NaiveDate::from_ymd_opt(2024, 2, 12)
        );
    }

    #[test]
    fn monthly_advance_moves_one_calendar_month() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        // chrono clamps to the last day of the shorter month
        assert_eq!(
            RecurrenceFrequency::Monthly.advance(start),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn slot_instants_span_the_duration() {
        let slot = AvailableSlot {
            date: NaiveDate::from_ymd_opt(2024, 2, 5).unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            provider_id: Uuid::new_v4(),
            appointment_type: AppointmentType::Consultation,
            duration_minutes: 30,
        };
        assert_eq!((slot.end_instant() - slot.start_instant()).num_minutes(), 30);
    }

    #[test]
    fn only_scheduled_blocks_the_calendar() {
        assert!(EventStatus::Scheduled.blocks_calendar());
        assert!(!EventStatus::Cancelled.blocks_calendar());
        assert!(!EventStatus::Rescheduled.blocks_calendar());
        assert!(!EventStatus::Completed.blocks_calendar());
    }
}
