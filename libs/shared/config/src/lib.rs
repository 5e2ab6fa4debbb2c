use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use std::env;
use tracing::warn;

/// Clinic-wide scheduling policy.
///
/// Loaded once at startup; the slot generator and the booking engine share
/// the same instance so their notions of working hours never drift.
#[derive(Debug, Clone)]
pub struct SchedulePolicy {
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
    pub break_start: NaiveTime,
    pub break_end: NaiveTime,
    pub slot_step_minutes: u32,
    pub excluded_weekdays: Vec<Weekday>,
    pub dialysis_start_hours: Vec<u32>,
    pub default_horizon_days: i64,
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self {
            day_start: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            day_end: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            break_start: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            break_end: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
            slot_step_minutes: 30,
            excluded_weekdays: vec![Weekday::Sat, Weekday::Sun],
            dialysis_start_hours: vec![8, 14],
            default_horizon_days: 30,
        }
    }
}

impl SchedulePolicy {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let policy = Self {
            day_start: env_time("CLINIC_DAY_START", defaults.day_start),
            day_end: env_time("CLINIC_DAY_END", defaults.day_end),
            break_start: env_time("CLINIC_BREAK_START", defaults.break_start),
            break_end: env_time("CLINIC_BREAK_END", defaults.break_end),
            default_horizon_days: env_i64("CLINIC_HORIZON_DAYS", defaults.default_horizon_days),
            ..defaults
        };

        if policy.day_start >= policy.day_end {
            warn!("Working hours are empty, no slots will be generated");
        }

        policy
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !self.excluded_weekdays.contains(&date.weekday())
    }

    /// Whether a candidate start time falls inside the lunch break.
    /// The break hour is fully excluded, never partially.
    pub fn in_break(&self, time: NaiveTime) -> bool {
        time >= self.break_start && time < self.break_end
    }
}

fn env_time(name: &str, default: NaiveTime) -> NaiveTime {
    match env::var(name) {
        Ok(raw) => NaiveTime::parse_from_str(&raw, "%H:%M").unwrap_or_else(|_| {
            warn!("{} is not a valid HH:MM time, using default", name);
            default
        }),
        Err(_) => default,
    }
}

fn env_i64(name: &str, default: i64) -> i64 {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} is not a valid integer, using default", name);
            default
        }),
        Err(_) => default,
    }
}
