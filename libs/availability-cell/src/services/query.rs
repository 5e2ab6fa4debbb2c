// libs/availability-cell/src/services/query.rs
use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use shared_models::{AppointmentType, AvailableSlot};

use crate::models::SlotSearchCriteria;

/// Read-only helpers over the current availability view. All operations
/// are side-effect free; calling them twice with the same inputs returns
/// identical results.
pub struct AvailabilityQueryService;

impl AvailabilityQueryService {
    pub fn new() -> Self {
        Self
    }

    /// Slots on one calendar day, optionally narrowed by provider and type.
    pub fn slots_for_date(
        &self,
        slots: &[AvailableSlot],
        date: NaiveDate,
        provider_id: Option<Uuid>,
        appointment_type: Option<AppointmentType>,
    ) -> Vec<AvailableSlot> {
        slots
            .iter()
            .filter(|slot| slot.date == date)
            .filter(|slot| provider_id.map_or(true, |id| slot.provider_id == id))
            .filter(|slot| appointment_type.map_or(true, |kind| slot.appointment_type == kind))
            .cloned()
            .collect()
    }

    /// The soonest slot matching the filter, by combined date + time.
    pub fn next_available(
        &self,
        slots: &[AvailableSlot],
        provider_id: Option<Uuid>,
        appointment_type: Option<AppointmentType>,
    ) -> Option<AvailableSlot> {
        slots
            .iter()
            .filter(|slot| provider_id.map_or(true, |id| slot.provider_id == id))
            .filter(|slot| appointment_type.map_or(true, |kind| slot.appointment_type == kind))
            .min_by_key(|slot| slot.start_instant())
            .cloned()
    }

    /// Combinable search by day-of-week (0 = Sunday), exact time-of-day,
    /// provider, type and date range; results ascending by instant.
    pub fn search(
        &self,
        slots: &[AvailableSlot],
        criteria: &SlotSearchCriteria,
    ) -> Vec<AvailableSlot> {
        let mut matches: Vec<AvailableSlot> = slots
            .iter()
            .filter(|slot| {
                criteria
                    .day_of_week
                    .map_or(true, |dow| slot.date.weekday().num_days_from_sunday() == dow)
            })
            .filter(|slot| criteria.time_of_day.map_or(true, |time| slot.time == time))
            .filter(|slot| criteria.provider_id.map_or(true, |id| slot.provider_id == id))
            .filter(|slot| {
                criteria
                    .appointment_type
                    .map_or(true, |kind| slot.appointment_type == kind)
            })
            .filter(|slot| criteria.from_date.map_or(true, |from| slot.date >= from))
            .filter(|slot| criteria.to_date.map_or(true, |to| slot.date <= to))
            .cloned()
            .collect();

        matches.sort_by_key(|slot| (slot.start_instant(), slot.provider_id));
        matches
    }
}

impl Default for AvailabilityQueryService {
    fn default() -> Self {
        Self::new()
    }
}
