// libs/availability-cell/src/services/slots.rs
use chrono::{NaiveDate, NaiveTime, Timelike};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use provider_cell::ProviderDirectory;
use shared_config::SchedulePolicy;
use shared_models::{AppointmentType, AvailableSlot, BookedEvent, BusyHold, Provider};

use crate::services::conflict;

/// Produces the bookable slot set over a forward horizon.
///
/// Pure with respect to its inputs: the same policy, event list and holds
/// always yield the same slots, so the view can be recomputed on demand
/// instead of incrementally patched.
pub struct SlotGeneratorService {
    directory: Arc<ProviderDirectory>,
    policy: SchedulePolicy,
}

impl SlotGeneratorService {
    pub fn new(directory: Arc<ProviderDirectory>, policy: SchedulePolicy) -> Self {
        Self { directory, policy }
    }

    /// Generate every eligible slot in `[start_date, start_date + horizon)`.
    ///
    /// Eligibility per half-hour boundary within working hours, outside the
    /// lunch break, on a working day:
    /// - consultation at every boundary,
    /// - follow-up only at the top of the hour,
    /// - hemodialysis only for the nephrology-capable provider at the
    ///   policy's fixed daily start hours.
    ///
    /// A malformed query (non-positive horizon, unknown provider filter)
    /// yields the empty set; no availability is a valid answer, not an
    /// error.
    pub fn generate(
        &self,
        events: &[BookedEvent],
        holds: &[BusyHold],
        start_date: NaiveDate,
        horizon_days: i64,
        provider_filter: Option<Uuid>,
        type_filter: Option<AppointmentType>,
    ) -> Vec<AvailableSlot> {
        if horizon_days <= 0 {
            warn!("Non-positive horizon ({} days), returning no slots", horizon_days);
            return Vec::new();
        }

        let providers: Vec<&Provider> = match provider_filter {
            Some(id) => match self.directory.find(id) {
                Some(provider) => vec![provider],
                None => {
                    warn!("Unknown provider filter {}, returning no slots", id);
                    return Vec::new();
                }
            },
            None => self.directory.providers().iter().collect(),
        };

        let mut slots = Vec::new();

        for day_offset in 0..horizon_days {
            let date = match start_date.checked_add_days(chrono::Days::new(day_offset as u64)) {
                Some(date) => date,
                None => break,
            };

            if !self.policy.is_working_day(date) {
                continue;
            }

            for provider in &providers {
                self.collect_day_slots(date, provider, events, holds, type_filter, &mut slots);
            }
        }

        slots.sort_by(|a, b| {
            (a.date, a.time, a.provider_id).cmp(&(b.date, b.time, b.provider_id))
        });

        debug!(
            "Generated {} slots over {} days for {} providers",
            slots.len(),
            horizon_days,
            providers.len()
        );

        slots
    }

    fn collect_day_slots(
        &self,
        date: NaiveDate,
        provider: &Provider,
        events: &[BookedEvent],
        holds: &[BusyHold],
        type_filter: Option<AppointmentType>,
        slots: &mut Vec<AvailableSlot>,
    ) {
        let step = self.policy.slot_step_minutes;
        let start_minute = self.policy.day_start.hour() * 60 + self.policy.day_start.minute();
        let end_minute = self.policy.day_end.hour() * 60 + self.policy.day_end.minute();

        let mut minute = start_minute;
        while minute < end_minute {
            let time = match NaiveTime::from_hms_opt(minute / 60, minute % 60, 0) {
                Some(time) => time,
                None => break,
            };
            minute += step;

            if self.policy.in_break(time) {
                continue;
            }

            for kind in AppointmentType::ALL {
                if type_filter.is_some_and(|wanted| wanted != kind) {
                    continue;
                }
                if !self.eligible_at(kind, time, provider) {
                    continue;
                }

                let slot = AvailableSlot {
                    date,
                    time,
                    provider_id: provider.id,
                    appointment_type: kind,
                    duration_minutes: self.directory.duration_minutes(kind),
                };

                let start = slot.start_instant();
                let end = slot.end_instant();
                let close = date.and_time(self.policy.day_end).and_utc();

                if end > close {
                    continue;
                }
                if conflict::conflicts_with_events(start, end, provider.id, events) {
                    continue;
                }
                if conflict::conflicts_with_holds(start, end, provider.id, holds) {
                    continue;
                }

                slots.push(slot);
            }
        }
    }

    fn eligible_at(&self, kind: AppointmentType, time: NaiveTime, provider: &Provider) -> bool {
        match kind {
            AppointmentType::Consultation => true,
            AppointmentType::FollowUp => time.minute() == 0,
            AppointmentType::Hemodialysis => {
                time.minute() == 0
                    && self.policy.dialysis_start_hours.contains(&time.hour())
                    && self.directory.offers_hemodialysis(provider.id)
            }
        }
    }
}
