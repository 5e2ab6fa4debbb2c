// libs/availability-cell/src/services/conflict.rs
//
// Single source of truth for interval overlap. The slot generator and the
// booking engine both route through these predicates rather than carrying
// their own interval arithmetic.
use chrono::{DateTime, Utc};
use uuid::Uuid;

use shared_models::{BookedEvent, BusyHold};

/// Half-open `[start, end)` overlap: an event ending exactly when another
/// starts does not conflict, permitting back-to-back scheduling.
pub fn intervals_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Whether a candidate `[start, end)` for `provider_id` collides with any
/// calendar-blocking event. An event with no provider is a clinic-wide
/// block and conflicts with every provider.
pub fn conflicts_with_events(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    provider_id: Uuid,
    events: &[BookedEvent],
) -> bool {
    events.iter().any(|event| {
        event.status.blocks_calendar()
            && blocks_provider(event.provider_id, provider_id)
            && intervals_overlap(start, end, event.start_time, event.end_time)
    })
}

/// Same rule over the externally held busy list (holds not yet committed
/// to the event store).
pub fn conflicts_with_holds(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    provider_id: Uuid,
    holds: &[BusyHold],
) -> bool {
    holds.iter().any(|hold| {
        blocks_provider(hold.provider_id, provider_id)
            && intervals_overlap(start, end, hold.start_time, hold.end_time)
    })
}

fn blocks_provider(owner: Option<Uuid>, candidate: Uuid) -> bool {
    owner.map_or(true, |id| id == candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared_models::{AppointmentType, EventStatus};

    fn instant(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 5, hour, minute, 0).unwrap()
    }

    fn event(provider: Option<Uuid>, start: DateTime<Utc>, end: DateTime<Utc>) -> BookedEvent {
        BookedEvent {
            id: Uuid::new_v4(),
            title: "Consultation".to_string(),
            start_time: start,
            end_time: end,
            appointment_type: AppointmentType::Consultation,
            status: EventStatus::Scheduled,
            provider_id: provider,
            patient_id: None,
            room: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn touching_endpoints_do_not_overlap() {
        assert!(!intervals_overlap(
            instant(9, 0),
            instant(9, 30),
            instant(9, 30),
            instant(10, 0)
        ));
        assert!(intervals_overlap(
            instant(9, 0),
            instant(9, 31),
            instant(9, 30),
            instant(10, 0)
        ));
    }

    #[test]
    fn other_providers_do_not_conflict() {
        let provider = Uuid::new_v4();
        let other = Uuid::new_v4();
        let events = vec![event(Some(other), instant(9, 0), instant(9, 30))];

        assert!(!conflicts_with_events(instant(9, 0), instant(9, 30), provider, &events));
        assert!(conflicts_with_events(instant(9, 0), instant(9, 30), other, &events));
    }

    #[test]
    fn wildcard_event_blocks_every_provider() {
        let events = vec![event(None, instant(9, 0), instant(12, 0))];

        assert!(conflicts_with_events(
            instant(10, 0),
            instant(10, 30),
            Uuid::new_v4(),
            &events
        ));
    }

    #[test]
    fn cancelled_events_release_their_window() {
        let provider = Uuid::new_v4();
        let mut cancelled = event(Some(provider), instant(9, 0), instant(9, 30));
        cancelled.status = EventStatus::Cancelled;

        assert!(!conflicts_with_events(
            instant(9, 0),
            instant(9, 30),
            provider,
            &[cancelled]
        ));
    }

    #[test]
    fn holds_follow_the_same_rule() {
        let provider = Uuid::new_v4();
        let holds = vec![BusyHold {
            provider_id: Some(provider),
            start_time: instant(14, 0),
            end_time: instant(15, 0),
        }];

        assert!(conflicts_with_holds(instant(14, 30), instant(15, 0), provider, &holds));
        assert!(!conflicts_with_holds(instant(15, 0), instant(15, 30), provider, &holds));
        assert!(!conflicts_with_holds(instant(14, 30), instant(15, 0), Uuid::new_v4(), &holds));
    }
}
