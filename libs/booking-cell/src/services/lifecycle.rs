// libs/booking-cell/src/services/lifecycle.rs
use tracing::{debug, warn};

use shared_models::{EventStatus, SchedulingError};

/// Status machine for booked events.
///
/// A reschedule produces a new request, never an in-place time mutation,
/// so all three targets of `Scheduled` are terminal here.
pub struct EventLifecycleService;

impl EventLifecycleService {
    pub fn new() -> Self {
        Self
    }

    pub fn valid_transitions(&self, current: EventStatus) -> Vec<EventStatus> {
        match current {
            EventStatus::Scheduled => vec![
                EventStatus::Completed,
                EventStatus::Cancelled,
                EventStatus::Rescheduled,
            ],
            EventStatus::Completed | EventStatus::Cancelled | EventStatus::Rescheduled => vec![],
        }
    }

    pub fn validate_transition(
        &self,
        current: EventStatus,
        next: EventStatus,
    ) -> Result<(), SchedulingError> {
        debug!("Validating status transition {} -> {}", current, next);

        if !self.valid_transitions(current).contains(&next) {
            warn!("Invalid status transition attempted: {} -> {}", current, next);
            return Err(SchedulingError::InvalidStatusTransition(current));
        }

        Ok(())
    }
}

impl Default for EventLifecycleService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn scheduled_has_three_exits() {
        let lifecycle = EventLifecycleService::new();
        let targets = lifecycle.valid_transitions(EventStatus::Scheduled);
        assert_eq!(targets.len(), 3);
        for next in targets {
            assert!(lifecycle.validate_transition(EventStatus::Scheduled, next).is_ok());
        }
    }

    #[test]
    fn terminal_statuses_allow_nothing() {
        let lifecycle = EventLifecycleService::new();
        for current in [
            EventStatus::Completed,
            EventStatus::Cancelled,
            EventStatus::Rescheduled,
        ] {
            assert_matches!(
                lifecycle.validate_transition(current, EventStatus::Scheduled),
                Err(SchedulingError::InvalidStatusTransition(_))
            );
        }
    }
}
