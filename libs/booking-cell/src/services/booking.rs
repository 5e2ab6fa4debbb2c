// libs/booking-cell/src/services/booking.rs
use chrono::{Duration, NaiveDate, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use availability_cell::services::conflict;
use provider_cell::ProviderDirectory;
use shared_models::{
    AppointmentRequest, AppointmentType, BookedEvent, EventStatus, Recurrence, SchedulingError,
};
use shared_store::CalendarStore;

use crate::models::{RecurringOutcome, SkippedOccurrence};
use crate::services::lifecycle::EventLifecycleService;

/// Commits validated appointment requests against the calendar store.
///
/// The sequence is validate, conflict-check, append: the store write is
/// the commit point, so a transient write failure leaves nothing to undo
/// and the caller may retry without risking a double booking.
pub struct AppointmentBookingService {
    store: Arc<dyn CalendarStore>,
    directory: Arc<ProviderDirectory>,
    lifecycle: EventLifecycleService,
}

impl AppointmentBookingService {
    pub fn new(store: Arc<dyn CalendarStore>, directory: Arc<ProviderDirectory>) -> Self {
        Self {
            store,
            directory,
            lifecycle: EventLifecycleService::new(),
        }
    }

    /// Synchronous validation, performed before any state mutation.
    pub fn validate(&self, request: &AppointmentRequest) -> Result<(), SchedulingError> {
        if self.directory.find(request.provider_id).is_none() {
            return Err(SchedulingError::UnknownProvider(request.provider_id));
        }

        if request.appointment_type == AppointmentType::Hemodialysis
            && !self.directory.offers_hemodialysis(request.provider_id)
        {
            return Err(SchedulingError::ProviderNotQualified(request.appointment_type));
        }

        if let Some(recurrence) = &request.recurrence {
            if recurrence.occurrence_count == 0 {
                return Err(SchedulingError::InvalidRecurrence(
                    "occurrence count must be positive".to_string(),
                ));
            }
            if let Some(end_date) = recurrence.end_date {
                if end_date < request.date {
                    return Err(SchedulingError::InvalidRecurrence(
                        "end date precedes the first occurrence".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Book a one-off appointment.
    pub async fn book_single(
        &self,
        request: &AppointmentRequest,
    ) -> Result<BookedEvent, SchedulingError> {
        self.validate(request)?;

        let event = self.build_event(request, request.date, None);
        let existing = self.store.list_events().await?;

        if conflict::conflicts_with_events(
            event.start_time,
            event.end_time,
            request.provider_id,
            &existing,
        ) {
            warn!(
                "Conflict detected for provider {} at {}",
                request.provider_id, event.start_time
            );
            return Err(SchedulingError::ConflictDetected);
        }

        let stored = self.store.append_event(event).await?;
        info!(
            "Booked {} for patient {} at {}",
            stored.appointment_type, request.patient_id, stored.start_time
        );
        Ok(stored)
    }

    /// Expand and book a recurring series.
    ///
    /// Every occurrence is validated independently against the conflict
    /// detector; collisions and store failures are reported per occurrence
    /// rather than silently double-booking the provider on a later date.
    pub async fn book_recurring(
        &self,
        request: &AppointmentRequest,
        recurrence: &Recurrence,
    ) -> Result<RecurringOutcome, SchedulingError> {
        self.validate(request)?;

        let total = recurrence.occurrence_count;
        let mut booked = Vec::new();
        let mut skipped = Vec::new();
        let mut date = request.date;

        for ordinal in 1..=total {
            if ordinal > 1 {
                date = recurrence.frequency.advance(date).ok_or_else(|| {
                    SchedulingError::InvalidTime("recurrence date out of range".to_string())
                })?;
            }

            if let Some(end_date) = recurrence.end_date {
                if date > end_date {
                    skipped.push(self.skip(ordinal, date, "past the recurrence end date"));
                    continue;
                }
            }

            // re-read so earlier occurrences in this series count as booked
            let existing = self.store.list_events().await?;
            let event = self.build_event(request, date, Some((ordinal, total)));

            if conflict::conflicts_with_events(
                event.start_time,
                event.end_time,
                request.provider_id,
                &existing,
            ) {
                skipped.push(self.skip(ordinal, date, "conflicts with an existing booking"));
                continue;
            }

            match self.store.append_event(event).await {
                Ok(stored) => booked.push(stored),
                Err(err) => skipped.push(self.skip(ordinal, date, &err.to_string())),
            }
        }

        info!(
            "Recurring series for patient {}: {} booked, {} skipped",
            request.patient_id,
            booked.len(),
            skipped.len()
        );
        Ok(RecurringOutcome { booked, skipped })
    }

    /// Move a booked event through the status machine. A reschedule or
    /// cancellation frees the event's window on the next availability load.
    pub async fn update_event_status(
        &self,
        event_id: Uuid,
        next: EventStatus,
    ) -> Result<BookedEvent, SchedulingError> {
        let events = self.store.list_events().await?;
        let current = events
            .iter()
            .find(|event| event.id == event_id)
            .ok_or(SchedulingError::EventNotFound(event_id))?;

        self.lifecycle.validate_transition(current.status, next)?;

        let updated = self.store.update_event_status(event_id, next).await?;
        info!("Event {} moved from {} to {}", event_id, current.status, next);
        Ok(updated)
    }

    fn build_event(
        &self,
        request: &AppointmentRequest,
        date: NaiveDate,
        ordinal: Option<(u32, u32)>,
    ) -> BookedEvent {
        let spec = self.directory.spec(request.appointment_type);
        let start_time = date.and_time(request.time).and_utc();

        let title = match ordinal {
            Some((i, n)) => format!(
                "{} for {} (session {} of {})",
                spec.label, request.patient_name, i, n
            ),
            None => format!("{} for {}", spec.label, request.patient_name),
        };

        BookedEvent {
            id: Uuid::new_v4(),
            title,
            start_time,
            end_time: start_time + Duration::minutes(spec.duration_minutes as i64),
            appointment_type: request.appointment_type,
            status: EventStatus::Scheduled,
            provider_id: Some(request.provider_id),
            patient_id: Some(request.patient_id),
            room: None,
            created_at: Utc::now(),
        }
    }

    fn skip(&self, ordinal: u32, date: NaiveDate, reason: &str) -> SkippedOccurrence {
        warn!("Skipping occurrence {} on {}: {}", ordinal, date, reason);
        SkippedOccurrence {
            ordinal,
            date,
            reason: reason.to_string(),
        }
    }
}
