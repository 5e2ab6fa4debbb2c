// libs/shared/store/src/memory.rs
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use uuid::Uuid;

use shared_models::{BookedEvent, EventStatus, StoreError};

use crate::CalendarStore;

/// In-memory calendar store with simulated network latency.
///
/// `fail_next_append` lets tests exercise the transient write failure path:
/// the next append is rejected once, leaving the stored events untouched.
pub struct InMemoryCalendarStore {
    events: RwLock<Vec<BookedEvent>>,
    latency: Duration,
    fail_next_append: AtomicBool,
}

impl InMemoryCalendarStore {
    pub fn new() -> Self {
        Self::with_latency(Duration::ZERO)
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            events: RwLock::new(Vec::new()),
            latency,
            fail_next_append: AtomicBool::new(false),
        }
    }

    /// Pre-populate the store with already-booked events.
    pub async fn seed(&self, events: Vec<BookedEvent>) {
        let mut guard = self.events.write().await;
        guard.extend(events);
        guard.sort_by_key(|event| event.start_time);
    }

    /// Arm a one-shot write fault for the next `append_event` call.
    pub fn fail_next_append(&self) {
        self.fail_next_append.store(true, Ordering::SeqCst);
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for InMemoryCalendarStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CalendarStore for InMemoryCalendarStore {
    async fn list_events(&self) -> Result<Vec<BookedEvent>, StoreError> {
        self.simulate_latency().await;
        let guard = self.events.read().await;
        debug!("Listing {} booked events", guard.len());
        Ok(guard.clone())
    }

    async fn append_event(&self, event: BookedEvent) -> Result<BookedEvent, StoreError> {
        self.simulate_latency().await;

        if self.fail_next_append.swap(false, Ordering::SeqCst) {
            warn!("Injected write fault for event {}", event.id);
            return Err(StoreError::WriteFailed("injected fault".to_string()));
        }

        if event.start_time >= event.end_time {
            return Err(StoreError::WriteFailed(format!(
                "event {} has an empty or inverted interval",
                event.id
            )));
        }

        let mut guard = self.events.write().await;
        guard.push(event.clone());
        guard.sort_by_key(|stored| stored.start_time);
        debug!("Appended event {} ({} total)", event.id, guard.len());

        Ok(event)
    }

    async fn update_event_status(
        &self,
        event_id: Uuid,
        status: EventStatus,
    ) -> Result<BookedEvent, StoreError> {
        self.simulate_latency().await;

        let mut guard = self.events.write().await;
        match guard.iter_mut().find(|event| event.id == event_id) {
            Some(event) => {
                event.status = status;
                debug!("Event {} moved to status {}", event_id, status);
                Ok(event.clone())
            }
            None => Err(StoreError::NotFound(event_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shared_models::{AppointmentType, EventStatus};
    use uuid::Uuid;

    fn sample_event() -> BookedEvent {
        let start = Utc.with_ymd_and_hms(2024, 2, 5, 10, 0, 0).unwrap();
        BookedEvent {
            id: Uuid::new_v4(),
            title: "Consultation for Ana Reyes".to_string(),
            start_time: start,
            end_time: start + chrono::Duration::minutes(30),
            appointment_type: AppointmentType::Consultation,
            status: EventStatus::Scheduled,
            provider_id: Some(Uuid::new_v4()),
            patient_id: Some(Uuid::new_v4()),
            room: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn append_then_list_round_trips() {
        let store = InMemoryCalendarStore::new();
        let event = sample_event();
        store.append_event(event.clone()).await.unwrap();

        let events = store.list_events().await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, event.id);
    }

    #[tokio::test]
    async fn injected_fault_fails_exactly_once() {
        let store = InMemoryCalendarStore::new();
        store.fail_next_append();

        let err = store.append_event(sample_event()).await.unwrap_err();
        assert!(matches!(err, StoreError::WriteFailed(_)));
        assert!(store.list_events().await.unwrap().is_empty());

        // the fault is one-shot, a retry succeeds
        store.append_event(sample_event()).await.unwrap();
        assert_eq!(store.list_events().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn status_update_targets_one_event() {
        let store = InMemoryCalendarStore::new();
        let event = sample_event();
        store.append_event(event.clone()).await.unwrap();

        let updated = store
            .update_event_status(event.id, EventStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(updated.status, EventStatus::Cancelled);

        let err = store
            .update_event_status(Uuid::new_v4(), EventStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn inverted_interval_is_rejected() {
        let store = InMemoryCalendarStore::new();
        let mut event = sample_event();
        event.end_time = event.start_time;

        let err = store.append_event(event).await.unwrap_err();
        assert!(matches!(err, StoreError::WriteFailed(_)));
    }
}
