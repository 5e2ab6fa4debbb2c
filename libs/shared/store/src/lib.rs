pub mod memory;

use async_trait::async_trait;
use shared_models::{BookedEvent, EventStatus, StoreError};
use uuid::Uuid;

/// The calendar event store collaborator.
///
/// The core reads the full booked set, appends new events and flips event
/// statuses; persistence layout is the store's concern, not the
/// scheduler's.
#[async_trait]
pub trait CalendarStore: Send + Sync {
    async fn list_events(&self) -> Result<Vec<BookedEvent>, StoreError>;

    async fn append_event(&self, event: BookedEvent) -> Result<BookedEvent, StoreError>;

    async fn update_event_status(
        &self,
        event_id: Uuid,
        status: EventStatus,
    ) -> Result<BookedEvent, StoreError>;
}

pub use memory::InMemoryCalendarStore;
