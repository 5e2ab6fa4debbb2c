// libs/booking-cell/src/services/scheduler.rs
use chrono::{NaiveDate, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use availability_cell::services::conflict;
use availability_cell::{
    AvailabilityQueryService, SlotFilter, SlotGeneratorService, SlotSearchCriteria,
};
use provider_cell::ProviderDirectory;
use shared_config::SchedulePolicy;
use shared_models::{
    AppointmentRequest, AppointmentType, AvailableSlot, BookedEvent, BusyHold, EventStatus,
    SchedulingError,
};
use shared_store::CalendarStore;

use crate::models::BookingReport;
use crate::services::booking::AppointmentBookingService;

/// In-process facade over the scheduling core.
///
/// Owns the current availability view, a disposable materialized view over
/// policy + event store that every load recomputes from scratch. Booking
/// runs under a single commit lock so the conflict check, the store append
/// and the slot prune cannot interleave between two callers.
pub struct ClinicScheduler {
    store: Arc<dyn CalendarStore>,
    policy: SchedulePolicy,
    generator: SlotGeneratorService,
    query: AvailabilityQueryService,
    booking: AppointmentBookingService,
    slots: RwLock<Vec<AvailableSlot>>,
    holds: RwLock<Vec<BusyHold>>,
    load_generation: AtomicU64,
    commit_lock: Mutex<()>,
}

impl ClinicScheduler {
    pub fn new(
        store: Arc<dyn CalendarStore>,
        directory: Arc<ProviderDirectory>,
        policy: SchedulePolicy,
    ) -> Self {
        let generator = SlotGeneratorService::new(Arc::clone(&directory), policy.clone());
        let booking = AppointmentBookingService::new(Arc::clone(&store), directory);

        Self {
            store,
            policy,
            generator,
            query: AvailabilityQueryService::new(),
            booking,
            slots: RwLock::new(Vec::new()),
            holds: RwLock::new(Vec::new()),
            load_generation: AtomicU64::new(0),
            commit_lock: Mutex::new(()),
        }
    }

    /// Install the externally held busy list consulted by subsequent loads.
    pub async fn set_external_holds(&self, holds: Vec<BusyHold>) {
        *self.holds.write().await = holds;
    }

    /// Abandon any in-flight load: a load started before this call commits
    /// nothing when it completes.
    pub fn invalidate_pending_loads(&self) {
        self.load_generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Recompute the availability view from the event store. Latent; safe
    /// to run concurrently with the read-only query operations.
    pub async fn load_available_slots(&self, filter: &SlotFilter) -> Result<(), SchedulingError> {
        let generation = self.load_generation.load(Ordering::SeqCst);

        let events = self.store.list_events().await?;
        let holds = self.holds.read().await.clone();
        let start_date = filter.start_date.unwrap_or_else(|| Utc::now().date_naive());

        let slots = self.generator.generate(
            &events,
            &holds,
            start_date,
            self.policy.default_horizon_days,
            filter.provider_id,
            filter.appointment_type,
        );

        if self.load_generation.load(Ordering::SeqCst) != generation {
            debug!("Discarding stale slot load (view was invalidated mid-flight)");
            return Ok(());
        }

        info!("Availability view loaded: {} slots", slots.len());
        *self.slots.write().await = slots;
        Ok(())
    }

    /// Validate and commit a single or recurring appointment request.
    ///
    /// Validation errors are reported before any mutation; a transient
    /// store failure surfaces as `SchedulingError::Store` with the
    /// availability view untouched, so the caller can retry.
    pub async fn book_appointment(
        &self,
        request: AppointmentRequest,
    ) -> Result<BookingReport, SchedulingError> {
        self.booking.validate(&request)?;

        let _guard = self.commit_lock.lock().await;

        let report = match &request.recurrence {
            Some(recurrence) => {
                BookingReport::Recurring(self.booking.book_recurring(&request, recurrence).await?)
            }
            None => BookingReport::Single(self.booking.book_single(&request).await?),
        };

        self.prune_created(&report).await;
        Ok(report)
    }

    /// Slots on one day, optionally narrowed by provider and type.
    pub async fn slots_for_date_and_provider(
        &self,
        date: NaiveDate,
        provider_id: Option<Uuid>,
        appointment_type: Option<AppointmentType>,
    ) -> Vec<AvailableSlot> {
        let slots = self.slots.read().await;
        self.query.slots_for_date(&slots, date, provider_id, appointment_type)
    }

    /// The soonest available slot matching the filter.
    pub async fn next_available_slot(
        &self,
        provider_id: Option<Uuid>,
        appointment_type: Option<AppointmentType>,
    ) -> Option<AvailableSlot> {
        let slots = self.slots.read().await;
        self.query.next_available(&slots, provider_id, appointment_type)
    }

    /// Move a booked event through its status machine. Cancelling or
    /// rescheduling releases the window; the freed slots reappear on the
    /// next `load_available_slots`.
    pub async fn update_event_status(
        &self,
        event_id: Uuid,
        next: EventStatus,
    ) -> Result<BookedEvent, SchedulingError> {
        let _guard = self.commit_lock.lock().await;
        self.booking.update_event_status(event_id, next).await
    }

    pub async fn search_available_slots(
        &self,
        criteria: &SlotSearchCriteria,
    ) -> Vec<AvailableSlot> {
        let slots = self.slots.read().await;
        self.query.search(&slots, criteria)
    }

    /// Snapshot of the whole current view.
    pub async fn available_slots(&self) -> Vec<AvailableSlot> {
        self.slots.read().await.clone()
    }

    /// Drop every slot of the booked provider whose interval overlaps a
    /// created event. Stronger than removing the exact tuple: a dialysis
    /// booking also consumes the consultation slots inside its window.
    async fn prune_created(&self, report: &BookingReport) {
        let created: Vec<&BookedEvent> = report.created_events();
        if created.is_empty() {
            return;
        }

        let mut slots = self.slots.write().await;
        let before = slots.len();
        slots.retain(|slot| {
            !created.iter().any(|event| {
                event.provider_id == Some(slot.provider_id)
                    && conflict::intervals_overlap(
                        slot.start_instant(),
                        slot.end_instant(),
                        event.start_time,
                        event.end_time,
                    )
            })
        });
        debug!("Pruned {} consumed slots from the view", before - slots.len());
    }
}
