use anyhow::Result;
use chrono::{Duration, Utc};
use dotenv::dotenv;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use availability_cell::{SlotFilter, SlotSearchCriteria};
use booking_cell::{BookingReport, ClinicScheduler};
use provider_cell::ProviderDirectory;
use shared_config::SchedulePolicy;
use shared_models::{
    AppointmentRequest, AppointmentType, BookedEvent, EventStatus, Recurrence,
    RecurrenceFrequency,
};
use shared_store::{CalendarStore, InMemoryCalendarStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting clinic scheduling demo");

    let policy = SchedulePolicy::from_env();
    let directory = Arc::new(ProviderDirectory::new());
    let store = Arc::new(InMemoryCalendarStore::with_latency(StdDuration::from_millis(25)));

    let nephrologist = directory
        .providers()
        .iter()
        .find(|p| directory.offers_hemodialysis(p.id))
        .expect("reference roster includes a nephrologist")
        .clone();
    let generalist = directory
        .providers()
        .iter()
        .find(|p| p.id != nephrologist.id)
        .expect("reference roster includes more than one provider")
        .clone();

    // one pre-existing booking so the generator has something to avoid
    let tomorrow_nine = (Utc::now() + Duration::days(1))
        .date_naive()
        .and_hms_opt(9, 0, 0)
        .expect("09:00 is a valid time")
        .and_utc();
    store
        .seed(vec![BookedEvent {
            id: Uuid::new_v4(),
            title: format!("Consultation with {}", generalist.display_name),
            start_time: tomorrow_nine,
            end_time: tomorrow_nine + Duration::minutes(30),
            appointment_type: AppointmentType::Consultation,
            status: EventStatus::Scheduled,
            provider_id: Some(generalist.id),
            patient_id: Some(Uuid::new_v4()),
            room: Some("Room 2".to_string()),
            created_at: Utc::now(),
        }])
        .await;

    let scheduler = ClinicScheduler::new(store.clone(), directory, policy);
    scheduler.load_available_slots(&SlotFilter::default()).await?;

    if let Some(slot) = scheduler.next_available_slot(None, None).await {
        info!(
            "Next open slot: {} {} with provider {}",
            slot.date, slot.time, slot.provider_id
        );
    }

    let dialysis_slots = scheduler
        .search_available_slots(&SlotSearchCriteria {
            appointment_type: Some(AppointmentType::Hemodialysis),
            ..Default::default()
        })
        .await;
    info!("{} hemodialysis slots over the horizon", dialysis_slots.len());

    // book the soonest consultation with the generalist
    if let Some(slot) = scheduler
        .next_available_slot(Some(generalist.id), Some(AppointmentType::Consultation))
        .await
    {
        let report = scheduler
            .book_appointment(AppointmentRequest {
                patient_id: Uuid::new_v4(),
                patient_name: "Ana Reyes".to_string(),
                provider_id: slot.provider_id,
                date: slot.date,
                time: slot.time,
                appointment_type: slot.appointment_type,
                reason: Some("persistent headaches".to_string()),
                notes: None,
                recurrence: None,
            })
            .await?;
        if let BookingReport::Single(event) = report {
            info!("Booked '{}' at {}", event.title, event.start_time);

            // the patient calls back to cancel; the window frees on the next load
            let cancelled = scheduler
                .update_event_status(event.id, EventStatus::Cancelled)
                .await?;
            info!("Cancelled event {}, status now {}", cancelled.id, cancelled.status);
        }
    }

    // weekly dialysis series for a returning patient
    if let Some(slot) = scheduler
        .next_available_slot(Some(nephrologist.id), Some(AppointmentType::Hemodialysis))
        .await
    {
        let report = scheduler
            .book_appointment(AppointmentRequest {
                patient_id: Uuid::new_v4(),
                patient_name: "Miguel Costa".to_string(),
                provider_id: slot.provider_id,
                date: slot.date,
                time: slot.time,
                appointment_type: slot.appointment_type,
                reason: Some("chronic kidney disease, stage 5".to_string()),
                notes: None,
                recurrence: Some(Recurrence {
                    frequency: RecurrenceFrequency::Weekly,
                    occurrence_count: 4,
                    end_date: None,
                }),
            })
            .await?;
        if let BookingReport::Recurring(outcome) = report {
            info!(
                "Dialysis series: {} booked, {} skipped",
                outcome.booked.len(),
                outcome.skipped.len()
            );
            for skip in &outcome.skipped {
                info!("  session {} on {} skipped: {}", skip.ordinal, skip.date, skip.reason);
            }
            info!(
                "Series detail:\n{}",
                serde_json::to_string_pretty(&outcome.booked)?
            );
        }
    }

    let events = store.list_events().await?;
    info!("Calendar now holds {} events", events.len());

    Ok(())
}
