// libs/availability-cell/tests/query_test.rs
use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;
use uuid::Uuid;

use availability_cell::{AvailabilityQueryService, SlotGeneratorService, SlotSearchCriteria};
use provider_cell::ProviderDirectory;
use shared_config::SchedulePolicy;
use shared_models::{AppointmentType, AvailableSlot, Provider};

const NEPH_ID: Uuid = Uuid::from_u128(0x11);
const GP_ID: Uuid = Uuid::from_u128(0x22);

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, 5).unwrap()
}

fn view() -> Vec<AvailableSlot> {
    let directory = Arc::new(ProviderDirectory::with_providers(vec![
        Provider {
            id: NEPH_ID,
            display_name: "Dr. Amara Diallo".to_string(),
            specialty: "Nephrology".to_string(),
        },
        Provider {
            id: GP_ID,
            display_name: "Dr. Ines Moreau".to_string(),
            specialty: "General Practice".to_string(),
        },
    ]));
    SlotGeneratorService::new(directory, SchedulePolicy::default())
        .generate(&[], &[], monday(), 7, None, None)
}

#[test]
fn filter_by_date_provider_and_type() {
    let slots = view();
    let query = AvailabilityQueryService::new();

    let filtered = query.slots_for_date(
        &slots,
        monday(),
        Some(GP_ID),
        Some(AppointmentType::Consultation),
    );
    assert_eq!(filtered.len(), 20);
    assert!(filtered.iter().all(|slot| {
        slot.date == monday()
            && slot.provider_id == GP_ID
            && slot.appointment_type == AppointmentType::Consultation
    }));
}

#[test]
fn query_layer_is_idempotent() {
    let slots = view();
    let query = AvailabilityQueryService::new();

    let first = query.slots_for_date(&slots, monday(), Some(GP_ID), None);
    let second = query.slots_for_date(&slots, monday(), Some(GP_ID), None);
    assert_eq!(first, second);
}

#[test]
fn next_available_returns_the_soonest_instant() {
    let slots = view();
    let query = AvailabilityQueryService::new();

    let next = query.next_available(&slots, None, None).unwrap();
    assert_eq!(next.date, monday());
    assert_eq!(next.time, NaiveTime::from_hms_opt(7, 0, 0).unwrap());

    let next_dialysis = query
        .next_available(&slots, None, Some(AppointmentType::Hemodialysis))
        .unwrap();
    assert_eq!(next_dialysis.provider_id, NEPH_ID);
    assert_eq!(next_dialysis.time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
}

#[test]
fn next_available_on_empty_filter_is_none() {
    let slots = view();
    let query = AvailabilityQueryService::new();

    assert!(query.next_available(&slots, Some(Uuid::new_v4()), None).is_none());
    assert!(query
        .next_available(&[], None, Some(AppointmentType::Consultation))
        .is_none());
}

#[test]
fn search_by_day_of_week_and_time() {
    let slots = view();
    let query = AvailabilityQueryService::new();

    // Wednesdays at 09:00
    let criteria = SlotSearchCriteria {
        day_of_week: Some(3),
        time_of_day: Some(NaiveTime::from_hms_opt(9, 0, 0).unwrap()),
        ..Default::default()
    };
    let matches = query.search(&slots, &criteria);

    assert!(!matches.is_empty());
    assert!(matches.iter().all(|slot| {
        slot.date == NaiveDate::from_ymd_opt(2024, 2, 7).unwrap()
            && slot.time == NaiveTime::from_hms_opt(9, 0, 0).unwrap()
    }));
}

#[test]
fn search_respects_date_range_and_sorts_ascending() {
    let slots = view();
    let query = AvailabilityQueryService::new();

    let criteria = SlotSearchCriteria {
        provider_id: Some(NEPH_ID),
        appointment_type: Some(AppointmentType::Hemodialysis),
        from_date: Some(NaiveDate::from_ymd_opt(2024, 2, 6).unwrap()),
        to_date: Some(NaiveDate::from_ymd_opt(2024, 2, 8).unwrap()),
        ..Default::default()
    };
    let matches = query.search(&slots, &criteria);

    // Tue, Wed, Thu at 08:00 and 14:00
    assert_eq!(matches.len(), 6);
    for pair in matches.windows(2) {
        assert!(pair[0].start_instant() <= pair[1].start_instant());
    }
}
