// libs/availability-cell/src/models.rs
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::AppointmentType;

/// Filter applied when (re)loading the availability view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotFilter {
    pub provider_id: Option<Uuid>,
    pub appointment_type: Option<AppointmentType>,
    pub start_date: Option<NaiveDate>,
}

/// Search criteria over the current availability view.
///
/// `day_of_week` uses 0 = Sunday through 6 = Saturday. All criteria are
/// combinable; absent fields match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotSearchCriteria {
    pub day_of_week: Option<u32>,
    pub time_of_day: Option<NaiveTime>,
    pub provider_id: Option<Uuid>,
    pub appointment_type: Option<AppointmentType>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}
