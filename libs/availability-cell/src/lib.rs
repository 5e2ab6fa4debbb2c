pub mod models;
pub mod services;

pub use models::{SlotFilter, SlotSearchCriteria};
pub use services::query::AvailabilityQueryService;
pub use services::slots::SlotGeneratorService;
