pub mod models;
pub mod services;

pub use models::{BookingReport, RecurringOutcome, SkippedOccurrence};
pub use services::booking::AppointmentBookingService;
pub use services::lifecycle::EventLifecycleService;
pub use services::scheduler::ClinicScheduler;
