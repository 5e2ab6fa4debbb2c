pub mod error;
pub mod scheduling;

pub use error::{SchedulingError, StoreError};
pub use scheduling::*;
