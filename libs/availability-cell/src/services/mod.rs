pub mod conflict;
pub mod query;
pub mod slots;
