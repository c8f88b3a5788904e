//! Platform adapters behind the port traits the supervisor consumes.

pub mod time;
pub mod wifi;
