//! Application state

pub mod notifications;
pub mod wallet;
