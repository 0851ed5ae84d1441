//! Ambient helpers: global counters, scoped timers and log deduplication.

pub mod counter;
pub mod log_once;
pub mod timer;
