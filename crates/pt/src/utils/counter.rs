//! Process wide statistics counters.
//!
//! Counters are registered lazily the first time a [counter!] or
//! [timed_scope_accumulate!](crate::utils::timer::timed_scope_accumulate) site runs, and are
//! all dumped by [report_counters]. Without the `counter` feature the macros compile to nothing.

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    time::Duration,
};

pub enum Counter {
    Count(CounterU64),
    Time(CounterTime),
}

impl Counter {
    pub fn format(&self) -> String {
        match self {
            Counter::Count(c) => c.value().to_string(),
            Counter::Time(c) => super::timer::format_elapsed(c.value()),
        }
    }
}

#[derive(Default)]
pub struct CounterU64 {
    atomic: AtomicU64,
}

impl CounterU64 {
    pub const fn new() -> Self {
        Self {
            atomic: AtomicU64::new(0),
        }
    }

    pub fn add(&self, amount: u64) {
        self.atomic.fetch_add(amount, Ordering::Relaxed);
    }

    pub fn value(&self) -> u64 {
        self.atomic.load(Ordering::Acquire)
    }
}

#[derive(Default)]
pub struct CounterTime {
    nanos: AtomicU64,
}

impl CounterTime {
    pub const fn new() -> Self {
        Self {
            nanos: AtomicU64::new(0),
        }
    }

    pub fn add(&self, dur: Duration) {
        self.nanos
            .fetch_add(dur.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn value(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::Acquire))
    }
}

lazy_static::lazy_static! {
    static ref COUNTERS: Mutex<BTreeMap<&'static str, Arc<Counter>>> = Mutex::new(BTreeMap::new());
}

// A panic while holding the lock cannot leave the map half updated
fn counters() -> MutexGuard<'static, BTreeMap<&'static str, Arc<Counter>>> {
    COUNTERS.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registers `counter` under `descr`, or returns the counter already registered there
pub fn insert_counter(descr: &'static str, counter: Counter) -> Arc<Counter> {
    counters()
        .entry(descr)
        .or_insert_with(|| Arc::new(counter))
        .clone()
}

/// Current value of every counter, sorted by name
pub fn snapshot() -> Vec<(&'static str, String)> {
    counters()
        .iter()
        .map(|(name, counter)| (*name, counter.format()))
        .collect()
}

pub fn report_counters() {
    for (name, value) in snapshot() {
        log::info!(target: "counter_report", "{name}: {value}");
    }
}

/// Adds one (or the given amount) to the named counter
#[macro_export]
macro_rules! counter {
    ($descr:literal) => {
        $crate::counter!($descr, 1)
    };
    ($descr:literal, $amount:expr) => {
        if cfg!(feature = "counter") {
            use $crate::utils::counter::{insert_counter, lazy_static, Counter, CounterU64};
            lazy_static::lazy_static! {
                static ref COUNTER_REF: std::sync::Arc<Counter> =
                    insert_counter($descr, Counter::Count(CounterU64::new()));
            }

            if let Counter::Count(c) = &**COUNTER_REF {
                c.add($amount as u64);
            }
        }
    };
}

pub use counter;
pub use lazy_static;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        for _ in 0..3 {
            counter!("test counter");
        }
        counter!("test counter", 4);

        if cfg!(feature = "counter") {
            let snapshot = snapshot();
            let value = snapshot
                .iter()
                .find(|(name, _)| *name == "test counter")
                .map(|(_, value)| value.as_str());
            assert_eq!(value, Some("7"));
        }
    }

    #[test]
    fn same_name_same_counter() {
        let a = insert_counter("shared test counter", Counter::Count(CounterU64::new()));
        let b = insert_counter("shared test counter", Counter::Count(CounterU64::new()));
        assert!(Arc::ptr_eq(&a, &b));
    }
}
