use std::{
    ops::{Deref, DerefMut},
    time::{Duration, Instant},
};

use super::counter::CounterTime;

pub struct TimedResult<T> {
    pub res: T,
    pub elapsed: Duration,
}

impl<T> Deref for TimedResult<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.res
    }
}

impl<T> DerefMut for TimedResult<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.res
    }
}

pub fn timed_scope<R, F: FnOnce() -> R>(f: F) -> TimedResult<R> {
    let begin = Instant::now();
    let res = f();

    TimedResult {
        res,
        elapsed: begin.elapsed(),
    }
}

/// Runs `f` and logs how long it took at debug level
pub fn timed_scope_log<R, F: FnOnce() -> R>(label: &'static str, f: F) -> TimedResult<R> {
    let timed = timed_scope(f);
    log::debug!(target: "scoped timer", "{label}: {}", format_elapsed(timed.elapsed));
    timed
}

pub fn format_elapsed(elapsed: Duration) -> String {
    if elapsed < Duration::from_millis(1) {
        format!("{:.3}µs", elapsed.as_secs_f32() * 1e6)
    } else if elapsed < Duration::from_secs(1) {
        format!("{:.3}ms", elapsed.as_secs_f32() * 1e3)
    } else if elapsed < Duration::from_secs(60) {
        format!("{:.3}s", elapsed.as_secs_f32())
    } else {
        let secs = elapsed.as_secs();
        format!("{}h{}m{}s", secs / 3600, (secs / 60) % 60, secs % 60)
    }
}

#[doc(hidden)]
pub fn timed_scope_accumulate_<R, F: FnOnce() -> R>(timer: &CounterTime, f: F) -> R {
    let timed = timed_scope(f);
    timer.add(timed.elapsed);
    timed.res
}

/// Runs the closure and adds its duration to the named time counter
#[macro_export]
macro_rules! timed_scope_accumulate {
    ($descr:literal, $f:expr) => {{
        use $crate::utils::counter::{insert_counter, lazy_static, Counter, CounterTime};
        lazy_static::lazy_static! {
            static ref COUNTER_REF: std::sync::Arc<Counter> =
                insert_counter($descr, Counter::Time(CounterTime::new()));
        }
        match &**COUNTER_REF {
            Counter::Time(c) if cfg!(feature = "counter") => {
                $crate::utils::timer::timed_scope_accumulate_(c, $f)
            }
            _ => ($f)(),
        }
    }};
}

pub use timed_scope_accumulate;
