//! The fixed-cadence loop.
//!
//! One cycle per interval, for a bounded total duration. The sleep after a
//! cycle is compensated for the time the cycle took, so cycle k starts at
//! `start + interval * k` — cadence drift does not accumulate. A cycle that
//! fails is logged through the notifier and swallowed; the next scheduled
//! cycle is the retry.
//!
//! Cancellation is cooperative: the sleep is sliced and polls an
//! `AtomicBool`, so a Ctrl-C handler setting the flag stops the loop
//! without waiting out the remaining sleep.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use chrono::Local;

use breakline_core::engine::{run_cycle, CycleContext};

/// Cadence and total run duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Time between cycle starts.
    pub interval: Duration,
    /// Total wall-clock budget for the run.
    pub duration: Duration,
}

/// How long to sleep so the next cycle starts on the cadence grid.
///
/// Returns the remainder to the next multiple of `interval` after `start`.
/// A cycle that took 5 s of a 120 s interval sleeps 115 s; a cycle that ran
/// exactly onto a grid point sleeps a full interval.
pub fn sleep_until_next(start: Instant, now: Instant, interval: Duration) -> Duration {
    let elapsed = now.saturating_duration_since(start);
    let interval_ns = interval.as_nanos().max(1);
    let into_slot = elapsed.as_nanos() % interval_ns;
    Duration::from_nanos((interval_ns - into_slot) as u64)
}

/// Granularity of cancellation polling during a sleep.
const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Sleep `total`, polling `cancel`. Returns false if cancelled.
fn sleep_cancellable(total: Duration, cancel: &AtomicBool) -> bool {
    let deadline = Instant::now() + total;
    loop {
        if cancel.load(Ordering::Relaxed) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        std::thread::sleep(SLEEP_SLICE.min(deadline - now));
    }
}

/// Run cycles on the schedule until the duration is spent or `cancel` is
/// set. Returns the number of cycles started.
pub fn run_schedule(ctx: &CycleContext, schedule: &Schedule, cancel: &AtomicBool) -> usize {
    let start = Instant::now();
    let mut cycles = 0;

    while start.elapsed() <= schedule.duration {
        if cancel.load(Ordering::Relaxed) {
            break;
        }

        ctx.notifier.on_cycle_start(Local::now());
        cycles += 1;
        if let Err(err) = run_cycle(ctx) {
            ctx.notifier.on_cycle_error(&err);
        }

        let nap = sleep_until_next(start, Instant::now(), schedule.interval);
        if !sleep_cancellable(nap, cancel) {
            break;
        }
    }

    cycles
}
