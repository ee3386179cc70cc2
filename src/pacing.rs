// Iteration budget and inter-iteration pacing.

use crate::interrupt::Interrupt;
use std::time::Duration;

/// Used when neither an iteration count nor a duration is given.
pub const DEFAULT_DURATION: Duration = Duration::from_secs(60 * 60);

/// What bounds a run. An explicit count wins over a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Iterations(u64),
    Duration(Duration),
}

impl Termination {
    pub fn resolve(iterations: Option<u64>, duration: Option<Duration>) -> Self {
        match (iterations, duration) {
            (Some(n), _) => Termination::Iterations(n),
            (None, Some(d)) => Termination::Duration(d),
            (None, None) => Termination::Duration(DEFAULT_DURATION),
        }
    }
}

/// Total number of iterations for a run, never less than one.
///
/// Duration-bound runs use `floor(duration / interval)`. A zero interval
/// cannot divide a duration; config validation rejects that combination, and
/// here it degrades to a single iteration.
pub fn plan(termination: Termination, interval: Duration) -> u64 {
    match termination {
        Termination::Iterations(n) => n.max(1),
        Termination::Duration(_) if interval.is_zero() => 1,
        Termination::Duration(d) => {
            let n = d.as_nanos() / interval.as_nanos();
            u64::try_from(n).unwrap_or(u64::MAX).max(1)
        }
    }
}

/// How long to wait after a batch that took `elapsed`, so that batches start
/// roughly `interval` apart. Zero when the batch overran the interval; missed
/// slots are not made up.
pub fn remainder(interval: Duration, elapsed: Duration) -> Duration {
    interval.saturating_sub(elapsed)
}

/// Wait out the rest of the interval. Returns `true` if an interrupt ended
/// the wait early.
pub fn sleep_remainder(interval: Duration, elapsed: Duration, interrupt: &Interrupt) -> bool {
    let pause = remainder(interval, elapsed);
    tracing::trace!(?pause, ?elapsed, "pacing");
    interrupt.sleep(pause)
}
