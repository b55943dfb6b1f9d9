//! Current-time seam for the host's metadata subsystem.

use std::time::{SystemTime, UNIX_EPOCH};

/// Supplies the timestamps recorded on metadata mutations.
pub trait Clock {
    /// Current time as unix nanoseconds.
    fn now(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as i64)
            .unwrap_or(0)
    }
}
