// Time source for remote call timestamps

use std::sync::Arc;

/// Source of wall-clock milliseconds.
pub trait Clock: Send + Sync {
    fn unix_millis(&self) -> u128;

    /// Millisecond epoch rendered the way the remote protocol expects it.
    fn timestamp(&self) -> String {
        self.unix_millis().to_string()
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_millis(&self) -> u128 {
        #[cfg(miri)]
        {
            0
        }
        #[cfg(not(miri))]
        {
            chrono::Utc::now().timestamp_millis().max(0) as u128
        }
    }
}

/// Clock pinned to one instant. Useful for dry runs and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u128);

impl Clock for FixedClock {
    fn unix_millis(&self) -> u128 {
        self.0
    }
}

pub fn system_clock() -> Arc<dyn Clock> {
    Arc::new(SystemClock)
}
