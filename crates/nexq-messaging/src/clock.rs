//! Time sources for the session
//!
//! The session never reads the wall clock directly. Production code uses
//! [`SystemClock`]; tests and the fast demo use [`ManualClock`] and move it
//! forward explicitly.

use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

/// Time abstraction for testability
pub trait Clock: Send + Sync {
    /// Get the current UTC datetime
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Real clock implementation using system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Virtual clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Start the clock at a fixed instant
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let delta = chrono::Duration::from_std(by).unwrap_or(chrono::Duration::MAX);
        let mut now = self.now.lock();
        *now = now.checked_add_signed(delta).unwrap_or(DateTime::<Utc>::MAX_UTC);
    }

    /// Jump to an instant; earlier instants are ignored
    pub fn set(&self, to: DateTime<Utc>) {
        let mut now = self.now.lock();
        if to > *now {
            *now = to;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::starting_at(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl Clock for ManualClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;

    #[test]
    fn test_manual_clock_advances() {
        let start = Utc.with_ymd_and_hms(2025, 4, 10, 16, 0, 0).unwrap();
        let clock = ManualClock::starting_at(start);
        assert_eq!(clock.now_utc(), start);

        clock.advance(Duration::from_millis(5000));
        assert_eq!(clock.now_utc(), start + chrono::Duration::seconds(5));
    }

    #[test]
    fn test_manual_clock_never_rewinds() {
        let start = Utc.with_ymd_and_hms(2025, 4, 10, 16, 0, 0).unwrap();
        let clock = ManualClock::starting_at(start);
        clock.set(start - chrono::Duration::hours(1));
        assert_eq!(clock.now_utc(), start);
    }

    #[test]
    fn test_shared_clock() {
        let clock = Arc::new(ManualClock::default());
        let shared: Arc<dyn Clock> = clock.clone();
        clock.advance(Duration::from_secs(1));
        assert_eq!(shared.now_utc(), DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::seconds(1));
    }
}
