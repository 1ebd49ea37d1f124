//! Drives the session's deferred replies from the tokio timer

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use nexq_messaging::{Clock, ManualClock, MessagingSession, SessionEvent};
use tokio::time::Instant;

/// Clock anchored to the tokio timer
///
/// Reads wall time at construction and then advances with
/// `tokio::time::Instant`, so a paused runtime freezes it too.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    anchor_utc: DateTime<Utc>,
    anchor: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            anchor_utc: Utc::now(),
            anchor: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now_utc(&self) -> DateTime<Utc> {
        let elapsed =
            chrono::Duration::from_std(self.anchor.elapsed()).unwrap_or(chrono::Duration::MAX);
        self.anchor_utc
            .checked_add_signed(elapsed)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// How waiting is carried out
#[derive(Clone)]
enum Pacing {
    /// Sleep on the tokio timer
    Timer,
    /// Move a manual clock forward without sleeping
    Manual(Arc<ManualClock>),
}

/// Waits for pending replies and fires them
#[derive(Clone)]
pub struct ReplyPump {
    clock: Arc<dyn Clock>,
    pacing: Pacing,
}

impl ReplyPump {
    /// Pump that sleeps on the tokio timer
    pub fn timer(clock: Arc<TokioClock>) -> Self {
        Self {
            clock,
            pacing: Pacing::Timer,
        }
    }

    /// Pump that skips ahead on a manual clock
    pub fn manual(clock: Arc<ManualClock>) -> Self {
        Self {
            clock: clock.clone(),
            pacing: Pacing::Manual(clock),
        }
    }

    /// Clock to hand to the session
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Time left until the next pending reply, zero if it is overdue
    pub fn delay_until_next(&self, session: &MessagingSession) -> Option<Duration> {
        let due = session.next_due()?;
        let remaining = due - self.clock.now_utc();
        Some(remaining.to_std().unwrap_or(Duration::ZERO))
    }

    /// Let `delay` pass
    pub async fn wait(&self, delay: Duration) {
        match &self.pacing {
            Pacing::Timer => tokio::time::sleep(delay).await,
            Pacing::Manual(clock) => {
                clock.advance(delay);
                tokio::task::yield_now().await;
            }
        }
    }

    /// Wait for the next pending reply and deliver everything then due
    ///
    /// Returns no events when nothing is pending.
    pub async fn deliver_next(&self, session: &mut MessagingSession) -> Vec<SessionEvent> {
        let Some(delay) = self.delay_until_next(session) else {
            return Vec::new();
        };
        self.wait(delay).await;
        session.run_due()
    }
}
