//! Countdown timer and the scoped tick schedule that drives it.
//!
//! [`CountdownTimer`] is plain state: it only moves when [`tick`] is called.
//! [`TickSchedule`] owns the runtime interval that produces those calls; the
//! interval is dropped on [`TickSchedule::cancel`] (or with the schedule), so
//! no tick can be delivered after a session leaves `InProgress`.
//!
//! [`tick`]: CountdownTimer::tick

use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Period between countdown ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Result of advancing the countdown by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// One second elapsed; time remains.
    Ticked { remaining: u64 },
    /// The countdown reached zero. Reported exactly once per timer.
    Expired,
    /// The timer is stopped or already expired.
    Idle,
}

/// Seconds remaining in an attempt.
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    remaining: u64,
    expired: bool,
    stopped: bool,
}

impl CountdownTimer {
    /// Negative values are clamped to zero and expire immediately.
    pub fn new(remaining_secs: i64) -> Self {
        Self {
            remaining: u64::try_from(remaining_secs).unwrap_or(0),
            expired: false,
            stopped: false,
        }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn has_expired(&self) -> bool {
        self.expired
    }

    /// `true` while ticks still change the countdown.
    pub fn is_running(&self) -> bool {
        !self.stopped && !self.expired
    }

    /// Fire expiry if the countdown is at zero and has not fired yet.
    ///
    /// A timer constructed at or below zero expires on the first call,
    /// without any tick.
    pub fn take_expiry(&mut self) -> bool {
        if self.is_running() && self.remaining == 0 {
            self.expired = true;
            true
        } else {
            false
        }
    }

    /// Advance by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.take_expiry() {
            TickOutcome::Expired
        } else {
            TickOutcome::Ticked {
                remaining: self.remaining,
            }
        }
    }

    /// Stop the countdown; later ticks are ignored and expiry never fires.
    pub fn stop(&mut self) {
        self.stopped = true;
    }
}

/// Cancellable source of once-per-period ticks.
///
/// Must be started from within a Tokio runtime. A cancelled schedule never
/// yields again.
#[derive(Debug)]
pub struct TickSchedule {
    interval: Option<Interval>,
}

impl TickSchedule {
    /// Start ticking; the first tick arrives one `period` from now.
    pub fn start(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            interval: Some(interval),
        }
    }

    /// A schedule that never ticks.
    pub fn idle() -> Self {
        Self { interval: None }
    }

    pub fn is_active(&self) -> bool {
        self.interval.is_some()
    }

    /// Wait for the next tick. Pends forever once cancelled.
    pub async fn next(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }

    /// Drop the underlying interval.
    pub fn cancel(&mut self) {
        if self.interval.take().is_some() {
            tracing::debug!("tick schedule cancelled");
        }
    }
}
