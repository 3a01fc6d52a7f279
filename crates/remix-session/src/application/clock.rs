//! Session clock: the countdown's tick source.
//!
//! The clock does not touch session state. The session task polls
//! [`SessionClock::next_tick`] alongside its command queue and applies each
//! tick itself, so stopping the clock and handling a command can never race.

use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// Periodic tick source with an explicit start/stop lifecycle.
#[derive(Debug)]
pub struct SessionClock {
    period: Duration,
    interval: Option<Interval>,
}

impl SessionClock {
    /// Creates a stopped clock.
    ///
    /// `period` must be non-zero.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    /// Time between ticks.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether ticks are being scheduled.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// Starts scheduling; the first tick fires one full period from now.
    ///
    /// Restarting a running clock discards the partial period.
    pub fn start(&mut self) {
        let mut interval = time::interval_at(Instant::now() + self.period, self.period);
        // A stalled task gets one late tick per missed period, never a burst.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    /// Stops scheduling. Any partially elapsed period is discarded.
    pub fn stop(&mut self) {
        self.interval = None;
    }

    /// Waits for the next tick. Never resolves while stopped.
    ///
    /// Cancel safe: dropping the future before it resolves loses no tick.
    pub async fn next_tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_stopped_clock_never_ticks() {
        let mut clock = SessionClock::new(Duration::from_secs(1));

        let result = time::timeout(Duration::from_secs(30), clock.next_tick()).await;

        assert!(result.is_err());
        assert!(!clock.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_fires_one_period_after_start() {
        // Arrange
        let mut clock = SessionClock::new(Duration::from_secs(1));
        let started = Instant::now();

        // Act
        clock.start();
        clock.next_tick().await;

        // Assert
        assert_eq!(started.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_period() {
        let mut clock = SessionClock::new(Duration::from_secs(1));
        let started = Instant::now();
        clock.start();

        for _ in 0..5 {
            clock.next_tick().await;
        }

        assert_eq!(started.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_pending_tick() {
        // Arrange
        let mut clock = SessionClock::new(Duration::from_secs(1));
        clock.start();
        time::advance(Duration::from_millis(600)).await;

        // Act
        clock.stop();
        let result = time::timeout(Duration::from_secs(10), clock.next_tick()).await;

        // Assert
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_begins_a_fresh_period() {
        let mut clock = SessionClock::new(Duration::from_secs(1));
        clock.start();
        time::advance(Duration::from_millis(700)).await;
        clock.stop();

        clock.start();
        let restarted = Instant::now();
        clock.next_tick().await;

        assert_eq!(restarted.elapsed(), Duration::from_secs(1));
    }
}
