// ABOUTME: Manual clock for driving the monitor without real timers.
// ABOUTME: Sleeping advances the clock instantly and is counted.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use ecsroll::deploy::Clock;
use parking_lot::Mutex;
use std::time::Duration;

/// Fixed reference instant all test timestamps are relative to.
pub fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
}

/// `at(secs)` plus some milliseconds.
pub fn at_ms(secs: i64, millis: i64) -> DateTime<Utc> {
    at(secs) + TimeDelta::milliseconds(millis)
}

pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
    sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += TimeDelta::from_std(by).unwrap();
    }

    pub fn sleep_count(&self) -> usize {
        self.sleeps.lock().len()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().push(duration);
        self.advance(duration);
    }
}

impl ManualClock {
    /// Time passed since `start`, as seen by this clock.
    pub fn now_elapsed_since(&self, start: DateTime<Utc>) -> Duration {
        (self.now() - start).to_std().unwrap()
    }
}
