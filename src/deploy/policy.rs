// ABOUTME: Monitor policy: deadline, warning handling, and poll cadence.
// ABOUTME: Timeout is configured in seconds, with -1 meaning no deadline.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_POLL_RETRIES: u32 = 3;

/// Sentinel that disables the deadline.
const DISABLED: i64 = -1;

#[derive(Debug, thiserror::Error)]
#[error("invalid timeout {0}: expected a positive number of seconds or -1")]
pub struct InvalidTimeout(pub i64);

/// How long the monitor waits for convergence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    /// Poll until the service converges or fails.
    Disabled,
    /// Fail once this much time has passed since polling began.
    After(Duration),
}

impl Timeout {
    pub fn from_secs(secs: i64) -> Result<Self, InvalidTimeout> {
        match secs {
            DISABLED => Ok(Self::Disabled),
            s if s > 0 => Ok(Self::After(Duration::from_secs(s.unsigned_abs()))),
            s => Err(InvalidTimeout(s)),
        }
    }

    pub fn as_secs(&self) -> i64 {
        match self {
            Self::Disabled => DISABLED,
            Self::After(d) => i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
        }
    }

    /// Absolute deadline for polling that began at `start`.
    /// `None` when disabled or too far away to represent.
    pub fn deadline(&self, start: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Disabled => None,
            Self::After(d) => start.checked_add_signed(TimeDelta::from_std(*d).ok()?),
        }
    }
}

impl Default for Timeout {
    fn default() -> Self {
        Self::After(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "disabled"),
            Self::After(d) => write!(f, "{}s", d.as_secs()),
        }
    }
}

impl Serialize for Timeout {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_secs())
    }
}

impl<'de> Deserialize<'de> for Timeout {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let secs = i64::deserialize(deserializer)?;
        Timeout::from_secs(secs).map_err(serde::de::Error::custom)
    }
}

/// Everything that shapes one monitor run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorPolicy {
    pub timeout: Timeout,
    /// Treat service events as warnings instead of failures.
    pub ignore_warnings: bool,
    pub poll_interval: Duration,
    /// Consecutive failed polls tolerated before giving up.
    pub poll_retries: u32,
}

impl Default for MonitorPolicy {
    fn default() -> Self {
        Self {
            timeout: Timeout::default(),
            ignore_warnings: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_retries: DEFAULT_POLL_RETRIES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minus_one_disables_deadline() {
        let timeout = Timeout::from_secs(-1).unwrap();
        assert_eq!(timeout, Timeout::Disabled);
        assert!(timeout.deadline(Utc::now()).is_none());
    }

    #[test]
    fn positive_seconds_set_deadline() {
        let start = Utc::now();
        let deadline = Timeout::from_secs(2).unwrap().deadline(start).unwrap();
        assert_eq!(deadline - start, TimeDelta::seconds(2));
    }

    #[test]
    fn zero_and_other_negatives_are_rejected() {
        assert!(Timeout::from_secs(0).is_err());
        assert!(Timeout::from_secs(-5).is_err());
    }

    #[test]
    fn default_is_five_minutes() {
        assert_eq!(Timeout::default().as_secs(), 300);
        assert_eq!(Timeout::default().to_string(), "300s");
    }
}
