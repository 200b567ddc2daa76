// ABOUTME: Release version used as the new image tag.
// ABOUTME: Trimmed and validated against the registry tag grammar.

use std::fmt;
use thiserror::Error;

const MAX_LEN: usize = 128;

#[derive(Debug, Error)]
pub enum ReleaseVersionError {
    #[error("release version cannot be empty")]
    Empty,

    #[error("release version exceeds maximum tag length of 128 characters")]
    TooLong,

    #[error("release version cannot start with '{0}'")]
    InvalidStart(char),

    #[error("invalid character in release version: '{0}'")]
    InvalidChar(char),
}

/// A non-empty image tag, e.g. `1.4.2` or `2024-06-01_rc1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseVersion(String);

impl ReleaseVersion {
    pub fn new(value: &str) -> Result<Self, ReleaseVersionError> {
        let value = value.trim();
        let first = value.chars().next().ok_or(ReleaseVersionError::Empty)?;

        if value.len() > MAX_LEN {
            return Err(ReleaseVersionError::TooLong);
        }

        if first == '.' || first == '-' {
            return Err(ReleaseVersionError::InvalidStart(first));
        }

        if let Some(c) = value
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && !matches!(c, '.' | '-' | '_'))
        {
            return Err(ReleaseVersionError::InvalidChar(c));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ReleaseVersion {
    type Err = ReleaseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
