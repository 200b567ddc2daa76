// ABOUTME: ECS cluster identifier validation.
// ABOUTME: Accepts either a short cluster name or a full cluster ARN.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

const MAX_LEN: usize = 255;

#[derive(Debug, Error)]
pub enum ClusterNameError {
    #[error("cluster name cannot be empty")]
    Empty,

    #[error("cluster name exceeds maximum length of 255 characters")]
    TooLong,

    #[error("invalid character in cluster name: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ClusterName(String);

impl ClusterName {
    pub fn new(value: &str) -> Result<Self, ClusterNameError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ClusterNameError::Empty);
        }

        if value.starts_with("arn:") {
            if let Some(c) = value.chars().find(|c| c.is_whitespace()) {
                return Err(ClusterNameError::InvalidChar(c));
            }
            return Ok(Self(value.to_string()));
        }

        if value.len() > MAX_LEN {
            return Err(ClusterNameError::TooLong);
        }

        if let Some(c) = value
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '-' && *c != '_')
        {
            return Err(ClusterNameError::InvalidChar(c));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_arn(&self) -> bool {
        self.0.starts_with("arn:")
    }
}

impl fmt::Display for ClusterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
