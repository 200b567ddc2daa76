// ABOUTME: ECS service identifier validation.
// ABOUTME: Accepts a short service name or a full service ARN.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

const MAX_LEN: usize = 255;

#[derive(Debug, Error)]
pub enum ServiceNameError {
    #[error("service name cannot be empty")]
    Empty,

    #[error("service name exceeds maximum length of 255 characters")]
    TooLong,

    #[error("invalid character in service name: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn new(value: &str) -> Result<Self, ServiceNameError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ServiceNameError::Empty);
        }

        if value.starts_with("arn:") {
            if let Some(c) = value.chars().find(|c| c.is_whitespace()) {
                return Err(ServiceNameError::InvalidChar(c));
            }
            return Ok(Self(value.to_string()));
        }

        if value.len() > MAX_LEN {
            return Err(ServiceNameError::TooLong);
        }

        if let Some(c) = value
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '-' && *c != '_')
        {
            return Err(ServiceNameError::InvalidChar(c));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_arn(&self) -> bool {
        self.0.starts_with("arn:")
    }

    /// The bare service name. For an ARN (`...:service/cluster/web` or the
    /// older `...:service/web`) this is the last path segment.
    pub fn short_name(&self) -> &str {
        if self.is_arn() {
            self.0.rsplit('/').next().unwrap_or(&self.0)
        } else {
            &self.0
        }
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
