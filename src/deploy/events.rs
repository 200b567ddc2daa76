// ABOUTME: Event classification by deployment window.
// ABOUTME: Selects service events strictly between two instants, oldest first.

use chrono::{DateTime, Utc};

use crate::orchestrator::{Service, ServiceEvent};

#[derive(Debug, Clone, thiserror::Error)]
pub enum EventWindowError {
    #[error("service {0} has no PRIMARY deployment")]
    NoPrimaryDeployment(String),
}

/// Created-at of the PRIMARY deployment.
pub fn primary_created_at(service: &Service) -> Result<DateTime<Utc>, EventWindowError> {
    service
        .primary_deployment()
        .map(|d| d.created_at)
        .ok_or_else(|| EventWindowError::NoPrimaryDeployment(service.name.clone()))
}

/// Updated-at of the PRIMARY deployment.
pub fn primary_updated_at(service: &Service) -> Result<DateTime<Utc>, EventWindowError> {
    service
        .primary_deployment()
        .map(|d| d.updated_at)
        .ok_or_else(|| EventWindowError::NoPrimaryDeployment(service.name.clone()))
}

/// An open time interval `(since, until)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeploymentWindow {
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl DeploymentWindow {
    pub fn new(since: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        Self { since, until }
    }

    /// The PRIMARY deployment's lifetime so far: created-at to updated-at.
    pub fn for_service(service: &Service) -> Result<Self, EventWindowError> {
        Ok(Self::new(
            primary_created_at(service)?,
            primary_updated_at(service)?,
        ))
    }

    /// Both ends are excluded.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.since < at && at < self.until
    }

    /// Events inside the window, ascending by timestamp; equal timestamps
    /// keep the service's original order.
    pub fn events<'a>(&self, service: &'a Service) -> Vec<&'a ServiceEvent> {
        let mut events: Vec<_> = service
            .events
            .iter()
            .filter(|event| self.contains(event.created_at))
            .collect();
        events.sort_by_key(|event| event.created_at);
        events
    }
}

/// Events strictly between `since` and `until`.
///
/// `since` defaults to the PRIMARY deployment's created-at, `until` to now.
pub fn window_events(
    service: &Service,
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
) -> Result<Vec<&ServiceEvent>, EventWindowError> {
    let since = match since {
        Some(since) => since,
        None => primary_created_at(service)?,
    };
    let until = until.unwrap_or_else(Utc::now);
    Ok(DeploymentWindow::new(since, until).events(service))
}
