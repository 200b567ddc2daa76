// ABOUTME: Immutable snapshots of orchestrator state.
// ABOUTME: Service, Deployment, ServiceEvent, and Task as returned by describe calls.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::types::{ClusterArn, TaskArn, TaskDefinitionArn};

/// Rollout status of a service deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DeploymentStatus {
    /// The deployment currently being rolled out.
    Primary,
    /// An older deployment still draining.
    Active,
    /// A finished deployment.
    Inactive,
    /// Anything the orchestrator may add later.
    Other(String),
}

impl DeploymentStatus {
    pub fn parse(value: &str) -> Self {
        match value {
            "PRIMARY" => Self::Primary,
            "ACTIVE" => Self::Active,
            "INACTIVE" => Self::Inactive,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_primary(&self) -> bool {
        matches!(self, Self::Primary)
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "PRIMARY"),
            Self::Active => write!(f, "ACTIVE"),
            Self::Inactive => write!(f, "INACTIVE"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// One deployment of a service.
#[derive(Debug, Clone, Serialize)]
pub struct Deployment {
    pub id: String,
    pub status: DeploymentStatus,
    pub task_definition: Option<TaskDefinitionArn>,
    pub desired_count: i32,
    pub running_count: i32,
    pub pending_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A scheduler message attached to a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceEvent {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub message: String,
}

/// Live service state at the moment it was described.
#[derive(Debug, Clone, Serialize)]
pub struct Service {
    pub name: String,
    pub cluster_arn: Option<ClusterArn>,
    pub desired_count: i32,
    pub task_definition: TaskDefinitionArn,
    pub deployments: Vec<Deployment>,
    pub events: Vec<ServiceEvent>,
}

impl Service {
    /// The deployment currently rolling out, if any.
    pub fn primary_deployment(&self) -> Option<&Deployment> {
        self.deployments.iter().find(|d| d.status.is_primary())
    }
}

/// Last reported lifecycle status of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Provisioning,
    Pending,
    Activating,
    Running,
    Deactivating,
    Stopping,
    Deprovisioning,
    Stopped,
    Other(String),
}

impl TaskStatus {
    pub fn parse(value: &str) -> Self {
        match value {
            "PROVISIONING" => Self::Provisioning,
            "PENDING" => Self::Pending,
            "ACTIVATING" => Self::Activating,
            "RUNNING" => Self::Running,
            "DEACTIVATING" => Self::Deactivating,
            "STOPPING" => Self::Stopping,
            "DEPROVISIONING" => Self::Deprovisioning,
            "STOPPED" => Self::Stopped,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A live task, as much of it as convergence needs.
#[derive(Debug, Clone)]
pub struct Task {
    pub arn: TaskArn,
    pub task_definition_arn: TaskDefinitionArn,
    pub last_status: TaskStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deployment_status_round_trips_known_values() {
        for raw in ["PRIMARY", "ACTIVE", "INACTIVE"] {
            assert_eq!(DeploymentStatus::parse(raw).to_string(), raw);
        }
        assert_eq!(
            DeploymentStatus::parse("DRAINING"),
            DeploymentStatus::Other("DRAINING".to_string())
        );
    }

    #[test]
    fn task_status_parses_running() {
        assert_eq!(TaskStatus::parse("RUNNING"), TaskStatus::Running);
        assert_eq!(
            TaskStatus::parse("WEIRD"),
            TaskStatus::Other("WEIRD".to_string())
        );
    }
}
