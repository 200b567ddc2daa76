// ABOUTME: Service operations trait for the orchestrator.
// ABOUTME: Describe a service snapshot and trigger a service update.

use async_trait::async_trait;

use crate::orchestrator::{OrchestratorError, Service};
use crate::types::{ClusterName, ServiceName, TaskDefinitionArn};

/// What an update-service call should change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceUpdate {
    /// Point the service at a new task definition revision.
    TaskDefinition(TaskDefinitionArn),
    /// Redeploy the current task definition.
    ForceNewDeployment,
}

/// Service lifecycle operations.
#[async_trait]
pub trait ServiceOps: Send + Sync {
    /// Fetch a fresh snapshot of the service, including deployments and events.
    async fn describe_service(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
    ) -> Result<Service, OrchestratorError>;

    /// Start a new deployment of the service.
    async fn update_service(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
        update: ServiceUpdate,
    ) -> Result<(), OrchestratorError>;
}
