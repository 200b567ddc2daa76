// ABOUTME: Task operations trait for the orchestrator.
// ABOUTME: List and describe the live tasks backing a service.

use async_trait::async_trait;

use crate::orchestrator::{OrchestratorError, Task};
use crate::types::{ClusterName, ServiceName, TaskArn};

#[async_trait]
pub trait TaskOps: Send + Sync {
    /// ARNs of the tasks currently attached to the service. May be empty.
    async fn list_task_arns(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
    ) -> Result<Vec<TaskArn>, OrchestratorError>;

    /// Describe the given tasks.
    async fn describe_tasks(
        &self,
        cluster: &ClusterName,
        tasks: &[TaskArn],
    ) -> Result<Vec<Task>, OrchestratorError>;
}
