// ABOUTME: Convergence check for a rolling service deployment.
// ABOUTME: One deployment left and every desired task RUNNING the current definition.

use crate::orchestrator::{OrchestratorError, Service, Task, TaskOps, TaskStatus};
use crate::types::{ClusterName, ServiceName};

/// The old deployment is gone once only one remains.
pub fn single_deployment(service: &Service) -> bool {
    service.deployments.len() == 1
}

/// Tasks RUNNING the service's current task definition.
pub fn running_count(service: &Service, tasks: &[Task]) -> usize {
    tasks
        .iter()
        .filter(|task| {
            task.task_definition_arn == service.task_definition
                && task.last_status == TaskStatus::Running
        })
        .count()
}

/// Whether the running tasks satisfy the desired count.
pub fn converged_with(service: &Service, tasks: &[Task]) -> bool {
    usize::try_from(service.desired_count).is_ok_and(|desired| desired == running_count(service, tasks))
}

/// Whether the service has fully rolled over to its current task definition.
///
/// Task counts alone are not enough: while both old and new tasks are
/// RUNNING the orchestrator still lists two deployments.
pub async fn is_converged<O: TaskOps + ?Sized>(
    orchestrator: &O,
    cluster: &ClusterName,
    service_name: &ServiceName,
    service: &Service,
) -> Result<bool, OrchestratorError> {
    if !single_deployment(service) {
        tracing::debug!(
            service = %service_name,
            deployments = service.deployments.len(),
            "rollout still replacing old deployment"
        );
        return Ok(false);
    }

    let arns = orchestrator.list_task_arns(cluster, service_name).await?;
    if arns.is_empty() {
        // Scaled to zero counts as converged
        return Ok(service.desired_count == 0);
    }

    let tasks = orchestrator.describe_tasks(cluster, &arns).await?;
    let converged = converged_with(service, &tasks);
    tracing::debug!(
        service = %service_name,
        desired = service.desired_count,
        running = running_count(service, &tasks),
        converged,
        "checked task convergence"
    );
    Ok(converged)
}
