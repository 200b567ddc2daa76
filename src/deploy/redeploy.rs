// ABOUTME: Forced redeploy of a service's current task definition.
// ABOUTME: Skips task definition changes and reuses the rollout monitor.

use serde::Serialize;

use crate::orchestrator::{ServiceOps, ServiceUpdate, TaskOps};
use crate::types::{ClusterName, ServiceName};

use super::clock::Clock;
use super::error::{DeployError, OrchestratorResultExt};
use super::monitor::Monitor;
use super::narration::{Narration, Narrator};
use super::policy::MonitorPolicy;

/// Outcome of a forced redeploy.
#[derive(Debug, Clone, Serialize)]
pub struct RedeploySummary {
    pub cluster: String,
    pub service: String,
    pub task_definition_arn: String,
    pub desired_count: i32,
}

/// Restart every task of the service on its current task definition and
/// wait for the rollout to converge.
///
/// # Errors
///
/// `DeployError::Orchestrator` if the update is rejected, or whatever the
/// monitor reports.
pub async fn force_redeploy<O, C>(
    orchestrator: &O,
    clock: &C,
    narrator: &dyn Narrator,
    policy: &MonitorPolicy,
    cluster: &ClusterName,
    service: &ServiceName,
) -> Result<RedeploySummary, DeployError>
where
    O: ServiceOps + TaskOps + ?Sized,
    C: Clock + ?Sized,
{
    tracing::info!(%cluster, %service, "forcing new deployment");
    narrator.narrate(&Narration::info("Forcing new deployment"));

    orchestrator
        .update_service(cluster, service, ServiceUpdate::ForceNewDeployment)
        .await
        .during("update service")?;

    let converged = Monitor::new(orchestrator, clock, narrator, policy)
        .watch(cluster, service)
        .await?;

    Ok(RedeploySummary {
        cluster: cluster.to_string(),
        service: service.to_string(),
        task_definition_arn: converged.task_definition.into_inner(),
        desired_count: converged.desired_count,
    })
}
