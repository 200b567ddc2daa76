// ABOUTME: Status command implementation.
// ABOUTME: Shows deployments and convergence of every configured service.

use super::connect;
use ecsroll::config::Config;
use ecsroll::deploy::is_converged;
use ecsroll::error::Result;
use ecsroll::orchestrator::ServiceOps;
use ecsroll::output::Output;
use serde::Serialize;

#[derive(Serialize)]
struct ServiceStatus {
    service: String,
    task_definition: String,
    desired_count: i32,
    deployments: Vec<DeploymentStatusLine>,
    converged: bool,
}

#[derive(Serialize)]
struct DeploymentStatusLine {
    status: String,
    task_definition: Option<String>,
    running: i32,
    pending: i32,
    desired: i32,
}

pub async fn status(config: Config, output: &Output) -> Result<()> {
    let (orchestrator, targets) = connect(&config)?;
    let mut report = Vec::with_capacity(targets.len());

    for target in targets.iter() {
        let service = orchestrator
            .describe_service(&target.cluster, &target.service)
            .await?;
        let converged =
            is_converged(&orchestrator, &target.cluster, &target.service, &service).await?;

        output.progress(&format!(
            "{}: {} ({})",
            target.label(),
            service.task_definition,
            if converged { "steady" } else { "rolling" }
        ));
        for d in &service.deployments {
            output.progress(&format!(
                "  {:<8} running {}/{} pending {}",
                d.status.to_string(),
                d.running_count,
                d.desired_count,
                d.pending_count
            ));
        }

        report.push(ServiceStatus {
            service: target.label(),
            task_definition: service.task_definition.to_string(),
            desired_count: service.desired_count,
            deployments: service
                .deployments
                .iter()
                .map(|d| DeploymentStatusLine {
                    status: d.status.to_string(),
                    task_definition: d.task_definition.as_ref().map(|arn| arn.to_string()),
                    running: d.running_count,
                    pending: d.pending_count,
                    desired: d.desired_count,
                })
                .collect(),
            converged,
        });
    }

    output.success(&format!("{} service(s) checked", report.len()), &report);
    Ok(())
}
