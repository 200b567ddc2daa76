// ABOUTME: ECS implementation of the orchestrator traits via the AWS SDK.
// ABOUTME: Shapes requests and converts SDK responses into snapshots.

use async_trait::async_trait;
use aws_sdk_ecs::Client;
use aws_sdk_ecs::config::{BehaviorVersion, Credentials as SdkCredentials, Region};
use aws_sdk_ecs::error::DisplayErrorContext;
use aws_sdk_ecs::primitives::DateTime as SdkDateTime;
use aws_sdk_ecs::types as ecs;
use chrono::{DateTime, Utc};

use super::traits::{
    ContainerImage, RegisteredRevision, ServiceOps, ServiceUpdate, TaskDefinitionOps,
    TaskDefinitionSpec, TaskOps,
};
use super::{
    Deployment, DeploymentStatus, OrchestratorError, Service, ServiceEvent, Task, TaskStatus,
};
use crate::credentials::Credentials;
use crate::types::{ClusterArn, ClusterName, ServiceName, TaskArn, TaskDefinitionArn};

/// DescribeTasks accepts at most this many ARNs per call.
const DESCRIBE_TASKS_BATCH: usize = 100;

const PROVIDER_NAME: &str = "ecsroll";

/// Orchestrator backed by the ECS control-plane API.
#[derive(Debug, Clone)]
pub struct EcsOrchestrator {
    client: Client,
}

impl EcsOrchestrator {
    /// Build a client from explicitly resolved credentials.
    pub fn new(credentials: &Credentials) -> Self {
        let sdk_credentials = SdkCredentials::new(
            credentials.access_key_id(),
            credentials.secret_access_key(),
            credentials.session_token().map(str::to_string),
            None,
            PROVIDER_NAME,
        );
        let config = aws_sdk_ecs::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(credentials.region().to_string()))
            .credentials_provider(sdk_credentials)
            .build();

        Self::from_client(Client::from_conf(config))
    }

    /// Wrap an already configured SDK client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

// =============================================================================
// Error and Conversion Helpers
// =============================================================================

fn api_error<E: std::error::Error>(operation: &'static str, e: E) -> OrchestratorError {
    OrchestratorError::api(operation, DisplayErrorContext(&e).to_string())
}

fn to_utc(
    operation: &'static str,
    field: &str,
    value: Option<&SdkDateTime>,
) -> Result<DateTime<Utc>, OrchestratorError> {
    let value = value
        .ok_or_else(|| OrchestratorError::malformed(operation, format!("missing {field}")))?;
    DateTime::from_timestamp(value.secs(), value.subsec_nanos()).ok_or_else(|| {
        OrchestratorError::malformed(operation, format!("{field} out of range: {value}"))
    })
}

fn convert_deployment(raw: &ecs::Deployment) -> Result<Deployment, OrchestratorError> {
    const OP: &str = "DescribeServices";
    Ok(Deployment {
        id: raw.id().unwrap_or_default().to_string(),
        status: DeploymentStatus::parse(raw.status().unwrap_or_default()),
        task_definition: raw.task_definition().map(TaskDefinitionArn::new),
        desired_count: raw.desired_count(),
        running_count: raw.running_count(),
        pending_count: raw.pending_count(),
        created_at: to_utc(OP, "deployment createdAt", raw.created_at())?,
        updated_at: to_utc(OP, "deployment updatedAt", raw.updated_at())?,
    })
}

fn convert_event(raw: &ecs::ServiceEvent) -> Result<ServiceEvent, OrchestratorError> {
    Ok(ServiceEvent {
        id: raw.id().unwrap_or_default().to_string(),
        created_at: to_utc("DescribeServices", "event createdAt", raw.created_at())?,
        message: raw.message().unwrap_or_default().to_string(),
    })
}

fn convert_service(raw: &ecs::Service) -> Result<Service, OrchestratorError> {
    let task_definition = raw.task_definition().ok_or_else(|| {
        OrchestratorError::malformed("DescribeServices", "service has no task definition")
    })?;

    Ok(Service {
        name: raw.service_name().unwrap_or_default().to_string(),
        cluster_arn: raw.cluster_arn().map(ClusterArn::new),
        desired_count: raw.desired_count(),
        task_definition: TaskDefinitionArn::new(task_definition),
        deployments: raw
            .deployments()
            .iter()
            .map(convert_deployment)
            .collect::<Result<_, _>>()?,
        events: raw
            .events()
            .iter()
            .map(convert_event)
            .collect::<Result<_, _>>()?,
    })
}

fn convert_task(raw: &ecs::Task) -> Result<Task, OrchestratorError> {
    let arn = raw
        .task_arn()
        .ok_or_else(|| OrchestratorError::malformed("DescribeTasks", "task has no ARN"))?;
    let task_definition_arn = raw.task_definition_arn().ok_or_else(|| {
        OrchestratorError::malformed("DescribeTasks", format!("task {arn} has no definition"))
    })?;

    Ok(Task {
        arn: TaskArn::new(arn),
        task_definition_arn: TaskDefinitionArn::new(task_definition_arn),
        last_status: TaskStatus::parse(raw.last_status().unwrap_or_default()),
    })
}

/// ECS rejects empty lists for some optional fields; send nothing instead.
fn non_empty<T: Clone>(values: &[T]) -> Option<Vec<T>> {
    if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}

// =============================================================================
// SDK Types as Task Definition Specs
// =============================================================================

impl ContainerImage for ecs::ContainerDefinition {
    fn container_name(&self) -> &str {
        ecs::ContainerDefinition::name(self).unwrap_or_default()
    }

    fn image(&self) -> Option<&str> {
        ecs::ContainerDefinition::image(self)
    }

    fn with_image(&self, image: String) -> Self {
        let mut container = self.clone();
        container.image = Some(image);
        container
    }
}

impl TaskDefinitionSpec for ecs::TaskDefinition {
    type Container = ecs::ContainerDefinition;

    fn family(&self) -> &str {
        ecs::TaskDefinition::family(self).unwrap_or_default()
    }

    fn revision(&self) -> i32 {
        ecs::TaskDefinition::revision(self)
    }

    fn arn(&self) -> Option<TaskDefinitionArn> {
        self.task_definition_arn().map(TaskDefinitionArn::new)
    }

    fn containers(&self) -> &[ecs::ContainerDefinition] {
        self.container_definitions()
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

#[async_trait]
impl ServiceOps for EcsOrchestrator {
    async fn describe_service(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
    ) -> Result<Service, OrchestratorError> {
        let output = self
            .client
            .describe_services()
            .cluster(cluster.as_str())
            .services(service.as_str())
            .send()
            .await
            .map_err(|e| api_error("DescribeServices", e))?;

        let raw = output
            .services()
            .first()
            .ok_or_else(|| OrchestratorError::ServiceNotFound(format!("{cluster}/{service}")))?;

        convert_service(raw)
    }

    async fn update_service(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
        update: ServiceUpdate,
    ) -> Result<(), OrchestratorError> {
        let request = self
            .client
            .update_service()
            .cluster(cluster.as_str())
            .service(service.as_str());

        let request = match update {
            ServiceUpdate::TaskDefinition(arn) => request.task_definition(arn.into_inner()),
            ServiceUpdate::ForceNewDeployment => request.force_new_deployment(true),
        };

        request
            .send()
            .await
            .map_err(|e| api_error("UpdateService", e))?;

        tracing::debug!(%cluster, %service, "service update accepted");
        Ok(())
    }
}

#[async_trait]
impl TaskDefinitionOps for EcsOrchestrator {
    type TaskDefinition = ecs::TaskDefinition;

    async fn describe_task_definition(
        &self,
        arn: &TaskDefinitionArn,
    ) -> Result<ecs::TaskDefinition, OrchestratorError> {
        let output = self
            .client
            .describe_task_definition()
            .task_definition(arn.as_str())
            .send()
            .await
            .map_err(|e| api_error("DescribeTaskDefinition", e))?;

        output
            .task_definition()
            .cloned()
            .ok_or_else(|| OrchestratorError::TaskDefinitionNotFound(arn.to_string()))
    }

    async fn register_task_definition(
        &self,
        base: &ecs::TaskDefinition,
        containers: Vec<ecs::ContainerDefinition>,
    ) -> Result<RegisteredRevision, OrchestratorError> {
        const OP: &str = "RegisterTaskDefinition";

        let output = self
            .client
            .register_task_definition()
            .set_family(ecs::TaskDefinition::family(base).map(str::to_string))
            .set_task_role_arn(base.task_role_arn().map(str::to_string))
            .set_execution_role_arn(base.execution_role_arn().map(str::to_string))
            .set_network_mode(base.network_mode().cloned())
            .set_container_definitions(Some(containers))
            .set_volumes(non_empty(base.volumes()))
            .set_placement_constraints(non_empty(base.placement_constraints()))
            .set_requires_compatibilities(non_empty(base.requires_compatibilities()))
            .set_cpu(base.cpu().map(str::to_string))
            .set_memory(base.memory().map(str::to_string))
            .set_pid_mode(base.pid_mode().cloned())
            .set_ipc_mode(base.ipc_mode().cloned())
            .set_inference_accelerators(non_empty(base.inference_accelerators()))
            .set_proxy_configuration(base.proxy_configuration().cloned())
            .set_runtime_platform(base.runtime_platform().cloned())
            .set_ephemeral_storage(base.ephemeral_storage().cloned())
            .send()
            .await
            .map_err(|e| api_error(OP, e))?;

        let registered = output
            .task_definition()
            .ok_or_else(|| OrchestratorError::malformed(OP, "no task definition returned"))?;
        let arn = registered
            .arn()
            .ok_or_else(|| OrchestratorError::malformed(OP, "registered revision has no ARN"))?;

        Ok(RegisteredRevision {
            arn,
            family: TaskDefinitionSpec::family(registered).to_string(),
            revision: TaskDefinitionSpec::revision(registered),
        })
    }
}

#[async_trait]
impl TaskOps for EcsOrchestrator {
    async fn list_task_arns(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
    ) -> Result<Vec<TaskArn>, OrchestratorError> {
        let mut arns = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = self
                .client
                .list_tasks()
                .cluster(cluster.as_str())
                .service_name(service.short_name())
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| api_error("ListTasks", e))?;

            arns.extend(output.task_arns().iter().map(|arn| TaskArn::new(arn.as_str())));

            match output.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        Ok(arns)
    }

    async fn describe_tasks(
        &self,
        cluster: &ClusterName,
        tasks: &[TaskArn],
    ) -> Result<Vec<Task>, OrchestratorError> {
        let mut described = Vec::with_capacity(tasks.len());

        for batch in tasks.chunks(DESCRIBE_TASKS_BATCH) {
            let output = self
                .client
                .describe_tasks()
                .cluster(cluster.as_str())
                .set_tasks(Some(batch.iter().map(|a| a.as_str().to_string()).collect()))
                .send()
                .await
                .map_err(|e| api_error("DescribeTasks", e))?;

            for raw in output.tasks() {
                described.push(convert_task(raw)?);
            }
        }

        Ok(described)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_definition_rewrite_keeps_other_fields() {
        let container = ecs::ContainerDefinition::builder()
            .name("web")
            .image("123.dkr.ecr.eu-west-1.amazonaws.com/web:1.0.0")
            .memory(512)
            .essential(true)
            .build();

        let rewritten = container.with_image("123.dkr.ecr.eu-west-1.amazonaws.com/web:2.0.0".into());

        assert_eq!(
            ContainerImage::image(&rewritten),
            Some("123.dkr.ecr.eu-west-1.amazonaws.com/web:2.0.0")
        );
        assert_eq!(rewritten.name(), Some("web"));
        assert_eq!(rewritten.memory(), Some(512));
        assert_eq!(rewritten.essential(), Some(true));
    }

    #[test]
    fn task_definition_spec_reads_sdk_fields() {
        let definition = ecs::TaskDefinition::builder()
            .family("web")
            .revision(7)
            .task_definition_arn("arn:aws:ecs:eu-west-1:123:task-definition/web:7")
            .container_definitions(ecs::ContainerDefinition::builder().name("web").build())
            .build();

        assert_eq!(TaskDefinitionSpec::family(&definition), "web");
        assert_eq!(TaskDefinitionSpec::revision(&definition), 7);
        assert_eq!(
            definition.arn().map(|a| a.into_inner()),
            Some("arn:aws:ecs:eu-west-1:123:task-definition/web:7".to_string())
        );
        assert_eq!(definition.containers().len(), 1);
    }

    #[test]
    fn service_conversion_requires_timestamps() {
        let raw = ecs::Service::builder()
            .service_name("web")
            .task_definition("arn:td/web:1")
            .deployments(ecs::Deployment::builder().status("PRIMARY").build())
            .build();

        assert!(matches!(
            convert_service(&raw),
            Err(OrchestratorError::Malformed { .. })
        ));
    }

    #[test]
    fn service_conversion_maps_deployments_and_events() {
        let raw = ecs::Service::builder()
            .service_name("web")
            .desired_count(2)
            .task_definition("arn:td/web:2")
            .deployments(
                ecs::Deployment::builder()
                    .id("ecs-svc/1")
                    .status("PRIMARY")
                    .created_at(SdkDateTime::from_secs(1_700_000_000))
                    .updated_at(SdkDateTime::from_secs(1_700_000_060))
                    .build(),
            )
            .events(
                ecs::ServiceEvent::builder()
                    .id("e1")
                    .created_at(SdkDateTime::from_secs(1_700_000_030))
                    .message("(service web) has reached a steady state.")
                    .build(),
            )
            .build();

        let service = convert_service(&raw).unwrap();
        assert_eq!(service.desired_count, 2);
        assert_eq!(service.task_definition.as_str(), "arn:td/web:2");
        assert!(service.deployments[0].status.is_primary());
        assert_eq!(service.events[0].created_at.timestamp(), 1_700_000_030);
    }
}
