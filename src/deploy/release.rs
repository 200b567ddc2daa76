// ABOUTME: Release pipeline from fetch to converged rollout, as a type state chain.
// ABOUTME: Each step consumes the release and returns the next state on success.

use serde::Serialize;

use crate::orchestrator::{
    Orchestrator, RegisteredRevision, Service, ServiceOps, ServiceUpdate, TaskDefinitionOps,
    TaskDefinitionSpec, TaskOps,
};
use crate::types::{ClusterName, ReleaseVersion, ServiceName};

use super::clock::Clock;
use super::error::{DeployError, OrchestratorResultExt};
use super::monitor::Monitor;
use super::narration::{Narration, Narrator};
use super::policy::MonitorPolicy;
use super::rewrite::{ImageRewrite, RewrittenContainers, rewrite_images};
use super::state::{Completed, Fetched, Pending, Registered, Rewritten, Updated};

/// A release in progress, parameterized by its current state.
///
/// The state carries what the previous steps produced, so a revision
/// cannot be registered before images are rewritten, and a service cannot
/// be watched before it was updated.
#[derive(Debug)]
pub struct Release<S> {
    pub(crate) cluster: ClusterName,
    pub(crate) service: ServiceName,
    pub(crate) version: ReleaseVersion,
    pub(crate) state: S,
}

impl Release<Pending> {
    pub fn new(cluster: ClusterName, service: ServiceName, version: ReleaseVersion) -> Self {
        Release {
            cluster,
            service,
            version,
            state: Pending,
        }
    }
}

impl<S> Release<S> {
    fn advance<T>(self, next: impl FnOnce(S) -> T) -> Release<T> {
        Release {
            cluster: self.cluster,
            service: self.service,
            version: self.version,
            state: next(self.state),
        }
    }

    pub fn cluster(&self) -> &ClusterName {
        &self.cluster
    }

    pub fn service_name(&self) -> &ServiceName {
        &self.service
    }

    pub fn version(&self) -> &ReleaseVersion {
        &self.version
    }

    pub fn state(&self) -> &S {
        &self.state
    }
}

// =============================================================================
// Pending -> Fetched
// =============================================================================

impl Release<Pending> {
    /// Describe the service and the task definition it currently runs.
    ///
    /// # Errors
    ///
    /// `DeployError::Orchestrator` if either describe call fails.
    #[must_use = "release state must be used"]
    pub async fn fetch<O>(
        self,
        orchestrator: &O,
        narrator: &dyn Narrator,
    ) -> Result<Release<Fetched<O::TaskDefinition>>, DeployError>
    where
        O: ServiceOps + TaskDefinitionOps + ?Sized,
    {
        let service = orchestrator
            .describe_service(&self.cluster, &self.service)
            .await
            .during("describe service")?;
        let task_definition = orchestrator
            .describe_task_definition(&service.task_definition)
            .await
            .during("describe task definition")?;

        narrator.narrate(&Narration::info(format!(
            "Deploying based on task definition: {}",
            task_definition.family()
        )));

        Ok(self.advance(|Pending| Fetched {
            service,
            task_definition,
        }))
    }
}

impl<T> Release<Fetched<T>> {
    /// Service snapshot taken before the release.
    pub fn current_service(&self) -> &Service {
        &self.state.service
    }

    pub fn task_definition(&self) -> &T {
        &self.state.task_definition
    }
}

// =============================================================================
// Fetched -> Rewritten
// =============================================================================

impl<T: TaskDefinitionSpec> Release<Fetched<T>> {
    /// Retag every container image with the release version.
    ///
    /// # Errors
    ///
    /// `DeployError::NoContainers` for an empty task definition, and
    /// `DeployError::Rewrite` for an image that cannot be retagged.
    #[must_use = "release state must be used"]
    pub fn rewrite(self, narrator: &dyn Narrator) -> Result<Release<Rewritten<T>>, DeployError> {
        let task_definition = self.state.task_definition;
        if task_definition.containers().is_empty() {
            return Err(DeployError::NoContainers(format!(
                "{}:{}",
                task_definition.family(),
                task_definition.revision()
            )));
        }

        let RewrittenContainers {
            containers,
            changes,
        } = rewrite_images(task_definition.containers(), &self.version)?;

        for change in &changes {
            narrator.narrate(&Narration::info(format!(
                "Changed image of container \"{}\" to: \"{}\" (was: \"{}\")",
                change.container, change.image, change.previous
            )));
        }

        Ok(Release {
            cluster: self.cluster,
            service: self.service,
            version: self.version,
            state: Rewritten {
                task_definition,
                containers,
                changes,
            },
        })
    }
}

impl<T: TaskDefinitionSpec> Release<Rewritten<T>> {
    pub fn changes(&self) -> &[ImageRewrite] {
        &self.state.changes
    }
}

// =============================================================================
// Rewritten -> Registered
// =============================================================================

impl<T: TaskDefinitionSpec> Release<Rewritten<T>> {
    /// Register a new revision with the rewritten containers.
    ///
    /// # Errors
    ///
    /// `DeployError::Orchestrator` if registration is rejected.
    #[must_use = "release state must be used"]
    pub async fn register<O>(
        self,
        orchestrator: &O,
        narrator: &dyn Narrator,
    ) -> Result<Release<Registered>, DeployError>
    where
        O: TaskDefinitionOps<TaskDefinition = T> + ?Sized,
    {
        narrator.narrate(&Narration::info("Creating new task definition revision"));

        let Rewritten {
            task_definition,
            containers,
            changes,
        } = self.state;
        let revision = orchestrator
            .register_task_definition(&task_definition, containers)
            .await
            .during("register task definition")?;

        narrator.narrate(&Narration::info(format!(
            "Successfully created revision: {}",
            revision.revision
        )));

        Ok(Release {
            cluster: self.cluster,
            service: self.service,
            version: self.version,
            state: Registered { revision, changes },
        })
    }
}

// =============================================================================
// Registered -> Updated
// =============================================================================

impl Release<Registered> {
    pub fn revision(&self) -> &RegisteredRevision {
        &self.state.revision
    }

    /// Point the service at the new revision.
    ///
    /// # Errors
    ///
    /// `DeployError::Orchestrator` if the update is rejected.
    #[must_use = "release state must be used"]
    pub async fn update_service<O: ServiceOps + ?Sized>(
        self,
        orchestrator: &O,
        narrator: &dyn Narrator,
    ) -> Result<Release<Updated>, DeployError> {
        narrator.narrate(&Narration::info("Updating service"));

        orchestrator
            .update_service(
                &self.cluster,
                &self.service,
                ServiceUpdate::TaskDefinition(self.state.revision.arn.clone()),
            )
            .await
            .during("update service")?;

        narrator.narrate(&Narration::success(format!(
            "Successfully changed task definition to: {}",
            self.state.revision
        )));

        Ok(self.advance(|Registered { revision, changes }| Updated { revision, changes }))
    }
}

// =============================================================================
// Updated -> Completed
// =============================================================================

impl Release<Updated> {
    /// Watch the rollout until it converges.
    ///
    /// # Errors
    ///
    /// Whatever the monitor reports: a fatal event, a timeout, or repeated
    /// transport failures.
    #[must_use = "release state must be used"]
    pub async fn watch<O, C>(
        self,
        orchestrator: &O,
        clock: &C,
        narrator: &dyn Narrator,
        policy: &MonitorPolicy,
    ) -> Result<Release<Completed>, DeployError>
    where
        O: ServiceOps + TaskOps + ?Sized,
        C: Clock + ?Sized,
    {
        let service = Monitor::new(orchestrator, clock, narrator, policy)
            .watch(&self.cluster, &self.service)
            .await?;

        Ok(self.advance(|Updated { revision, changes }| Completed {
            revision,
            changes,
            service,
        }))
    }
}

/// What a finished release did, for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseSummary {
    pub cluster: String,
    pub service: String,
    pub version: String,
    pub revision: String,
    pub task_definition_arn: String,
    pub changes: Vec<ImageRewrite>,
    pub desired_count: i32,
}

impl Release<Completed> {
    pub fn final_service(&self) -> &Service {
        &self.state.service
    }

    pub fn finish(self) -> ReleaseSummary {
        let Completed {
            revision,
            changes,
            service,
        } = self.state;
        ReleaseSummary {
            cluster: self.cluster.to_string(),
            service: self.service.to_string(),
            version: self.version.to_string(),
            revision: revision.to_string(),
            task_definition_arn: revision.arn.into_inner(),
            changes,
            desired_count: service.desired_count,
        }
    }
}

/// Run the whole release: fetch, rewrite, register, update, watch.
///
/// # Errors
///
/// The first step that fails aborts the release.
pub async fn deploy_release<O, C>(
    orchestrator: &O,
    clock: &C,
    narrator: &dyn Narrator,
    policy: &MonitorPolicy,
    cluster: ClusterName,
    service: ServiceName,
    version: ReleaseVersion,
) -> Result<ReleaseSummary, DeployError>
where
    O: Orchestrator + ?Sized,
    C: Clock + ?Sized,
{
    tracing::info!(%cluster, %service, %version, "starting release");

    let completed = Release::new(cluster, service, version)
        .fetch(orchestrator, narrator)
        .await?
        .rewrite(narrator)?
        .register(orchestrator, narrator)
        .await?
        .update_service(orchestrator, narrator)
        .await?
        .watch(orchestrator, clock, narrator, policy)
        .await?;

    Ok(completed.finish())
}
