// ABOUTME: Task definition operations trait for the orchestrator.
// ABOUTME: Container definitions stay opaque except for name and image.

use async_trait::async_trait;

use crate::orchestrator::OrchestratorError;
use crate::types::TaskDefinitionArn;

/// A container definition whose image can be swapped without touching
/// anything else.
pub trait ContainerImage: Clone + Send + Sync {
    /// Container name, for narration.
    fn container_name(&self) -> &str;

    /// Current image reference, if one is set.
    fn image(&self) -> Option<&str>;

    /// A copy of this definition with only the image replaced.
    fn with_image(&self, image: String) -> Self;
}

/// A registered task definition revision.
pub trait TaskDefinitionSpec: Send + Sync {
    type Container: ContainerImage;

    fn family(&self) -> &str;

    fn revision(&self) -> i32;

    fn arn(&self) -> Option<TaskDefinitionArn>;

    /// Container definitions in registration order.
    fn containers(&self) -> &[Self::Container];
}

/// Shorthand for the container type of an orchestrator's task definitions.
pub type ContainerOf<O> =
    <<O as TaskDefinitionOps>::TaskDefinition as TaskDefinitionSpec>::Container;

/// Identity of a freshly registered revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredRevision {
    pub arn: TaskDefinitionArn,
    pub family: String,
    pub revision: i32,
}

impl std::fmt::Display for RegisteredRevision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.family, self.revision)
    }
}

#[async_trait]
pub trait TaskDefinitionOps: Send + Sync {
    type TaskDefinition: TaskDefinitionSpec;

    /// Fetch a task definition by ARN (or `family:revision`).
    async fn describe_task_definition(
        &self,
        arn: &TaskDefinitionArn,
    ) -> Result<Self::TaskDefinition, OrchestratorError>;

    /// Register a new revision of `base`'s family.
    ///
    /// Every structural field of `base` is carried forward; only the
    /// container definitions are replaced by `containers`.
    async fn register_task_definition(
        &self,
        base: &Self::TaskDefinition,
        containers: Vec<ContainerOf<Self>>,
    ) -> Result<RegisteredRevision, OrchestratorError>;
}
