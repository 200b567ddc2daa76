// ABOUTME: Composable capability traits for the cluster orchestrator.
// ABOUTME: Defines ServiceOps, TaskDefinitionOps, TaskOps and the combined Orchestrator.

mod service;
mod task;
mod task_definition;

pub use service::{ServiceOps, ServiceUpdate};
pub use task::TaskOps;
pub use task_definition::{
    ContainerImage, ContainerOf, RegisteredRevision, TaskDefinitionOps, TaskDefinitionSpec,
};

/// Everything a release needs: read and update services, read and register
/// task definitions, and inspect running tasks.
pub trait Orchestrator: ServiceOps + TaskDefinitionOps + TaskOps {}

impl<T: ?Sized> Orchestrator for T where T: ServiceOps + TaskDefinitionOps + TaskOps {}
