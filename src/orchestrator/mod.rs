// ABOUTME: Orchestrator control-plane facade and the ECS implementation.
// ABOUTME: Exposes capability traits plus the immutable snapshots they return.

mod ecs;
mod error;
mod model;
pub mod traits;

pub use ecs::EcsOrchestrator;
pub use error::OrchestratorError;
pub use model::{Deployment, DeploymentStatus, Service, ServiceEvent, Task, TaskStatus};
pub use traits::*;
