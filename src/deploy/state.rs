// ABOUTME: Release state marker types for the type state pattern.
// ABOUTME: Each state carries exactly the data the next step needs.

use crate::orchestrator::{RegisteredRevision, Service, TaskDefinitionSpec};

use super::rewrite::ImageRewrite;

/// Nothing fetched yet.
/// Available actions: `fetch()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Pending;

/// Service and its current task definition described.
/// Available actions: `rewrite()`
#[derive(Debug)]
pub struct Fetched<T> {
    pub(crate) service: Service,
    pub(crate) task_definition: T,
}

/// Container images retagged in memory.
/// Available actions: `register()`
#[derive(Debug)]
pub struct Rewritten<T: TaskDefinitionSpec> {
    pub(crate) task_definition: T,
    pub(crate) containers: Vec<T::Container>,
    pub(crate) changes: Vec<ImageRewrite>,
}

/// New revision registered.
/// Available actions: `update_service()`
#[derive(Debug, Clone)]
pub struct Registered {
    pub(crate) revision: RegisteredRevision,
    pub(crate) changes: Vec<ImageRewrite>,
}

/// Service points at the new revision; rollout started.
/// Available actions: `watch()`
#[derive(Debug, Clone)]
pub struct Updated {
    pub(crate) revision: RegisteredRevision,
    pub(crate) changes: Vec<ImageRewrite>,
}

/// Rollout converged.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Completed {
    pub(crate) revision: RegisteredRevision,
    pub(crate) changes: Vec<ImageRewrite>,
    pub(crate) service: Service,
}
