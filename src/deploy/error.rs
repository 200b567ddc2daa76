// ABOUTME: Error types for release and redeploy operations.
// ABOUTME: Wraps orchestrator, rewrite, and monitor failures with the step that failed.

use crate::orchestrator::OrchestratorError;

use super::events::EventWindowError;
use super::monitor::{FailureReason, MonitorFailure};
use super::rewrite::ImageRewriteError;

/// Errors that can occur while releasing a service.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// An orchestrator call failed.
    #[error("{step} failed: {source}")]
    Orchestrator {
        step: &'static str,
        #[source]
        source: OrchestratorError,
    },

    /// A container image could not be retagged.
    #[error(transparent)]
    Rewrite(#[from] ImageRewriteError),

    /// The service has no deployment to anchor the event window.
    #[error(transparent)]
    EventWindow(#[from] EventWindowError),

    /// The rollout failed or timed out.
    #[error(transparent)]
    Monitor(#[from] MonitorFailure),

    /// The task definition has no container definitions to retag.
    #[error("task definition {0} has no container definitions")]
    NoContainers(String),
}

/// Coarse classification for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    Transport,
    InvalidTaskDefinition,
    Rejected,
    TimedOut,
}

impl DeployError {
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            Self::Orchestrator { .. } => DeployErrorKind::Transport,
            Self::Rewrite(_) | Self::NoContainers(_) | Self::EventWindow(_) => {
                DeployErrorKind::InvalidTaskDefinition
            }
            Self::Monitor(f) if f.reason == FailureReason::Timeout => DeployErrorKind::TimedOut,
            Self::Monitor(_) => DeployErrorKind::Rejected,
        }
    }
}

/// Attach the failing step to orchestrator results.
pub trait OrchestratorResultExt<T> {
    fn during(self, step: &'static str) -> Result<T, DeployError>;
}

impl<T> OrchestratorResultExt<T> for Result<T, OrchestratorError> {
    fn during(self, step: &'static str) -> Result<T, DeployError> {
        self.map_err(|source| DeployError::Orchestrator { step, source })
    }
}
