// ABOUTME: Release orchestration: image rewrite, registration, and rollout monitoring.
// ABOUTME: Exports the type state Release pipeline and its building blocks.

mod clock;
pub mod convergence;
mod error;
pub mod events;
pub mod monitor;
mod narration;
mod policy;
mod redeploy;
mod release;
pub mod rewrite;
mod state;

pub use clock::{Clock, SystemClock};
pub use convergence::is_converged;
pub use error::{DeployError, DeployErrorKind, OrchestratorResultExt};
pub use events::{DeploymentWindow, EventWindowError, window_events};
pub use monitor::{
    FailureReason, Monitor, MonitorFailure, MonitorState, Observation, Transition, transition,
};
pub use narration::{Level, Narration, Narrator, Prefixed};
pub use policy::{
    DEFAULT_POLL_INTERVAL, DEFAULT_POLL_RETRIES, DEFAULT_TIMEOUT_SECS, InvalidTimeout,
    MonitorPolicy, Timeout,
};
pub use redeploy::{RedeploySummary, force_redeploy};
pub use release::{Release, ReleaseSummary, deploy_release};
pub use rewrite::{ImageRewrite, ImageRewriteError, rewrite_images};
pub use state::{Completed, Fetched, Pending, Registered, Rewritten, Updated};
