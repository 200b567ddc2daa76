// ABOUTME: Rollout monitor: a pure per-tick transition plus an async poll loop.
// ABOUTME: Turns service events and convergence into Polling, Succeeded, or Failed.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::diagnostics::WarningKind;
use crate::orchestrator::{OrchestratorError, Service, ServiceEvent, ServiceOps, TaskOps};
use crate::types::{ClusterName, ServiceName};

use super::clock::Clock;
use super::convergence::is_converged;
use super::error::DeployError;
use super::events::{DeploymentWindow, EventWindowError, primary_created_at};
use super::narration::{Narration, Narrator};
use super::policy::MonitorPolicy;

pub const FAILURE_MESSAGE: &str = "Deployment failed";
pub const SUCCESS_MESSAGE: &str = "Deployment successful";
pub const START_MESSAGE: &str = "Deploying new task definition";

/// Why the monitor gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The deadline passed before the service converged.
    Timeout,
    /// A service event was treated as fatal.
    HardError,
}

/// Terminal failure of a monitor run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct MonitorFailure {
    pub reason: FailureReason,
    pub message: String,
    /// Watermark at the moment the run failed.
    pub inspected_until: Option<DateTime<Utc>>,
}

/// Monitor state between ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorState {
    /// Still waiting; events up to `inspected_until` have been handled.
    /// `None` means nothing was inspected past the primary deployment's start.
    Polling {
        inspected_until: Option<DateTime<Utc>>,
    },
    Succeeded,
    Failed(MonitorFailure),
}

/// Everything one tick saw.
#[derive(Debug, Clone, Copy)]
pub struct Observation<'a> {
    pub service: &'a Service,
    /// Taken after the convergence query.
    pub now: DateTime<Utc>,
    pub converged: bool,
    pub timed_out: bool,
}

/// Next state plus the lines to narrate, in order.
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: MonitorState,
    pub lines: Vec<Narration>,
}

/// Result of classifying the events of one tick.
#[derive(Debug, Clone, Default)]
pub struct Inspection {
    pub inspected_until: Option<DateTime<Utc>>,
    pub errored: bool,
    pub lines: Vec<Narration>,
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn classify(
    watermark: Option<DateTime<Utc>>,
    events: &[&ServiceEvent],
    ignore_warnings: bool,
) -> Inspection {
    events.iter().fold(
        Inspection {
            inspected_until: watermark,
            ..Inspection::default()
        },
        |mut acc, event| {
            let at = timestamp(event.created_at);
            if ignore_warnings {
                acc.lines.push(Narration::warn(
                    WarningKind::ServiceEvent,
                    format!("[{at}] WARNING: {}", event.message),
                ));
                acc.lines.push(Narration::info("Continuing."));
                acc.inspected_until = Some(
                    acc.inspected_until
                        .map_or(event.created_at, |w| w.max(event.created_at)),
                );
            } else {
                acc.lines
                    .push(Narration::error(format!("[{at}] ERROR: {}", event.message)));
                acc.errored = true;
            }
            acc
        },
    )
}

/// Classify events newer than the watermark and report older ones.
///
/// Events in `(watermark, now)` are warnings when `ignore_warnings` is set,
/// advancing the watermark, and fatal otherwise, leaving it in place.
/// Events inside the primary deployment's own lifetime are narrated as
/// detail and never fail the tick.
pub fn inspect(
    watermark: Option<DateTime<Utc>>,
    service: &Service,
    now: DateTime<Utc>,
    ignore_warnings: bool,
) -> Result<Inspection, EventWindowError> {
    let since = match watermark {
        Some(since) => since,
        None => primary_created_at(service)?,
    };
    let recent = DeploymentWindow::new(since, now).events(service);
    let mut inspection = classify(watermark, &recent, ignore_warnings);

    let older = DeploymentWindow::for_service(service)?.events(service);
    if !older.is_empty() {
        inspection.lines.push(Narration::detail("Older errors"));
        inspection.lines.extend(older.iter().map(|event| {
            Narration::detail(format!("[{}] {}", timestamp(event.created_at), event.message))
        }));
    }

    Ok(inspection)
}

fn timeout_failure(
    policy: &MonitorPolicy,
    inspected_until: Option<DateTime<Utc>>,
    last_poll_error: Option<&OrchestratorError>,
) -> MonitorFailure {
    let mut message = format!("{FAILURE_MESSAGE} due to timeout after {}", policy.timeout);
    if let Some(err) = last_poll_error {
        message.push_str(&format!(" (last poll failed: {err})"));
    }
    MonitorFailure {
        reason: FailureReason::Timeout,
        message,
        inspected_until,
    }
}

/// Decide the next monitor state from one observation.
pub fn transition(
    watermark: Option<DateTime<Utc>>,
    observation: &Observation<'_>,
    policy: &MonitorPolicy,
) -> Result<Transition, EventWindowError> {
    let Inspection {
        inspected_until,
        errored,
        mut lines,
    } = inspect(
        watermark,
        observation.service,
        observation.now,
        policy.ignore_warnings,
    )?;

    let state = if observation.timed_out {
        MonitorState::Failed(timeout_failure(policy, inspected_until, None))
    } else if errored {
        MonitorState::Failed(MonitorFailure {
            reason: FailureReason::HardError,
            message: FAILURE_MESSAGE.to_string(),
            inspected_until,
        })
    } else if observation.converged {
        lines.push(Narration::success(SUCCESS_MESSAGE));
        MonitorState::Succeeded
    } else {
        MonitorState::Polling { inspected_until }
    };

    Ok(Transition { state, lines })
}

/// Async poll loop around [`transition`].
pub struct Monitor<'a, O: ?Sized, C: ?Sized> {
    orchestrator: &'a O,
    clock: &'a C,
    narrator: &'a dyn Narrator,
    policy: &'a MonitorPolicy,
}

impl<'a, O, C> Monitor<'a, O, C>
where
    O: ServiceOps + TaskOps + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(
        orchestrator: &'a O,
        clock: &'a C,
        narrator: &'a dyn Narrator,
        policy: &'a MonitorPolicy,
    ) -> Self {
        Self {
            orchestrator,
            clock,
            narrator,
            policy,
        }
    }

    /// Fresh snapshot plus convergence, unless the deadline already passed.
    async fn observe(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
        timed_out: bool,
    ) -> Result<(Service, bool), OrchestratorError> {
        let snapshot = self.orchestrator.describe_service(cluster, service).await?;
        let converged = if timed_out {
            false
        } else {
            is_converged(self.orchestrator, cluster, service, &snapshot).await?
        };
        Ok((snapshot, converged))
    }

    /// Poll until the service converges, an event fails it, or time runs out.
    ///
    /// Returns the final service snapshot on success.
    ///
    /// # Errors
    ///
    /// `DeployError::Monitor` for a fatal event or timeout, and
    /// `DeployError::Orchestrator` once transport failures exceed
    /// `poll_retries` in a row. Past the deadline the final poll is still
    /// retried, and a poll that keeps failing ends as a timeout.
    pub async fn watch(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
    ) -> Result<Service, DeployError> {
        self.narrator.narrate(&Narration::info(START_MESSAGE));

        let deadline = self.policy.timeout.deadline(self.clock.now());
        let mut watermark = None;
        let mut failures = 0u32;

        loop {
            let timed_out = deadline.is_some_and(|d| self.clock.now() >= d);

            let (snapshot, converged) = match self.observe(cluster, service, timed_out).await {
                Ok(observed) => {
                    failures = 0;
                    observed
                }
                Err(source) => {
                    failures += 1;
                    if failures > self.policy.poll_retries {
                        if timed_out {
                            let failure = timeout_failure(self.policy, watermark, Some(&source));
                            return Err(failure.into());
                        }
                        return Err(DeployError::Orchestrator {
                            step: "poll service",
                            source,
                        });
                    }
                    tracing::warn!(%service, failures, error = %source, "poll failed");
                    self.narrator.narrate(&Narration::warn(
                        WarningKind::PollRetry,
                        format!(
                            "Polling failed ({failures}/{}): {source}. Retrying.",
                            self.policy.poll_retries
                        ),
                    ));
                    self.clock.sleep(self.policy.poll_interval).await;
                    continue;
                }
            };

            let observation = Observation {
                service: &snapshot,
                now: self.clock.now(),
                converged,
                timed_out,
            };
            let Transition { state, lines } = transition(watermark, &observation, self.policy)?;
            for line in &lines {
                self.narrator.narrate(line);
            }

            match state {
                MonitorState::Polling { inspected_until } => {
                    tracing::debug!(%service, ?inspected_until, "still converging");
                    watermark = inspected_until;
                    self.clock.sleep(self.policy.poll_interval).await;
                }
                MonitorState::Succeeded => return Ok(snapshot),
                MonitorState::Failed(failure) => return Err(failure.into()),
            }
        }
    }
}
