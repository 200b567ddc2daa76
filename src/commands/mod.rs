// ABOUTME: Command module aggregator for the ecsroll CLI.
// ABOUTME: Shared setup plus sequential and parallel fan-out over targets.

mod deploy;
mod redeploy;
mod status;
mod verify;

pub use deploy::deploy;
pub use redeploy::redeploy;
pub use status::status;
pub use verify::verify;

use ecsroll::config::{Config, DeployTarget};
use ecsroll::credentials::EnvCredentials;
use ecsroll::deploy::DeployError;
use ecsroll::error::{Error, Result};
use ecsroll::orchestrator::EcsOrchestrator;
use ecsroll::output::Output;
use ecsroll::verify::{Verified, verify_conditions};
use futures::future::join_all;
use nonempty::NonEmpty;
use std::future::Future;

/// Verify the environment and build a client for it.
fn connect(config: &Config) -> Result<(EcsOrchestrator, NonEmpty<DeployTarget>)> {
    let Verified {
        credentials,
        targets,
    } = verify_conditions(config, &EnvCredentials)?;
    tracing::debug!(region = credentials.region(), targets = targets.len(), "verified");
    Ok((EcsOrchestrator::new(&credentials), targets))
}

/// Run `task` for every target.
///
/// Sequential runs stop at the first failure. Parallel runs wait for all
/// targets, report every failure, and return the first.
async fn fan_out<'a, T, F, Fut>(
    targets: &'a NonEmpty<DeployTarget>,
    parallel: bool,
    output: &Output,
    task: F,
) -> Result<Vec<T>>
where
    F: Fn(&'a DeployTarget) -> Fut,
    Fut: Future<Output = std::result::Result<T, DeployError>>,
{
    let wrap = |target: &DeployTarget, source: DeployError| Error::Deploy {
        service: target.label(),
        source,
    };

    if !parallel {
        let mut done = Vec::with_capacity(targets.len());
        for target in targets.iter() {
            done.push(task(target).await.map_err(|e| wrap(target, e))?);
        }
        return Ok(done);
    }

    let results = join_all(targets.iter().map(&task)).await;
    let mut done = Vec::with_capacity(results.len());
    let mut first_error = None;
    for (target, result) in targets.iter().zip(results) {
        match result {
            Ok(value) => done.push(value),
            Err(source) => {
                let err = wrap(target, source);
                if first_error.is_none() {
                    first_error = Some(err);
                } else {
                    output.error(&err.to_string());
                }
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(done),
    }
}
