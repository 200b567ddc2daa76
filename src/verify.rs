// ABOUTME: Precondition checks run before any orchestrator call.
// ABOUTME: Aggregates every credential and config problem into one error.

use nonempty::NonEmpty;

use crate::config::{Config, DeployTarget};
use crate::credentials::{CredentialProvider, Credentials};
use crate::error::{Error, ErrorKind, Result};

/// Credentials and targets that passed verification.
#[derive(Debug)]
pub struct Verified {
    pub credentials: Credentials,
    pub targets: NonEmpty<DeployTarget>,
}

/// Check credentials and the `services` list, reporting all problems at once.
///
/// # Errors
///
/// `Error::Verification` with every catalog entry that applies, or
/// `Error::InvalidConfig` when a cluster or service name is malformed.
pub fn verify_conditions(config: &Config, provider: &dyn CredentialProvider) -> Result<Verified> {
    let mut problems = Vec::new();

    let set = match provider.load() {
        Ok(set) => Some(set),
        Err(err) => {
            tracing::debug!(provider = provider.name(), error = %err, "credential lookup failed");
            problems.push(ErrorKind::Credentials);
            None
        }
    };

    if let Some(ref set) = set {
        if set.access_key_id.is_none() {
            problems.push(ErrorKind::NoAccessKeyId);
        }
        if set.secret_access_key.is_none() {
            problems.push(ErrorKind::NoSecretAccessKey);
        }
        if set.region.is_none() && config.region.is_none() {
            problems.push(ErrorKind::NoRegion);
        }
    }

    problems.extend(config.target_problems());
    if !problems.is_empty() {
        return Err(Error::Verification(problems));
    }

    // Every part was checked above
    let set = set.ok_or(Error::Verification(vec![ErrorKind::Credentials]))?;
    let credentials = Credentials::resolve(set, provider.name(), config.region.as_deref())?;
    let targets = config.targets()?;

    Ok(Verified {
        credentials,
        targets,
    })
}
