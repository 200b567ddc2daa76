// ABOUTME: Application-wide error types and the closed error catalog.
// ABOUTME: Uses thiserror; every user-facing failure maps to an ErrorKind.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::credentials::CredentialError;
use crate::deploy::DeployError;
use crate::orchestrator::OrchestratorError;

/// Every failure the tool reports to users, with a short message and a
/// longer explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NoAccessKeyId,
    NoSecretAccessKey,
    NoRegion,
    Credentials,
    NoServices,
    NoService,
    NoCluster,
    Deploy,
}

impl ErrorKind {
    /// Stable code for scripting and JSON output.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::NoAccessKeyId => "ENOACCESSKEYID",
            ErrorKind::NoSecretAccessKey => "ENOSECRETACCESSKEY",
            ErrorKind::NoRegion => "ENOREGION",
            ErrorKind::Credentials => "ECREDENTIALS",
            ErrorKind::NoServices => "ENOSERVICES",
            ErrorKind::NoService => "ENOSERVICE",
            ErrorKind::NoCluster => "ENOCLUSTER",
            ErrorKind::Deploy => "EDEPLOY",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::NoAccessKeyId => "No aws access key id specified.",
            ErrorKind::NoSecretAccessKey => "No aws secret access key specified.",
            ErrorKind::NoRegion => "No aws region specified.",
            ErrorKind::Credentials => "No aws credentials specified.",
            ErrorKind::NoServices => "No services specified.",
            ErrorKind::NoService => "No service name specified.",
            ErrorKind::NoCluster => "No cluster specified.",
            ErrorKind::Deploy => "Error executing update-service.",
        }
    }

    pub fn details(self) -> &'static str {
        match self {
            ErrorKind::NoAccessKeyId => {
                "An aws access key id must be created and set in the `AWS_ACCESS_KEY_ID` \
                 environment variable on your CI environment."
            }
            ErrorKind::NoSecretAccessKey => {
                "An aws secret access key must be created and set in the \
                 `AWS_SECRET_ACCESS_KEY` environment variable on your CI environment."
            }
            ErrorKind::NoRegion => {
                "Set `region` in the configuration file or the `AWS_REGION` environment \
                 variable on your CI environment."
            }
            ErrorKind::Credentials => {
                "Aws credentials must be created and set in the `AWS_ACCESS_KEY_ID` and \
                 `AWS_SECRET_ACCESS_KEY` environment variables on your CI environment."
            }
            ErrorKind::NoServices => {
                "At least one entry must be listed under `services` in the configuration file."
            }
            ErrorKind::NoService => {
                "Every entry under `services` needs a non-empty `service` name."
            }
            ErrorKind::NoCluster => {
                "Every entry under `services` needs a non-empty `cluster` identifier."
            }
            ErrorKind::Deploy => {
                "The service could not be updated or did not reach a steady state. \
                 See the output above for the orchestrator events."
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<&CredentialError> for ErrorKind {
    fn from(err: &CredentialError) -> Self {
        match err {
            CredentialError::MissingAccessKeyId { .. } => ErrorKind::NoAccessKeyId,
            CredentialError::MissingSecretAccessKey { .. } => ErrorKind::NoSecretAccessKey,
            CredentialError::MissingRegion => ErrorKind::NoRegion,
            CredentialError::NotUnicode { .. } => ErrorKind::Credentials,
        }
    }
}

fn render_kinds(kinds: &[ErrorKind]) -> String {
    kinds
        .iter()
        .map(|k| k.message())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{}", render_kinds(.0))]
    Verification(Vec<ErrorKind>),

    #[error("{} ({service}: {source})", ErrorKind::Deploy.message())]
    Deploy {
        service: String,
        #[source]
        source: DeployError,
    },

    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Catalog entries behind this error, for detailed reporting.
    pub fn kinds(&self) -> Vec<ErrorKind> {
        match self {
            Error::Verification(kinds) => kinds.clone(),
            Error::Deploy { .. } => vec![ErrorKind::Deploy],
            Error::Credentials(e) => vec![ErrorKind::from(e)],
            _ => Vec::new(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
