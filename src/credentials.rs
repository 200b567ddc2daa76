// ABOUTME: Explicit AWS credential providers resolved once per invocation.
// ABOUTME: Reads keys and region from the environment or from static values.

use snafu::{OptionExt, Snafu};
use std::fmt;

pub const ACCESS_KEY_ID_VAR: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";
pub const SESSION_TOKEN_VAR: &str = "AWS_SESSION_TOKEN";
pub const REGION_VARS: [&str; 2] = ["AWS_REGION", "AWS_DEFAULT_REGION"];

/// Errors while loading or completing credentials.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum CredentialError {
    #[snafu(display("no access key id found in {provider}"))]
    MissingAccessKeyId { provider: &'static str },

    #[snafu(display("no secret access key found in {provider}"))]
    MissingSecretAccessKey { provider: &'static str },

    #[snafu(display("no region configured (set region in config or {})", REGION_VARS.join("/")))]
    MissingRegion,

    #[snafu(display("{var} is not valid unicode"))]
    NotUnicode { var: String },
}

/// Whatever a provider could find. Any part may be missing.
#[derive(Clone, Default)]
pub struct CredentialSet {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    pub region: Option<String>,
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSet")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &self.secret_access_key.as_ref().map(|_| "***"))
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .field("region", &self.region)
            .finish()
    }
}

/// Complete credentials, ready to build an orchestrator client.
#[derive(Clone)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: Option<String>,
    region: String,
}

impl Credentials {
    /// Complete a credential set. A region override (from config) wins over
    /// whatever the provider found.
    pub fn resolve(
        set: CredentialSet,
        provider: &'static str,
        region_override: Option<&str>,
    ) -> Result<Self, CredentialError> {
        let access_key_id = set
            .access_key_id
            .context(MissingAccessKeyIdSnafu { provider })?;
        let secret_access_key = set
            .secret_access_key
            .context(MissingSecretAccessKeySnafu { provider })?;
        let region = region_override
            .map(str::to_string)
            .or(set.region)
            .context(MissingRegionSnafu)?;

        Ok(Self {
            access_key_id,
            secret_access_key,
            session_token: set.session_token,
            region,
        })
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("region", &self.region)
            .finish()
    }
}

/// A source of credentials.
pub trait CredentialProvider: Send + Sync {
    /// Short name used in error messages.
    fn name(&self) -> &'static str;

    /// Load whatever is available.
    fn load(&self) -> Result<CredentialSet, CredentialError>;

    /// Load and complete credentials in one step.
    fn credentials(&self, region_override: Option<&str>) -> Result<Credentials, CredentialError> {
        Credentials::resolve(self.load()?, self.name(), region_override)
    }
}

/// Reads the standard `AWS_*` environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

fn read_var(var: &str) -> Result<Option<String>, CredentialError> {
    match std::env::var(var) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => NotUnicodeSnafu { var }.fail(),
    }
}

impl CredentialProvider for EnvCredentials {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn load(&self) -> Result<CredentialSet, CredentialError> {
        let mut region = None;
        for var in REGION_VARS {
            if let Some(value) = read_var(var)? {
                region = Some(value);
                break;
            }
        }

        Ok(CredentialSet {
            access_key_id: read_var(ACCESS_KEY_ID_VAR)?,
            secret_access_key: read_var(SECRET_ACCESS_KEY_VAR)?,
            session_token: read_var(SESSION_TOKEN_VAR)?,
            region,
        })
    }
}

/// Fixed credentials, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials(pub CredentialSet);

impl CredentialProvider for StaticCredentials {
    fn name(&self) -> &'static str {
        "static credentials"
    }

    fn load(&self) -> Result<CredentialSet, CredentialError> {
        Ok(self.0.clone())
    }
}
