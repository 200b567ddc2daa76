// ABOUTME: Configuration types and parsing for ecsroll.yml.
// ABOUTME: Handles YAML parsing, target validation, and environment merging.

mod deserialize;
mod init;
mod target;

pub use init::init_config;
pub use target::{DeployTarget, ServiceTarget};

use crate::deploy::{DEFAULT_POLL_INTERVAL, DEFAULT_POLL_RETRIES, MonitorPolicy, Timeout};
use crate::error::{Error, ErrorKind, Result};
use crate::types::{ClusterName, ServiceName};
use deserialize::{deserialize_targets, deserialize_targets_option};
use nonempty::NonEmpty;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "ecsroll.yml";
pub const CONFIG_FILENAME_ALT: &str = "ecsroll.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".ecsroll/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Overrides the region found by the credential provider.
    #[serde(default)]
    pub region: Option<String>,

    #[serde(default, deserialize_with = "deserialize_targets")]
    pub services: Vec<ServiceTarget>,

    #[serde(default)]
    pub timeout: Timeout,

    #[serde(default)]
    pub ignore_warnings: bool,

    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,

    #[serde(default = "default_poll_retries")]
    pub poll_retries: u32,

    #[serde(default)]
    pub environments: HashMap<String, Environment>,
}

/// Per-environment overrides, selected with `--environment`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Environment {
    #[serde(default)]
    pub region: Option<String>,

    #[serde(default, deserialize_with = "deserialize_targets_option")]
    pub services: Option<Vec<ServiceTarget>>,

    #[serde(default)]
    pub timeout: Option<Timeout>,

    #[serde(default)]
    pub ignore_warnings: Option<bool>,
}

fn default_poll_interval() -> Duration {
    DEFAULT_POLL_INTERVAL
}

fn default_poll_retries() -> u32 {
    DEFAULT_POLL_RETRIES
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config");
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    pub fn for_environment(&self, name: &str) -> Result<Config> {
        let env = self
            .environments
            .get(name)
            .ok_or_else(|| Error::UnknownEnvironment(name.to_string()))?;

        let mut merged = self.clone();

        if let Some(ref services) = env.services {
            merged.services = services.clone();
        }

        if env.region.is_some() {
            merged.region = env.region.clone();
        }

        if let Some(timeout) = env.timeout {
            merged.timeout = timeout;
        }

        if let Some(ignore_warnings) = env.ignore_warnings {
            merged.ignore_warnings = ignore_warnings;
        }

        Ok(merged)
    }

    /// Select an environment if one is named, otherwise the base config.
    pub fn select(self, environment: Option<&str>) -> Result<Config> {
        match environment {
            Some(name) => self.for_environment(name),
            None => Ok(self),
        }
    }

    /// Effective monitor policy for one entry; entry settings win.
    pub fn policy_for(&self, target: &ServiceTarget) -> MonitorPolicy {
        MonitorPolicy {
            timeout: target.timeout.unwrap_or(self.timeout),
            ignore_warnings: target.ignore_warnings.unwrap_or(self.ignore_warnings),
            poll_interval: self.poll_interval,
            poll_retries: self.poll_retries,
        }
    }

    /// Every catalog problem with the `services` list.
    pub fn target_problems(&self) -> Vec<ErrorKind> {
        if self.services.is_empty() {
            return vec![ErrorKind::NoServices];
        }
        self.services.iter().flat_map(ServiceTarget::problems).collect()
    }

    /// Validate every entry into a deploy target.
    ///
    /// # Errors
    ///
    /// `Error::Verification` listing every missing cluster or service, or
    /// `Error::InvalidConfig` for a name the orchestrator would reject.
    pub fn targets(&self) -> Result<NonEmpty<DeployTarget>> {
        let problems = self.target_problems();
        if !problems.is_empty() {
            return Err(Error::Verification(problems));
        }

        let targets = self
            .services
            .iter()
            .map(|entry| {
                Ok(DeployTarget {
                    cluster: ClusterName::new(&entry.cluster)
                        .map_err(|e| Error::InvalidConfig(e.to_string()))?,
                    service: ServiceName::new(&entry.service)
                        .map_err(|e| Error::InvalidConfig(e.to_string()))?,
                    policy: self.policy_for(entry),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        NonEmpty::from_vec(targets).ok_or(Error::Verification(vec![ErrorKind::NoServices]))
    }

    pub fn template() -> Self {
        Config {
            region: Some("eu-west-1".to_string()),
            services: vec![ServiceTarget {
                cluster: "my-cluster".to_string(),
                service: "my-service".to_string(),
                timeout: None,
                ignore_warnings: None,
            }],
            timeout: Timeout::default(),
            ignore_warnings: false,
            poll_interval: default_poll_interval(),
            poll_retries: default_poll_retries(),
            environments: HashMap::new(),
        }
    }
}
