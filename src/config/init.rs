// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates ecsroll.yml template files.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{ClusterName, ServiceName};

use super::{CONFIG_FILENAME, Config, ServiceTarget};

pub fn init_config(
    dir: &Path,
    cluster: Option<&str>,
    service: Option<&str>,
    force: bool,
) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = Config::template();

    if let Some(c) = cluster {
        let cluster = ClusterName::new(c).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.services[0].cluster = cluster.to_string();
    }

    if let Some(s) = service {
        let service = ServiceName::new(s).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.services[0].service = service.to_string();
    }

    let yaml = generate_template_yaml(&config);
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    format!(
        r#"# Region override (default: AWS_REGION / AWS_DEFAULT_REGION)
region: {}
services:
  - {}
# Seconds to wait for the rollout, -1 to wait indefinitely
timeout: {}
# Treat service events as warnings instead of failing the release
ignore_warnings: {}
# poll_interval: 1s
# environments:
#   staging:
#     services:
#       - staging-cluster/my-service
"#,
        config.region.as_deref().unwrap_or("eu-west-1"),
        config
            .services
            .iter()
            .map(ServiceTarget::label)
            .collect::<Vec<_>>()
            .join("\n  - "),
        config.timeout.as_secs(),
        config.ignore_warnings,
    )
}
