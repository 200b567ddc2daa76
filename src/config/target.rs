// ABOUTME: Service target entries from the config file.
// ABOUTME: Parses "cluster/service" shorthand and resolves entries into validated targets.

use serde::Deserialize;

use crate::deploy::{MonitorPolicy, Timeout};
use crate::error::ErrorKind;
use crate::types::{ClusterName, ServiceName};

/// One `services` entry as written. Names are validated later so that
/// every problem can be reported at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceTarget {
    #[serde(default)]
    pub cluster: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub timeout: Option<Timeout>,
    #[serde(default)]
    pub ignore_warnings: Option<bool>,
}

impl ServiceTarget {
    /// Parse `cluster/service`. The cluster may be a full ARN, which itself
    /// contains slashes, so the split is on the last one.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("service entry cannot be empty".to_string());
        }

        let (cluster, service) = match s.rsplit_once('/') {
            Some((cluster, service)) => (cluster.trim(), service.trim()),
            None => ("", s),
        };

        Ok(ServiceTarget {
            cluster: cluster.to_string(),
            service: service.to_string(),
            timeout: None,
            ignore_warnings: None,
        })
    }

    /// Catalog problems with this entry, empty when it is usable.
    pub fn problems(&self) -> Vec<ErrorKind> {
        let mut problems = Vec::new();
        if self.service.trim().is_empty() {
            problems.push(ErrorKind::NoService);
        }
        if self.cluster.trim().is_empty() {
            problems.push(ErrorKind::NoCluster);
        }
        problems
    }

    pub fn label(&self) -> String {
        format!("{}/{}", self.cluster, self.service)
    }
}

/// A validated target with its effective monitor policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployTarget {
    pub cluster: ClusterName,
    pub service: ServiceName,
    pub policy: MonitorPolicy,
}

impl DeployTarget {
    /// Short label for narration prefixes: the cluster's last path segment
    /// and the bare service name.
    pub fn label(&self) -> String {
        let cluster = self
            .cluster
            .as_str()
            .rsplit('/')
            .next()
            .unwrap_or(self.cluster.as_str());
        format!("{}/{}", cluster, self.service.short_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cluster_and_service() {
        let t = ServiceTarget::parse("production/web").unwrap();
        assert_eq!(t.cluster, "production");
        assert_eq!(t.service, "web");
        assert!(t.problems().is_empty());
    }

    #[test]
    fn parse_cluster_arn() {
        let t = ServiceTarget::parse("arn:aws:ecs:eu-west-1:123456789012:cluster/prod/api").unwrap();
        assert_eq!(t.cluster, "arn:aws:ecs:eu-west-1:123456789012:cluster/prod");
        assert_eq!(t.service, "api");
    }

    #[test]
    fn label_uses_bare_names_for_arns() {
        let target = DeployTarget {
            cluster: ClusterName::new("arn:aws:ecs:eu-west-1:123456789012:cluster/prod").unwrap(),
            service: ServiceName::new("arn:aws:ecs:eu-west-1:123456789012:service/prod/web")
                .unwrap(),
            policy: MonitorPolicy::default(),
        };
        assert_eq!(target.label(), "prod/web");
    }

    #[test]
    fn service_without_cluster_reports_no_cluster() {
        let t = ServiceTarget::parse("web").unwrap();
        assert_eq!(t.problems(), vec![ErrorKind::NoCluster]);
    }

    #[test]
    fn empty_parts_report_both() {
        let t = ServiceTarget::default();
        assert_eq!(t.problems(), vec![ErrorKind::NoService, ErrorKind::NoCluster]);
    }
}
