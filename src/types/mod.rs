// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to keep task and task definition ARNs apart.

mod cluster_name;
mod id;
mod image_ref;
mod release_version;
mod service_name;

pub use cluster_name::{ClusterName, ClusterNameError};
pub use id::{Arn, ClusterArn, TaskArn, TaskDefinitionArn};
pub use image_ref::{ImageRef, ParseImageRefError};
pub use release_version::{ReleaseVersion, ReleaseVersionError};
pub use service_name::{ServiceName, ServiceNameError};
