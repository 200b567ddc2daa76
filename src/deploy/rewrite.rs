// ABOUTME: Retags every container image of a task definition with the release version.
// ABOUTME: Pure; only the image field changes, order and other fields are preserved.

use serde::Serialize;

use crate::orchestrator::ContainerImage;
use crate::types::{ImageRef, ParseImageRefError, ReleaseVersion};

/// Why a container image could not be retagged.
#[derive(Debug, thiserror::Error)]
pub enum ImageRewriteError {
    #[error("container \"{container}\" has no image")]
    MissingImage { container: String },

    #[error("image \"{image}\" of container \"{container}\" has no tag to replace")]
    MissingTag { container: String, image: String },

    #[error("image \"{image}\" of container \"{container}\" is pinned by digest")]
    DigestPinned { container: String, image: String },

    #[error("image \"{image}\" of container \"{container}\" is invalid: {source}")]
    Invalid {
        container: String,
        image: String,
        #[source]
        source: ParseImageRefError,
    },
}

/// Before/after record for one container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRewrite {
    pub container: String,
    pub previous: String,
    pub image: String,
}

/// Rewritten container definitions plus what changed.
#[derive(Debug, Clone)]
pub struct RewrittenContainers<C> {
    pub containers: Vec<C>,
    pub changes: Vec<ImageRewrite>,
}

/// Replace the tag of a single image reference.
pub fn retag(container: &str, image: &str, version: &ReleaseVersion) -> Result<String, ImageRewriteError> {
    let parsed = ImageRef::parse(image).map_err(|source| ImageRewriteError::Invalid {
        container: container.to_string(),
        image: image.to_string(),
        source,
    })?;

    if parsed.digest().is_some() {
        return Err(ImageRewriteError::DigestPinned {
            container: container.to_string(),
            image: image.to_string(),
        });
    }

    if parsed.tag().is_none() {
        return Err(ImageRewriteError::MissingTag {
            container: container.to_string(),
            image: image.to_string(),
        });
    }

    Ok(parsed.with_tag(version).to_string())
}

/// Retag every container, keeping length and order.
pub fn rewrite_images<C: ContainerImage>(
    containers: &[C],
    version: &ReleaseVersion,
) -> Result<RewrittenContainers<C>, ImageRewriteError> {
    let (containers, changes) = containers
        .iter()
        .map(|container| {
            let name = container.container_name();
            let previous = container
                .image()
                .ok_or_else(|| ImageRewriteError::MissingImage {
                    container: name.to_string(),
                })?;
            let image = retag(name, previous, version)?;
            let change = ImageRewrite {
                container: name.to_string(),
                previous: previous.to_string(),
                image: image.clone(),
            };
            Ok((container.with_image(image), change))
        })
        .collect::<Result<Vec<_>, ImageRewriteError>>()?
        .into_iter()
        .unzip();

    Ok(RewrittenContainers {
        containers,
        changes,
    })
}
