// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Accepts service entries as "cluster/service" strings or as maps.

use serde::Deserialize;

use super::ServiceTarget;

pub fn deserialize_targets<'de, D>(deserializer: D) -> Result<Vec<ServiceTarget>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Option<Vec<TargetEntry>> = Option::deserialize(deserializer)?;
    values
        .unwrap_or_default()
        .into_iter()
        .map(|entry| entry.into_target())
        .collect::<Result<Vec<_>, _>>()
        .map_err(serde::de::Error::custom)
}

pub fn deserialize_targets_option<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<ServiceTarget>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<Vec<TargetEntry>> = Option::deserialize(deserializer)?;
    match opt {
        None => Ok(None),
        Some(values) => {
            let targets = values
                .into_iter()
                .map(|entry| entry.into_target())
                .collect::<Result<Vec<_>, _>>()
                .map_err(serde::de::Error::custom)?;

            if targets.is_empty() {
                return Err(serde::de::Error::custom(
                    "environment services list cannot be empty",
                ));
            }
            Ok(Some(targets))
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TargetEntry {
    Simple(String),
    Detailed(ServiceTarget),
}

impl TargetEntry {
    fn into_target(self) -> Result<ServiceTarget, String> {
        match self {
            TargetEntry::Simple(s) => ServiceTarget::parse(&s),
            TargetEntry::Detailed(t) => Ok(t),
        }
    }
}
