// ABOUTME: Verify command implementation.
// ABOUTME: Reports credential and configuration problems without calling the orchestrator.

use ecsroll::config::Config;
use ecsroll::credentials::EnvCredentials;
use ecsroll::error::Result;
use ecsroll::output::Output;
use ecsroll::verify::verify_conditions;
use serde::Serialize;

#[derive(Serialize)]
struct VerifyReport {
    region: String,
    services: Vec<String>,
}

pub fn verify(config: Config, output: &Output) -> Result<()> {
    let verified = verify_conditions(&config, &EnvCredentials)?;

    for target in verified.targets.iter() {
        output.progress(&format!(
            "  {} (timeout {}, ignore warnings: {})",
            target.label(),
            target.policy.timeout,
            target.policy.ignore_warnings
        ));
    }

    let report = VerifyReport {
        region: verified.credentials.region().to_string(),
        services: verified.targets.iter().map(|t| t.label()).collect(),
    };
    output.success(
        &format!(
            "Configuration OK: {} service(s) in {}",
            report.services.len(),
            report.region
        ),
        &report,
    );
    Ok(())
}
