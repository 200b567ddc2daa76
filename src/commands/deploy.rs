// ABOUTME: Deploy command implementation.
// ABOUTME: Runs the release pipeline for every configured service.

use super::{connect, fan_out};
use ecsroll::config::Config;
use ecsroll::deploy::{Narrator, Prefixed, SystemClock, deploy_release};
use ecsroll::error::Result;
use ecsroll::output::Output;
use ecsroll::types::ReleaseVersion;

/// Release `version` to all configured services.
pub async fn deploy(
    config: Config,
    version: ReleaseVersion,
    parallel: bool,
    output: &Output,
) -> Result<()> {
    let (orchestrator, targets) = connect(&config)?;
    let clock = SystemClock;
    let prefix = targets.len() > 1;

    output.progress(&format!(
        "Releasing {} to {} service(s)",
        version,
        targets.len()
    ));

    let summaries = fan_out(&targets, parallel, output, |target| {
        let orchestrator = &orchestrator;
        let clock = &clock;
        let version = version.clone();
        async move {
            let prefixed = Prefixed::new(target.label(), output);
            let narrator: &dyn Narrator = if prefix { &prefixed } else { output };
            deploy_release(
                orchestrator,
                clock,
                narrator,
                &target.policy,
                target.cluster.clone(),
                target.service.clone(),
                version,
            )
            .await
        }
    })
    .await?;

    output.print_warnings();
    output.success(
        &format!("Released {} to {} service(s)", version, summaries.len()),
        &summaries,
    );
    Ok(())
}
