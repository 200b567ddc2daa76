// ABOUTME: Redeploy command implementation.
// ABOUTME: Forces a new deployment of every configured service.

use super::{connect, fan_out};
use ecsroll::config::Config;
use ecsroll::deploy::{Narrator, Prefixed, SystemClock, force_redeploy};
use ecsroll::error::Result;
use ecsroll::output::Output;

pub async fn redeploy(config: Config, parallel: bool, output: &Output) -> Result<()> {
    let (orchestrator, targets) = connect(&config)?;
    let clock = SystemClock;
    let prefix = targets.len() > 1;

    let summaries = fan_out(&targets, parallel, output, |target| {
        let orchestrator = &orchestrator;
        let clock = &clock;
        async move {
            let prefixed = Prefixed::new(target.label(), output);
            let narrator: &dyn Narrator = if prefix { &prefixed } else { output };
            force_redeploy(
                orchestrator,
                clock,
                narrator,
                &target.policy,
                &target.cluster,
                &target.service,
            )
            .await
        }
    })
    .await?;

    output.print_warnings();
    output.success(
        &format!("Redeployed {} service(s)", summaries.len()),
        &summaries,
    );
    Ok(())
}
