// ABOUTME: Integration tests for the release pipeline and forced redeploys.
// ABOUTME: Verifies step order, narration, and what reaches the orchestrator.

mod support;

use ecsroll::deploy::{
    DeployError, DeployErrorKind, ImageRewriteError, MonitorPolicy, Release, deploy_release,
    force_redeploy,
};
use ecsroll::orchestrator::{ServiceUpdate, TaskDefinitionSpec};
use ecsroll::types::{ReleaseVersion, TaskDefinitionArn};
use support::clock::{ManualClock, at};
use support::fake::{
    FakeContainer, FakeOrchestrator, FakeTaskDefinition, Step, cluster, current_tasks,
    service_name, snapshot,
};
use support::narrator::RecordingNarrator;

fn version(v: &str) -> ReleaseVersion {
    ReleaseVersion::new(v).unwrap()
}

fn settled_fake(containers: Vec<FakeContainer>) -> FakeOrchestrator {
    FakeOrchestrator::new(
        vec![Step::Snapshot(snapshot(1, 2, vec![]))],
        vec![current_tasks(2)],
    )
    .with_task_definition(FakeTaskDefinition::web(containers))
}

#[tokio::test]
async fn release_retags_registers_updates_and_watches() {
    support::init_tracing();
    let fake = settled_fake(vec![
        FakeContainer::new("app", "123456789012.dkr.ecr.eu-west-1.amazonaws.com/web:1.0.0"),
        FakeContainer::new("proxy", "registry.local:5000/nginx:1.25"),
    ]);
    let clock = ManualClock::starting_at(at(100));
    let narrator = RecordingNarrator::default();

    let summary = deploy_release(
        &fake,
        &clock,
        &narrator,
        &MonitorPolicy::default(),
        cluster(),
        service_name(),
        version("1.1.0"),
    )
    .await
    .unwrap();

    assert_eq!(summary.revision, "web:8");
    assert_eq!(summary.changes.len(), 2);

    let registered = fake.registered.lock();
    assert_eq!(registered.len(), 1);
    assert_eq!(
        registered[0][0].image.as_deref(),
        Some("123456789012.dkr.ecr.eu-west-1.amazonaws.com/web:1.1.0")
    );
    assert_eq!(
        registered[0][1].image.as_deref(),
        Some("registry.local:5000/nginx:1.1.0")
    );
    assert_eq!(registered[0][1].memory, 512);

    assert_eq!(
        *fake.updates.lock(),
        vec![ServiceUpdate::TaskDefinition(TaskDefinitionArn::new(
            "arn:aws:ecs:eu-west-1:123456789012:task-definition/web:8"
        ))]
    );

    assert_eq!(
        narrator.texts(),
        vec![
            "Deploying based on task definition: web".to_string(),
            "Changed image of container \"app\" to: \"123456789012.dkr.ecr.eu-west-1.amazonaws.com/web:1.1.0\" (was: \"123456789012.dkr.ecr.eu-west-1.amazonaws.com/web:1.0.0\")".to_string(),
            "Changed image of container \"proxy\" to: \"registry.local:5000/nginx:1.1.0\" (was: \"registry.local:5000/nginx:1.25\")".to_string(),
            "Creating new task definition revision".to_string(),
            "Successfully created revision: 8".to_string(),
            "Updating service".to_string(),
            "Successfully changed task definition to: web:8".to_string(),
            "Deploying new task definition".to_string(),
            "Deployment successful".to_string(),
        ]
    );
}

#[tokio::test]
async fn untagged_image_stops_before_registration() {
    let fake = settled_fake(vec![FakeContainer::new("app", "registry.local:5000/web")]);
    let clock = ManualClock::starting_at(at(100));
    let narrator = RecordingNarrator::default();

    let err = deploy_release(
        &fake,
        &clock,
        &narrator,
        &MonitorPolicy::default(),
        cluster(),
        service_name(),
        version("2.0.0"),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        DeployError::Rewrite(ImageRewriteError::MissingTag { .. })
    ));
    assert_eq!(err.kind(), DeployErrorKind::InvalidTaskDefinition);
    assert!(fake.registered.lock().is_empty());
    assert!(fake.updates.lock().is_empty());
}

#[tokio::test]
async fn rejected_registration_never_updates_service() {
    let fake = settled_fake(vec![FakeContainer::new("app", "web:1.0.0")])
        .failing_register("family limit exceeded");
    let clock = ManualClock::starting_at(at(100));
    let narrator = RecordingNarrator::default();

    let err = deploy_release(
        &fake,
        &clock,
        &narrator,
        &MonitorPolicy::default(),
        cluster(),
        service_name(),
        version("2.0.0"),
    )
    .await
    .unwrap_err();

    match err {
        DeployError::Orchestrator { step, .. } => assert_eq!(step, "register task definition"),
        other => panic!("expected orchestrator error, got {other:?}"),
    }
    assert!(fake.updates.lock().is_empty());
}

#[tokio::test]
async fn missing_task_definition_is_reported_from_fetch() {
    let fake = FakeOrchestrator::new(
        vec![Step::Snapshot(snapshot(1, 2, vec![]))],
        vec![current_tasks(2)],
    );
    let narrator = RecordingNarrator::default();

    let err = Release::new(cluster(), service_name(), version("2.0.0"))
        .fetch(&fake, &narrator)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), DeployErrorKind::Transport);
    assert!(narrator.texts().is_empty());
}

#[tokio::test]
async fn release_steps_can_be_driven_one_at_a_time() {
    let fake = settled_fake(vec![FakeContainer::new("app", "web:1.0.0")]);
    let narrator = RecordingNarrator::default();

    let fetched = Release::new(cluster(), service_name(), version("3.0.0"))
        .fetch(&fake, &narrator)
        .await
        .unwrap();
    assert_eq!(fetched.task_definition().family(), "web");
    assert_eq!(fetched.current_service().deployments.len(), 1);

    let rewritten = fetched.rewrite(&narrator).unwrap();
    assert_eq!(rewritten.changes()[0].image, "web:3.0.0");
    assert_eq!(rewritten.changes()[0].previous, "web:1.0.0");

    let registered = rewritten.register(&fake, &narrator).await.unwrap();
    assert_eq!(registered.revision().revision, 8);
    assert!(fake.updates.lock().is_empty());
}

#[tokio::test]
async fn empty_task_definition_is_rejected() {
    let fake = settled_fake(vec![]);
    let narrator = RecordingNarrator::default();

    let err = Release::new(cluster(), service_name(), version("3.0.0"))
        .fetch(&fake, &narrator)
        .await
        .unwrap()
        .rewrite(&narrator)
        .unwrap_err();

    assert!(matches!(err, DeployError::NoContainers(_)));
}

#[tokio::test]
async fn force_redeploy_skips_task_definition_changes() {
    let fake = settled_fake(vec![FakeContainer::new("app", "web:1.0.0")]);
    let clock = ManualClock::starting_at(at(100));
    let narrator = RecordingNarrator::default();

    let summary = force_redeploy(
        &fake,
        &clock,
        &narrator,
        &MonitorPolicy::default(),
        &cluster(),
        &service_name(),
    )
    .await
    .unwrap();

    assert_eq!(summary.desired_count, 2);
    assert!(fake.registered.lock().is_empty());
    assert_eq!(*fake.updates.lock(), vec![ServiceUpdate::ForceNewDeployment]);
    assert!(narrator.contains("Deployment successful"));
}
