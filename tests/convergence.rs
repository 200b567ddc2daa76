// ABOUTME: Integration tests for the convergence check.
// ABOUTME: Deployment count gate, scale to zero, and task counting.

mod support;

use ecsroll::deploy::convergence::{converged_with, running_count};
use ecsroll::deploy::is_converged;
use ecsroll::orchestrator::TaskStatus;
use proptest::prelude::*;
use support::fake::{
    CURRENT_TD, FakeOrchestrator, cluster, current_tasks, running, service_name, snapshot,
    with_status,
};

const OLD_TD: &str = "arn:aws:ecs:eu-west-1:123456789012:task-definition/web:6";

async fn check(deployments: usize, desired: i32, tasks: Vec<ecsroll::orchestrator::Task>) -> bool {
    let service = snapshot(deployments, desired, vec![]);
    let fake = FakeOrchestrator::new(vec![], vec![tasks]);
    is_converged(&fake, &cluster(), &service_name(), &service)
        .await
        .unwrap()
}

#[tokio::test]
async fn single_deployment_with_all_tasks_running_is_converged() {
    assert!(check(1, 3, current_tasks(3)).await);
}

#[tokio::test]
async fn two_deployments_are_never_converged() {
    assert!(!check(2, 3, current_tasks(3)).await);
    assert!(!check(2, 0, vec![]).await);
}

#[tokio::test]
async fn scale_to_zero_with_no_tasks_is_converged() {
    assert!(check(1, 0, vec![]).await);
}

#[tokio::test]
async fn no_tasks_while_some_are_desired_is_not_converged() {
    assert!(!check(1, 2, vec![]).await);
}

#[tokio::test]
async fn old_definition_and_pending_tasks_are_not_counted() {
    let tasks = vec![
        running(0, CURRENT_TD),
        running(1, OLD_TD),
        with_status(running(2, CURRENT_TD), TaskStatus::Pending),
    ];
    assert!(!check(1, 2, tasks.clone()).await);
    assert!(check(1, 1, tasks).await);
}

#[test]
fn running_count_only_counts_current_running_tasks() {
    let service = snapshot(1, 2, vec![]);
    let tasks = vec![
        running(0, CURRENT_TD),
        running(1, OLD_TD),
        with_status(running(2, CURRENT_TD), TaskStatus::Stopped),
    ];
    assert_eq!(running_count(&service, &tasks), 1);
}

proptest! {
    #[test]
    fn converged_iff_running_matches_desired(desired in 0i32..20, current in 0usize..20, old in 0usize..5) {
        let service = snapshot(1, desired, vec![]);
        let mut tasks = current_tasks(current);
        tasks.extend((0..old).map(|i| running(100 + i, OLD_TD)));

        prop_assert_eq!(converged_with(&service, &tasks), current == desired as usize);
    }
}
