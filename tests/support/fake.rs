// ABOUTME: In-memory orchestrator with scripted service snapshots.
// ABOUTME: Records registrations and updates so tests can assert on them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ecsroll::orchestrator::{
    ContainerImage, Deployment, DeploymentStatus, OrchestratorError, RegisteredRevision, Service,
    ServiceEvent, ServiceOps, ServiceUpdate, Task, TaskDefinitionOps, TaskDefinitionSpec, TaskOps,
    TaskStatus,
};
use ecsroll::types::{ClusterName, ServiceName, TaskArn, TaskDefinitionArn};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

use super::clock::at;

pub const CURRENT_TD: &str = "arn:aws:ecs:eu-west-1:123456789012:task-definition/web:7";

/// A container definition with a few opaque fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeContainer {
    pub name: String,
    pub image: Option<String>,
    pub memory: i32,
    pub environment: Vec<(String, String)>,
}

impl FakeContainer {
    pub fn new(name: &str, image: &str) -> Self {
        Self {
            name: name.to_string(),
            image: Some(image.to_string()),
            memory: 512,
            environment: vec![("RUST_LOG".to_string(), "info".to_string())],
        }
    }
}

impl ContainerImage for FakeContainer {
    fn container_name(&self) -> &str {
        &self.name
    }

    fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    fn with_image(&self, image: String) -> Self {
        Self {
            image: Some(image),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone)]
pub struct FakeTaskDefinition {
    pub family: String,
    pub revision: i32,
    pub arn: TaskDefinitionArn,
    pub containers: Vec<FakeContainer>,
}

impl FakeTaskDefinition {
    pub fn web(containers: Vec<FakeContainer>) -> Self {
        Self {
            family: "web".to_string(),
            revision: 7,
            arn: TaskDefinitionArn::new(CURRENT_TD),
            containers,
        }
    }
}

impl TaskDefinitionSpec for FakeTaskDefinition {
    type Container = FakeContainer;

    fn family(&self) -> &str {
        &self.family
    }

    fn revision(&self) -> i32 {
        self.revision
    }

    fn arn(&self) -> Option<TaskDefinitionArn> {
        Some(self.arn.clone())
    }

    fn containers(&self) -> &[FakeContainer] {
        &self.containers
    }
}

/// One scripted describe-service answer.
#[derive(Debug, Clone)]
pub enum Step {
    Snapshot(Service),
    Fail(String),
}

/// Scripted answers are consumed one per call; the last one repeats.
#[derive(Debug)]
struct Script<T: Clone> {
    queue: VecDeque<T>,
    current: Option<T>,
}

impl<T: Clone> Script<T> {
    fn new(items: Vec<T>) -> Self {
        Self {
            queue: items.into(),
            current: None,
        }
    }

    fn next(&mut self) -> Option<T> {
        let item = if self.queue.len() > 1 {
            self.queue.pop_front()
        } else {
            self.queue.front().cloned()
        };
        self.current = item.clone();
        item
    }

    fn current(&self) -> Option<T> {
        self.current.clone()
    }
}

pub struct FakeOrchestrator {
    services: Mutex<Script<Step>>,
    tasks: Mutex<Script<Vec<Task>>>,
    task_definitions: Mutex<HashMap<String, FakeTaskDefinition>>,
    fail_register: Mutex<Option<String>>,
    pub registered: Mutex<Vec<Vec<FakeContainer>>>,
    pub updates: Mutex<Vec<ServiceUpdate>>,
    pub describe_calls: Mutex<usize>,
}

impl FakeOrchestrator {
    /// Task scripts advance once per convergence check, which only happens
    /// while a single deployment is left.
    pub fn new(steps: Vec<Step>, tasks: Vec<Vec<Task>>) -> Self {
        Self {
            services: Mutex::new(Script::new(steps)),
            tasks: Mutex::new(Script::new(tasks)),
            task_definitions: Mutex::new(HashMap::new()),
            fail_register: Mutex::new(None),
            registered: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
            describe_calls: Mutex::new(0),
        }
    }

    pub fn with_task_definition(self, td: FakeTaskDefinition) -> Self {
        self.task_definitions
            .lock()
            .insert(td.arn.as_str().to_string(), td);
        self
    }

    pub fn failing_register(self, message: &str) -> Self {
        *self.fail_register.lock() = Some(message.to_string());
        self
    }
}

#[async_trait]
impl ServiceOps for FakeOrchestrator {
    async fn describe_service(
        &self,
        _cluster: &ClusterName,
        service: &ServiceName,
    ) -> Result<Service, OrchestratorError> {
        *self.describe_calls.lock() += 1;
        match self.services.lock().next() {
            Some(Step::Snapshot(snapshot)) => Ok(snapshot),
            Some(Step::Fail(message)) => Err(OrchestratorError::api("DescribeServices", message)),
            None => Err(OrchestratorError::ServiceNotFound(service.to_string())),
        }
    }

    async fn update_service(
        &self,
        _cluster: &ClusterName,
        _service: &ServiceName,
        update: ServiceUpdate,
    ) -> Result<(), OrchestratorError> {
        self.updates.lock().push(update);
        Ok(())
    }
}

#[async_trait]
impl TaskDefinitionOps for FakeOrchestrator {
    type TaskDefinition = FakeTaskDefinition;

    async fn describe_task_definition(
        &self,
        arn: &TaskDefinitionArn,
    ) -> Result<FakeTaskDefinition, OrchestratorError> {
        self.task_definitions
            .lock()
            .get(arn.as_str())
            .cloned()
            .ok_or_else(|| OrchestratorError::TaskDefinitionNotFound(arn.to_string()))
    }

    async fn register_task_definition(
        &self,
        base: &FakeTaskDefinition,
        containers: Vec<FakeContainer>,
    ) -> Result<RegisteredRevision, OrchestratorError> {
        if let Some(message) = self.fail_register.lock().clone() {
            return Err(OrchestratorError::api("RegisterTaskDefinition", message));
        }
        self.registered.lock().push(containers);
        let revision = base.revision + 1;
        Ok(RegisteredRevision {
            arn: TaskDefinitionArn::new(format!(
                "arn:aws:ecs:eu-west-1:123456789012:task-definition/{}:{}",
                base.family, revision
            )),
            family: base.family.clone(),
            revision,
        })
    }
}

#[async_trait]
impl TaskOps for FakeOrchestrator {
    async fn list_task_arns(
        &self,
        _cluster: &ClusterName,
        _service: &ServiceName,
    ) -> Result<Vec<TaskArn>, OrchestratorError> {
        let tasks = self.tasks.lock().next().unwrap_or_default();
        Ok(tasks.into_iter().map(|t| t.arn).collect())
    }

    async fn describe_tasks(
        &self,
        _cluster: &ClusterName,
        arns: &[TaskArn],
    ) -> Result<Vec<Task>, OrchestratorError> {
        // Answers from the same tick as the preceding list call
        let current = self.tasks.lock().current().unwrap_or_default();
        Ok(current
            .into_iter()
            .filter(|t| arns.contains(&t.arn))
            .collect())
    }
}

pub fn cluster() -> ClusterName {
    ClusterName::new("production").unwrap()
}

pub fn service_name() -> ServiceName {
    ServiceName::new("web").unwrap()
}

pub fn deployment(status: DeploymentStatus, created_at: DateTime<Utc>) -> Deployment {
    Deployment {
        id: format!("ecs-svc/{}", created_at.timestamp()),
        status,
        task_definition: Some(TaskDefinitionArn::new(CURRENT_TD)),
        desired_count: 2,
        running_count: 0,
        pending_count: 0,
        created_at,
        updated_at: created_at,
    }
}

pub fn event(created_at: DateTime<Utc>, message: &str) -> ServiceEvent {
    ServiceEvent {
        id: created_at.timestamp_millis().to_string(),
        created_at,
        message: message.to_string(),
    }
}

/// A service mid-rollout (`deployments` > 1) or settled (`deployments` == 1).
/// The PRIMARY deployment was created at `at(90)`.
pub fn snapshot(deployments: usize, desired: i32, events: Vec<ServiceEvent>) -> Service {
    let mut list = vec![deployment(DeploymentStatus::Primary, at(90))];
    list.extend((1..deployments).map(|i| deployment(DeploymentStatus::Active, at(i as i64))));
    Service {
        name: "web".to_string(),
        cluster_arn: None,
        desired_count: desired,
        task_definition: TaskDefinitionArn::new(CURRENT_TD),
        deployments: list,
        events,
    }
}

pub fn running(id: usize, task_definition: &str) -> Task {
    Task {
        arn: TaskArn::new(format!("arn:aws:ecs:eu-west-1:123456789012:task/{id}")),
        task_definition_arn: TaskDefinitionArn::new(task_definition),
        last_status: TaskStatus::Running,
    }
}

pub fn with_status(mut task: Task, status: TaskStatus) -> Task {
    task.last_status = status;
    task
}

/// `count` RUNNING tasks of the current task definition.
pub fn current_tasks(count: usize) -> Vec<Task> {
    (0..count).map(|i| running(i, CURRENT_TD)).collect()
}
