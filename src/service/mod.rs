use crate::domain::{Task, TaskCreate, TaskUpdate};
use crate::errors::AppError;
use crate::repository::TaskRepository;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;


pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(5);

/// Task operations exposed to the HTTP layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskService: Send + Sync {
    async fn create(&self, create: TaskCreate) -> Result<Task, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Task, AppError>;

    async fn list(&self) -> Result<Vec<Task>, AppError>;

    async fn update_by_id(&self, id: i64, update: TaskUpdate) -> Result<Task, AppError>;

    async fn delete_by_id(&self, id: i64) -> Result<(), AppError>;
}

/// Bounds every repository call with a deadline and logs the outcome.
///
/// Each call is attempted once. When the deadline elapses the storage future
/// is dropped and the caller gets [`AppError::Timeout`].
pub struct TaskServiceImpl<R> {
    repo: R,
    deadline: Duration,
}

impl<R: TaskRepository> TaskServiceImpl<R> {
    pub fn new(repo: R) -> Self {
        Self::with_deadline(repo, DEFAULT_DEADLINE)
    }

    pub fn with_deadline(repo: R, deadline: Duration) -> Self {
        Self { repo, deadline }
    }

    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        let result = tokio::time::timeout(self.deadline, fut)
            .await
            .unwrap_or_else(|_| Err(AppError::Timeout(self.deadline)));

        match &result {
            Err(AppError::NotFound) => tracing::info!(op, "No rows found"),
            Err(e) => tracing::error!(op, error = %e, "Service error"),
            Ok(_) => {}
        }

        result
    }
}

#[async_trait]
impl<R: TaskRepository> TaskService for TaskServiceImpl<R> {
    async fn create(&self, create: TaskCreate) -> Result<Task, AppError> {
        let task = self.bounded("create", self.repo.create(create)).await?;
        tracing::debug!(task_id = task.id, "Task created");
        Ok(task)
    }

    async fn find_by_id(&self, id: i64) -> Result<Task, AppError> {
        let task = self.bounded("find_by_id", self.repo.find_by_id(id)).await?;
        tracing::debug!(task_id = id, "Task found");
        Ok(task)
    }

    async fn list(&self) -> Result<Vec<Task>, AppError> {
        let tasks = self.bounded("list", self.repo.list()).await?;
        tracing::debug!(count = tasks.len(), "Tasks listed");
        Ok(tasks)
    }

    async fn update_by_id(&self, id: i64, update: TaskUpdate) -> Result<Task, AppError> {
        let task = self
            .bounded("update_by_id", self.repo.update_by_id(id, update))
            .await?;
        tracing::debug!(task_id = id, "Task updated");
        Ok(task)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), AppError> {
        self.bounded("delete_by_id", self.repo.delete_by_id(id)).await?;
        tracing::debug!(task_id = id, "Task deleted");
        Ok(())
    }
}
