//! Storage capability used by the service layer.

use async_trait::async_trait;

use crate::domain::{Task, TaskCreate, TaskUpdate};
use crate::errors::AppError;

/// The five task operations the service needs from storage.
///
/// Implementations report a missing row as [`AppError::NotFound`] and any
/// other storage failure unchanged.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, create: TaskCreate) -> Result<Task, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Task, AppError>;

    /// Returns every stored task. An empty table yields an empty vector.
    async fn list(&self) -> Result<Vec<Task>, AppError>;

    async fn update_by_id(&self, id: i64, update: TaskUpdate) -> Result<Task, AppError>;

    /// Returns the id of the deleted row.
    async fn delete_by_id(&self, id: i64) -> Result<i64, AppError>;
}
