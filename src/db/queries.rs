use crate::domain::{Task, TaskCreate, TaskUpdate};
use crate::errors::AppError;
use crate::repository::TaskRepository;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct TaskStore {
    pool: SqlitePool,
}

impl TaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for TaskStore {
    /// Inserts a new task and returns the persisted row.
    ///
    /// `created_at` and `updated_at` share one UTC timestamp.
    async fn create(&self, create: TaskCreate) -> Result<Task, AppError> {
        let now = Utc::now();

        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, due_date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, title, description, due_date, created_at, updated_at
            "#,
        )
        .bind(&create.title)
        .bind(&create.description)
        .bind(create.due_date)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    async fn find_by_id(&self, id: i64) -> Result<Task, AppError> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, due_date, created_at, updated_at
            FROM tasks
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    async fn list(&self) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, due_date, created_at, updated_at
            FROM tasks
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    /// Overwrites title, description and due date; `created_at` is left alone.
    async fn update_by_id(&self, id: i64, update: TaskUpdate) -> Result<Task, AppError> {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = ?, description = ?, due_date = ?, updated_at = ?
            WHERE id = ?
            RETURNING id, title, description, due_date, created_at, updated_at
            "#,
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(update.due_date)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    async fn delete_by_id(&self, id: i64) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("DELETE FROM tasks WHERE id = ? RETURNING id")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound)
    }
}
