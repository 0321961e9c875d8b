use chrono::{DateTime, FixedOffset, Utc};
use sqlx::FromRow;

/// Persisted task. Serves as both the transfer and the storage representation.
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Keeps the offset it was submitted with.
    pub due_date: DateTime<FixedOffset>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a new task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskCreate {
    pub title: String,
    pub description: String,
    pub due_date: DateTime<FixedOffset>,
}

/// Full replacement of the mutable fields of a task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskUpdate {
    pub title: String,
    pub description: String,
    pub due_date: DateTime<FixedOffset>,
}
