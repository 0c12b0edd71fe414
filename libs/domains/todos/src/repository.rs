use async_trait::async_trait;

use crate::error::TaskResult;
use crate::models::{CreateTask, Task, TaskDto, TaskQuery, TaskStatus, UpdateTask};

/// Store trait for task persistence
///
/// This trait defines the data access interface for tasks; the store is
/// the source of truth. Implementations can use different storage
/// backends (PostgreSQL, etc.)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// List task projections, filtered, ordered by creation time
    /// descending, and paginated
    async fn list(&self, query: TaskQuery) -> TaskResult<Vec<TaskDto>>;

    /// Get a task by id; absence is `Ok(None)`, not an error
    async fn get_by_id(&self, id: i32) -> TaskResult<Option<Task>>;

    /// Fetch only the current status of a task, for change detection
    async fn status_of(&self, id: i32) -> TaskResult<Option<TaskStatus>>;

    /// Persist a new task; the store assigns the id and creation time
    async fn create(&self, input: CreateTask) -> TaskResult<Task>;

    /// Overwrite the mutable fields of one row in a single atomic update
    /// statement (never read-modify-write); returns rows affected (0 or 1)
    async fn update_partial(&self, id: i32, input: UpdateTask) -> TaskResult<u64>;

    /// Delete a task by id; returns whether a row existed
    async fn delete(&self, id: i32) -> TaskResult<bool>;

    /// Count tasks whose status matches, case-insensitively; an unknown
    /// status string matches zero rows
    async fn count_by_status(&self, status: String) -> TaskResult<u64>;
}
