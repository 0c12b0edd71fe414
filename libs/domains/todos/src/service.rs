use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use validator::Validate;

use crate::cache::TaskListCache;
use crate::error::{TaskError, TaskResult};
use crate::models::{CreateTask, Task, TaskDto, TaskQuery, UpdateTask};
use crate::publisher::StatusPublisher;
use crate::repository::TaskStore;

/// Orchestrator for task operations
///
/// Composes the store (source of truth), the coarse list cache, and the
/// status-change publisher. Owns the cache-invalidation and
/// publish-triggering policy:
///
/// - reads are cache-aside: cache hit wins, miss falls through to the
///   store and repopulates the cache;
/// - every successful mutation invalidates the cached list;
/// - a status-change notification is published if and only if an update
///   actually changed the status, after the store commit, fire-and-forget.
///
/// Neither invalidate-after-write nor publish-after-commit is
/// transactional with the store write: a crash in between leaves a stale
/// cache entry until TTL expiry, or silently drops the notification.
pub struct TaskService<S: TaskStore, C: TaskListCache, P: StatusPublisher> {
    store: Arc<S>,
    cache: Arc<C>,
    publisher: Arc<P>,
}

impl<S: TaskStore, C: TaskListCache, P: StatusPublisher> TaskService<S, C, P> {
    pub fn new(store: S, cache: C, publisher: P) -> Self {
        Self {
            store: Arc::new(store),
            cache: Arc::new(cache),
            publisher: Arc::new(publisher),
        }
    }

    /// List tasks, serving from the cache when possible
    ///
    /// The cache holds one entry for the whole list, keyed without regard
    /// to the supplied filters or pagination; a hit is returned as-is.
    /// Cache faults on this path degrade to the store instead of failing
    /// the read.
    #[instrument(skip(self))]
    pub async fn list_tasks(&self, query: TaskQuery) -> TaskResult<Vec<TaskDto>> {
        match self.cache.get().await {
            Ok(Some(tasks)) => {
                debug!(count = tasks.len(), "Task list served from cache");
                return Ok(tasks);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Cache read failed, falling back to store"),
        }

        let tasks = self.store.list(query).await?;

        if let Err(e) = self.cache.set(tasks.clone()).await {
            warn!(error = %e, "Failed to populate task list cache");
        }

        Ok(tasks)
    }

    /// Get a task by id; absence is `Ok(None)`, not an error
    #[instrument(skip(self), fields(task_id = %id))]
    pub async fn get_task(&self, id: i32) -> TaskResult<Option<Task>> {
        self.store.get_by_id(id).await
    }

    /// Count tasks by status string, case-insensitively; never cached
    pub async fn count_by_status(&self, status: &str) -> TaskResult<u64> {
        self.store.count_by_status(status.to_string()).await
    }

    /// Create a new task and invalidate the cached list
    ///
    /// No notification is published on creation.
    #[instrument(skip(self, input), fields(task_title = %input.title))]
    pub async fn create_task(&self, input: CreateTask) -> TaskResult<Task> {
        input
            .validate()
            .map_err(|e| TaskError::Validation(e.to_string()))?;

        let task = self.store.create(input).await?;
        self.cache.invalidate().await?;

        info!(task_id = %task.id, "Created task");
        Ok(task)
    }

    /// Update a task's mutable fields; returns whether the task existed
    ///
    /// The current status is read first solely to detect a status change.
    /// The update itself is one atomic store statement; if it affects no
    /// rows the task is reported missing and nothing else happens. On
    /// success the cached list is invalidated, and a notification goes
    /// out only when the status actually changed. A publish failure is
    /// logged and swallowed; it never rolls back the committed update.
    #[instrument(skip(self, input), fields(task_id = %id))]
    pub async fn update_task(&self, id: i32, input: UpdateTask) -> TaskResult<bool> {
        input
            .validate()
            .map_err(|e| TaskError::Validation(e.to_string()))?;

        let Some(old_status) = self.store.status_of(id).await? else {
            return Ok(false);
        };

        let new_status = input.status;
        let rows_affected = self.store.update_partial(id, input).await?;
        if rows_affected == 0 {
            // The row vanished between the status lookup and the update
            return Ok(false);
        }

        self.cache.invalidate().await?;

        if old_status != new_status {
            if let Err(e) = self.publisher.publish_status_changed(id, new_status).await {
                error!(error = %e, task_id = %id, "Failed to publish status change");
            }
        }

        info!(task_id = %id, "Updated task");
        Ok(true)
    }

    /// Delete a task; returns whether the task existed
    ///
    /// No notification is published on deletion.
    #[instrument(skip(self), fields(task_id = %id))]
    pub async fn delete_task(&self, id: i32) -> TaskResult<bool> {
        if self.store.get_by_id(id).await?.is_none() {
            return Ok(false);
        }

        if !self.store.delete(id).await? {
            // Lost a race with a concurrent delete; nothing left to invalidate for
            return Ok(false);
        }

        self.cache.invalidate().await?;

        info!(task_id = %id, "Deleted task");
        Ok(true)
    }
}

impl<S: TaskStore, C: TaskListCache, P: StatusPublisher> Clone for TaskService<S, C, P> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
            publisher: Arc::clone(&self.publisher),
        }
    }
}
