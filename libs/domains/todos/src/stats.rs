use serde::Serialize;
use tracing::{error, instrument};

use crate::cache::TaskListCache;
use crate::error::TaskResult;
use crate::publisher::StatusPublisher;
use crate::repository::TaskStore;
use crate::service::TaskService;

/// Per-status task counts for dashboards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub active: u64,
    pub completed: u64,
    pub pending: u64,
}

/// Read-only analytics over the task store
///
/// Counts come straight from the store, never the cache. A store fault
/// degrades to all-zero counts rather than failing the caller; stats are
/// advisory, not authoritative.
pub struct TaskAnalytics<S: TaskStore, C: TaskListCache, P: StatusPublisher> {
    service: TaskService<S, C, P>,
}

impl<S: TaskStore, C: TaskListCache, P: StatusPublisher> TaskAnalytics<S, C, P> {
    pub fn new(service: TaskService<S, C, P>) -> Self {
        Self { service }
    }

    #[instrument(skip(self))]
    pub async fn stats(&self) -> TaskStats {
        match self.try_stats().await {
            Ok(stats) => stats,
            Err(e) => {
                error!(error = %e, "Failed to compute task stats, returning zeros");
                TaskStats::default()
            }
        }
    }

    async fn try_stats(&self) -> TaskResult<TaskStats> {
        Ok(TaskStats {
            active: self.service.count_by_status("active").await?,
            completed: self.service.count_by_status("completed").await?,
            pending: self.service.count_by_status("pending").await?,
        })
    }
}

impl<S: TaskStore, C: TaskListCache, P: StatusPublisher> Clone for TaskAnalytics<S, C, P> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MockTaskListCache;
    use crate::error::TaskError;
    use crate::publisher::MockStatusPublisher;
    use crate::repository::MockTaskStore;
    use mockall::predicate;

    #[tokio::test]
    async fn test_stats_counts_each_status() {
        let mut store = MockTaskStore::new();
        store
            .expect_count_by_status()
            .with(predicate::eq("active".to_string()))
            .times(1)
            .returning(|_| Ok(4));
        store
            .expect_count_by_status()
            .with(predicate::eq("completed".to_string()))
            .times(1)
            .returning(|_| Ok(2));
        store
            .expect_count_by_status()
            .with(predicate::eq("pending".to_string()))
            .times(1)
            .returning(|_| Ok(1));

        let service = TaskService::new(store, MockTaskListCache::new(), MockStatusPublisher::new());
        let stats = TaskAnalytics::new(service).stats().await;
        assert_eq!(
            stats,
            TaskStats {
                active: 4,
                completed: 2,
                pending: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_stats_degrade_to_zeros_on_store_fault() {
        let mut store = MockTaskStore::new();
        store
            .expect_count_by_status()
            .returning(|_| Err(TaskError::Database("store unreachable".to_string())));

        let service = TaskService::new(store, MockTaskListCache::new(), MockStatusPublisher::new());
        let stats = TaskAnalytics::new(service).stats().await;
        assert_eq!(stats, TaskStats::default());
    }
}
