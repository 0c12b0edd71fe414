use async_trait::async_trait;
use database::redis::RedisConfig;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::debug;

use crate::error::{TaskError, TaskResult};
use crate::models::TaskDto;

/// Single coarse cache key for the task list
///
/// The whole unfiltered, default-paginated list lives under one key;
/// per-query keys are intentionally out of scope.
pub const TASK_LIST_CACHE_KEY: &str = "todos:all";

/// Absolute expiration for the cached list (10 minutes)
pub const TASK_LIST_CACHE_TTL_SECS: u64 = 600;

/// Cache trait for the task list
///
/// The cached value is a serialized, time-bounded, disposable copy of the
/// list; never authoritative, always safe to discard and rebuild from the
/// store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskListCache: Send + Sync {
    /// Fetch the cached list; `Ok(None)` is a miss
    async fn get(&self) -> TaskResult<Option<Vec<TaskDto>>>;

    /// Store the list with the absolute TTL
    async fn set(&self, tasks: Vec<TaskDto>) -> TaskResult<()>;

    /// Drop the cached list; removing an absent entry is a no-op
    async fn invalidate(&self) -> TaskResult<()>;
}

/// Redis-backed task list cache
///
/// Values are stored as JSON under [`TASK_LIST_CACHE_KEY`] with a
/// 10-minute absolute expiration.
#[derive(Clone)]
pub struct RedisTaskListCache {
    redis: ConnectionManager,
}

impl RedisTaskListCache {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }

    /// Connect to Redis and build a cache from configuration
    pub async fn connect(config: RedisConfig) -> TaskResult<Self> {
        let redis = database::redis::connect_from_config(config)
            .await
            .map_err(|e| TaskError::Cache(e.to_string()))?;
        Ok(Self::new(redis))
    }
}

#[async_trait]
impl TaskListCache for RedisTaskListCache {
    async fn get(&self) -> TaskResult<Option<Vec<TaskDto>>> {
        let mut conn = self.redis.clone();

        let cached: Option<String> = conn
            .get(TASK_LIST_CACHE_KEY)
            .await
            .map_err(|e| TaskError::Cache(e.to_string()))?;

        match cached {
            Some(json) => {
                debug!(key = TASK_LIST_CACHE_KEY, "Task list cache hit");
                Ok(Some(serde_json::from_str(&json)?))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, tasks: Vec<TaskDto>) -> TaskResult<()> {
        let mut conn = self.redis.clone();

        let json = serde_json::to_string(&tasks)?;
        conn.set_ex::<_, _, ()>(TASK_LIST_CACHE_KEY, json, TASK_LIST_CACHE_TTL_SECS)
            .await
            .map_err(|e| TaskError::Cache(e.to_string()))?;

        debug!(
            key = TASK_LIST_CACHE_KEY,
            count = tasks.len(),
            "Populated task list cache"
        );
        Ok(())
    }

    async fn invalidate(&self) -> TaskResult<()> {
        let mut conn = self.redis.clone();

        // DEL of a missing key deletes zero keys, which is fine
        conn.del::<_, ()>(TASK_LIST_CACHE_KEY)
            .await
            .map_err(|e| TaskError::Cache(e.to_string()))?;

        debug!(key = TASK_LIST_CACHE_KEY, "Invalidated task list cache");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;

    async fn cache() -> RedisTaskListCache {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
        let redis = database::redis::connect(&redis_url).await.unwrap();
        RedisTaskListCache::new(redis)
    }

    fn sample_tasks() -> Vec<TaskDto> {
        vec![TaskDto {
            id: 1,
            title: "Cached task".to_string(),
            description: String::new(),
            status: TaskStatus::Active,
            created_at: chrono::Utc::now(),
        }]
    }

    #[tokio::test]
    #[ignore] // Requires actual Redis
    async fn test_set_get_invalidate_roundtrip() {
        let cache = cache().await;

        cache.set(sample_tasks()).await.unwrap();
        let cached = cache.get().await.unwrap().unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].title, "Cached task");

        cache.invalidate().await.unwrap();
        assert_eq!(cache.get().await.unwrap(), None);
    }

    #[tokio::test]
    #[ignore] // Requires actual Redis
    async fn test_invalidate_absent_key_is_noop() {
        let cache = cache().await;

        cache.invalidate().await.unwrap();
        // A second invalidation of the now-absent key must also succeed
        cache.invalidate().await.unwrap();
    }
}
