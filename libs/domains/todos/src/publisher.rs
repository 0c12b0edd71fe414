use async_trait::async_trait;
use database::redis::RedisConfig;
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{TaskError, TaskResult};
use crate::models::TaskStatus;

/// Stream carrying status-change notifications
///
/// Entries are durable on the broker side; fan-out happens by each
/// subscriber reading the stream through its own consumer group.
pub const STATUS_STREAM: &str = "tasks:status-changed";

/// Maximum stream length (approximate trimming)
const STATUS_STREAM_MAX_LENGTH: i64 = 100_000;

/// Notification emitted when a task's status changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChangedEvent {
    pub task_id: i32,
    pub new_status: TaskStatus,
}

/// Publisher trait for status-change notifications
///
/// Delivery is at-most-once from the publisher's point of view: no retry,
/// no outbox, no acknowledgment tracking. Callers decide whether a
/// failure matters; the orchestrator logs and moves on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatusPublisher: Send + Sync {
    async fn publish_status_changed(&self, task_id: i32, new_status: TaskStatus) -> TaskResult<()>;
}

/// Redis-stream-backed status publisher
#[derive(Clone)]
pub struct RedisStatusPublisher {
    redis: ConnectionManager,
}

impl RedisStatusPublisher {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }

    /// Connect to Redis and build a publisher from configuration
    pub async fn connect(config: RedisConfig) -> TaskResult<Self> {
        let redis = database::redis::connect_from_config(config)
            .await
            .map_err(|e| TaskError::Publish(e.to_string()))?;
        Ok(Self::new(redis))
    }
}

#[async_trait]
impl StatusPublisher for RedisStatusPublisher {
    async fn publish_status_changed(&self, task_id: i32, new_status: TaskStatus) -> TaskResult<()> {
        let mut conn = self.redis.clone();

        let payload = serde_json::to_string(&StatusChangedEvent {
            task_id,
            new_status,
        })?;

        // XADD with MAXLEN ~ for approximate trimming (more efficient)
        let stream_id: String = redis::cmd("XADD")
            .arg(STATUS_STREAM)
            .arg("MAXLEN")
            .arg("~")
            .arg(STATUS_STREAM_MAX_LENGTH)
            .arg("*")
            .arg("event")
            .arg(&payload)
            .query_async(&mut conn)
            .await
            .map_err(|e| TaskError::Publish(e.to_string()))?;

        debug!(
            stream = STATUS_STREAM,
            stream_id = %stream_id,
            task_id = %task_id,
            new_status = %new_status,
            "Published status change"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = StatusChangedEvent {
            task_id: 7,
            new_status: TaskStatus::Completed,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"task_id\":7"));
        assert!(json.contains("\"new_status\":\"completed\""));

        let decoded: StatusChangedEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, event);
    }

    #[tokio::test]
    #[ignore] // Requires actual Redis
    async fn test_publish_appends_to_stream() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
        let redis = database::redis::connect(&redis_url).await.unwrap();
        let publisher = RedisStatusPublisher::new(redis);

        publisher
            .publish_status_changed(1, TaskStatus::Pending)
            .await
            .unwrap();
    }
}
