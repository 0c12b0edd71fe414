//! Todos Domain
//!
//! This crate provides the orchestration core for managing todo tasks:
//! a persistent relational store as the source of truth, a coarse
//! read-through cache for the task list, and a fire-and-forget
//! notification published whenever a task's status changes.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   TaskService    │  ← Orchestration: cache-aside reads,
//! └───┬─────┬─────┬──┘    invalidation, conditional publish
//!     │     │     │
//! ┌───▼──┐ ┌▼────────────┐ ┌▼───────────────┐
//! │Store │ │ List cache  │ │ Status events  │
//! │(Pg)  │ │ (Redis)     │ │ (Redis stream) │
//! └──────┘ └─────────────┘ └────────────────┘
//! ```
//!
//! The three collaborators are trait abstractions injected into the
//! service's constructor, so tests substitute them with mocks.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_todos::{PgTaskStore, RedisStatusPublisher, RedisTaskListCache, TaskService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = database::postgres::connect("postgres://...").await?;
//! let redis = database::redis::connect("redis://127.0.0.1:6379").await?;
//!
//! let service = TaskService::new(
//!     PgTaskStore::new(db),
//!     RedisTaskListCache::new(redis.clone()),
//!     RedisStatusPublisher::new(redis),
//! );
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod entity;
pub mod error;
pub mod models;
pub mod postgres;
pub mod publisher;
pub mod repository;
pub mod service;
pub mod stats;

// Re-export commonly used types
pub use cache::{RedisTaskListCache, TaskListCache, TASK_LIST_CACHE_KEY, TASK_LIST_CACHE_TTL_SECS};
pub use error::{TaskError, TaskResult};
pub use models::{CreateTask, Task, TaskDto, TaskQuery, TaskStatus, UpdateTask};
pub use postgres::PgTaskStore;
pub use publisher::{RedisStatusPublisher, StatusChangedEvent, StatusPublisher, STATUS_STREAM};
pub use repository::TaskStore;
pub use service::TaskService;
pub use stats::{TaskAnalytics, TaskStats};
