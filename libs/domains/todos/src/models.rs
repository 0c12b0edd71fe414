use chrono::{DateTime, Utc};
use sea_orm::sea_query::StringLen;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::Validate;

/// Task status
///
/// A flat enumeration with no enforced transition graph: any status may
/// move to any other. Stored lowercase; parsing is case-insensitive so
/// `"Active"` and `"active"` name the same status.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TaskStatus {
    /// Default status for new tasks
    #[default]
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "pending")]
    Pending,
}

/// Task entity - represents a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, assigned by the store on creation
    pub id: i32,
    /// Task title
    pub title: String,
    /// Task description
    pub description: String,
    /// Task status
    pub status: TaskStatus,
    /// Creation timestamp, set once and never mutated
    pub created_at: DateTime<Utc>,
}

/// Read-model projection of a task
///
/// Decouples the persisted shape from the wire shape; this is what list
/// reads return and what the list cache stores (serialized).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDto {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Task> for TaskDto {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            created_at: task.created_at,
        }
    }
}

/// DTO for creating a new task
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTask {
    #[validate(length(min = 3, max = 100))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
}

/// DTO for updating an existing task
///
/// Covers the full mutable field set; `id` and `created_at` never change.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTask {
    #[validate(length(min = 3, max = 100))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
    pub status: TaskStatus,
}

/// Query parameters for listing tasks
#[derive(Debug, Clone, Deserialize)]
pub struct TaskQuery {
    /// Case-insensitive substring filter on title
    pub title: Option<String>,
    /// Case-insensitive status equality filter
    pub status: Option<String>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    10
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self {
            title: None,
            status: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl TaskQuery {
    /// Rows to skip: `(page - 1) * page_size`, with page clamped to >= 1
    pub fn offset(&self) -> u64 {
        self.page.max(1).saturating_sub(1) * self.page_size
    }

    /// Rows to take
    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(TaskStatus::from_str("active").unwrap(), TaskStatus::Active);
        assert_eq!(TaskStatus::from_str("Active").unwrap(), TaskStatus::Active);
        assert_eq!(TaskStatus::from_str("ACTIVE").unwrap(), TaskStatus::Active);
        assert_eq!(
            TaskStatus::from_str("Completed").unwrap(),
            TaskStatus::Completed
        );
        assert_eq!(
            TaskStatus::from_str("pending").unwrap(),
            TaskStatus::Pending
        );
    }

    #[test]
    fn test_status_parse_rejects_unknown() {
        assert!(TaskStatus::from_str("done").is_err());
        assert!(TaskStatus::from_str("").is_err());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::Active).unwrap(),
            "\"active\""
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::Completed).unwrap(),
            "\"completed\""
        );
    }

    #[test]
    fn test_query_defaults() {
        let query = TaskQuery::default();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 10);
        assert_eq!(query.offset(), 0);
        assert_eq!(query.limit(), 10);
    }

    #[test]
    fn test_query_pagination_offsets() {
        // 5 tasks, page=2/page_size=2 skips the first two (items ranked 3rd and 4th)
        let query = TaskQuery {
            page: 2,
            page_size: 2,
            ..Default::default()
        };
        assert_eq!(query.offset(), 2);
        assert_eq!(query.limit(), 2);

        // page 0 is treated as page 1
        let query = TaskQuery {
            page: 0,
            page_size: 10,
            ..Default::default()
        };
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_create_task_validation() {
        let valid = CreateTask {
            title: "Buy milk".to_string(),
            description: String::new(),
            status: TaskStatus::Active,
        };
        assert!(valid.validate().is_ok());

        let too_short = CreateTask {
            title: "ab".to_string(),
            description: String::new(),
            status: TaskStatus::Active,
        };
        assert!(too_short.validate().is_err());

        let too_long_description = CreateTask {
            title: "Buy milk".to_string(),
            description: "x".repeat(501),
            status: TaskStatus::Active,
        };
        assert!(too_long_description.validate().is_err());
    }

    #[test]
    fn test_update_task_validation() {
        let valid = UpdateTask {
            title: "Walk the dog".to_string(),
            description: "x".repeat(500),
            status: TaskStatus::Completed,
        };
        assert!(valid.validate().is_ok());

        let too_long_title = UpdateTask {
            title: "x".repeat(101),
            description: String::new(),
            status: TaskStatus::Completed,
        };
        assert!(too_long_title.validate().is_err());
    }

    #[test]
    fn test_query_deserializes_with_defaults() {
        let query: TaskQuery = serde_json::from_str(r#"{"title": "milk"}"#).unwrap();
        assert_eq!(query.title.as_deref(), Some("milk"));
        assert_eq!(query.status, None);
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 10);
    }
}
