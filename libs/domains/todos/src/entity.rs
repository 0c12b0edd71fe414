use crate::models::TaskStatus;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{self, Set};
use serde::{Deserialize, Serialize};

/// SeaORM Entity for the tasks table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub status: TaskStatus,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// Conversion from SeaORM Model to domain Task
impl From<Model> for crate::models::Task {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            status: model.status,
            created_at: model.created_at.into(),
        }
    }
}

// Conversion from SeaORM Model to the read-model projection
impl From<Model> for crate::models::TaskDto {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            status: model.status,
            created_at: model.created_at.into(),
        }
    }
}

// Conversion from CreateTask to SeaORM ActiveModel; the store assigns the id
impl From<crate::models::CreateTask> for ActiveModel {
    fn from(input: crate::models::CreateTask) -> Self {
        ActiveModel {
            id: ActiveValue::NotSet,
            title: Set(input.title),
            description: Set(input.description),
            status: Set(input.status),
            created_at: Set(chrono::Utc::now().into()),
        }
    }
}
