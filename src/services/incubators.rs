use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use uuid::Uuid;

use crate::entities::{incubator, Incubator};
use crate::error::AppError;

/// All incubators, newest first.
#[tracing::instrument(skip(db))]
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<incubator::Model>, AppError> {
    Ok(Incubator::find()
        .order_by_desc(incubator::Column::CreatedAt)
        .all(db)
        .await?)
}

#[tracing::instrument(skip(db))]
pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<incubator::Model, AppError> {
    Incubator::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("incubator {}", id)))
}
