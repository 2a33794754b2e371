use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use utoipa::ToSchema;

use super::Tags;

/// Incubator programs; the API only reads them.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize, ToSchema)]
#[sea_orm(table_name = "incubators")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub application_process: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub contact_info: Option<String>,
    #[sea_orm(column_type = "Json")]
    pub eligibility_criteria: Tags,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
