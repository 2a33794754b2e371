use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use utoipa::ToSchema;

pub use super::investor::VerificationStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize, ToSchema)]
#[sea_orm(table_name = "mentors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub expertise: Option<String>,
    pub years_of_experience: i32,
    pub industry: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub availability: Option<String>, // free text, e.g. "Weekdays"
    pub linkedin_url: Option<String>,
    pub website: Option<String>,
    pub avatar: Option<String>,
    pub status: VerificationStatus,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::mentor_availability::Entity")]
    Availability,
}

impl Related<super::mentor_availability::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Availability.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
