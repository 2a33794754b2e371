use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::INSERT_CHUNK;
use crate::csv_import::{self, CsvRecord, CsvRow};
use crate::entities::{tool, Tags, Tool, ToolStatus};
use crate::error::{AppError, FieldError};
use crate::validation::{self, normalize};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, Validate, ToSchema)]
#[serde(default)]
pub struct ToolForm {
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    /// Free text, e.g. "Freemium"
    pub price_model: Option<String>,
    #[validate(url(message = "Please enter a valid website URL."))]
    pub website: Option<String>,
    #[validate(email(message = "Please enter a valid email address."))]
    pub contact_email: Option<String>,
    pub integration_details: Option<String>,
    pub tags: Vec<String>,
    #[validate(range(min = 0, message = "Usage count cannot be negative."))]
    pub usage_count: i32,
    /// Defaults to `active`
    pub status: Option<ToolStatus>,
}

impl ToolForm {
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            category: normalize(self.category),
            description: normalize(self.description),
            price_model: normalize(self.price_model),
            website: normalize(self.website),
            contact_email: normalize(self.contact_email),
            integration_details: normalize(self.integration_details),
            tags: self
                .tags
                .into_iter()
                .filter_map(|tag| normalize(Some(tag)))
                .collect(),
            ..self
        }
    }

    fn check(&self) -> Vec<FieldError> {
        validation::form_errors(self, Vec::new())
    }

    fn apply(self, model: &mut tool::ActiveModel) {
        model.name = Set(self.name);
        model.category = Set(self.category);
        model.description = Set(self.description);
        model.price_model = Set(self.price_model);
        model.website = Set(self.website);
        model.contact_email = Set(self.contact_email);
        model.integration_details = Set(self.integration_details);
        model.tags = Set(Tags(self.tags));
        model.usage_count = Set(self.usage_count);
        model.status = Set(self.status.unwrap_or_default());
    }

    fn into_new_model(self) -> tool::ActiveModel {
        let now = Utc::now();
        let mut model = tool::ActiveModel {
            id: Set(Uuid::new_v4()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        self.apply(&mut model);
        model
    }
}

impl CsvRecord for ToolForm {
    const REQUIRED: &'static [&'static str] = &["name"];
    const TEMPLATE: &'static [(&'static str, &'static str)] = &[
        ("name", "Figma"),
        ("category", "Design"),
        ("description", "Collaborative interface design tool"),
        ("price_model", "Freemium"),
        ("website", "https://figma.com"),
        ("contact_email", "sales@figma.com"),
        ("integration_details", "Slack, Jira"),
        ("tags", "design, prototyping"),
        ("usage_count", "0"),
        ("status", "active"),
    ];

    fn from_row(row: &CsvRow) -> Result<Self, String> {
        Ok(Self {
            name: csv_import::cell(row, "name").unwrap_or_default(),
            category: csv_import::cell(row, "category"),
            description: csv_import::cell(row, "description"),
            price_model: csv_import::cell(row, "price_model"),
            website: csv_import::cell(row, "website"),
            contact_email: csv_import::cell(row, "contact_email"),
            integration_details: csv_import::cell(row, "integration_details"),
            tags: csv_import::cell(row, "tags")
                .map(|cell| Tags::from_csv_cell(&cell).0)
                .unwrap_or_default(),
            usage_count: csv_import::int_cell(row, "usage_count"),
            status: csv_import::enum_cell(row, "status", ToolStatus::parse)?,
        })
    }

    fn row_errors(&self) -> Vec<FieldError> {
        self.check()
    }
}

/// All tools, newest first.
#[tracing::instrument(skip(db))]
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<tool::Model>, AppError> {
    Ok(Tool::find()
        .order_by_desc(tool::Column::CreatedAt)
        .all(db)
        .await?)
}

#[tracing::instrument(skip(db))]
pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<tool::Model, AppError> {
    Tool::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("tool {}", id)))
}

#[tracing::instrument(skip(db, form))]
pub async fn create(db: &DatabaseConnection, form: ToolForm) -> Result<tool::Model, AppError> {
    let form = form.normalized();
    validation::ensure_valid(form.check())?;
    let created = form.into_new_model().insert(db).await?;
    info!(id = %created.id, "tool created");
    Ok(created)
}

#[tracing::instrument(skip(db, form))]
pub async fn update(db: &DatabaseConnection, id: Uuid, form: ToolForm) -> Result<tool::Model, AppError> {
    let form = form.normalized();
    validation::ensure_valid(form.check())?;
    let mut model: tool::ActiveModel = get(db, id).await?.into();
    form.apply(&mut model);
    model.updated_at = Set(Utc::now());
    Ok(model.update(db).await?)
}

#[tracing::instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), AppError> {
    let result = Tool::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!("tool {}", id)));
    }
    info!(%id, "tool deleted");
    Ok(())
}

#[tracing::instrument(skip(db, forms), fields(rows = forms.len()))]
pub async fn bulk_insert(db: &DatabaseConnection, forms: Vec<ToolForm>) -> Result<u64, AppError> {
    let txn = db.begin().await?;
    let mut inserted = 0;
    for chunk in forms.chunks(INSERT_CHUNK) {
        let models = chunk.iter().cloned().map(|f| f.normalized().into_new_model());
        inserted += Tool::insert_many(models).exec_without_returning(&txn).await?;
    }
    txn.commit().await?;
    Ok(inserted)
}
