use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::INSERT_CHUNK;

/// Size of the "top startups" showcase.
pub const TOP_STARTUPS: u64 = 10;
use crate::csv_import::{self, CsvRecord, CsvRow};
use crate::entities::{startup, Startup, StartupStatus};
use crate::error::{AppError, FieldError};
use crate::validation::{self, is_valid_year, normalize};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, Validate, ToSchema)]
#[serde(default)]
pub struct StartupForm {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters."))]
    pub name: String,
    #[validate(length(min = 2, max = 50, message = "Industry must be between 2 and 50 characters."))]
    pub industry: Option<String>,
    #[validate(length(min = 10, max = 500, message = "Description must be between 10 and 500 characters."))]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Team size cannot be negative."))]
    pub team_size: Option<i32>,
    #[validate(url(message = "Please enter a valid website URL."))]
    pub website: Option<String>,
    #[validate(email(message = "Please enter a valid email address."))]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    #[validate(length(min = 2, message = "Business model must be at least 2 characters."))]
    pub business_model: Option<String>,
    pub funding_stage: Option<String>,
    pub total_funding: Option<String>,
    pub location: Option<String>,
    /// Four digit year
    pub founded_year: Option<i32>,
    /// Defaults to `active`
    pub status: Option<StartupStatus>,
    pub pitch_deck: Option<String>,
}

impl StartupForm {
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            industry: normalize(self.industry),
            description: normalize(self.description),
            website: normalize(self.website),
            contact_email: normalize(self.contact_email),
            contact_phone: normalize(self.contact_phone),
            business_model: normalize(self.business_model),
            funding_stage: normalize(self.funding_stage),
            total_funding: normalize(self.total_funding),
            location: normalize(self.location),
            pitch_deck: normalize(self.pitch_deck),
            ..self
        }
    }

    fn check(&self) -> Vec<FieldError> {
        let mut extra = Vec::new();
        if self.founded_year.is_some_and(|year| !is_valid_year(year)) {
            extra.push(FieldError::new("founded_year", "Must be a valid year"));
        }
        validation::form_errors(self, extra)
    }

    fn apply(self, model: &mut startup::ActiveModel) {
        model.name = Set(self.name);
        model.industry = Set(self.industry);
        model.description = Set(self.description);
        model.team_size = Set(self.team_size);
        model.website = Set(self.website);
        model.contact_email = Set(self.contact_email);
        model.contact_phone = Set(self.contact_phone);
        model.business_model = Set(self.business_model);
        model.funding_stage = Set(self.funding_stage);
        model.total_funding = Set(self.total_funding);
        model.location = Set(self.location);
        model.founded_year = Set(self.founded_year);
        model.status = Set(self.status.unwrap_or_default());
        model.pitch_deck = Set(self.pitch_deck);
    }

    fn into_new_model(self) -> startup::ActiveModel {
        let now = Utc::now();
        let mut model = startup::ActiveModel {
            id: Set(Uuid::new_v4()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        self.apply(&mut model);
        model
    }
}

impl CsvRecord for StartupForm {
    const REQUIRED: &'static [&'static str] = &["name"];
    const TEMPLATE: &'static [(&'static str, &'static str)] = &[
        ("name", "Acme Robotics"),
        ("industry", "Robotics"),
        ("description", "Warehouse automation for small retailers"),
        ("team_size", "12"),
        ("website", "https://acme-robotics.example.com"),
        ("contact_email", "founders@acme-robotics.example.com"),
        ("contact_phone", "+1 555 0100"),
        ("business_model", "B2B SaaS"),
        ("funding_stage", "Seed"),
        ("total_funding", "1.5M"),
        ("location", "Austin, USA"),
        ("founded_year", "2021"),
        ("status", "active"),
        ("pitch_deck", "https://acme-robotics.example.com/deck.pdf"),
    ];

    fn from_row(row: &CsvRow) -> Result<Self, String> {
        Ok(Self {
            name: csv_import::cell(row, "name").unwrap_or_default(),
            industry: csv_import::cell(row, "industry"),
            description: csv_import::cell(row, "description"),
            team_size: csv_import::cell(row, "team_size").map(|_| csv_import::int_cell(row, "team_size")),
            website: csv_import::cell(row, "website"),
            contact_email: csv_import::cell(row, "contact_email"),
            contact_phone: csv_import::cell(row, "contact_phone"),
            business_model: csv_import::cell(row, "business_model"),
            funding_stage: csv_import::cell(row, "funding_stage"),
            total_funding: csv_import::cell(row, "total_funding"),
            location: csv_import::cell(row, "location"),
            founded_year: csv_import::opt_int_cell(row, "founded_year"),
            status: csv_import::enum_cell(row, "status", StartupStatus::parse)?,
            pitch_deck: csv_import::cell(row, "pitch_deck"),
        })
    }

    fn row_errors(&self) -> Vec<FieldError> {
        self.check()
    }
}

/// All startups, newest first.
#[tracing::instrument(skip(db))]
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<startup::Model>, AppError> {
    Ok(Startup::find()
        .order_by_desc(startup::Column::CreatedAt)
        .all(db)
        .await?)
}

/// The most recently added startups.
#[tracing::instrument(skip(db))]
pub async fn top(db: &DatabaseConnection) -> Result<Vec<startup::Model>, AppError> {
    Ok(Startup::find()
        .order_by_desc(startup::Column::CreatedAt)
        .limit(TOP_STARTUPS)
        .all(db)
        .await?)
}

#[tracing::instrument(skip(db))]
pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<startup::Model, AppError> {
    Startup::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("startup {}", id)))
}

#[tracing::instrument(skip(db, form))]
pub async fn create(db: &DatabaseConnection, form: StartupForm) -> Result<startup::Model, AppError> {
    let form = form.normalized();
    validation::ensure_valid(form.check())?;
    let created = form.into_new_model().insert(db).await?;
    info!(id = %created.id, "startup created");
    Ok(created)
}

#[tracing::instrument(skip(db, form))]
pub async fn update(db: &DatabaseConnection, id: Uuid, form: StartupForm) -> Result<startup::Model, AppError> {
    let form = form.normalized();
    validation::ensure_valid(form.check())?;
    let mut model: startup::ActiveModel = get(db, id).await?.into();
    form.apply(&mut model);
    model.updated_at = Set(Utc::now());
    Ok(model.update(db).await?)
}

#[tracing::instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), AppError> {
    let result = Startup::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!("startup {}", id)));
    }
    info!(%id, "startup deleted");
    Ok(())
}

#[tracing::instrument(skip(db, forms), fields(rows = forms.len()))]
pub async fn bulk_insert(db: &DatabaseConnection, forms: Vec<StartupForm>) -> Result<u64, AppError> {
    let txn = db.begin().await?;
    let mut inserted = 0;
    for chunk in forms.chunks(INSERT_CHUNK) {
        let models = chunk.iter().cloned().map(|f| f.normalized().into_new_model());
        inserted += Startup::insert_many(models).exec_without_returning(&txn).await?;
    }
    txn.commit().await?;
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> StartupForm {
        StartupForm {
            name: "Acme".into(),
            industry: Some("Fintech".into()),
            description: Some("Payments for freelancers".into()),
            founded_year: Some(2021),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(valid().normalized().check().is_empty());
    }

    #[test]
    fn test_length_limits() {
        let form = StartupForm {
            name: "A".into(),
            industry: Some("F".into()),
            description: Some("too short".into()),
            business_model: Some("B".into()),
            ..valid()
        };
        let fields: Vec<String> = form.check().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["business_model", "description", "industry", "name"]);
    }

    #[test]
    fn test_founded_year_must_have_four_digits() {
        let form = StartupForm { founded_year: Some(21), ..valid() };
        let errors = form.check();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Must be a valid year");
    }

    #[test]
    fn test_blank_optionals_skip_checks() {
        let form = StartupForm {
            name: "Acme".into(),
            industry: Some(" ".into()),
            website: Some("".into()),
            ..Default::default()
        }
        .normalized();
        assert!(form.check().is_empty());
        assert_eq!(form.website, None);
    }

    #[test]
    fn test_from_row_team_size_falls_back_to_zero() {
        let row: CsvRow = [("name", "Acme"), ("team_size", "a dozen")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let form = StartupForm::from_row(&row).unwrap();
        assert_eq!(form.team_size, Some(0));
        assert_eq!(form.founded_year, None);
    }
}
