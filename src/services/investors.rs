use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{ProfileStats, INSERT_CHUNK};
use crate::csv_import::{self, CsvRecord, CsvRow};
use crate::entities::{investor, Investor, VerificationStatus};
use crate::error::{AppError, FieldError};
use crate::validation::{self, normalize};

/// Create/update payload for an investor profile.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, Validate, ToSchema)]
#[serde(default)]
pub struct InvestorForm {
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,
    #[validate(
        length(min = 1, message = "Email is required."),
        email(message = "Please enter a valid email address.")
    )]
    pub email: String,
    pub organization: Option<String>,
    /// Free text, e.g. "5M"
    pub total_investment: Option<String>,
    #[validate(range(min = 0, message = "Invested startups cannot be negative."))]
    pub invested_startups: i32,
    /// Comma separated sectors
    pub investment_focus: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub minimum_investment: Option<String>,
    pub maximum_investment: Option<String>,
    #[validate(url(message = "Please enter a valid website URL."))]
    pub website: Option<String>,
    #[validate(url(message = "Please enter a valid LinkedIn URL."))]
    pub linkedin_url: Option<String>,
    /// Image URL
    #[validate(url(message = "Please enter a valid image URL."))]
    pub avatar: Option<String>,
    /// Defaults to `pending`
    pub status: Option<VerificationStatus>,
    /// Defaults to `true`
    pub active: Option<bool>,
}

impl InvestorForm {
    /// Trims every text field; blank optional fields become `None`.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            organization: normalize(self.organization),
            total_investment: normalize(self.total_investment),
            investment_focus: normalize(self.investment_focus),
            city: normalize(self.city),
            country: normalize(self.country),
            minimum_investment: normalize(self.minimum_investment),
            maximum_investment: normalize(self.maximum_investment),
            website: normalize(self.website),
            linkedin_url: normalize(self.linkedin_url),
            avatar: normalize(self.avatar),
            ..self
        }
    }

    fn check(&self) -> Vec<FieldError> {
        validation::form_errors(self, Vec::new())
    }

    fn apply(self, model: &mut investor::ActiveModel) {
        model.name = Set(self.name);
        model.email = Set(self.email);
        model.organization = Set(self.organization);
        model.total_investment = Set(self.total_investment);
        model.invested_startups = Set(self.invested_startups);
        model.investment_focus = Set(self.investment_focus);
        model.city = Set(self.city);
        model.country = Set(self.country);
        model.minimum_investment = Set(self.minimum_investment);
        model.maximum_investment = Set(self.maximum_investment);
        model.website = Set(self.website);
        model.linkedin_url = Set(self.linkedin_url);
        model.avatar = Set(self.avatar);
        model.status = Set(self.status.unwrap_or_default());
        model.active = Set(self.active.unwrap_or(true));
    }

    fn into_new_model(self) -> investor::ActiveModel {
        let now = Utc::now();
        let mut model = investor::ActiveModel {
            id: Set(Uuid::new_v4()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        self.apply(&mut model);
        model
    }
}

impl CsvRecord for InvestorForm {
    const REQUIRED: &'static [&'static str] = &["name", "email"];
    const TEMPLATE: &'static [(&'static str, &'static str)] = &[
        ("name", "John Doe"),
        ("email", "john@example.com"),
        ("organization", "Example VC"),
        ("total_investment", "5M"),
        ("invested_startups", "10"),
        ("investment_focus", "Tech, Healthcare"),
        ("website", "https://example.com"),
        ("linkedin_url", "https://linkedin.com/in/johndoe"),
        ("city", "San Francisco"),
        ("country", "USA"),
        ("minimum_investment", "100K"),
        ("maximum_investment", "1M"),
        ("avatar", ""),
    ];

    /// Uploaded investors always start unverified and active; any `status`
    /// or `active` column is ignored.
    fn from_row(row: &CsvRow) -> Result<Self, String> {
        let form = Self {
            name: csv_import::cell(row, "name").unwrap_or_default(),
            email: csv_import::cell(row, "email").unwrap_or_default(),
            organization: csv_import::cell(row, "organization"),
            total_investment: csv_import::cell(row, "total_investment"),
            invested_startups: csv_import::int_cell(row, "invested_startups"),
            investment_focus: csv_import::cell(row, "investment_focus"),
            city: csv_import::cell(row, "city"),
            country: csv_import::cell(row, "country"),
            minimum_investment: csv_import::cell(row, "minimum_investment"),
            maximum_investment: csv_import::cell(row, "maximum_investment"),
            website: csv_import::cell(row, "website"),
            linkedin_url: csv_import::cell(row, "linkedin_url"),
            avatar: csv_import::cell(row, "avatar"),
            status: Some(VerificationStatus::Pending),
            active: Some(true),
        };
        Ok(form)
    }

    fn row_errors(&self) -> Vec<FieldError> {
        self.check()
    }
}

/// All investors, newest first.
#[tracing::instrument(skip(db))]
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<investor::Model>, AppError> {
    let investors = Investor::find()
        .order_by_desc(investor::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(investors)
}

#[tracing::instrument(skip(db))]
pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<investor::Model, AppError> {
    Investor::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("investor {}", id)))
}

#[tracing::instrument(skip(db, form))]
pub async fn create(db: &DatabaseConnection, form: InvestorForm) -> Result<investor::Model, AppError> {
    let form = form.normalized();
    validation::ensure_valid(form.check())?;
    let created = form.into_new_model().insert(db).await?;
    info!(id = %created.id, "investor created");
    Ok(created)
}

/// Overwrites every form field of an existing investor.
#[tracing::instrument(skip(db, form))]
pub async fn update(db: &DatabaseConnection, id: Uuid, form: InvestorForm) -> Result<investor::Model, AppError> {
    let form = form.normalized();
    validation::ensure_valid(form.check())?;
    let mut model: investor::ActiveModel = get(db, id).await?.into();
    form.apply(&mut model);
    model.updated_at = Set(Utc::now());
    Ok(model.update(db).await?)
}

#[tracing::instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), AppError> {
    let result = Investor::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!("investor {}", id)));
    }
    info!(%id, "investor deleted");
    Ok(())
}

/// Inserts every form in a single transaction.
#[tracing::instrument(skip(db, forms), fields(rows = forms.len()))]
pub async fn bulk_insert(db: &DatabaseConnection, forms: Vec<InvestorForm>) -> Result<u64, AppError> {
    let txn = db.begin().await?;
    let mut inserted = 0;
    for chunk in forms.chunks(INSERT_CHUNK) {
        let models = chunk.iter().cloned().map(|f| f.normalized().into_new_model());
        inserted += Investor::insert_many(models).exec_without_returning(&txn).await?;
    }
    txn.commit().await?;
    Ok(inserted)
}

pub fn stats(investors: &[investor::Model]) -> ProfileStats {
    ProfileStats::from_profiles(investors.iter().map(|i| (i.status, i.active)))
}
