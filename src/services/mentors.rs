use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, LoaderTrait,
    ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{ProfileStats, INSERT_CHUNK};
use crate::csv_import::{self, CsvRecord, CsvRow};
use crate::entities::{
    mentor, mentor_availability, DayOfWeek, Mentor, MentorAvailability, VerificationStatus,
};
use crate::error::{AppError, FieldError};
use crate::validation::{self, is_valid_time, normalize, validate_time};

/// A weekly availability window, `HH:MM` on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Validate, ToSchema)]
pub struct TimeSlot {
    pub day_of_week: DayOfWeek,
    #[validate(custom(function = "validate_time"))]
    pub start_time: String,
    #[validate(custom(function = "validate_time"))]
    pub end_time: String,
}

impl From<mentor_availability::Model> for TimeSlot {
    fn from(slot: mentor_availability::Model) -> Self {
        Self {
            day_of_week: slot.day_of_week,
            start_time: slot.start_time,
            end_time: slot.end_time,
        }
    }
}

/// A mentor row with its time slots, as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MentorProfile {
    #[serde(flatten)]
    pub mentor: mentor::Model,
    pub time_slots: Vec<TimeSlot>,
}

impl MentorProfile {
    fn new(mentor: mentor::Model, slots: Vec<mentor_availability::Model>) -> Self {
        let mut time_slots: Vec<TimeSlot> = slots.into_iter().map(TimeSlot::from).collect();
        time_slots.sort_by(|a, b| {
            a.day_of_week
                .cmp(&b.day_of_week)
                .then_with(|| a.start_time.cmp(&b.start_time))
        });
        Self { mentor, time_slots }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, Validate, ToSchema)]
#[serde(default)]
pub struct MentorForm {
    #[validate(length(min = 2, message = "Name must be at least 2 characters."))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,
    pub expertise: Option<String>,
    #[validate(range(min = 0, max = 100, message = "Years of experience must be between 0 and 100."))]
    pub years_of_experience: i32,
    pub industry: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    /// Free text, e.g. "Weekdays"
    pub availability: Option<String>,
    #[validate(url(message = "Please enter a valid LinkedIn URL."))]
    pub linkedin_url: Option<String>,
    #[validate(url(message = "Please enter a valid website URL."))]
    pub website: Option<String>,
    #[validate(url(message = "Please enter a valid image URL."))]
    pub avatar: Option<String>,
    pub status: Option<VerificationStatus>,
    pub active: Option<bool>,
    /// Replaces the mentor's whole slot set on update
    #[validate(nested)]
    pub time_slots: Vec<TimeSlot>,
}

impl MentorForm {
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            expertise: normalize(self.expertise),
            industry: normalize(self.industry),
            city: normalize(self.city),
            country: normalize(self.country),
            availability: normalize(self.availability),
            linkedin_url: normalize(self.linkedin_url),
            website: normalize(self.website),
            avatar: normalize(self.avatar),
            time_slots: self
                .time_slots
                .into_iter()
                .map(|slot| TimeSlot {
                    start_time: slot.start_time.trim().to_string(),
                    end_time: slot.end_time.trim().to_string(),
                    ..slot
                })
                .collect(),
            ..self
        }
    }

    fn check(&self) -> Vec<FieldError> {
        let mut extra = Vec::new();
        for (i, slot) in self.time_slots.iter().enumerate() {
            // Zero-padded HH:MM compares correctly as text
            if is_valid_time(&slot.start_time)
                && is_valid_time(&slot.end_time)
                && slot.end_time <= slot.start_time
            {
                extra.push(FieldError::new(
                    format!("time_slots[{}].end_time", i),
                    "End time must be after start time.",
                ));
            }
        }
        validation::form_errors(self, extra)
    }

    /// Splits off the slots so the mentor row can be written first.
    fn into_parts(mut self) -> (Self, Vec<TimeSlot>) {
        let slots = std::mem::take(&mut self.time_slots);
        (self, slots)
    }

    fn apply(self, model: &mut mentor::ActiveModel) {
        model.name = Set(self.name);
        model.email = Set(self.email);
        model.expertise = Set(self.expertise);
        model.years_of_experience = Set(self.years_of_experience);
        model.industry = Set(self.industry);
        model.city = Set(self.city);
        model.country = Set(self.country);
        model.availability = Set(self.availability);
        model.linkedin_url = Set(self.linkedin_url);
        model.website = Set(self.website);
        model.avatar = Set(self.avatar);
        model.status = Set(self.status.unwrap_or_default());
        model.active = Set(self.active.unwrap_or(true));
    }

    fn into_new_model(self, id: Uuid) -> mentor::ActiveModel {
        let now = Utc::now();
        let mut model = mentor::ActiveModel {
            id: Set(id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        self.apply(&mut model);
        model
    }
}

impl CsvRecord for MentorForm {
    const REQUIRED: &'static [&'static str] = &["name", "email"];
    const TEMPLATE: &'static [(&'static str, &'static str)] = &[
        ("name", "John Doe"),
        ("email", "john@example.com"),
        ("expertise", "AI"),
        ("years_of_experience", "5"),
        ("industry", "Tech"),
        ("website", "https://example.com"),
        ("linkedin_url", "https://linkedin.com/in/johndoe"),
        ("city", "San Francisco"),
        ("country", "USA"),
        ("availability", "Weekdays"),
        ("status", "pending"),
        ("active", "true"),
        ("avatar", "https://example.com/avatar.jpg"),
    ];

    fn from_row(row: &CsvRow) -> Result<Self, String> {
        Ok(Self {
            name: csv_import::cell(row, "name").unwrap_or_default(),
            email: csv_import::cell(row, "email").unwrap_or_default(),
            expertise: csv_import::cell(row, "expertise"),
            years_of_experience: csv_import::int_cell(row, "years_of_experience"),
            industry: csv_import::cell(row, "industry"),
            city: csv_import::cell(row, "city"),
            country: csv_import::cell(row, "country"),
            availability: csv_import::cell(row, "availability"),
            linkedin_url: csv_import::cell(row, "linkedin_url"),
            website: csv_import::cell(row, "website"),
            avatar: csv_import::cell(row, "avatar"),
            status: csv_import::enum_cell(row, "status", VerificationStatus::parse)?,
            // Only an explicit yes marks an uploaded mentor active
            active: Some(csv_import::bool_cell(row, "active", false)),
            time_slots: Vec::new(),
        })
    }

    fn row_errors(&self) -> Vec<FieldError> {
        self.check()
    }
}

async fn insert_slots<C: ConnectionTrait>(db: &C, mentor_id: Uuid, slots: Vec<TimeSlot>) -> Result<(), AppError> {
    if slots.is_empty() {
        return Ok(());
    }
    let now = Utc::now();
    let models = slots.into_iter().map(|slot| mentor_availability::ActiveModel {
        id: Set(Uuid::new_v4()),
        mentor_id: Set(mentor_id),
        day_of_week: Set(slot.day_of_week),
        start_time: Set(slot.start_time),
        end_time: Set(slot.end_time),
        created_at: Set(now),
    });
    MentorAvailability::insert_many(models)
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// All mentors with their slots, newest first.
#[tracing::instrument(skip(db))]
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<MentorProfile>, AppError> {
    let mentors = Mentor::find()
        .order_by_desc(mentor::Column::CreatedAt)
        .all(db)
        .await?;
    let slots = mentors.load_many(MentorAvailability, db).await?;
    Ok(mentors
        .into_iter()
        .zip(slots)
        .map(|(mentor, slots)| MentorProfile::new(mentor, slots))
        .collect())
}

#[tracing::instrument(skip(db))]
pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<MentorProfile, AppError> {
    let mentor = Mentor::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("mentor {}", id)))?;
    let slots = mentor.find_related(MentorAvailability).all(db).await?;
    Ok(MentorProfile::new(mentor, slots))
}

/// Inserts the mentor row and its slots in one transaction.
#[tracing::instrument(skip(db, form))]
pub async fn create(db: &DatabaseConnection, form: MentorForm) -> Result<MentorProfile, AppError> {
    let form = form.normalized();
    validation::ensure_valid(form.check())?;
    let (form, slots) = form.into_parts();

    let txn = db.begin().await?;
    let mentor = form.into_new_model(Uuid::new_v4()).insert(&txn).await?;
    insert_slots(&txn, mentor.id, slots).await?;
    txn.commit().await?;

    info!(id = %mentor.id, "mentor created");
    get(db, mentor.id).await
}

/// Overwrites the mentor row and replaces its slot set in one transaction.
#[tracing::instrument(skip(db, form))]
pub async fn update(db: &DatabaseConnection, id: Uuid, form: MentorForm) -> Result<MentorProfile, AppError> {
    let form = form.normalized();
    validation::ensure_valid(form.check())?;
    let (form, slots) = form.into_parts();

    let txn = db.begin().await?;
    let existing = Mentor::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("mentor {}", id)))?;
    let mut model: mentor::ActiveModel = existing.into();
    form.apply(&mut model);
    model.updated_at = Set(Utc::now());
    model.update(&txn).await?;

    MentorAvailability::delete_many()
        .filter(mentor_availability::Column::MentorId.eq(id))
        .exec(&txn)
        .await?;
    insert_slots(&txn, id, slots).await?;
    txn.commit().await?;

    get(db, id).await
}

/// Deletes the mentor and its slots.
#[tracing::instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), AppError> {
    let txn = db.begin().await?;
    MentorAvailability::delete_many()
        .filter(mentor_availability::Column::MentorId.eq(id))
        .exec(&txn)
        .await?;
    let result = Mentor::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!("mentor {}", id)));
    }
    txn.commit().await?;
    info!(%id, "mentor deleted");
    Ok(())
}

#[tracing::instrument(skip(db, forms), fields(rows = forms.len()))]
pub async fn bulk_insert(db: &DatabaseConnection, forms: Vec<MentorForm>) -> Result<u64, AppError> {
    let txn = db.begin().await?;
    let mut inserted = 0;
    for chunk in forms.chunks(INSERT_CHUNK) {
        let mut slot_sets = Vec::new();
        let mut models = Vec::with_capacity(chunk.len());
        for form in chunk.iter().cloned() {
            let (form, slots) = form.normalized().into_parts();
            let id = Uuid::new_v4();
            slot_sets.push((id, slots));
            models.push(form.into_new_model(id));
        }
        inserted += Mentor::insert_many(models).exec_without_returning(&txn).await?;
        for (id, slots) in slot_sets {
            insert_slots(&txn, id, slots).await?;
        }
    }
    txn.commit().await?;
    Ok(inserted)
}

pub fn stats(mentors: &[MentorProfile]) -> ProfileStats {
    ProfileStats::from_profiles(mentors.iter().map(|p| (p.mentor.status, p.mentor.active)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(day: DayOfWeek, start: &str, end: &str) -> TimeSlot {
        TimeSlot {
            day_of_week: day,
            start_time: start.into(),
            end_time: end.into(),
        }
    }

    fn valid() -> MentorForm {
        MentorForm {
            name: "Grace".into(),
            email: "grace@example.com".into(),
            years_of_experience: 12,
            time_slots: vec![slot(DayOfWeek::Monday, "09:00", "17:00")],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(valid().normalized().check().is_empty());
    }

    #[test]
    fn test_years_of_experience_bounds() {
        for (years, ok) in [(0, true), (100, true), (-1, false), (101, false)] {
            let form = MentorForm { years_of_experience: years, ..valid() };
            assert_eq!(form.check().is_empty(), ok, "years = {}", years);
        }
    }

    #[test]
    fn test_slot_times_are_checked() {
        let form = MentorForm {
            time_slots: vec![
                slot(DayOfWeek::Tuesday, "9am", "17:00"),
                slot(DayOfWeek::Wednesday, "18:00", "10:00"),
            ],
            ..valid()
        };
        let errors = form.check();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["time_slots[0].start_time", "time_slots[1].end_time"]);
        assert_eq!(errors[1].message, "End time must be after start time.");
    }

    #[test]
    fn test_profile_orders_slots_by_day_then_start() {
        let now = Utc::now();
        let mentor_id = Uuid::new_v4();
        let row = |day, start: &str| mentor_availability::Model {
            id: Uuid::new_v4(),
            mentor_id,
            day_of_week: day,
            start_time: start.to_string(),
            end_time: "23:00".to_string(),
            created_at: now,
        };
        let mentor = mentor::Model {
            id: mentor_id,
            name: "Grace".into(),
            email: "grace@example.com".into(),
            expertise: None,
            years_of_experience: 3,
            industry: None,
            city: None,
            country: None,
            availability: None,
            linkedin_url: None,
            website: None,
            avatar: None,
            status: VerificationStatus::Pending,
            active: true,
            created_at: now,
            updated_at: now,
        };
        let profile = MentorProfile::new(
            mentor,
            vec![
                row(DayOfWeek::Friday, "10:00"),
                row(DayOfWeek::Monday, "14:00"),
                row(DayOfWeek::Monday, "09:00"),
            ],
        );
        let order: Vec<(DayOfWeek, &str)> = profile
            .time_slots
            .iter()
            .map(|s| (s.day_of_week, s.start_time.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                (DayOfWeek::Monday, "09:00"),
                (DayOfWeek::Monday, "14:00"),
                (DayOfWeek::Friday, "10:00"),
            ]
        );
    }
}
