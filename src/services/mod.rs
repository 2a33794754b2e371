//! Database operations per entity. Handlers and the import binary call into
//! these; none of them touch the query cache.

pub mod incubators;
pub mod investors;
pub mod mentors;
pub mod startups;
pub mod tools;

use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde::Serialize;
use utoipa::ToSchema;

use crate::csv_import::{self, CsvKind, CsvPreview};
use crate::entities::{Investor, Mentor, Startup, Tool, VerificationStatus};
use crate::error::AppError;

/// Rows per INSERT statement during bulk import.
pub(crate) const INSERT_CHUNK: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProfileStats {
    pub total: usize,
    pub verified: usize,
    pub active: usize,
    /// Share of verified profiles, 0-100 with one decimal
    pub verified_pct: f64,
    /// Share of active profiles, 0-100 with one decimal
    pub active_pct: f64,
}

impl ProfileStats {
    pub(crate) fn from_profiles<I>(profiles: I) -> Self
    where
        I: IntoIterator<Item = (VerificationStatus, bool)>,
    {
        let (mut total, mut verified, mut active) = (0, 0, 0);
        for (status, is_active) in profiles {
            total += 1;
            if status == VerificationStatus::Verified {
                verified += 1;
            }
            if is_active {
                active += 1;
            }
        }
        Self {
            total,
            verified,
            active,
            verified_pct: percentage(verified, total),
            active_pct: percentage(active, total),
        }
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 * 1000.0 / total as f64).round() / 10.0
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Overview {
    pub investors: u64,
    pub startups: u64,
    pub mentors: u64,
    pub tools: u64,
}

/// Row counts for the dashboard landing page.
#[tracing::instrument(skip(db))]
pub async fn overview(db: &DatabaseConnection) -> Result<Overview, AppError> {
    Ok(Overview {
        investors: Investor::find().count(db).await?,
        startups: Startup::find().count(db).await?,
        mentors: Mentor::find().count(db).await?,
        tools: Tool::find().count(db).await?,
    })
}

/// Template CSV for `kind`.
pub fn csv_template(kind: CsvKind) -> Result<String, AppError> {
    match kind {
        CsvKind::Investors => csv_import::template::<investors::InvestorForm>(),
        CsvKind::Startups => csv_import::template::<startups::StartupForm>(),
        CsvKind::Mentors => csv_import::template::<mentors::MentorForm>(),
        CsvKind::Tools => csv_import::template::<tools::ToolForm>(),
    }
}

/// Parses and checks an upload without writing.
pub fn preview_csv(kind: CsvKind, input: &str) -> Result<CsvPreview, AppError> {
    Ok(match kind {
        CsvKind::Investors => csv_import::prepare::<investors::InvestorForm>(input)?.preview,
        CsvKind::Startups => csv_import::prepare::<startups::StartupForm>(input)?.preview,
        CsvKind::Mentors => csv_import::prepare::<mentors::MentorForm>(input)?.preview,
        CsvKind::Tools => csv_import::prepare::<tools::ToolForm>(input)?.preview,
    })
}

/// Imports every row of `input` or none of them. Returns the number of rows stored.
#[tracing::instrument(skip(db, input), fields(entity = kind.as_str(), bytes = input.len()))]
pub async fn import_csv(db: &DatabaseConnection, kind: CsvKind, input: &str) -> Result<u64, AppError> {
    let inserted = match kind {
        CsvKind::Investors => {
            let forms = csv_import::prepare::<investors::InvestorForm>(input)?.into_forms()?;
            investors::bulk_insert(db, forms).await?
        }
        CsvKind::Startups => {
            let forms = csv_import::prepare::<startups::StartupForm>(input)?.into_forms()?;
            startups::bulk_insert(db, forms).await?
        }
        CsvKind::Mentors => {
            let forms = csv_import::prepare::<mentors::MentorForm>(input)?.into_forms()?;
            mentors::bulk_insert(db, forms).await?
        }
        CsvKind::Tools => {
            let forms = csv_import::prepare::<tools::ToolForm>(input)?.into_forms()?;
            tools::bulk_insert(db, forms).await?
        }
    };
    tracing::info!(inserted, "csv import committed");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_on_empty_list() {
        let stats = ProfileStats::from_profiles(Vec::new());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.verified_pct, 0.0);
        assert_eq!(stats.active_pct, 0.0);
    }

    #[test]
    fn test_stats_percentages_round_to_one_decimal() {
        let stats = ProfileStats::from_profiles(vec![
            (VerificationStatus::Verified, true),
            (VerificationStatus::Pending, true),
            (VerificationStatus::Pending, false),
        ]);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.verified, 1);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.verified_pct, 33.3);
        assert_eq!(stats.active_pct, 66.7);
    }

    #[test]
    fn test_every_template_previews_cleanly() {
        for kind in [CsvKind::Investors, CsvKind::Startups, CsvKind::Mentors, CsvKind::Tools] {
            let template = csv_template(kind).unwrap();
            let preview = preview_csv(kind, &template).unwrap();
            assert!(preview.errors.is_empty(), "{:?}: {:?}", kind, preview.errors);
            assert_eq!(preview.rows.len(), 1);

            let (headers, rows) = csv_import::parse(&template).unwrap();
            assert_eq!(preview.headers, headers);
            assert_eq!(preview.rows[0], rows[0]);
        }
    }
}
