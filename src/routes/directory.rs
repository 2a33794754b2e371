//! Founder-facing investor directory.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use super::ApiQuery;
use crate::avatar::Avatar;
use crate::entities::{investor, VerificationStatus};
use crate::error::AppError;
use crate::search::{self, DirectoryQuery};
use crate::AppState;

const NOT_SPECIFIED: &str = "Not specified";

/// An investor with the display fields a directory card needs.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InvestorCard {
    #[serde(flatten)]
    pub investor: investor::Model,
    pub avatar: Avatar,
    /// "City, Country", or "Not specified" unless both are known
    pub location: String,
    pub focus: String,
    /// "$min - $max", or "Not specified" unless both bounds are known
    pub investment_range: String,
    pub total_investment_label: String,
    /// "Verified" or "Pending"
    pub status_label: String,
}

impl From<investor::Model> for InvestorCard {
    fn from(investor: investor::Model) -> Self {
        let location = match (&investor.city, &investor.country) {
            (Some(city), Some(country)) => format!("{}, {}", city, country),
            _ => NOT_SPECIFIED.to_string(),
        };
        let investment_range = match (&investor.minimum_investment, &investor.maximum_investment) {
            (Some(min), Some(max)) => format!("${} - ${}", min, max),
            _ => NOT_SPECIFIED.to_string(),
        };
        let total_investment_label = investor
            .total_investment
            .as_ref()
            .map_or_else(|| NOT_SPECIFIED.to_string(), |total| format!("${}", total));
        let focus = investor
            .investment_focus
            .clone()
            .unwrap_or_else(|| NOT_SPECIFIED.to_string());
        let status_label = match investor.status {
            VerificationStatus::Verified => "Verified",
            VerificationStatus::Pending => "Pending",
        }
        .to_string();

        Self {
            avatar: Avatar::for_name(&investor.name),
            location,
            focus,
            investment_range,
            total_investment_label,
            status_label,
            investor,
        }
    }
}

/// Search, filter and sort investors for founders
#[utoipa::path(
    get,
    path = "/directory/investors",
    tag = "directory",
    params(DirectoryQuery),
    responses(
        (status = 200, description = "Matching investors in the requested order", body = [InvestorCard]),
        (status = 400, description = "Unknown status, sort field or order")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn investor_directory(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DirectoryQuery>,
) -> Result<Json<Vec<InvestorCard>>, AppError> {
    let all = super::investors::cached(&state).await?;
    let cards = search::directory(&all, &query)
        .into_iter()
        .map(InvestorCard::from)
        .collect();
    Ok(Json(cards))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn investor() -> investor::Model {
        let now = Utc::now();
        investor::Model {
            id: Uuid::new_v4(),
            name: "John Doe".into(),
            email: "john@example.com".into(),
            organization: None,
            total_investment: Some("5M".into()),
            invested_startups: 3,
            investment_focus: None,
            city: Some("Berlin".into()),
            country: None,
            minimum_investment: Some("100K".into()),
            maximum_investment: Some("1M".into()),
            status: VerificationStatus::Verified,
            active: true,
            avatar: None,
            linkedin_url: None,
            website: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_card_labels() {
        let card = InvestorCard::from(investor());
        assert_eq!(card.location, "Not specified");
        assert_eq!(card.investment_range, "$100K - $1M");
        assert_eq!(card.total_investment_label, "$5M");
        assert_eq!(card.focus, "Not specified");
        assert_eq!(card.status_label, "Verified");
        assert_eq!(card.avatar.initials, "J");
        assert_eq!(card.avatar.color.name, "cyan");
    }

    #[test]
    fn test_card_location_needs_city_and_country() {
        let mut model = investor();
        model.country = Some("Germany".into());
        assert_eq!(InvestorCard::from(model).location, "Berlin, Germany");
    }
}
