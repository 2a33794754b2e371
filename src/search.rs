//! In-memory search, filter and sort over fetched lists.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::entities::{investor, startup, tool, VerificationStatus};
use crate::services::mentors::MentorProfile;

/// Records that expose a fixed list of text fields to the search box.
pub trait Searchable {
    fn search_fields(&self) -> Vec<Option<&str>>;
}

/// Case-insensitive substring match on any searchable field.
pub fn matches_query<T: Searchable>(item: &T, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    item.search_fields()
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Keeps the items that match `query`, preserving order. A blank query keeps everything.
pub fn filter_by_query<T: Searchable + Clone>(items: &[T], query: Option<&str>) -> Vec<T> {
    match query.map(str::trim).filter(|q| !q.is_empty()) {
        None => items.to_vec(),
        Some(q) => items.iter().filter(|item| matches_query(*item, q)).cloned().collect(),
    }
}

impl Searchable for investor::Model {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.name.as_str()),
            Some(self.email.as_str()),
            self.organization.as_deref(),
            self.investment_focus.as_deref(),
            self.city.as_deref(),
            self.country.as_deref(),
        ]
    }
}

impl Searchable for MentorProfile {
    fn search_fields(&self) -> Vec<Option<&str>> {
        let m = &self.mentor;
        vec![
            Some(m.name.as_str()),
            Some(m.email.as_str()),
            m.expertise.as_deref(),
            m.industry.as_deref(),
            m.city.as_deref(),
            m.country.as_deref(),
        ]
    }
}

impl Searchable for startup::Model {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.name.as_str()),
            self.industry.as_deref(),
            self.location.as_deref(),
        ]
    }
}

impl Searchable for tool::Model {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.name.as_str()),
            self.category.as_deref(),
            self.description.as_deref(),
        ]
    }
}

// --- Founder directory ---

/// The founder-facing directory searches a narrower field set.
struct DirectoryEntry<'a>(&'a investor::Model);

impl Searchable for DirectoryEntry<'_> {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.0.name.as_str()),
            self.0.organization.as_deref(),
            self.0.investment_focus.as_deref(),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Verified,
}

impl StatusFilter {
    pub fn accepts(&self, status: VerificationStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == VerificationStatus::Pending,
            StatusFilter::Verified => status == VerificationStatus::Verified,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Name,
    Organization,
    InvestmentFocus,
    City,
    Country,
    Status,
    InvestedStartups,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey<'a> {
    Text(&'a str),
    Number(i32),
    Time(DateTime<Utc>),
}

fn sort_key(investor: &investor::Model, field: SortField) -> Option<SortKey<'_>> {
    match field {
        SortField::Name => Some(SortKey::Text(&investor.name)),
        SortField::Organization => investor.organization.as_deref().map(SortKey::Text),
        SortField::InvestmentFocus => investor.investment_focus.as_deref().map(SortKey::Text),
        SortField::City => investor.city.as_deref().map(SortKey::Text),
        SortField::Country => investor.country.as_deref().map(SortKey::Text),
        SortField::Status => Some(SortKey::Text(investor.status.as_str())),
        SortField::InvestedStartups => Some(SortKey::Number(investor.invested_startups)),
        SortField::CreatedAt => Some(SortKey::Time(investor.created_at)),
    }
}

/// Missing values go last when ascending and first when descending.
fn compare(a: Option<SortKey<'_>>, b: Option<SortKey<'_>>, order: SortOrder) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => match order {
            SortOrder::Asc => Ordering::Greater,
            SortOrder::Desc => Ordering::Less,
        },
        (Some(_), None) => match order {
            SortOrder::Asc => Ordering::Less,
            SortOrder::Desc => Ordering::Greater,
        },
        (Some(a), Some(b)) => match order {
            SortOrder::Asc => a.cmp(&b),
            SortOrder::Desc => b.cmp(&a),
        },
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(default)]
pub struct DirectoryQuery {
    /// Matches name, organization or investment focus
    pub q: Option<String>,
    /// `all`, `pending` or `verified` (default `all`)
    pub status: StatusFilter,
    /// Field to sort by (default `name`)
    pub sort_by: SortField,
    /// `asc` or `desc` (default `asc`)
    pub order: SortOrder,
}

/// Search, status filter and stable sort for the founder directory.
pub fn directory(investors: &[investor::Model], query: &DirectoryQuery) -> Vec<investor::Model> {
    let needle = query.q.as_deref().unwrap_or("");
    let mut matched: Vec<investor::Model> = investors
        .iter()
        .filter(|inv| matches_query(&DirectoryEntry(inv), needle))
        .filter(|inv| query.status.accepts(inv.status))
        .cloned()
        .collect();

    matched.sort_by(|a, b| compare(sort_key(a, query.sort_by), sort_key(b, query.sort_by), query.order));
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn investor(name: &str, org: Option<&str>, status: VerificationStatus) -> investor::Model {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        investor::Model {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            organization: org.map(|o| o.to_string()),
            total_investment: None,
            invested_startups: 0,
            investment_focus: Some("Fintech, SaaS".to_string()),
            city: None,
            country: Some("USA".to_string()),
            minimum_investment: None,
            maximum_investment: None,
            status,
            active: true,
            avatar: None,
            linkedin_url: None,
            website: None,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_blank_query_returns_everything() {
        let list = vec![
            investor("Ann", None, VerificationStatus::Pending),
            investor("Bob", None, VerificationStatus::Verified),
        ];
        assert_eq!(filter_by_query(&list, None).len(), 2);
        assert_eq!(filter_by_query(&list, Some("   ")).len(), 2);
    }

    #[test]
    fn test_filter_is_case_insensitive_subset() {
        let list = vec![
            investor("Ann", Some("Acme Ventures"), VerificationStatus::Pending),
            investor("Bob", Some("Globex"), VerificationStatus::Verified),
            investor("Cid", None, VerificationStatus::Pending),
        ];
        let found = filter_by_query(&list, Some("ACME"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Ann");

        for query in ["a", "usa", "b", "fintech", "zzz"] {
            let result = filter_by_query(&list, Some(query));
            assert!(result.len() <= list.len());
            for item in &result {
                assert!(list.contains(item));
                assert!(matches_query(item, query));
            }
        }
    }

    #[test]
    fn test_directory_status_filter_and_sort() {
        let list = vec![
            investor("Cid", Some("Zeta"), VerificationStatus::Verified),
            investor("Ann", None, VerificationStatus::Verified),
            investor("Bob", Some("Acme"), VerificationStatus::Pending),
        ];

        let verified = directory(
            &list,
            &DirectoryQuery { status: StatusFilter::Verified, ..Default::default() },
        );
        let names: Vec<&str> = verified.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Cid"]);

        let by_org_asc = directory(
            &list,
            &DirectoryQuery { sort_by: SortField::Organization, ..Default::default() },
        );
        let names: Vec<&str> = by_org_asc.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Cid", "Ann"]);

        let by_org_desc = directory(
            &list,
            &DirectoryQuery {
                sort_by: SortField::Organization,
                order: SortOrder::Desc,
                ..Default::default()
            },
        );
        let names: Vec<&str> = by_org_desc.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Cid", "Bob"]);
    }

    #[test]
    fn test_directory_search_ignores_email() {
        let list = vec![investor("Ann", None, VerificationStatus::Pending)];
        let query = DirectoryQuery { q: Some("example.com".to_string()), ..Default::default() };
        assert!(directory(&list, &query).is_empty());
    }
}
