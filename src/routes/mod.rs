pub mod avatar;
pub mod bulk;
pub mod directory;
pub mod incubators;
pub mod investors;
pub mod mentors;
pub mod overview;
pub mod startups;
pub mod tools;

use axum::extract::FromRequestParts;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::AppError;

/// `Query` whose rejection is rendered as a JSON `AppError`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// `Path` whose rejection is rendered as a JSON `AppError`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Query string shared by the list endpoints.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Case-insensitive search over the entity's searchable fields
    pub q: Option<String>,
    /// Status value to keep; blank or `all` keeps every row
    pub status: Option<String>,
}

impl ListQuery {
    /// Parses `status` with the entity's own parser.
    pub fn status_filter<T>(&self, parse: fn(&str) -> Option<T>) -> Result<Option<T>, AppError> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) if s.eq_ignore_ascii_case("all") => Ok(None),
            Some(s) => parse(s)
                .map(Some)
                .ok_or_else(|| AppError::InvalidRequest(format!("unknown status '{}'", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::VerificationStatus;

    fn query(status: Option<&str>) -> ListQuery {
        ListQuery {
            q: None,
            status: status.map(str::to_string),
        }
    }

    #[test]
    fn test_status_filter() {
        let parse = VerificationStatus::parse;
        assert_eq!(query(None).status_filter(parse).unwrap(), None);
        assert_eq!(query(Some("all")).status_filter(parse).unwrap(), None);
        assert_eq!(
            query(Some("Verified")).status_filter(parse).unwrap(),
            Some(VerificationStatus::Verified)
        );
        assert!(query(Some("approved")).status_filter(parse).is_err());
    }
}
