use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::{ApiPath, ApiQuery, ListQuery};
use crate::cache::QueryKey;
use crate::entities::{investor, VerificationStatus};
use crate::error::AppError;
use crate::search::filter_by_query;
use crate::services::{self, investors::InvestorForm, ProfileStats};
use crate::AppState;

/// Cached full investor list.
pub(crate) async fn cached(state: &AppState) -> Result<Arc<Vec<investor::Model>>, AppError> {
    state
        .cache
        .get_or_fetch(QueryKey::Investors, || services::investors::list_all(&state.db))
        .await
}

/// List investors
#[utoipa::path(
    get,
    path = "/investors",
    tag = "investors",
    params(ListQuery),
    responses(
        (status = 200, description = "Investors, newest first", body = [investor::Model]),
        (status = 400, description = "Unknown status filter")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_investors(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<investor::Model>>, AppError> {
    let status = query.status_filter(VerificationStatus::parse)?;
    let all = cached(&state).await?;
    let mut investors = filter_by_query(&all, query.q.as_deref());
    if let Some(status) = status {
        investors.retain(|i| i.status == status);
    }
    Ok(Json(investors))
}

/// Totals and verified/active shares
#[utoipa::path(
    get,
    path = "/investors/stats",
    tag = "investors",
    responses((status = 200, description = "Investor statistics", body = ProfileStats))
)]
pub async fn investor_stats(State(state): State<AppState>) -> Result<Json<ProfileStats>, AppError> {
    let all = cached(&state).await?;
    Ok(Json(services::investors::stats(&all)))
}

#[utoipa::path(
    get,
    path = "/investors/{id}",
    tag = "investors",
    params(("id" = Uuid, Path, description = "Investor id")),
    responses(
        (status = 200, description = "The investor", body = investor::Model),
        (status = 404, description = "No investor with this id")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_investor(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<investor::Model>, AppError> {
    Ok(Json(services::investors::get(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/investors",
    tag = "investors",
    request_body = InvestorForm,
    responses(
        (status = 201, description = "Investor created", body = investor::Model),
        (status = 422, description = "Validation failed")
    )
)]
#[tracing::instrument(skip(state, form))]
pub async fn create_investor(
    State(state): State<AppState>,
    Json(form): Json<InvestorForm>,
) -> Result<(StatusCode, Json<investor::Model>), AppError> {
    let created = services::investors::create(&state.db, form).await?;
    state.cache.invalidate(QueryKey::Investors).await;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/investors/{id}",
    tag = "investors",
    params(("id" = Uuid, Path, description = "Investor id")),
    request_body = InvestorForm,
    responses(
        (status = 200, description = "Investor updated", body = investor::Model),
        (status = 404, description = "No investor with this id"),
        (status = 422, description = "Validation failed")
    )
)]
#[tracing::instrument(skip(state, form))]
pub async fn update_investor(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    Json(form): Json<InvestorForm>,
) -> Result<Json<investor::Model>, AppError> {
    let updated = services::investors::update(&state.db, id, form).await?;
    state.cache.invalidate(QueryKey::Investors).await;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/investors/{id}",
    tag = "investors",
    params(("id" = Uuid, Path, description = "Investor id")),
    responses(
        (status = 204, description = "Investor deleted"),
        (status = 404, description = "No investor with this id")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_investor(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    services::investors::delete(&state.db, id).await?;
    state.cache.invalidate(QueryKey::Investors).await;
    Ok(StatusCode::NO_CONTENT)
}
