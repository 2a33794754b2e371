use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::{ApiPath, ApiQuery, ListQuery};
use crate::cache::QueryKey;
use crate::entities::{startup, StartupStatus};
use crate::error::AppError;
use crate::search::filter_by_query;
use crate::services::{self, startups::StartupForm};
use crate::AppState;

/// Cached full startup list.
pub(crate) async fn cached(state: &AppState) -> Result<Arc<Vec<startup::Model>>, AppError> {
    state
        .cache
        .get_or_fetch(QueryKey::Startups, || services::startups::list_all(&state.db))
        .await
}

/// List startups
#[utoipa::path(
    get,
    path = "/startups",
    tag = "startups",
    params(ListQuery),
    responses(
        (status = 200, description = "Startups, newest first", body = [startup::Model]),
        (status = 400, description = "Unknown status filter")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_startups(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<startup::Model>>, AppError> {
    let status = query.status_filter(StartupStatus::parse)?;
    let all = cached(&state).await?;
    let mut startups = filter_by_query(&all, query.q.as_deref());
    if let Some(status) = status {
        startups.retain(|s| s.status == status);
    }
    Ok(Json(startups))
}

/// Latest ten startups
#[utoipa::path(
    get,
    path = "/startups/top",
    tag = "startups",
    responses((status = 200, description = "Newest startups first", body = [startup::Model]))
)]
#[tracing::instrument(skip(state))]
pub async fn top_startups(State(state): State<AppState>) -> Result<Json<Vec<startup::Model>>, AppError> {
    Ok(Json(services::startups::top(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/startups/{id}",
    tag = "startups",
    params(("id" = Uuid, Path, description = "Startup id")),
    responses(
        (status = 200, description = "The startup", body = startup::Model),
        (status = 404, description = "No startup with this id")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_startup(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<startup::Model>, AppError> {
    Ok(Json(services::startups::get(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/startups",
    tag = "startups",
    request_body = StartupForm,
    responses(
        (status = 201, description = "Startup created", body = startup::Model),
        (status = 422, description = "Validation failed")
    )
)]
#[tracing::instrument(skip(state, form))]
pub async fn create_startup(
    State(state): State<AppState>,
    Json(form): Json<StartupForm>,
) -> Result<(StatusCode, Json<startup::Model>), AppError> {
    let created = services::startups::create(&state.db, form).await?;
    state.cache.invalidate(QueryKey::Startups).await;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/startups/{id}",
    tag = "startups",
    params(("id" = Uuid, Path, description = "Startup id")),
    request_body = StartupForm,
    responses(
        (status = 200, description = "Startup updated", body = startup::Model),
        (status = 404, description = "No startup with this id"),
        (status = 422, description = "Validation failed")
    )
)]
#[tracing::instrument(skip(state, form))]
pub async fn update_startup(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    Json(form): Json<StartupForm>,
) -> Result<Json<startup::Model>, AppError> {
    let updated = services::startups::update(&state.db, id, form).await?;
    state.cache.invalidate(QueryKey::Startups).await;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/startups/{id}",
    tag = "startups",
    params(("id" = Uuid, Path, description = "Startup id")),
    responses(
        (status = 204, description = "Startup deleted"),
        (status = 404, description = "No startup with this id")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_startup(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    services::startups::delete(&state.db, id).await?;
    state.cache.invalidate(QueryKey::Startups).await;
    Ok(StatusCode::NO_CONTENT)
}
