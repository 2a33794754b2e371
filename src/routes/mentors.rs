use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::{ApiPath, ApiQuery, ListQuery};
use crate::cache::QueryKey;
use crate::entities::VerificationStatus;
use crate::error::AppError;
use crate::search::filter_by_query;
use crate::services::{
    self,
    mentors::{MentorForm, MentorProfile},
    ProfileStats,
};
use crate::AppState;

pub(crate) async fn cached(state: &AppState) -> Result<Arc<Vec<MentorProfile>>, AppError> {
    state
        .cache
        .get_or_fetch(QueryKey::Mentors, || services::mentors::list_all(&state.db))
        .await
}

/// List mentors with their weekly time slots
#[utoipa::path(
    get,
    path = "/mentors",
    tag = "mentors",
    params(ListQuery),
    responses(
        (status = 200, description = "Mentors, newest first", body = [MentorProfile]),
        (status = 400, description = "Unknown status filter")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_mentors(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<MentorProfile>>, AppError> {
    let status = query.status_filter(VerificationStatus::parse)?;
    let all = cached(&state).await?;
    let mut mentors = filter_by_query(&all, query.q.as_deref());
    if let Some(status) = status {
        mentors.retain(|p| p.mentor.status == status);
    }
    Ok(Json(mentors))
}

#[utoipa::path(
    get,
    path = "/mentors/stats",
    tag = "mentors",
    responses((status = 200, description = "Mentor statistics", body = ProfileStats))
)]
pub async fn mentor_stats(State(state): State<AppState>) -> Result<Json<ProfileStats>, AppError> {
    let all = cached(&state).await?;
    Ok(Json(services::mentors::stats(&all)))
}

#[utoipa::path(
    get,
    path = "/mentors/{id}",
    tag = "mentors",
    params(("id" = Uuid, Path, description = "Mentor id")),
    responses(
        (status = 200, description = "The mentor and its time slots", body = MentorProfile),
        (status = 404, description = "No mentor with this id")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_mentor(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MentorProfile>, AppError> {
    Ok(Json(services::mentors::get(&state.db, id).await?))
}

/// Create a mentor together with its time slots
#[utoipa::path(
    post,
    path = "/mentors",
    tag = "mentors",
    request_body = MentorForm,
    responses(
        (status = 201, description = "Mentor created", body = MentorProfile),
        (status = 422, description = "Validation failed")
    )
)]
#[tracing::instrument(skip(state, form))]
pub async fn create_mentor(
    State(state): State<AppState>,
    Json(form): Json<MentorForm>,
) -> Result<(StatusCode, Json<MentorProfile>), AppError> {
    let created = services::mentors::create(&state.db, form).await?;
    state.cache.invalidate(QueryKey::Mentors).await;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a mentor; the submitted slots replace the stored ones
#[utoipa::path(
    put,
    path = "/mentors/{id}",
    tag = "mentors",
    params(("id" = Uuid, Path, description = "Mentor id")),
    request_body = MentorForm,
    responses(
        (status = 200, description = "Mentor updated", body = MentorProfile),
        (status = 404, description = "No mentor with this id"),
        (status = 422, description = "Validation failed")
    )
)]
#[tracing::instrument(skip(state, form))]
pub async fn update_mentor(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    Json(form): Json<MentorForm>,
) -> Result<Json<MentorProfile>, AppError> {
    let updated = services::mentors::update(&state.db, id, form).await?;
    state.cache.invalidate(QueryKey::Mentors).await;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/mentors/{id}",
    tag = "mentors",
    params(("id" = Uuid, Path, description = "Mentor id")),
    responses(
        (status = 204, description = "Mentor and its slots deleted"),
        (status = 404, description = "No mentor with this id")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_mentor(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    services::mentors::delete(&state.db, id).await?;
    state.cache.invalidate(QueryKey::Mentors).await;
    Ok(StatusCode::NO_CONTENT)
}
