//! Public incubator pages: the list and one program's details.

use axum::{extract::State, Json};
use uuid::Uuid;

use super::ApiPath;
use crate::entities::incubator;
use crate::error::AppError;
use crate::services;
use crate::AppState;

/// List incubators
#[utoipa::path(
    get,
    path = "/incubators",
    tag = "incubators",
    responses((status = 200, description = "Incubators, newest first", body = [incubator::Model]))
)]
#[tracing::instrument(skip(state))]
pub async fn list_incubators(State(state): State<AppState>) -> Result<Json<Vec<incubator::Model>>, AppError> {
    Ok(Json(services::incubators::list_all(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/incubators/{id}",
    tag = "incubators",
    params(("id" = Uuid, Path, description = "Incubator id")),
    responses(
        (status = 200, description = "The incubator", body = incubator::Model),
        (status = 404, description = "No incubator with this id")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_incubator(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<incubator::Model>, AppError> {
    Ok(Json(services::incubators::get(&state.db, id).await?))
}
