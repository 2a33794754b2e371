use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::{ApiPath, ApiQuery, ListQuery};
use crate::cache::QueryKey;
use crate::entities::{tool, ToolStatus};
use crate::error::AppError;
use crate::search::filter_by_query;
use crate::services::{self, tools::ToolForm};
use crate::AppState;

/// Cached full tool list.
pub(crate) async fn cached(state: &AppState) -> Result<Arc<Vec<tool::Model>>, AppError> {
    state
        .cache
        .get_or_fetch(QueryKey::Tools, || services::tools::list_all(&state.db))
        .await
}

/// List tools
#[utoipa::path(
    get,
    path = "/tools",
    tag = "tools",
    params(ListQuery),
    responses(
        (status = 200, description = "Tools, newest first", body = [tool::Model]),
        (status = 400, description = "Unknown status filter")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_tools(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<tool::Model>>, AppError> {
    let status = query.status_filter(ToolStatus::parse)?;
    let all = cached(&state).await?;
    let mut tools = filter_by_query(&all, query.q.as_deref());
    if let Some(status) = status {
        tools.retain(|t| t.status == status);
    }
    Ok(Json(tools))
}

#[utoipa::path(
    get,
    path = "/tools/{id}",
    tag = "tools",
    params(("id" = Uuid, Path, description = "Tool id")),
    responses(
        (status = 200, description = "The tool", body = tool::Model),
        (status = 404, description = "No tool with this id")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_tool(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<tool::Model>, AppError> {
    Ok(Json(services::tools::get(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/tools",
    tag = "tools",
    request_body = ToolForm,
    responses(
        (status = 201, description = "Tool created", body = tool::Model),
        (status = 422, description = "Validation failed")
    )
)]
#[tracing::instrument(skip(state, form))]
pub async fn create_tool(
    State(state): State<AppState>,
    Json(form): Json<ToolForm>,
) -> Result<(StatusCode, Json<tool::Model>), AppError> {
    let created = services::tools::create(&state.db, form).await?;
    state.cache.invalidate(QueryKey::Tools).await;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/tools/{id}",
    tag = "tools",
    params(("id" = Uuid, Path, description = "Tool id")),
    request_body = ToolForm,
    responses(
        (status = 200, description = "Tool updated", body = tool::Model),
        (status = 404, description = "No tool with this id"),
        (status = 422, description = "Validation failed")
    )
)]
#[tracing::instrument(skip(state, form))]
pub async fn update_tool(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    Json(form): Json<ToolForm>,
) -> Result<Json<tool::Model>, AppError> {
    let updated = services::tools::update(&state.db, id, form).await?;
    state.cache.invalidate(QueryKey::Tools).await;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/tools/{id}",
    tag = "tools",
    params(("id" = Uuid, Path, description = "Tool id")),
    responses(
        (status = 204, description = "Tool deleted"),
        (status = 404, description = "No tool with this id")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_tool(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    services::tools::delete(&state.db, id).await?;
    state.cache.invalidate(QueryKey::Tools).await;
    Ok(StatusCode::NO_CONTENT)
}
