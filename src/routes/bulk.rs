//! CSV template download, preview and all-or-nothing import.

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::ApiPath;
use crate::csv_import::{CsvKind, CsvPreview};
use crate::error::AppError;
use crate::services;
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ImportResult {
    pub entity: CsvKind,
    pub inserted: u64,
}

fn kind_from_path(entity: &str) -> Result<CsvKind, AppError> {
    CsvKind::parse(entity).ok_or_else(|| AppError::NotFound(format!("entity '{}'", entity)))
}

/// Download a CSV template with one example row
#[utoipa::path(
    get,
    path = "/{entity}/csv/template",
    tag = "csv",
    params(("entity" = String, Path, description = "investors, startups, mentors or tools")),
    responses(
        (status = 200, description = "Template file", content_type = "text/csv", body = String),
        (status = 404, description = "Unknown entity")
    )
)]
pub async fn csv_template(ApiPath(entity): ApiPath<String>) -> Result<impl IntoResponse, AppError> {
    let kind = kind_from_path(&entity)?;
    let body = services::csv_template(kind)?;
    let disposition = format!("attachment; filename=\"{}\"", kind.template_file_name());
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

/// Parse an upload and report problems without writing anything
#[utoipa::path(
    post,
    path = "/{entity}/csv/preview",
    tag = "csv",
    params(("entity" = String, Path, description = "investors, startups, mentors or tools")),
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Parsed rows and any row errors", body = CsvPreview),
        (status = 400, description = "No data rows"),
        (status = 404, description = "Unknown entity"),
        (status = 422, description = "Malformed CSV")
    )
)]
#[tracing::instrument(skip(body), fields(bytes = body.len()))]
pub async fn csv_preview(ApiPath(entity): ApiPath<String>, body: String) -> Result<Json<CsvPreview>, AppError> {
    let kind = kind_from_path(&entity)?;
    Ok(Json(services::preview_csv(kind, &body)?))
}

/// Import every row, or none when any row has an error
#[utoipa::path(
    post,
    path = "/{entity}/csv/import",
    tag = "csv",
    params(("entity" = String, Path, description = "investors, startups, mentors or tools")),
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "All rows stored", body = ImportResult),
        (status = 400, description = "No data rows"),
        (status = 404, description = "Unknown entity"),
        (status = 422, description = "Row errors; nothing was stored")
    )
)]
#[tracing::instrument(skip(state, body), fields(bytes = body.len()))]
pub async fn csv_import(
    State(state): State<AppState>,
    ApiPath(entity): ApiPath<String>,
    body: String,
) -> Result<Json<ImportResult>, AppError> {
    let kind = kind_from_path(&entity)?;
    let inserted = services::import_csv(&state.db, kind, &body).await?;
    state.cache.invalidate(kind.query_key()).await;
    Ok(Json(ImportResult { entity: kind, inserted }))
}
