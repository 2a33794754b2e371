use axum::{extract::State, Json};

use crate::error::AppError;
use crate::services::{self, Overview};
use crate::AppState;

/// Row counts for each entity
#[utoipa::path(
    get,
    path = "/overview",
    tag = "overview",
    responses((status = 200, description = "Per-entity counts", body = Overview))
)]
pub async fn get_overview(State(state): State<AppState>) -> Result<Json<Overview>, AppError> {
    Ok(Json(services::overview(&state.db).await?))
}
