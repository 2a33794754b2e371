use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use super::ApiQuery;
use crate::avatar::Avatar;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvatarQuery {
    /// Display name to derive initials and colors from
    #[serde(default)]
    pub name: String,
}

/// Initials and a deterministic color for a display name
#[utoipa::path(
    get,
    path = "/avatar",
    tag = "avatar",
    params(AvatarQuery),
    responses((status = 200, description = "Avatar for the name", body = Avatar))
)]
pub async fn get_avatar(ApiQuery(query): ApiQuery<AvatarQuery>) -> Json<Avatar> {
    Json(Avatar::for_name(&query.name))
}
