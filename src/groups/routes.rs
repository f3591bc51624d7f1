use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::{auth::AuthExtractor, entity::groups, AppState};

use super::{models::GroupResponse, GroupsError};

pub fn groups_router() -> Router<AppState> {
    Router::new()
        .route("/v1/groups/", get(get_groups))
        .route("/v1/groups/:group_id/", get(get_group))
}

/// List groups
#[utoipa::path(
    get,
    path = "/v1/groups/",
    responses(
        (status = 200, body = [GroupResponse]),
        (status = StatusCode::UNAUTHORIZED, description = "Caller unauthorized", body = ErrorResponse),
    ),
    security(
        ("token" = [])
    ),
    tag = "Groups API"
)]
pub async fn get_groups(
    _auth: AuthExtractor,
    State(db): State<DatabaseConnection>,
) -> Result<Json<Vec<GroupResponse>>, GroupsError> {
    let groups = groups::Entity::find()
        .order_by_asc(groups::Column::Id)
        .all(&db)
        .await?;

    Ok(Json(groups.into_iter().map(GroupResponse::from).collect()))
}

/// Get group by id
#[utoipa::path(
    get,
    path = "/v1/groups/{group_id}/",
    params(
        ("group_id" = i32, Path, description = "ID of the requested group"),
    ),
    responses(
        (status = 200, body = GroupResponse),
        (status = StatusCode::UNAUTHORIZED, description = "Caller unauthorized", body = ErrorResponse),
        (status = StatusCode::NOT_FOUND, description = "Group not found", body = ErrorResponse),
    ),
    security(
        ("token" = [])
    ),
    tag = "Groups API"
)]
pub async fn get_group(
    _auth: AuthExtractor,
    State(db): State<DatabaseConnection>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<GroupResponse>, GroupsError> {
    let Ok(Path(group_id)) = path else {
        return Err(GroupsError::GroupNotFound);
    };

    let Some(group) = groups::Entity::find_by_id(group_id).one(&db).await? else {
        return Err(GroupsError::GroupNotFound);
    };

    Ok(Json(group.into()))
}
