use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::{auth::AuthExtractor, entity::users, AppState};

use super::{models::UserResponse, UsersError};

pub fn users_router() -> Router<AppState> {
    Router::new()
        .route("/v1/users/", get(get_users))
        .route("/v1/users/:user_id/", get(get_user))
}

/// List users
#[utoipa::path(
    get,
    path = "/v1/users/",
    responses(
        (status = 200, body = [UserResponse]),
        (status = StatusCode::UNAUTHORIZED, description = "Caller unauthorized", body = ErrorResponse),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Something went wrong", body = ErrorResponse),
    ),
    security(
        ("token" = [])
    ),
    tag = "Users API"
)]
pub async fn get_users(
    _auth: AuthExtractor,
    State(db): State<DatabaseConnection>,
) -> Result<Json<Vec<UserResponse>>, UsersError> {
    let users = users::Entity::find()
        .order_by_asc(users::Column::Id)
        .all(&db)
        .await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get user by id
#[utoipa::path(
    get,
    path = "/v1/users/{user_id}/",
    params(
        ("user_id" = i32, Path, description = "ID of the requested user"),
    ),
    responses(
        (status = 200, body = UserResponse),
        (status = StatusCode::UNAUTHORIZED, description = "Caller unauthorized", body = ErrorResponse),
        (status = StatusCode::NOT_FOUND, description = "User not found", body = ErrorResponse),
    ),
    security(
        ("token" = [])
    ),
    tag = "Users API"
)]
pub async fn get_user(
    _auth: AuthExtractor,
    State(db): State<DatabaseConnection>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<UserResponse>, UsersError> {
    let Ok(Path(user_id)) = path else {
        return Err(UsersError::UserNotFound);
    };

    let Some(user) = users::Entity::find_by_id(user_id).one(&db).await? else {
        return Err(UsersError::UserNotFound);
    };

    Ok(Json(user.into()))
}
