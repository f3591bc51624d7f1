use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{Method, StatusCode},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use garde::Validate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::{
    auth::AuthExtractor,
    entity::{comments, posts, users},
    permissions::is_author_or_read_only,
    AppState,
};

use super::{
    models::{CommentResponse, CreateComment, UpdateComment},
    PostCommentsError,
};

pub fn post_comments_router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/posts/:post_id/comments/",
            get(get_comments).post(create_comment),
        )
        .route(
            "/v1/posts/:post_id/comments/:comment_id/",
            get(get_comment)
                .put(update_comment)
                .patch(partial_update_comment)
                .delete(delete_comment),
        )
}

/// Ids are taken as strings so that one that is not a number is a 404, not a 400.
fn parse_id(raw: &str, not_found: PostCommentsError) -> Result<i32, PostCommentsError> {
    raw.parse().map_err(|_| not_found)
}

fn parse_ids(
    (post_id, comment_id): (String, String),
) -> Result<(i32, i32), PostCommentsError> {
    Ok((
        parse_id(&post_id, PostCommentsError::PostNotFound)?,
        parse_id(&comment_id, PostCommentsError::CommentNotFound)?,
    ))
}

/// Every comment route starts here: the parent post must exist.
async fn get_parent_post(
    db: &DatabaseConnection,
    post_id: i32,
) -> Result<posts::Model, PostCommentsError> {
    posts::Entity::find_by_id(post_id)
        .one(db)
        .await?
        .ok_or(PostCommentsError::PostNotFound)
}

/// Looks a comment up within `post` only, so ids from other posts are not found.
async fn get_scoped_comment(
    db: &DatabaseConnection,
    post: &posts::Model,
    comment_id: i32,
) -> Result<comments::Model, PostCommentsError> {
    post.find_related(comments::Entity)
        .filter(comments::Column::Id.eq(comment_id))
        .one(db)
        .await?
        .ok_or(PostCommentsError::CommentNotFound)
}

async fn get_comment_checked(
    db: &DatabaseConnection,
    method: &Method,
    requester_id: i32,
    post_id: i32,
    comment_id: i32,
) -> Result<comments::Model, PostCommentsError> {
    let post = get_parent_post(db, post_id).await?;
    let comment = get_scoped_comment(db, &post, comment_id).await?;

    if !is_author_or_read_only(method, requester_id, &comment) {
        tracing::debug!(
            "user {} denied {} on comment {}",
            requester_id,
            method,
            comment.id
        );
        return Err(PostCommentsError::Forbidden);
    }

    Ok(comment)
}

/// List comments of a post
#[utoipa::path(
    get,
    path = "/v1/posts/{post_id}/comments/",
    params(
        ("post_id" = i32, Path, description = "ID of the parent post"),
    ),
    responses(
        (status = 200, body = [CommentResponse]),
        (status = StatusCode::UNAUTHORIZED, description = "Caller unauthorized", body = ErrorResponse),
        (status = StatusCode::NOT_FOUND, description = "Post not found", body = ErrorResponse),
    ),
    security(
        ("token" = [])
    ),
    tag = "Comments API"
)]
pub async fn get_comments(
    _auth: AuthExtractor,
    State(db): State<DatabaseConnection>,
    Path(post_id): Path<String>,
) -> Result<Json<Vec<CommentResponse>>, PostCommentsError> {
    let post_id = parse_id(&post_id, PostCommentsError::PostNotFound)?;
    let post = get_parent_post(&db, post_id).await?;

    let records = comments::Entity::find()
        .filter(comments::Column::PostId.eq(post.id))
        .find_also_related(users::Entity)
        .order_by_asc(comments::Column::Id)
        .all(&db)
        .await?;

    let comments = records
        .into_iter()
        .map(|(comment, author)| {
            let author = author.map(|a| a.username).ok_or_else(|| {
                tracing::error!("comment {} has no author", comment.id);
                PostCommentsError::InternalServerError
            })?;
            Ok(CommentResponse::new(comment, author))
        })
        .collect::<Result<Vec<CommentResponse>, PostCommentsError>>()?;

    Ok(Json(comments))
}

/// Create comment on a post
#[utoipa::path(
    post,
    path = "/v1/posts/{post_id}/comments/",
    params(
        ("post_id" = i32, Path, description = "ID of the parent post"),
    ),
    request_body(content = CreateComment, content_type = "application/json"),
    responses(
        (status = 201, description = "Comment created under the post in the path", body = CommentResponse),
        (status = StatusCode::BAD_REQUEST, description = "Fields validation error", body = ErrorResponse),
        (status = StatusCode::UNAUTHORIZED, description = "Caller unauthorized", body = ErrorResponse),
        (status = StatusCode::NOT_FOUND, description = "Post not found", body = ErrorResponse),
    ),
    security(
        ("token" = [])
    ),
    tag = "Comments API"
)]
pub async fn create_comment(
    auth: AuthExtractor,
    State(db): State<DatabaseConnection>,
    Path(post_id): Path<String>,
    payload: Result<Json<CreateComment>, JsonRejection>,
) -> Result<(StatusCode, Json<CommentResponse>), PostCommentsError> {
    let post_id = parse_id(&post_id, PostCommentsError::PostNotFound)?;
    let post = get_parent_post(&db, post_id).await?;

    let Json(payload) = payload?;
    payload.validate(&())?;

    let comment = comments::ActiveModel {
        text: Set(payload.text.trim().to_owned()),
        created: Set(Utc::now()),
        author_id: Set(auth.current_user.id),
        post_id: Set(post.id),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    tracing::debug!(
        "user {} commented {} on post {}",
        auth.current_user.id,
        comment.id,
        post.id
    );

    Ok((
        StatusCode::CREATED,
        Json(CommentResponse::new(comment, auth.current_user.username)),
    ))
}

/// Get comment by id
#[utoipa::path(
    get,
    path = "/v1/posts/{post_id}/comments/{comment_id}/",
    params(
        ("post_id" = i32, Path, description = "ID of the parent post"),
        ("comment_id" = i32, Path, description = "ID of the requested comment"),
    ),
    responses(
        (status = 200, body = CommentResponse),
        (status = StatusCode::UNAUTHORIZED, description = "Caller unauthorized", body = ErrorResponse),
        (status = StatusCode::NOT_FOUND, description = "Post or comment not found", body = ErrorResponse),
    ),
    security(
        ("token" = [])
    ),
    tag = "Comments API"
)]
pub async fn get_comment(
    _auth: AuthExtractor,
    State(db): State<DatabaseConnection>,
    Path(ids): Path<(String, String)>,
) -> Result<Json<CommentResponse>, PostCommentsError> {
    let (post_id, comment_id) = parse_ids(ids)?;
    let post = get_parent_post(&db, post_id).await?;
    let comment = get_scoped_comment(&db, &post, comment_id).await?;

    let Some(author) = comment.find_related(users::Entity).one(&db).await? else {
        tracing::error!("comment {} has no author", comment.id);
        return Err(PostCommentsError::InternalServerError);
    };

    Ok(Json(CommentResponse::new(comment, author.username)))
}

async fn apply_update(
    auth: AuthExtractor,
    db: DatabaseConnection,
    method: Method,
    (post_id, comment_id): (i32, i32),
    payload: Result<Json<UpdateComment>, JsonRejection>,
    partial: bool,
) -> Result<Json<CommentResponse>, PostCommentsError> {
    let comment =
        get_comment_checked(&db, &method, auth.current_user.id, post_id, comment_id).await?;

    let Json(payload) = payload?;
    payload.validate(&())?;

    // null was rejected by validation
    let Some(text) = payload.text.flatten() else {
        if partial {
            return Ok(Json(CommentResponse::new(
                comment,
                auth.current_user.username,
            )));
        }
        return Err(PostCommentsError::Required("text"));
    };

    let mut comment = comment.into_active_model();
    comment.text = Set(text.trim().to_owned());
    let comment = comment.update(&db).await?;

    tracing::debug!(
        "user {} updated comment {}",
        auth.current_user.id,
        comment.id
    );

    Ok(Json(CommentResponse::new(
        comment,
        auth.current_user.username,
    )))
}

/// Replace comment
#[utoipa::path(
    put,
    path = "/v1/posts/{post_id}/comments/{comment_id}/",
    params(
        ("post_id" = i32, Path, description = "ID of the parent post"),
        ("comment_id" = i32, Path, description = "ID of the comment to update"),
    ),
    request_body(content = UpdateComment, content_type = "application/json"),
    responses(
        (status = 200, description = "Comment updated", body = CommentResponse),
        (status = StatusCode::BAD_REQUEST, description = "Fields validation error", body = ErrorResponse),
        (status = StatusCode::UNAUTHORIZED, description = "Caller unauthorized", body = ErrorResponse),
        (status = StatusCode::FORBIDDEN, description = "Caller is not the author", body = ErrorResponse),
        (status = StatusCode::NOT_FOUND, description = "Post or comment not found", body = ErrorResponse),
    ),
    security(
        ("token" = [])
    ),
    tag = "Comments API"
)]
pub async fn update_comment(
    auth: AuthExtractor,
    State(db): State<DatabaseConnection>,
    method: Method,
    Path(ids): Path<(String, String)>,
    payload: Result<Json<UpdateComment>, JsonRejection>,
) -> Result<Json<CommentResponse>, PostCommentsError> {
    apply_update(auth, db, method, parse_ids(ids)?, payload, false).await
}

/// Partially update comment
#[utoipa::path(
    patch,
    path = "/v1/posts/{post_id}/comments/{comment_id}/",
    params(
        ("post_id" = i32, Path, description = "ID of the parent post"),
        ("comment_id" = i32, Path, description = "ID of the comment to update"),
    ),
    request_body(content = UpdateComment, content_type = "application/json"),
    responses(
        (status = 200, description = "Comment updated", body = CommentResponse),
        (status = StatusCode::BAD_REQUEST, description = "Fields validation error", body = ErrorResponse),
        (status = StatusCode::UNAUTHORIZED, description = "Caller unauthorized", body = ErrorResponse),
        (status = StatusCode::FORBIDDEN, description = "Caller is not the author", body = ErrorResponse),
        (status = StatusCode::NOT_FOUND, description = "Post or comment not found", body = ErrorResponse),
    ),
    security(
        ("token" = [])
    ),
    tag = "Comments API"
)]
pub async fn partial_update_comment(
    auth: AuthExtractor,
    State(db): State<DatabaseConnection>,
    method: Method,
    Path(ids): Path<(String, String)>,
    payload: Result<Json<UpdateComment>, JsonRejection>,
) -> Result<Json<CommentResponse>, PostCommentsError> {
    apply_update(auth, db, method, parse_ids(ids)?, payload, true).await
}

/// Delete comment
#[utoipa::path(
    delete,
    path = "/v1/posts/{post_id}/comments/{comment_id}/",
    params(
        ("post_id" = i32, Path, description = "ID of the parent post"),
        ("comment_id" = i32, Path, description = "ID of the comment to delete"),
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = StatusCode::UNAUTHORIZED, description = "Caller unauthorized", body = ErrorResponse),
        (status = StatusCode::FORBIDDEN, description = "Caller is not the author", body = ErrorResponse),
        (status = StatusCode::NOT_FOUND, description = "Post or comment not found", body = ErrorResponse),
    ),
    security(
        ("token" = [])
    ),
    tag = "Comments API"
)]
pub async fn delete_comment(
    auth: AuthExtractor,
    State(db): State<DatabaseConnection>,
    method: Method,
    Path(ids): Path<(String, String)>,
) -> Result<StatusCode, PostCommentsError> {
    let (post_id, comment_id) = parse_ids(ids)?;
    let comment =
        get_comment_checked(&db, &method, auth.current_user.id, post_id, comment_id).await?;

    comment.delete(&db).await?;

    tracing::debug!(
        "user {} deleted comment {} on post {}",
        auth.current_user.id,
        comment_id,
        post_id
    );

    Ok(StatusCode::NO_CONTENT)
}
