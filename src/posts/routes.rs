use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{Method, StatusCode},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use garde::Validate;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait, QueryOrder,
    Set,
};

use crate::{
    auth::AuthExtractor,
    entity::{groups, posts, users},
    permissions::is_author_or_read_only,
    AppState,
};

use super::{
    models::{CreatePost, PostResponse, UpdatePost},
    PostsError,
};

pub fn posts_router() -> Router<AppState> {
    Router::new()
        .route("/v1/posts/", get(get_posts).post(create_post))
        .route(
            "/v1/posts/:post_id/",
            get(get_post)
                .put(update_post)
                .patch(partial_update_post)
                .delete(delete_post),
        )
}

async fn ensure_group_exists(
    db: &DatabaseConnection,
    group_id: Option<i32>,
) -> Result<(), PostsError> {
    let Some(group_id) = group_id else {
        return Ok(());
    };

    if groups::Entity::find_by_id(group_id).one(db).await?.is_none() {
        return Err(PostsError::InvalidGroup(group_id));
    }

    Ok(())
}

/// A post id that does not parse as one can never match a post.
fn parse_post_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, PostsError> {
    let Path(post_id) = path.map_err(|e| {
        tracing::debug!("unroutable post id: {}", e.body_text());
        PostsError::PostNotFound
    })?;

    Ok(post_id)
}

/// Looks up a post and applies the object-level permission for `method`.
async fn get_post_checked(
    db: &DatabaseConnection,
    method: &Method,
    requester_id: i32,
    post_id: i32,
) -> Result<posts::Model, PostsError> {
    let Some(post) = posts::Entity::find_by_id(post_id).one(db).await? else {
        return Err(PostsError::PostNotFound);
    };

    if !is_author_or_read_only(method, requester_id, &post) {
        tracing::debug!(
            "user {} denied {} on post {}",
            requester_id,
            method,
            post.id
        );
        return Err(PostsError::Forbidden);
    }

    Ok(post)
}

/// List posts
#[utoipa::path(
    get,
    path = "/v1/posts/",
    responses(
        (status = 200, body = [PostResponse]),
        (status = StatusCode::UNAUTHORIZED, description = "Caller unauthorized", body = ErrorResponse),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Something went wrong", body = ErrorResponse),
    ),
    security(
        ("token" = [])
    ),
    tag = "Posts API"
)]
pub async fn get_posts(
    _auth: AuthExtractor,
    State(db): State<DatabaseConnection>,
) -> Result<Json<Vec<PostResponse>>, PostsError> {
    let records = posts::Entity::find()
        .find_also_related(users::Entity)
        .order_by_asc(posts::Column::Id)
        .all(&db)
        .await?;

    let posts = records
        .into_iter()
        .map(|(post, author)| {
            let author = author.map(|a| a.username).ok_or_else(|| {
                tracing::error!("post {} has no author", post.id);
                PostsError::InternalServerError
            })?;
            Ok(PostResponse::new(post, author))
        })
        .collect::<Result<Vec<PostResponse>, PostsError>>()?;

    Ok(Json(posts))
}

/// Create post
#[utoipa::path(
    post,
    path = "/v1/posts/",
    request_body(content = CreatePost, content_type = "application/json"),
    responses(
        (status = 201, description = "Post created, author set to the caller", body = PostResponse),
        (status = StatusCode::BAD_REQUEST, description = "Fields validation error", body = ErrorResponse),
        (status = StatusCode::UNAUTHORIZED, description = "Caller unauthorized", body = ErrorResponse),
    ),
    security(
        ("token" = [])
    ),
    tag = "Posts API"
)]
pub async fn create_post(
    auth: AuthExtractor,
    State(db): State<DatabaseConnection>,
    payload: Result<Json<CreatePost>, JsonRejection>,
) -> Result<(StatusCode, Json<PostResponse>), PostsError> {
    let Json(payload) = payload?;
    payload.validate(&())?;
    ensure_group_exists(&db, payload.group).await?;

    let post = posts::ActiveModel {
        text: Set(payload.text.trim().to_owned()),
        pub_date: Set(Utc::now()),
        author_id: Set(auth.current_user.id),
        group_id: Set(payload.group),
        image: Set(payload.image),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    tracing::debug!("user {} created post {}", auth.current_user.id, post.id);

    Ok((
        StatusCode::CREATED,
        Json(PostResponse::new(post, auth.current_user.username)),
    ))
}

/// Get post by id
#[utoipa::path(
    get,
    path = "/v1/posts/{post_id}/",
    params(
        ("post_id" = i32, Path, description = "ID of the requested post"),
    ),
    responses(
        (status = 200, body = PostResponse),
        (status = StatusCode::UNAUTHORIZED, description = "Caller unauthorized", body = ErrorResponse),
        (status = StatusCode::NOT_FOUND, description = "Post not found", body = ErrorResponse),
    ),
    security(
        ("token" = [])
    ),
    tag = "Posts API"
)]
pub async fn get_post(
    _auth: AuthExtractor,
    State(db): State<DatabaseConnection>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<PostResponse>, PostsError> {
    let post_id = parse_post_id(path)?;

    let Some((post, Some(author))) = posts::Entity::find_by_id(post_id)
        .find_also_related(users::Entity)
        .one(&db)
        .await? else {
        return Err(PostsError::PostNotFound);
    };

    Ok(Json(PostResponse::new(post, author.username)))
}

async fn apply_update(
    auth: AuthExtractor,
    db: DatabaseConnection,
    method: Method,
    post_id: i32,
    payload: Result<Json<UpdatePost>, JsonRejection>,
    partial: bool,
) -> Result<Json<PostResponse>, PostsError> {
    let post = get_post_checked(&db, &method, auth.current_user.id, post_id).await?;

    let Json(payload) = payload?;
    payload.validate(&())?;

    // null was rejected by validation
    let text = payload.text.flatten();

    if !partial && text.is_none() {
        return Err(PostsError::Required("text"));
    }

    if let Some(group) = payload.group {
        ensure_group_exists(&db, group).await?;
    }

    if text.is_none() && payload.group.is_none() && payload.image.is_none() {
        return Ok(Json(PostResponse::new(post, auth.current_user.username)));
    }

    let mut post = post.into_active_model();

    if let Some(text) = text {
        post.text = Set(text.trim().to_owned());
    }

    if let Some(group) = payload.group {
        post.group_id = Set(group);
    }

    if let Some(image) = payload.image {
        post.image = Set(image);
    }

    let post = post.update(&db).await?;

    tracing::debug!("user {} updated post {}", auth.current_user.id, post.id);

    // only the author gets this far
    Ok(Json(PostResponse::new(post, auth.current_user.username)))
}

/// Replace post
#[utoipa::path(
    put,
    path = "/v1/posts/{post_id}/",
    params(
        ("post_id" = i32, Path, description = "ID of the post to update"),
    ),
    request_body(content = UpdatePost, content_type = "application/json"),
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = StatusCode::BAD_REQUEST, description = "Fields validation error", body = ErrorResponse),
        (status = StatusCode::UNAUTHORIZED, description = "Caller unauthorized", body = ErrorResponse),
        (status = StatusCode::FORBIDDEN, description = "Caller is not the author", body = ErrorResponse),
        (status = StatusCode::NOT_FOUND, description = "Post not found", body = ErrorResponse),
    ),
    security(
        ("token" = [])
    ),
    tag = "Posts API"
)]
pub async fn update_post(
    auth: AuthExtractor,
    State(db): State<DatabaseConnection>,
    method: Method,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdatePost>, JsonRejection>,
) -> Result<Json<PostResponse>, PostsError> {
    apply_update(auth, db, method, parse_post_id(path)?, payload, false).await
}

/// Partially update post
#[utoipa::path(
    patch,
    path = "/v1/posts/{post_id}/",
    params(
        ("post_id" = i32, Path, description = "ID of the post to update"),
    ),
    request_body(content = UpdatePost, content_type = "application/json"),
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = StatusCode::BAD_REQUEST, description = "Fields validation error", body = ErrorResponse),
        (status = StatusCode::UNAUTHORIZED, description = "Caller unauthorized", body = ErrorResponse),
        (status = StatusCode::FORBIDDEN, description = "Caller is not the author", body = ErrorResponse),
        (status = StatusCode::NOT_FOUND, description = "Post not found", body = ErrorResponse),
    ),
    security(
        ("token" = [])
    ),
    tag = "Posts API"
)]
pub async fn partial_update_post(
    auth: AuthExtractor,
    State(db): State<DatabaseConnection>,
    method: Method,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdatePost>, JsonRejection>,
) -> Result<Json<PostResponse>, PostsError> {
    apply_update(auth, db, method, parse_post_id(path)?, payload, true).await
}

/// Delete post
#[utoipa::path(
    delete,
    path = "/v1/posts/{post_id}/",
    params(
        ("post_id" = i32, Path, description = "ID of the post to delete"),
    ),
    responses(
        (status = 204, description = "Post and its comments deleted"),
        (status = StatusCode::UNAUTHORIZED, description = "Caller unauthorized", body = ErrorResponse),
        (status = StatusCode::FORBIDDEN, description = "Caller is not the author", body = ErrorResponse),
        (status = StatusCode::NOT_FOUND, description = "Post not found", body = ErrorResponse),
    ),
    security(
        ("token" = [])
    ),
    tag = "Posts API"
)]
pub async fn delete_post(
    auth: AuthExtractor,
    State(db): State<DatabaseConnection>,
    method: Method,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, PostsError> {
    let post_id = parse_post_id(path)?;
    let post = get_post_checked(&db, &method, auth.current_user.id, post_id).await?;

    let res = post.delete(&db).await?;

    tracing::debug!(
        "user {} deleted post {} ({} rows)",
        auth.current_user.id,
        post_id,
        res.rows_affected
    );

    Ok(StatusCode::NO_CONTENT)
}
