use axum::{extract::FromRef, response::IntoResponse, routing::get, Json, Router};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use ts_rs::TS;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi, ToSchema,
};

use crate::config::Config;

pub mod auth;
pub mod config;
pub mod entity;
pub mod groups;
pub mod permissions;
pub mod posts;
pub mod tokens;
pub mod users;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db: DatabaseConnection,
}

/// Opens the connection pool described by `config`.
pub async fn connect(config: &Config) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.database_max_connections)
        .sqlx_logging(false);

    Database::connect(options).await
}

/// Builds the full `/v1` router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(users::routes::users_router())
        .merge(groups::routes::groups_router())
        .merge(posts::routes::posts_router())
        .merge(posts::post_comments::routes::post_comments_router())
        .merge(tokens::routes::tokens_router())
        .route("/v1/openapi.json", get(openapi))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        users::routes::get_users,
        users::routes::get_user,
        groups::routes::get_groups,
        groups::routes::get_group,
        posts::routes::get_posts,
        posts::routes::create_post,
        posts::routes::get_post,
        posts::routes::update_post,
        posts::routes::partial_update_post,
        posts::routes::delete_post,
        posts::post_comments::routes::get_comments,
        posts::post_comments::routes::create_comment,
        posts::post_comments::routes::get_comment,
        posts::post_comments::routes::update_comment,
        posts::post_comments::routes::partial_update_comment,
        posts::post_comments::routes::delete_comment,
        tokens::routes::obtain_auth_token,
    ),
    components(
        schemas(users::models::UserResponse),
        schemas(groups::models::GroupResponse),
        schemas(posts::models::PostResponse),
        schemas(posts::models::CreatePost),
        schemas(posts::models::UpdatePost),
        schemas(posts::post_comments::models::CommentResponse),
        schemas(posts::post_comments::models::CreateComment),
        schemas(posts::post_comments::models::UpdateComment),
        schemas(tokens::models::Credentials),
        schemas(tokens::models::TokenResponse),
        schemas(ErrorResponse),
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users API"),
        (name = "Groups API"),
        (name = "Posts API"),
        (name = "Comments API"),
        (name = "Tokens API"),
    )
)]
pub struct ApiDoc;

#[derive(Serialize, Deserialize, ToSchema, TS, Debug, Default)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

/// Field-level messages for a failed validation: `text: length is lower than 1`.
pub fn validation_details(errors: &garde::Errors) -> Vec<String> {
    errors
        .flatten()
        .iter()
        .map(|(path, error)| {
            // garde roots every path at `value`
            match path.strip_prefix("value").map(|p| p.trim_start_matches('.')) {
                Some("") => error.to_string(),
                Some(field) => format!("{field}: {error}"),
                None => format!("{path}: {error}"),
            }
        })
        .collect()
}

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            // "Authorization: Token <key>"
            components.add_security_scheme(
                "token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("Authorization"))),
            )
        }
    }
}
