use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;
use garde::Validate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::{
    entity::{tokens, users},
    users::utils::verify_password,
    AppState,
};

use super::{
    models::{Credentials, TokenResponse},
    TokensError,
};

pub fn tokens_router() -> Router<AppState> {
    Router::new().route("/v1/api-token-auth/", post(obtain_auth_token))
}

/// Fresh opaque token key: 32 lowercase hex characters.
fn generate_key() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Returns the user's token, creating it on first use.
async fn get_or_create_token(
    db: &DatabaseConnection,
    user: &users::Model,
) -> Result<tokens::Model, TokensError> {
    if let Some(token) = user.find_related(tokens::Entity).one(db).await? {
        return Ok(token);
    }

    create_or_fetch_token(db, user).await
}

/// Inserts a token for `user`. When a concurrent login inserted one first,
/// the unique `user_id` rejects ours and the stored token is returned.
async fn create_or_fetch_token(
    db: &DatabaseConnection,
    user: &users::Model,
) -> Result<tokens::Model, TokensError> {
    let inserted = tokens::ActiveModel {
        key: Set(generate_key()),
        user_id: Set(user.id),
        created: Set(Utc::now()),
    }
    .insert(db)
    .await;

    match inserted {
        Ok(token) => {
            tracing::info!("issued token for user {}", user.id);
            Ok(token)
        }
        Err(e) => {
            let Some(token) = user.find_related(tokens::Entity).one(db).await? else {
                return Err(e.into());
            };

            tracing::debug!("token for user {} issued concurrently: {}", user.id, e);
            Ok(token)
        }
    }
}

/// Exchange credentials for a token
#[utoipa::path(
    post,
    path = "/v1/api-token-auth/",
    request_body(content = Credentials, content_type = "application/json"),
    responses(
        (status = 200, description = "Credentials valid. returned the caller's token", body = TokenResponse),
        (status = StatusCode::BAD_REQUEST, description = "Missing username or password", body = ErrorResponse),
        (status = StatusCode::UNAUTHORIZED, description = "Invalid credentials", body = ErrorResponse),
    ),
    tag = "Tokens API"
)]
pub async fn obtain_auth_token(
    State(db): State<DatabaseConnection>,
    credentials: Credentials,
) -> Result<Json<TokenResponse>, TokensError> {
    credentials.validate(&())?;

    let Some(user) = users::Entity::find()
        .filter(users::Column::Username.eq(credentials.username.as_str()))
        .one(&db)
        .await? else {
        tracing::debug!("login attempt for unknown user {}", credentials.username);
        return Err(TokensError::InvalidCredentials);
    };

    if !verify_password(&credentials.password, &user.password) {
        return Err(TokensError::InvalidCredentials);
    }

    let token = get_or_create_token(&db, &user).await?;

    Ok(Json(TokenResponse { token: token.key }))
}
