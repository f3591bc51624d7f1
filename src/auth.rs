use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::IntoResponse,
};
use sea_orm::EntityTrait;

use crate::{
    entity::{prelude::Token, users},
    AppState, ErrorResponse,
};

/// Authorization schemes accepted in front of a token key.
const TOKEN_SCHEMES: [&str; 2] = ["Token", "Bearer"];

/// The user behind the token presented in the `Authorization` header.
pub struct AuthExtractor {
    pub current_user: users::Model,
    pub token: String,
}

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("authentication credentials were not provided")]
    MissingCredentials,

    #[error("invalid token")]
    InvalidToken,

    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AuthError::MissingCredentials | AuthError::InvalidToken => {
                tracing::debug!("auth-extractor: {}", self);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse {
                        error: self.to_string(),
                        ..Default::default()
                    },
                )
                    .into_response()
            }
            AuthError::Db(e) => {
                tracing::error!("auth-extractor: {:#?}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Extracts the key from `Token <key>` or `Bearer <key>`.
fn parse_authorization(value: &str) -> Option<&str> {
    let (scheme, key) = value.trim().split_once(' ')?;

    if !TOKEN_SCHEMES
        .iter()
        .any(|s| s.eq_ignore_ascii_case(scheme))
    {
        return None;
    }

    let key = key.trim();
    if key.is_empty() || key.contains(' ') {
        return None;
    }

    Some(key)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthExtractor {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingCredentials)?
            .to_str()
            .map_err(|_| AuthError::InvalidToken)?;

        let key = parse_authorization(header).ok_or(AuthError::InvalidToken)?;

        let Some((token, Some(user))) = Token::find_by_id(key.to_owned())
            .find_also_related(users::Entity)
            .one(&state.db)
            .await? else {
            return Err(AuthError::InvalidToken);
        };

        Ok(AuthExtractor {
            current_user: user,
            token: token.key,
        })
    }
}
