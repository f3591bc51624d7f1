use axum::{http::StatusCode, response::IntoResponse};

use crate::{validation_details, ErrorResponse};

pub mod models;
pub mod routes;
pub mod utils;

#[derive(thiserror::Error, Debug)]
pub enum UsersError {
    #[error("user not found")]
    UserNotFound,

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Argon2(#[from] argon2::password_hash::Error),

    #[error("validation error: {0}")]
    Validator(#[from] garde::Errors),
}

impl IntoResponse for UsersError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!("{:#?}", self);

        match self {
            UsersError::UserNotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: self.to_string(),
                    ..Default::default()
                },
            )
                .into_response(),
            UsersError::Conflict(_) => (
                StatusCode::CONFLICT,
                ErrorResponse {
                    error: self.to_string(),
                    ..Default::default()
                },
            )
                .into_response(),
            UsersError::Validator(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: String::from("invalid input"),
                    details: Some(validation_details(&errors)),
                },
            )
                .into_response(),
            UsersError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            UsersError::Argon2(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}
