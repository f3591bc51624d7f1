use axum::{http::StatusCode, response::IntoResponse};

use crate::{validation_details, ErrorResponse};

pub mod models;
pub mod routes;
pub mod utils;

#[derive(thiserror::Error, Debug)]
pub enum GroupsError {
    #[error("group not found")]
    GroupNotFound,

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Validator(#[from] garde::Errors),
}

impl IntoResponse for GroupsError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!("{:#?}", self);

        match self {
            GroupsError::GroupNotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: self.to_string(),
                    ..Default::default()
                },
            )
                .into_response(),
            GroupsError::Conflict(_) => (
                StatusCode::CONFLICT,
                ErrorResponse {
                    error: self.to_string(),
                    ..Default::default()
                },
            )
                .into_response(),
            GroupsError::Validator(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: String::from("invalid input"),
                    details: Some(validation_details(&errors)),
                },
            )
                .into_response(),
            GroupsError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}
