use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse};

use crate::{validation_details, ErrorResponse};

pub mod models;
pub mod post_comments;
pub mod routes;
mod utils;

#[derive(thiserror::Error, Debug)]
pub enum PostsError {
    #[error("internal server error")]
    InternalServerError,

    #[error("post not found")]
    PostNotFound,

    #[error("you do not have permission to perform this action")]
    Forbidden,

    #[error("group {0} does not exist")]
    InvalidGroup(i32),

    #[error("{0}: this field is required")]
    Required(&'static str),

    #[error("{0}")]
    Payload(#[from] JsonRejection),

    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Validator(#[from] garde::Errors),
}

impl IntoResponse for PostsError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!("{:#?}", self);

        match self {
            PostsError::PostNotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: self.to_string(),
                    ..Default::default()
                },
            )
                .into_response(),
            PostsError::Forbidden => (
                StatusCode::FORBIDDEN,
                ErrorResponse {
                    error: self.to_string(),
                    ..Default::default()
                },
            )
                .into_response(),
            PostsError::InvalidGroup(_) | PostsError::Required(_) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: String::from("invalid input"),
                    details: Some(vec![self.to_string()]),
                },
            )
                .into_response(),
            PostsError::Payload(rejection) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: String::from("invalid input"),
                    details: Some(vec![rejection.body_text()]),
                },
            )
                .into_response(),
            PostsError::Validator(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: String::from("invalid input"),
                    details: Some(validation_details(&errors)),
                },
            )
                .into_response(),
            PostsError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            PostsError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}
