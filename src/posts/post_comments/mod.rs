use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse};

use crate::{validation_details, ErrorResponse};

pub mod models;
pub mod routes;

#[derive(thiserror::Error, Debug)]
pub enum PostCommentsError {
    #[error("internal server error")]
    InternalServerError,

    #[error("post not found")]
    PostNotFound,

    #[error("comment not found")]
    CommentNotFound,

    #[error("you do not have permission to perform this action")]
    Forbidden,

    #[error("{0}: this field is required")]
    Required(&'static str),

    #[error("{0}")]
    Payload(#[from] JsonRejection),

    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Validator(#[from] garde::Errors),
}

impl IntoResponse for PostCommentsError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!("{:#?}", self);

        match self {
            PostCommentsError::PostNotFound | PostCommentsError::CommentNotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: self.to_string(),
                    ..Default::default()
                },
            )
                .into_response(),
            PostCommentsError::Forbidden => (
                StatusCode::FORBIDDEN,
                ErrorResponse {
                    error: self.to_string(),
                    ..Default::default()
                },
            )
                .into_response(),
            PostCommentsError::Required(_) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: String::from("invalid input"),
                    details: Some(vec![self.to_string()]),
                },
            )
                .into_response(),
            PostCommentsError::Payload(rejection) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: String::from("invalid input"),
                    details: Some(vec![rejection.body_text()]),
                },
            )
                .into_response(),
            PostCommentsError::Validator(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: String::from("invalid input"),
                    details: Some(validation_details(&errors)),
                },
            )
                .into_response(),
            PostCommentsError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            PostCommentsError::InternalServerError => {
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
