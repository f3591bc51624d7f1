use axum::{
    extract::rejection::{FormRejection, JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{validation_details, ErrorResponse};

pub mod models;
pub mod routes;

#[derive(thiserror::Error, Debug)]
pub enum TokensError {
    #[error("unable to log in with provided credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Json(#[from] JsonRejection),

    #[error("{0}")]
    Form(#[from] FormRejection),

    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Validator(#[from] garde::Errors),
}

impl IntoResponse for TokensError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!("{:#?}", self);

        match self {
            TokensError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse {
                    error: self.to_string(),
                    ..Default::default()
                },
            )
                .into_response(),
            TokensError::Json(rejection) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: String::from("invalid input"),
                    details: Some(vec![rejection.body_text()]),
                },
            )
                .into_response(),
            TokensError::Form(rejection) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: String::from("invalid input"),
                    details: Some(vec![rejection.body_text()]),
                },
            )
                .into_response(),
            TokensError::Validator(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: String::from("invalid input"),
                    details: Some(validation_details(&errors)),
                },
            )
                .into_response(),
            TokensError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}
