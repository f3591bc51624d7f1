use async_trait::async_trait;
use axum::{
    body::HttpBody,
    extract::{FromRequest, Form},
    http::{header::CONTENT_TYPE, Request},
    BoxError, Json,
};
use garde::Validate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use super::TokensError;

/// Login form, accepted as JSON or `application/x-www-form-urlencoded`.
#[derive(Validate, Deserialize, ToSchema, Debug)]
pub struct Credentials {
    #[serde(default)]
    #[garde(length(min = 1))]
    pub username: String,
    #[serde(default)]
    #[garde(length(min = 1))]
    pub password: String,
}

#[async_trait]
impl<S, B> FromRequest<S, B> for Credentials
where
    B: HttpBody + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
    S: Send + Sync,
{
    type Rejection = TokensError;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map_or(false, |value| value.starts_with("application/json"));

        if is_json {
            let Json(credentials) = Json::<Credentials>::from_request(req, state).await?;
            Ok(credentials)
        } else {
            let Form(credentials) = Form::<Credentials>::from_request(req, state).await?;
            Ok(credentials)
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct TokenResponse {
    pub token: String,
}
