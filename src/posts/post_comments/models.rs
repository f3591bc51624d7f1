use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{
    entity::comments,
    posts::utils::{double_option, not_blank, not_blank_if_present},
};

#[derive(Deserialize, Serialize, Debug, ToSchema, TS)]
#[ts(export)]
pub struct CommentResponse {
    pub id: i32,
    pub text: String,
    pub created: DateTime<Utc>,
    /// username of the author
    pub author: String,
    pub post: i32,
}

impl CommentResponse {
    pub fn new(comment: comments::Model, author: String) -> Self {
        Self {
            id: comment.id,
            text: comment.text,
            created: comment.created,
            author,
            post: comment.post_id,
        }
    }
}

/// `author` and `post` come from the token and the URL; body values for them are ignored.
#[derive(Deserialize, Validate, ToSchema, Debug)]
pub struct CreateComment {
    #[serde(default)]
    #[garde(custom(not_blank))]
    pub text: String,
}

#[derive(Deserialize, Validate, ToSchema, Debug)]
pub struct UpdateComment {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    #[garde(custom(not_blank_if_present))]
    pub text: Option<Option<String>>,
}
