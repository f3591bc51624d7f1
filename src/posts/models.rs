use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::entity::posts;

use super::utils::{double_option, not_blank, not_blank_if_present};

#[derive(Debug, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct PostResponse {
    pub id: i32,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    /// username of the author
    pub author: String,
    pub group: Option<i32>,
    pub image: Option<String>,
}

impl PostResponse {
    pub fn new(post: posts::Model, author: String) -> Self {
        Self {
            id: post.id,
            text: post.text,
            pub_date: post.pub_date,
            author,
            group: post.group_id,
            image: post.image,
        }
    }
}

/// Body of `POST /v1/posts/`. Any `author` sent by the client is ignored.
#[derive(Deserialize, Validate, ToSchema, Debug)]
pub struct CreatePost {
    #[serde(default)]
    #[garde(custom(not_blank))]
    pub text: String,
    #[garde(skip)]
    pub group: Option<i32>,
    #[garde(skip)]
    pub image: Option<String>,
}

/// Body of `PUT`/`PATCH /v1/posts/{post_id}/`. Absent fields are left untouched.
#[derive(Deserialize, Validate, ToSchema, Debug)]
pub struct UpdatePost {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    #[garde(custom(not_blank_if_present))]
    pub text: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    #[garde(skip)]
    pub group: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    #[garde(skip)]
    pub image: Option<Option<String>>,
}
