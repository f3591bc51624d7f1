use garde::Validate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::entity::users;

#[derive(Debug, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Input for the `create-user` command.
#[derive(Validate, Debug)]
pub struct CreateUser {
    #[garde(length(min = 1, max = 150))]
    pub username: String,
    #[garde(length(min = 8))]
    pub password: String,
    #[garde(length(max = 150))]
    pub first_name: String,
    #[garde(length(max = 150))]
    pub last_name: String,
}
