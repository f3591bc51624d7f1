use garde::Validate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::entity::groups;

#[derive(Debug, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct GroupResponse {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl From<groups::Model> for GroupResponse {
    fn from(group: groups::Model) -> Self {
        Self {
            id: group.id,
            title: group.title,
            slug: group.slug,
            description: group.description,
        }
    }
}

/// Input for the `create-group` command.
#[derive(Validate, Debug)]
pub struct CreateGroup {
    #[garde(length(min = 1, max = 200))]
    pub title: String,
    #[garde(length(min = 1, max = 50))]
    pub slug: String,
    #[garde(skip)]
    pub description: String,
}
