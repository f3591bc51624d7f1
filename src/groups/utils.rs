use garde::Validate;
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::entity::groups;

use super::{models::CreateGroup, GroupsError};

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[_/]").expect("separators regex"));
static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^-\p{L}\p{N}\s]").expect("disallowed characters regex"));
static DASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-\s]+").expect("dashes regex"));

/// Turns a group title into a URL slug: "Rust & Friends" -> "rust-friends".
pub fn slugify(title: &str) -> String {
    // separators become dashes
    let title = SEPARATORS.replace_all(title.trim(), "-");

    // drop everything that is not a dash, letter, number or whitespace
    let title = DISALLOWED.replace_all(&title, "");

    // collapse runs of dashes and whitespace into a single dash
    let title = DASHES.replace_all(title.trim(), "-");

    title.trim_matches('-').to_lowercase()
}

pub async fn create_group(
    db: &DatabaseConnection,
    payload: CreateGroup,
) -> Result<groups::Model, GroupsError> {
    payload.validate(&())?;

    let taken = groups::Entity::find()
        .filter(groups::Column::Slug.eq(payload.slug.as_str()))
        .one(db)
        .await?
        .is_some();

    if taken {
        return Err(GroupsError::Conflict(format!(
            "group with slug '{}' already exists",
            payload.slug
        )));
    }

    let group = groups::ActiveModel {
        title: Set(payload.title),
        slug: Set(payload.slug),
        description: Set(payload.description),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!("created group {} ({})", group.slug, group.id);

    Ok(group)
}
