use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use chrono::Utc;
use garde::Validate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::entity::users;

use super::{models::CreateUser, UsersError};

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);

    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Checks `password` against a stored PHC string. A malformed hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        tracing::error!("stored password hash is not a valid PHC string");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

pub async fn create_user(
    db: &DatabaseConnection,
    payload: CreateUser,
) -> Result<users::Model, UsersError> {
    payload.validate(&())?;

    let taken = users::Entity::find()
        .filter(users::Column::Username.eq(payload.username.as_str()))
        .one(db)
        .await?
        .is_some();

    if taken {
        return Err(UsersError::Conflict(String::from("username taken")));
    }

    let user = users::ActiveModel {
        username: Set(payload.username),
        first_name: Set(payload.first_name),
        last_name: Set(payload.last_name),
        password: Set(hash_password(&payload.password)?),
        date_joined: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!("created user {} ({})", user.username, user.id);

    Ok(user)
}
