use std::collections::HashMap;

use uuid::Uuid;

use buddyscript_utils::id::new_uuid;

use crate::database::{catch_unique_violation, DatabaseClient, DatabaseError};
use super::types::{Author, DbUser, User, UserCreateData, UserUpdateData};

pub async fn create_user(
    db_client: &impl DatabaseClient,
    user_data: UserCreateData,
) -> Result<User, DatabaseError> {
    let user_id = new_uuid();
    let row = db_client.query_one(
        "
        INSERT INTO user_account (
            id,
            first_name,
            last_name,
            email,
            password_hash
        )
        VALUES ($1, $2, $3, $4, $5)
        RETURNING user_account
        ",
        &[
            &user_id,
            &user_data.first_name,
            &user_data.last_name,
            &user_data.email,
            &user_data.password_hash,
        ],
    ).await.map_err(catch_unique_violation("user"))?;
    let user: DbUser = row.try_get("user_account")?;
    Ok(user)
}

pub async fn get_user_by_id(
    db_client: &impl DatabaseClient,
    user_id: &Uuid,
) -> Result<User, DatabaseError> {
    let maybe_row = db_client.query_opt(
        "
        SELECT user_account
        FROM user_account
        WHERE id = $1
        ",
        &[&user_id],
    ).await?;
    let row = maybe_row.ok_or(DatabaseError::NotFound("user"))?;
    let user: DbUser = row.try_get("user_account")?;
    Ok(user)
}

pub async fn get_user_by_email(
    db_client: &impl DatabaseClient,
    email: &str,
) -> Result<User, DatabaseError> {
    let maybe_row = db_client.query_opt(
        "
        SELECT user_account
        FROM user_account
        WHERE email = $1
        ",
        &[&email],
    ).await?;
    let row = maybe_row.ok_or(DatabaseError::NotFound("user"))?;
    let user: DbUser = row.try_get("user_account")?;
    Ok(user)
}

pub async fn is_registered_email(
    db_client: &impl DatabaseClient,
    email: &str,
    exclude_user_id: Option<&Uuid>,
) -> Result<bool, DatabaseError> {
    let maybe_row = db_client.query_opt(
        "
        SELECT 1 FROM user_account
        WHERE email = $1 AND ($2::uuid IS NULL OR id != $2)
        ",
        &[&email, &exclude_user_id],
    ).await?;
    Ok(maybe_row.is_some())
}

/// Returns author summaries keyed by user ID
pub async fn get_authors(
    db_client: &impl DatabaseClient,
    user_ids: &[Uuid],
) -> Result<HashMap<Uuid, Author>, DatabaseError> {
    let rows = db_client.query(
        "
        SELECT user_account
        FROM user_account
        WHERE id = ANY($1)
        ",
        &[&user_ids],
    ).await?;
    let authors = rows.iter()
        .map(|row| {
            let user: DbUser = row.try_get("user_account")?;
            Ok::<_, DatabaseError>((user.id, Author::from(&user)))
        })
        .collect::<Result<_, _>>()?;
    Ok(authors)
}

pub async fn update_user(
    db_client: &impl DatabaseClient,
    user_id: &Uuid,
    data: UserUpdateData,
) -> Result<User, DatabaseError> {
    let (avatar_url, avatar_public_id) = match data.avatar {
        Some(image) => (Some(image.url), Some(image.public_id)),
        None => (None, None),
    };
    let maybe_row = db_client.query_opt(
        "
        UPDATE user_account
        SET
            first_name = COALESCE($2, first_name),
            last_name = COALESCE($3, last_name),
            email = COALESCE($4, email),
            password_hash = COALESCE($5, password_hash),
            avatar_url = COALESCE($6, avatar_url),
            avatar_public_id = COALESCE($7, avatar_public_id),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = $1
        RETURNING user_account
        ",
        &[
            &user_id,
            &data.first_name,
            &data.last_name,
            &data.email,
            &data.password_hash,
            &avatar_url,
            &avatar_public_id,
        ],
    ).await.map_err(catch_unique_violation("user"))?;
    let row = maybe_row.ok_or(DatabaseError::NotFound("user"))?;
    let user: DbUser = row.try_get("user_account")?;
    Ok(user)
}

/// Replaces stored refresh token (or clears it when `None`)
pub async fn set_refresh_token(
    db_client: &impl DatabaseClient,
    user_id: &Uuid,
    refresh_token: Option<&str>,
) -> Result<(), DatabaseError> {
    let updated_count = db_client.execute(
        "
        UPDATE user_account
        SET refresh_token = $2
        WHERE id = $1
        ",
        &[&user_id, &refresh_token],
    ).await?;
    if updated_count == 0 {
        return Err(DatabaseError::NotFound("user"));
    };
    Ok(())
}
