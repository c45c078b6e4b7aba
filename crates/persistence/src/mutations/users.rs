// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User account mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::{debug, info};

use crate::sqlite::last_insert_rowid;
use crate::diesel_schema::users;
use crate::error::PersistenceError;

/// Creates a new user account.
///
/// The plain-text password is hashed with bcrypt before storage.
///
/// # Errors
///
/// Returns an error if the user cannot be created or if the email
/// already exists.
pub fn create_user(
    conn: &mut SqliteConnection,
    name: &str,
    email: &str,
    password: &str,
    role: &str,
    supervisor_id: Option<i64>,
) -> Result<i64, PersistenceError> {
    info!("Creating user with email: {}, role: {}", email, role);

    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    diesel::insert_into(users::table)
        .values((
            users::name.eq(name),
            users::email.eq(email),
            users::password_hash.eq(&password_hash),
            users::role.eq(role),
            users::supervisor_id.eq(supervisor_id),
        ))
        .execute(conn)?;

    let user_id: i64 = last_insert_rowid(conn)?;

    info!(user_id, "User created successfully");

    Ok(user_id)
}

/// Updates a user account's mutable fields.
///
/// # Errors
///
/// Returns `NotFound` if no user has the given ID, or an error if the
/// update fails.
pub fn update_user(
    conn: &mut SqliteConnection,
    user_id: i64,
    name: &str,
    email: &str,
    role: &str,
    supervisor_id: Option<i64>,
    is_active: bool,
) -> Result<(), PersistenceError> {
    debug!("Updating user ID: {}", user_id);

    let rows_affected: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set((
            users::name.eq(name),
            users::email.eq(email),
            users::role.eq(role),
            users::supervisor_id.eq(supervisor_id),
            users::is_active.eq(i32::from(is_active)),
            users::updated_at
                .eq(diesel::dsl::sql::<diesel::sql_types::Text>("CURRENT_TIMESTAMP")),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "User with ID {user_id} not found"
        )));
    }

    Ok(())
}

/// Updates a user's password.
///
/// # Errors
///
/// Returns `NotFound` if no user has the given ID, or an error if the
/// update fails.
pub fn update_password(
    conn: &mut SqliteConnection,
    user_id: i64,
    new_password: &str,
) -> Result<(), PersistenceError> {
    debug!("Updating password for user ID: {}", user_id);

    let password_hash: String = bcrypt::hash(new_password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    let rows_affected: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set((
            users::password_hash.eq(&password_hash),
            users::updated_at
                .eq(diesel::dsl::sql::<diesel::sql_types::Text>("CURRENT_TIMESTAMP")),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "User with ID {user_id} not found"
        )));
    }

    Ok(())
}

/// Deletes a user account.
///
/// Foreign key constraints from visits restrict deletion of users that are
/// referenced as technician or supervisor; those surface as database errors.
///
/// # Errors
///
/// Returns `NotFound` if no user has the given ID, or an error if the
/// delete fails.
pub fn delete_user(conn: &mut SqliteConnection, user_id: i64) -> Result<(), PersistenceError> {
    info!("Deleting user ID: {}", user_id);

    let rows_affected: usize = diesel::delete(users::table)
        .filter(users::user_id.eq(user_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "User with ID {user_id} not found"
        )));
    }

    Ok(())
}
