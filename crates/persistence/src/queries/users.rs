// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User account queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::UserData;
use crate::diesel_schema::users;
use crate::error::PersistenceError;

/// Diesel Queryable struct for user rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
pub(crate) struct UserRow {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub supervisor_id: Option<i64>,
    pub is_active: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<UserRow> for UserData {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role: row.role,
            supervisor_id: row.supervisor_id,
            is_active: row.is_active != 0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Retrieves a user by email address.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no user has the given email.
pub fn get_user_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<UserData>, PersistenceError> {
    debug!("Looking up user by email");

    let result: Result<UserRow, diesel::result::Error> = users::table
        .filter(users::email.eq(email))
        .select(UserRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves a user by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<UserData>, PersistenceError> {
    debug!("Looking up user by ID: {}", user_id);

    let result: Result<UserRow, diesel::result::Error> = users::table
        .filter(users::user_id.eq(user_id))
        .select(UserRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists all users ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_users(conn: &mut SqliteConnection) -> Result<Vec<UserData>, PersistenceError> {
    debug!("Listing all users");

    let rows: Vec<UserRow> = users::table
        .select(UserRow::as_select())
        .order_by(users::name.asc())
        .load(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Lists the active technicians reporting to a supervisor.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_team_technicians(
    conn: &mut SqliteConnection,
    supervisor_id: i64,
) -> Result<Vec<UserData>, PersistenceError> {
    debug!(
        "Listing active technicians for supervisor ID: {}",
        supervisor_id
    );

    let rows: Vec<UserRow> = users::table
        .filter(users::supervisor_id.eq(supervisor_id))
        .filter(users::role.eq("TECHNICIAN"))
        .filter(users::is_active.eq(1))
        .select(UserRow::as_select())
        .order_by(users::name.asc())
        .load(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Verifies a password against a stored hash.
///
/// # Errors
///
/// Returns an error if password verification fails.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| PersistenceError::Other(format!("Failed to verify password: {e}")))
}
