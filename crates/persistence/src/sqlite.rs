// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` connection setup.
//!
//! The visit lifecycle leans on two database-level guarantees: foreign
//! keys must be enforced (sessions, visits, logs, and reports all hang off
//! other tables) and the schema must be migrated before the first query.
//! [`open`] establishes a connection with both guarantees in place, or
//! fails. PRAGMA statements and `last_insert_rowid()` are raw SQL because
//! Diesel has no DSL for them.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::error::PersistenceError;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Journaling choice for a new connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Journal {
    /// SQLite's default rollback journal. Used for in-memory databases,
    /// where WAL has no effect.
    Rollback,
    /// Write-ahead logging, for file-based databases that serve
    /// concurrent readers.
    WriteAhead,
}

/// Opens a connection, applies PRAGMAs, migrates, and confirms foreign
/// key enforcement took hold.
///
/// # Errors
///
/// Returns an error if the connection cannot be established, a migration
/// fails, or the `foreign_keys` PRAGMA did not stick.
pub fn open(database_url: &str, journal: Journal) -> Result<SqliteConnection, PersistenceError> {
    info!(database_url, "Opening SQLite database");

    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

    if journal == Journal::WriteAhead {
        diesel::sql_query("PRAGMA journal_mode = WAL")
            .execute(&mut conn)
            .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
    }

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;
    debug!(migrations = applied.len(), "Schema migrations applied");

    assert_foreign_keys_enforced(&mut conn)?;

    Ok(conn)
}

/// Returns the row id of the most recent insert on this connection.
///
/// `SQLite` does not support `RETURNING` in every insert shape, so inserts
/// read the id back through `last_insert_rowid()`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

#[derive(QueryableByName)]
struct ForeignKeyState {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

/// Reads the `foreign_keys` PRAGMA back; a build of `SQLite` compiled
/// without foreign key support silently ignores the PRAGMA, which would
/// let orphaned logs and reports through.
fn assert_foreign_keys_enforced(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let state: ForeignKeyState = diesel::sql_query("PRAGMA foreign_keys").get_result(conn)?;
    if state.foreign_keys == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }
    Ok(())
}
