// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the FieldOps service backend.
//!
//! This crate provides database persistence for user accounts, clients,
//! visits and their lifecycle, visit reports, and sessions. It is built on
//! Diesel over `SQLite`.
//!
//! ## Backend
//!
//! `SQLite` is the only backend:
//! - All standard development workflows
//! - Unit and integration tests (fast, deterministic, in-memory)
//! - File-based single-node deployments (WAL mode)
//!
//! ## Scoping
//!
//! Every visit-shaped read (visit listings, report joins, dashboard
//! aggregates) takes a [`VisitScope`] and applies it as the outermost row
//! predicate, so role visibility is enforced in exactly one way everywhere.
//!
//! ## Testing Philosophy
//!
//! - Standard tests (`cargo test`) run against in-memory `SQLite`
//! - Each in-memory database gets a unique name via an atomic counter,
//!   eliminating cross-test collisions
//!
//! [`VisitScope`]: fieldops_domain::VisitScope

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use fieldops_domain::VisitScope;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod sqlite;

#[cfg(test)]
mod tests;

pub use data_models::{
    ClientData, CompletedByName, NextVisitData, ReportData, SessionData, StatusCounts,
    UserData, VisitData, VisitFilters, VisitLogData,
};
pub use error::PersistenceError;
pub use mutations::clients::ClientFields;

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based
/// collisions. Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over a single `SQLite` connection.
///
/// All reads and writes go through this adapter; callers never see Diesel
/// types or schema details.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        // Unique shared in-memory database name per call so tests are isolated.
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_test_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let conn: SqliteConnection =
            sqlite::open(&shared_memory_url, sqlite::Journal::Rollback)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// Opens in WAL mode for better read concurrency.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let conn: SqliteConnection = sqlite::open(path_str, sqlite::Journal::WriteAhead)?;

        Ok(Self { conn })
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Creates a new user account with a bcrypt-hashed password.
    ///
    /// # Errors
    ///
    /// Returns an error if the user cannot be created or the email is taken.
    pub fn create_user(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
        supervisor_id: Option<i64>,
    ) -> Result<i64, PersistenceError> {
        mutations::users::create_user(&mut self.conn, name, email, password, role, supervisor_id)
    }

    /// Retrieves a user by email address.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_email(
        &mut self,
        email: &str,
    ) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_email(&mut self.conn, email)
    }

    /// Retrieves a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_id(&mut self, user_id: i64) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_id(&mut self.conn, user_id)
    }

    /// Lists all users ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_users(&mut self) -> Result<Vec<UserData>, PersistenceError> {
        queries::users::list_users(&mut self.conn)
    }

    /// Lists the active technicians reporting to a supervisor.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_team_technicians(
        &mut self,
        supervisor_id: i64,
    ) -> Result<Vec<UserData>, PersistenceError> {
        queries::users::list_team_technicians(&mut self.conn, supervisor_id)
    }

    /// Updates a user account's mutable fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user doesn't exist, or an error if the
    /// update fails.
    pub fn update_user(
        &mut self,
        user_id: i64,
        name: &str,
        email: &str,
        role: &str,
        supervisor_id: Option<i64>,
        is_active: bool,
    ) -> Result<(), PersistenceError> {
        mutations::users::update_user(
            &mut self.conn,
            user_id,
            name,
            email,
            role,
            supervisor_id,
            is_active,
        )
    }

    /// Updates a user's password.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user doesn't exist, or an error if the
    /// update fails.
    pub fn update_password(
        &mut self,
        user_id: i64,
        new_password: &str,
    ) -> Result<(), PersistenceError> {
        mutations::users::update_password(&mut self.conn, user_id, new_password)
    }

    /// Deletes a user account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user doesn't exist, or an error if the
    /// delete fails (including foreign key restriction from visits).
    pub fn delete_user(&mut self, user_id: i64) -> Result<(), PersistenceError> {
        mutations::users::delete_user(&mut self.conn, user_id)
    }

    /// Verifies a password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if password verification fails.
    pub fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, PersistenceError> {
        queries::users::verify_password(password, password_hash)
    }

    // ========================================================================
    // Clients
    // ========================================================================

    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn create_client(&mut self, fields: &ClientFields) -> Result<i64, PersistenceError> {
        mutations::clients::create_client(&mut self.conn, fields)
    }

    /// Retrieves a client by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_client_by_id(
        &mut self,
        client_id: i64,
    ) -> Result<Option<ClientData>, PersistenceError> {
        queries::clients::get_client_by_id(&mut self.conn, client_id)
    }

    /// Lists all clients ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_clients(&mut self) -> Result<Vec<ClientData>, PersistenceError> {
        queries::clients::list_clients(&mut self.conn)
    }

    /// Updates a client.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the client doesn't exist, or an error if the
    /// update fails.
    pub fn update_client(
        &mut self,
        client_id: i64,
        fields: &ClientFields,
    ) -> Result<(), PersistenceError> {
        mutations::clients::update_client(&mut self.conn, client_id, fields)
    }

    /// Deletes a client.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the client doesn't exist, or an error if the
    /// delete fails (including foreign key restriction from visits).
    pub fn delete_client(&mut self, client_id: i64) -> Result<(), PersistenceError> {
        mutations::clients::delete_client(&mut self.conn, client_id)
    }

    // ========================================================================
    // Visits
    // ========================================================================

    /// Creates a visit in the `PENDING` state.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_visit(
        &mut self,
        client_id: i64,
        technician_id: i64,
        supervisor_id: i64,
        planned_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::visits::create_visit(
            &mut self.conn,
            client_id,
            technician_id,
            supervisor_id,
            planned_at,
        )
    }

    /// Retrieves a single visit by ID with denormalized names.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_visit(&mut self, visit_id: i64) -> Result<Option<VisitData>, PersistenceError> {
        queries::visits::get_visit(&mut self.conn, visit_id)
    }

    /// Lists visits visible to the given scope, newest planned first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or a filter is invalid.
    pub fn list_visits(
        &mut self,
        scope: VisitScope,
        filters: &VisitFilters,
    ) -> Result<Vec<VisitData>, PersistenceError> {
        queries::visits::list_visits(&mut self.conn, scope, filters)
    }

    /// Lists the log rows for a visit in recording order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_visit_logs(
        &mut self,
        visit_id: i64,
    ) -> Result<Vec<VisitLogData>, PersistenceError> {
        queries::visits::list_visit_logs(&mut self.conn, visit_id)
    }

    /// Checks a technician in to a visit (transactional).
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::VisitNotOwned`] if the guarded update
    /// matches zero rows; the transaction rolls back and nothing is written.
    pub fn check_in(
        &mut self,
        visit_id: i64,
        technician_id: i64,
        lat: f64,
        lng: f64,
    ) -> Result<(), PersistenceError> {
        mutations::visits::check_in(&mut self.conn, visit_id, technician_id, lat, lng)
    }

    /// Checks a technician out of a visit (transactional).
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::VisitNotOwned`] if the guarded update
    /// matches zero rows; the transaction rolls back and nothing is written.
    pub fn check_out(
        &mut self,
        visit_id: i64,
        technician_id: i64,
        lat: f64,
        lng: f64,
        summary: &str,
        minutes_spent: i32,
    ) -> Result<(), PersistenceError> {
        mutations::visits::check_out(
            &mut self.conn,
            visit_id,
            technician_id,
            lat,
            lng,
            summary,
            minutes_spent,
        )
    }

    // ========================================================================
    // Reports
    // ========================================================================

    /// Lists reports visible to the given scope, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or a filter is invalid.
    pub fn list_reports(
        &mut self,
        scope: VisitScope,
        filters: &VisitFilters,
    ) -> Result<Vec<ReportData>, PersistenceError> {
        queries::reports::list_reports(&mut self.conn, scope, filters)
    }

    /// Retrieves the report for a single visit.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_report_by_visit(
        &mut self,
        visit_id: i64,
    ) -> Result<Option<ReportData>, PersistenceError> {
        queries::reports::get_report_by_visit(&mut self.conn, visit_id)
    }

    // ========================================================================
    // Dashboard aggregates
    // ========================================================================

    /// Counts active user accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_active_users(&mut self) -> Result<i64, PersistenceError> {
        queries::dashboard::count_active_users(&mut self.conn)
    }

    /// Counts all clients.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_clients(&mut self) -> Result<i64, PersistenceError> {
        queries::clients::count_clients(&mut self.conn)
    }

    /// Counts visits in a status within a scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_visits_with_status(
        &mut self,
        scope: VisitScope,
        status: &str,
    ) -> Result<i64, PersistenceError> {
        queries::dashboard::count_visits_with_status(&mut self.conn, scope, status)
    }

    /// Per-status visit counts within a scope, in lifecycle order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn status_histogram(
        &mut self,
        scope: VisitScope,
    ) -> Result<Vec<(String, i64)>, PersistenceError> {
        queries::dashboard::status_histogram(&mut self.conn, scope)
    }

    /// Per-status counts for visits planned on one day within a scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or the day is invalid.
    pub fn day_status_counts(
        &mut self,
        scope: VisitScope,
        day: &str,
    ) -> Result<StatusCounts, PersistenceError> {
        queries::dashboard::day_status_counts(&mut self.conn, scope, day)
    }

    /// Completed-visit counts grouped by supervisor name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn completed_by_supervisor(
        &mut self,
    ) -> Result<Vec<CompletedByName>, PersistenceError> {
        queries::dashboard::completed_by_supervisor(&mut self.conn)
    }

    /// Completed-visit counts for one team since a day, by technician name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn completed_by_technician_since(
        &mut self,
        supervisor_id: i64,
        since_day: &str,
    ) -> Result<Vec<CompletedByName>, PersistenceError> {
        queries::dashboard::completed_by_technician_since(&mut self.conn, supervisor_id, since_day)
    }

    /// The client each team technician is with for in-progress visits on a
    /// day, keyed by technician ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or the day is invalid.
    pub fn in_progress_clients_for_team(
        &mut self,
        supervisor_id: i64,
        day: &str,
    ) -> Result<Vec<(i64, String)>, PersistenceError> {
        queries::dashboard::in_progress_clients_for_team(&mut self.conn, supervisor_id, day)
    }

    /// The technician's earliest pending visit, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn next_pending_visit(
        &mut self,
        technician_id: i64,
    ) -> Result<Option<NextVisitData>, PersistenceError> {
        queries::dashboard::next_pending_visit(&mut self.conn, technician_id)
    }

    /// DATE portions of `planned_at` for finished visits in a half-open
    /// day range.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn completed_visit_dates(
        &mut self,
        technician_id: i64,
        from_day: &str,
        to_day_exclusive: &str,
    ) -> Result<Vec<String>, PersistenceError> {
        queries::dashboard::completed_visit_dates(
            &mut self.conn,
            technician_id,
            from_day,
            to_day_exclusive,
        )
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Creates a new session for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be created.
    pub fn create_session(
        &mut self,
        session_token: &str,
        user_id: i64,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::sessions::create_session(&mut self.conn, session_token, user_id, expires_at)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::sessions::get_session_by_token(&mut self.conn, session_token)
    }

    /// Deletes a session by token. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::sessions::delete_session(&mut self.conn, session_token)
    }

    /// Deletes all sessions expired at or before the given instant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_expired_sessions(&mut self, now: &str) -> Result<usize, PersistenceError> {
        mutations::sessions::delete_expired_sessions(&mut self.conn, now)
    }
}
