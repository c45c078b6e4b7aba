// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Scoped visit listings and lookups.
//!
//! Every listing takes a [`VisitScope`] and applies it before any explicit
//! filter, so a caller can never widen their visibility through the filter
//! vocabulary.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fieldops_domain::VisitScope;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use tracing::debug;

use crate::data_models::{VisitData, VisitFilters, VisitLogData};
use crate::diesel_schema::{clients, users, visit_logs, visits};
use crate::error::PersistenceError;

/// Date-only format for filter bounds (YYYY-MM-DD).
const DAY_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Row tuple for the denormalized visit join.
type VisitJoinRow = (
    i64,
    i64,
    String,
    i64,
    String,
    i64,
    String,
    String,
    String,
    String,
    String,
);

fn visit_from_row(row: VisitJoinRow) -> VisitData {
    VisitData {
        visit_id: row.0,
        client_id: row.1,
        client_name: row.2,
        technician_id: row.3,
        technician_name: row.4,
        supervisor_id: row.5,
        supervisor_name: row.6,
        planned_at: row.7,
        status: row.8,
        created_at: row.9,
        updated_at: row.10,
    }
}

/// Computes the exclusive upper bound for a date filter.
///
/// Timestamps are stored as ISO 8601 text, so `planned_at` values for a day
/// sort between the day string itself and the next day string. An inclusive
/// `end_date` therefore becomes `planned_at < day_after(end_date)`.
///
/// # Errors
///
/// Returns an error if the date string does not parse as YYYY-MM-DD.
pub(crate) fn day_after(date: &str) -> Result<String, PersistenceError> {
    let parsed: time::Date = time::Date::parse(date, DAY_FORMAT).map_err(|e| {
        PersistenceError::QueryFailed(format!("Invalid date filter '{date}': {e}"))
    })?;
    let next: time::Date = parsed.next_day().ok_or_else(|| {
        PersistenceError::QueryFailed(format!("Date filter out of range: {date}"))
    })?;
    next.format(DAY_FORMAT)
        .map_err(|e| PersistenceError::QueryFailed(format!("Failed to format date bound: {e}")))
}

/// Lists visits visible to the given scope, denormalized with client,
/// technician, and supervisor names, ordered by `planned_at` descending.
///
/// Explicit filters compose conjunctively with the scope.
///
/// # Errors
///
/// Returns an error if the database query fails or a date filter is invalid.
pub fn list_visits(
    conn: &mut SqliteConnection,
    scope: VisitScope,
    filters: &VisitFilters,
) -> Result<Vec<VisitData>, PersistenceError> {
    debug!("Listing visits for scope {:?}", scope);

    let (technician_users, supervisor_users) =
        diesel::alias!(users as technician_users, users as supervisor_users);

    let mut query = visits::table
        .inner_join(clients::table)
        .inner_join(
            technician_users
                .on(visits::technician_id.eq(technician_users.field(users::user_id))),
        )
        .inner_join(
            supervisor_users
                .on(visits::supervisor_id.eq(supervisor_users.field(users::user_id))),
        )
        .select((
            visits::visit_id,
            visits::client_id,
            clients::name,
            visits::technician_id,
            technician_users.field(users::name),
            visits::supervisor_id,
            supervisor_users.field(users::name),
            visits::planned_at,
            visits::status,
            visits::created_at,
            visits::updated_at,
        ))
        .order_by(visits::planned_at.desc())
        .into_boxed();

    match scope {
        VisitScope::All => {}
        VisitScope::Supervisor(id) => query = query.filter(visits::supervisor_id.eq(id)),
        VisitScope::Technician(id) => query = query.filter(visits::technician_id.eq(id)),
    }

    if let Some(status) = &filters.status {
        query = query.filter(visits::status.eq(status.clone()));
    }
    if let Some(technician_id) = filters.technician_id {
        query = query.filter(visits::technician_id.eq(technician_id));
    }
    if let Some(supervisor_id) = filters.supervisor_id {
        query = query.filter(visits::supervisor_id.eq(supervisor_id));
    }
    if let Some(start_date) = &filters.start_date {
        query = query.filter(visits::planned_at.ge(start_date.clone()));
    }
    if let Some(end_date) = &filters.end_date {
        query = query.filter(visits::planned_at.lt(day_after(end_date)?));
    }

    let rows: Vec<VisitJoinRow> = query.load(conn)?;

    Ok(rows.into_iter().map(visit_from_row).collect())
}

/// Retrieves a single visit by ID with its denormalized names.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the visit is not found.
pub fn get_visit(
    conn: &mut SqliteConnection,
    visit_id: i64,
) -> Result<Option<VisitData>, PersistenceError> {
    debug!("Looking up visit by ID: {}", visit_id);

    let (technician_users, supervisor_users) =
        diesel::alias!(users as technician_users, users as supervisor_users);

    let result: Result<VisitJoinRow, diesel::result::Error> = visits::table
        .inner_join(clients::table)
        .inner_join(
            technician_users
                .on(visits::technician_id.eq(technician_users.field(users::user_id))),
        )
        .inner_join(
            supervisor_users
                .on(visits::supervisor_id.eq(supervisor_users.field(users::user_id))),
        )
        .filter(visits::visit_id.eq(visit_id))
        .select((
            visits::visit_id,
            visits::client_id,
            clients::name,
            visits::technician_id,
            technician_users.field(users::name),
            visits::supervisor_id,
            supervisor_users.field(users::name),
            visits::planned_at,
            visits::status,
            visits::created_at,
            visits::updated_at,
        ))
        .first(conn);

    match result {
        Ok(row) => Ok(Some(visit_from_row(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists the log rows for a visit in the order they were recorded.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_visit_logs(
    conn: &mut SqliteConnection,
    visit_id: i64,
) -> Result<Vec<VisitLogData>, PersistenceError> {
    debug!("Listing logs for visit ID: {}", visit_id);

    let rows: Vec<(i64, i64, String, f64, f64, String)> = visit_logs::table
        .filter(visit_logs::visit_id.eq(visit_id))
        .select((
            visit_logs::visit_log_id,
            visit_logs::visit_id,
            visit_logs::event_type,
            visit_logs::lat,
            visit_logs::lng,
            visit_logs::logged_at,
        ))
        .order_by(visit_logs::visit_log_id.asc())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|row| VisitLogData {
            visit_log_id: row.0,
            visit_id: row.1,
            event_type: row.2,
            lat: row.3,
            lng: row.4,
            logged_at: row.5,
        })
        .collect())
}
