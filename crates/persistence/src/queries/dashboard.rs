// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Aggregate counts backing the role dashboards.
//!
//! Each function is one independent read; the dashboard aggregator composes
//! them per role. Row folding happens in Rust over scope-filtered loads so
//! every aggregate applies the same [`VisitScope`] predicate as the listing
//! queries.
//!
//! [`VisitScope`]: fieldops_domain::VisitScope

use std::collections::BTreeMap;

use diesel::SqliteConnection;
use diesel::dsl::count;
use diesel::prelude::*;
use fieldops_domain::VisitScope;
use tracing::debug;

use crate::data_models::{CompletedByName, NextVisitData, StatusCounts};
use crate::diesel_schema::{clients, users, visits};
use crate::error::PersistenceError;
use crate::queries::visits::day_after;

/// Counts active user accounts.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_active_users(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    let count: i64 = users::table
        .filter(users::is_active.eq(1))
        .select(count(users::user_id))
        .first(conn)?;

    Ok(count)
}

/// Counts visits in a status within a scope.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_visits_with_status(
    conn: &mut SqliteConnection,
    scope: VisitScope,
    status: &str,
) -> Result<i64, PersistenceError> {
    let count: i64 = match scope {
        VisitScope::All => visits::table
            .filter(visits::status.eq(status))
            .select(count(visits::visit_id))
            .first(conn)?,
        VisitScope::Supervisor(id) => visits::table
            .filter(visits::supervisor_id.eq(id))
            .filter(visits::status.eq(status))
            .select(count(visits::visit_id))
            .first(conn)?,
        VisitScope::Technician(id) => visits::table
            .filter(visits::technician_id.eq(id))
            .filter(visits::status.eq(status))
            .select(count(visits::visit_id))
            .first(conn)?,
    };

    Ok(count)
}

/// Per-status visit counts within a scope, in canonical status order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn status_histogram(
    conn: &mut SqliteConnection,
    scope: VisitScope,
) -> Result<Vec<(String, i64)>, PersistenceError> {
    debug!("Computing status histogram for scope {:?}", scope);

    let statuses: Vec<String> = match scope {
        VisitScope::All => visits::table.select(visits::status).load(conn)?,
        VisitScope::Supervisor(id) => visits::table
            .filter(visits::supervisor_id.eq(id))
            .select(visits::status)
            .load(conn)?,
        VisitScope::Technician(id) => visits::table
            .filter(visits::technician_id.eq(id))
            .select(visits::status)
            .load(conn)?,
    };

    let mut counts: BTreeMap<String, i64> = BTreeMap::new();
    for status in statuses {
        *counts.entry(status).or_insert(0) += 1;
    }

    // Canonical lifecycle order rather than alphabetical.
    let mut histogram: Vec<(String, i64)> = Vec::new();
    for status in ["PENDING", "IN_PROGRESS", "FINISHED"] {
        if let Some(n) = counts.remove(status) {
            histogram.push((status.to_string(), n));
        }
    }

    Ok(histogram)
}

/// Per-status counts for visits planned on one day within a scope.
///
/// # Errors
///
/// Returns an error if the database query fails or the day is invalid.
pub fn day_status_counts(
    conn: &mut SqliteConnection,
    scope: VisitScope,
    day: &str,
) -> Result<StatusCounts, PersistenceError> {
    let upper: String = day_after(day)?;

    let statuses: Vec<String> = match scope {
        VisitScope::All => visits::table
            .filter(visits::planned_at.ge(day.to_string()))
            .filter(visits::planned_at.lt(upper))
            .select(visits::status)
            .load(conn)?,
        VisitScope::Supervisor(id) => visits::table
            .filter(visits::supervisor_id.eq(id))
            .filter(visits::planned_at.ge(day.to_string()))
            .filter(visits::planned_at.lt(upper))
            .select(visits::status)
            .load(conn)?,
        VisitScope::Technician(id) => visits::table
            .filter(visits::technician_id.eq(id))
            .filter(visits::planned_at.ge(day.to_string()))
            .filter(visits::planned_at.lt(upper))
            .select(visits::status)
            .load(conn)?,
    };

    let mut counts = StatusCounts::default();
    for status in &statuses {
        counts.total += 1;
        match status.as_str() {
            "PENDING" => counts.pending += 1,
            "IN_PROGRESS" => counts.in_progress += 1,
            "FINISHED" => counts.finished += 1,
            _ => {}
        }
    }

    Ok(counts)
}

/// Completed-visit counts grouped by supervisor name, most productive first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn completed_by_supervisor(
    conn: &mut SqliteConnection,
) -> Result<Vec<CompletedByName>, PersistenceError> {
    let supervisor_users = diesel::alias!(users as supervisor_users);

    let names: Vec<String> = visits::table
        .inner_join(
            supervisor_users
                .on(visits::supervisor_id.eq(supervisor_users.field(users::user_id))),
        )
        .filter(visits::status.eq("FINISHED"))
        .select(supervisor_users.field(users::name))
        .load(conn)?;

    Ok(fold_completed(names))
}

/// Completed-visit counts for one supervisor's team since a given day,
/// grouped by technician name, most productive first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn completed_by_technician_since(
    conn: &mut SqliteConnection,
    supervisor_id: i64,
    since_day: &str,
) -> Result<Vec<CompletedByName>, PersistenceError> {
    let technician_users = diesel::alias!(users as technician_users);

    let names: Vec<String> = visits::table
        .inner_join(
            technician_users
                .on(visits::technician_id.eq(technician_users.field(users::user_id))),
        )
        .filter(visits::supervisor_id.eq(supervisor_id))
        .filter(visits::status.eq("FINISHED"))
        .filter(visits::planned_at.ge(since_day.to_string()))
        .select(technician_users.field(users::name))
        .load(conn)?;

    Ok(fold_completed(names))
}

fn fold_completed(names: Vec<String>) -> Vec<CompletedByName> {
    let mut counts: BTreeMap<String, i64> = BTreeMap::new();
    for name in names {
        *counts.entry(name).or_insert(0) += 1;
    }

    let mut result: Vec<CompletedByName> = counts
        .into_iter()
        .map(|(name, completed_count)| CompletedByName {
            name,
            completed_count,
        })
        .collect();
    result.sort_by(|a, b| b.completed_count.cmp(&a.completed_count));
    result
}

/// The client each of a supervisor's technicians is currently with, for
/// visits in progress on the given day. Keyed by technician ID.
///
/// # Errors
///
/// Returns an error if the database query fails or the day is invalid.
pub fn in_progress_clients_for_team(
    conn: &mut SqliteConnection,
    supervisor_id: i64,
    day: &str,
) -> Result<Vec<(i64, String)>, PersistenceError> {
    let upper: String = day_after(day)?;

    let rows: Vec<(i64, String)> = visits::table
        .inner_join(clients::table)
        .filter(visits::supervisor_id.eq(supervisor_id))
        .filter(visits::status.eq("IN_PROGRESS"))
        .filter(visits::planned_at.ge(day.to_string()))
        .filter(visits::planned_at.lt(upper))
        .select((visits::technician_id, clients::name))
        .load(conn)?;

    Ok(rows)
}

/// The technician's earliest pending visit, if any.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn next_pending_visit(
    conn: &mut SqliteConnection,
    technician_id: i64,
) -> Result<Option<NextVisitData>, PersistenceError> {
    let result: Result<(i64, String, Option<String>, String), diesel::result::Error> =
        visits::table
            .inner_join(clients::table)
            .filter(visits::technician_id.eq(technician_id))
            .filter(visits::status.eq("PENDING"))
            .select((
                visits::visit_id,
                clients::name,
                clients::address,
                visits::planned_at,
            ))
            .order_by(visits::planned_at.asc())
            .first(conn);

    match result {
        Ok((visit_id, client_name, address, planned_at)) => Ok(Some(NextVisitData {
            visit_id,
            client_name,
            address,
            planned_at,
        })),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// The DATE portions of `planned_at` for a technician's finished visits in
/// a half-open day range. The dashboard aggregator zero-fills these into a
/// daily series.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn completed_visit_dates(
    conn: &mut SqliteConnection,
    technician_id: i64,
    from_day: &str,
    to_day_exclusive: &str,
) -> Result<Vec<String>, PersistenceError> {
    let stamps: Vec<String> = visits::table
        .filter(visits::technician_id.eq(technician_id))
        .filter(visits::status.eq("FINISHED"))
        .filter(visits::planned_at.ge(from_day.to_string()))
        .filter(visits::planned_at.lt(to_day_exclusive.to_string()))
        .select(visits::planned_at)
        .load(conn)?;

    Ok(stamps
        .into_iter()
        .map(|stamp| stamp.chars().take(10).collect())
        .collect())
}
