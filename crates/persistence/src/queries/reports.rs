// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Scoped visit-report joins.
//!
//! Reports are always returned with their visit context (client, technician,
//! and supervisor names plus visit status and schedule), matching the field
//! set the CSV export and PDF renderer consume.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fieldops_domain::VisitScope;
use tracing::debug;

use crate::data_models::{ReportData, VisitFilters};
use crate::diesel_schema::{clients, users, visit_reports, visits};
use crate::error::PersistenceError;
use crate::queries::visits::day_after;

/// Row tuple for the report join.
type ReportJoinRow = (
    i64,
    i64,
    String,
    String,
    String,
    String,
    String,
    i32,
    String,
    String,
);

fn report_from_row(row: ReportJoinRow) -> ReportData {
    ReportData {
        report_id: row.0,
        visit_id: row.1,
        client_name: row.2,
        technician_name: row.3,
        supervisor_name: row.4,
        status: row.5,
        planned_at: row.6,
        minutes_spent: row.7,
        summary: row.8,
        created_at: row.9,
    }
}

/// Lists reports visible to the given scope, ordered by report creation
/// time descending.
///
/// Date-range filters apply to the DATE portion of the visit's `planned_at`,
/// matching the visit listing's filter vocabulary.
///
/// # Errors
///
/// Returns an error if the database query fails or a date filter is invalid.
pub fn list_reports(
    conn: &mut SqliteConnection,
    scope: VisitScope,
    filters: &VisitFilters,
) -> Result<Vec<ReportData>, PersistenceError> {
    debug!("Listing reports for scope {:?}", scope);

    let (technician_users, supervisor_users) =
        diesel::alias!(users as technician_users, users as supervisor_users);

    let mut query = visit_reports::table
        .inner_join(visits::table.inner_join(clients::table))
        .inner_join(
            technician_users
                .on(visits::technician_id.eq(technician_users.field(users::user_id))),
        )
        .inner_join(
            supervisor_users
                .on(visits::supervisor_id.eq(supervisor_users.field(users::user_id))),
        )
        .select((
            visit_reports::visit_report_id,
            visit_reports::visit_id,
            clients::name,
            technician_users.field(users::name),
            supervisor_users.field(users::name),
            visits::status,
            visits::planned_at,
            visit_reports::minutes_spent,
            visit_reports::summary,
            visit_reports::created_at,
        ))
        .order_by(visit_reports::created_at.desc())
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

    let rows: Vec<ReportJoinRow> = query.load(conn)?;

    Ok(rows.into_iter().map(report_from_row).collect())
}

/// Retrieves the report for a single visit.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the visit has no report.
pub fn get_report_by_visit(
    conn: &mut SqliteConnection,
    visit_id: i64,
) -> Result<Option<ReportData>, PersistenceError> {
    debug!("Looking up report for visit ID: {}", visit_id);

    let (technician_users, supervisor_users) =
        diesel::alias!(users as technician_users, users as supervisor_users);

    let result: Result<ReportJoinRow, diesel::result::Error> = visit_reports::table
        .inner_join(visits::table.inner_join(clients::table))
        .inner_join(
            technician_users
                .on(visits::technician_id.eq(technician_users.field(users::user_id))),
        )
        .inner_join(
            supervisor_users
                .on(visits::supervisor_id.eq(supervisor_users.field(users::user_id))),
        )
        .filter(visit_reports::visit_id.eq(visit_id))
        .select((
            visit_reports::visit_report_id,
            visit_reports::visit_id,
            clients::name,
            technician_users.field(users::name),
            supervisor_users.field(users::name),
            visits::status,
            visits::planned_at,
            visit_reports::minutes_spent,
            visit_reports::summary,
            visit_reports::created_at,
        ))
        .first(conn);

    match result {
        Ok(row) => Ok(Some(report_from_row(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
