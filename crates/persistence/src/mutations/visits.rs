// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Visit creation and the transactional check-in/check-out.
//!
//! Check-in and check-out are each one database transaction built around a
//! guarded status update. The guard predicate names the visit, the acting
//! technician, and the required current status; when it matches zero rows
//! the transaction returns [`PersistenceError::VisitNotOwned`] and rolls
//! back, so a status change, its log row, and (for check-out) the report
//! row always land together or not at all.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::{debug, info};

use crate::sqlite::last_insert_rowid;
use crate::diesel_schema::{visit_logs, visit_reports, visits};
use crate::error::PersistenceError;

/// Creates a visit in the `PENDING` state.
///
/// Referential validity of `client_id`, `technician_id`, and
/// `supervisor_id` is the caller's responsibility; foreign keys are the
/// backstop.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_visit(
    conn: &mut SqliteConnection,
    client_id: i64,
    technician_id: i64,
    supervisor_id: i64,
    planned_at: &str,
) -> Result<i64, PersistenceError> {
    info!(
        client_id,
        technician_id, supervisor_id, "Creating visit planned at {}", planned_at
    );

    diesel::insert_into(visits::table)
        .values((
            visits::client_id.eq(client_id),
            visits::technician_id.eq(technician_id),
            visits::supervisor_id.eq(supervisor_id),
            visits::planned_at.eq(planned_at),
        ))
        .execute(conn)?;

    let visit_id: i64 = last_insert_rowid(conn)?;

    info!(visit_id, "Visit created successfully");

    Ok(visit_id)
}

/// Checks a technician in to a visit.
///
/// One transaction: a guarded update moves the visit from `PENDING` to
/// `IN_PROGRESS`, then a `CHECKIN` log row records the coordinates.
///
/// # Errors
///
/// Returns [`PersistenceError::VisitNotOwned`] when the visit does not
/// exist, is assigned to a different technician, or is not `PENDING`; the
/// transaction rolls back and nothing is written.
pub fn check_in(
    conn: &mut SqliteConnection,
    visit_id: i64,
    technician_id: i64,
    lat: f64,
    lng: f64,
) -> Result<(), PersistenceError> {
    debug!(visit_id, technician_id, "Check-in requested");

    conn.transaction::<_, PersistenceError, _>(|conn| {
        let rows_affected: usize = diesel::update(visits::table)
            .filter(visits::visit_id.eq(visit_id))
            .filter(visits::technician_id.eq(technician_id))
            .filter(visits::status.eq("PENDING"))
            .set((
                visits::status.eq("IN_PROGRESS"),
                visits::updated_at
                    .eq(diesel::dsl::sql::<diesel::sql_types::Text>("CURRENT_TIMESTAMP")),
            ))
            .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::VisitNotOwned {
                visit_id,
                technician_id,
            });
        }

        diesel::insert_into(visit_logs::table)
            .values((
                visit_logs::visit_id.eq(visit_id),
                visit_logs::event_type.eq("CHECKIN"),
                visit_logs::lat.eq(lat),
                visit_logs::lng.eq(lng),
            ))
            .execute(conn)?;

        info!(visit_id, technician_id, "Check-in recorded");
        Ok(())
    })
}

/// Checks a technician out of a visit.
///
/// One transaction: a guarded update moves the visit from `IN_PROGRESS` to
/// `FINISHED`, a `CHECKOUT` log row records the coordinates, and the visit
/// report is written. The `IN_PROGRESS` guard makes a repeat check-out a
/// zero-row update, so the report can never be duplicated or overwritten.
///
/// # Errors
///
/// Returns [`PersistenceError::VisitNotOwned`] when the visit does not
/// exist, is assigned to a different technician, or is not `IN_PROGRESS`;
/// the transaction rolls back and nothing is written.
pub fn check_out(
    conn: &mut SqliteConnection,
    visit_id: i64,
    technician_id: i64,
    lat: f64,
    lng: f64,
    summary: &str,
    minutes_spent: i32,
) -> Result<(), PersistenceError> {
    debug!(visit_id, technician_id, "Check-out requested");

    conn.transaction::<_, PersistenceError, _>(|conn| {
        let rows_affected: usize = diesel::update(visits::table)
            .filter(visits::visit_id.eq(visit_id))
            .filter(visits::technician_id.eq(technician_id))
            .filter(visits::status.eq("IN_PROGRESS"))
            .set((
                visits::status.eq("FINISHED"),
                visits::updated_at
                    .eq(diesel::dsl::sql::<diesel::sql_types::Text>("CURRENT_TIMESTAMP")),
            ))
            .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::VisitNotOwned {
                visit_id,
                technician_id,
            });
        }

        diesel::insert_into(visit_logs::table)
            .values((
                visit_logs::visit_id.eq(visit_id),
                visit_logs::event_type.eq("CHECKOUT"),
                visit_logs::lat.eq(lat),
                visit_logs::lng.eq(lng),
            ))
            .execute(conn)?;

        diesel::insert_into(visit_reports::table)
            .values((
                visit_reports::visit_id.eq(visit_id),
                visit_reports::summary.eq(summary),
                visit_reports::minutes_spent.eq(minutes_spent),
            ))
            .execute(conn)?;

        info!(visit_id, technician_id, "Check-out recorded");
        Ok(())
    })
}
