// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Visit scheduling and the check-in/check-out lifecycle.

use std::str::FromStr;

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tracing::info;

use fieldops_domain::{
    Claims, Role, VisitScope, VisitStatus, parse_timestamp, validate_coordinates,
    validate_report_fields,
};
use fieldops_persistence::{
    Persistence, UserData, VisitData, VisitFilters, VisitLogData,
};

use crate::access::{authorize, sanitize_filters, scope_for};
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{CheckInRequest, CheckOutRequest, CreateVisitRequest};

/// Stored `planned_at` rendering: second-precision UTC, so lexicographic
/// order equals instant order and the first ten characters are the day.
const PLANNED_AT_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

/// Schedules a visit in the `PENDING` state.
///
/// SUPERVISOR callers always schedule for their own team; ADMIN callers
/// must name the responsible supervisor explicitly.
///
/// # Errors
///
/// Returns an error if the caller may not schedule visits, a referenced
/// row is missing or has the wrong role, or `planned_at` does not parse.
pub fn create_visit(
    persistence: &mut Persistence,
    claims: &Claims,
    request: &CreateVisitRequest,
) -> Result<VisitData, ApiError> {
    authorize(claims, "create_visit", &[Role::Admin, Role::Supervisor])?;
    let planned: OffsetDateTime =
        parse_timestamp(&request.planned_at).map_err(translate_domain_error)?;
    let planned_at: String = canonical_planned_at(planned)?;

    let supervisor_id: i64 = match claims.role {
        Role::Supervisor => claims.id,
        _ => request
            .supervisor_id
            .ok_or_else(|| ApiError::InvalidInput {
                field: String::from("supervisor_id"),
                message: String::from("supervisor_id is required when scheduling as ADMIN"),
            })?,
    };

    persistence
        .get_client_by_id(request.client_id)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Client"),
            message: format!("Client {} does not exist", request.client_id),
        })?;

    let technician: UserData = persistence
        .get_user_by_id(request.technician_id)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("User {} does not exist", request.technician_id),
        })?;
    if technician.role != Role::Technician.as_str() {
        return Err(ApiError::InvalidInput {
            field: String::from("technician_id"),
            message: format!("User {} is not a technician", request.technician_id),
        });
    }
    if !technician.is_active {
        return Err(ApiError::InvalidInput {
            field: String::from("technician_id"),
            message: format!("Technician {} is deactivated", request.technician_id),
        });
    }
    if claims.role == Role::Supervisor && technician.supervisor_id != Some(claims.id) {
        return Err(ApiError::InvalidInput {
            field: String::from("technician_id"),
            message: format!(
                "Technician {} does not report to you",
                request.technician_id
            ),
        });
    }

    let supervisor: UserData = persistence
        .get_user_by_id(supervisor_id)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("User {supervisor_id} does not exist"),
        })?;
    if supervisor.role != Role::Supervisor.as_str() {
        return Err(ApiError::InvalidInput {
            field: String::from("supervisor_id"),
            message: format!("User {supervisor_id} is not a supervisor"),
        });
    }

    let visit_id: i64 = persistence.create_visit(
        request.client_id,
        request.technician_id,
        supervisor_id,
        &planned_at,
    )?;

    let visit: VisitData = fetch_created(persistence, visit_id)?;
    info!(
        visit_id,
        technician_id = request.technician_id,
        supervisor_id,
        "Visit scheduled"
    );
    Ok(visit)
}

/// Lists visits visible to the caller, newest planned first.
///
/// # Errors
///
/// Returns an error if a filter is invalid or the query fails.
pub fn list_visits(
    persistence: &mut Persistence,
    claims: &Claims,
    filters: &VisitFilters,
) -> Result<Vec<VisitData>, ApiError> {
    let scope: VisitScope = scope_for(claims);
    let filters: VisitFilters = sanitize_filters(claims, filters);
    if let Some(status) = &filters.status {
        VisitStatus::from_str(status).map_err(translate_domain_error)?;
    }
    Ok(persistence.list_visits(scope, &filters)?)
}

/// Retrieves a single visit the caller may see.
///
/// # Errors
///
/// Returns `ResourceNotFound` for nonexistent and out-of-scope visits
/// alike.
pub fn get_visit(
    persistence: &mut Persistence,
    claims: &Claims,
    visit_id: i64,
) -> Result<VisitData, ApiError> {
    let visit: VisitData = persistence
        .get_visit(visit_id)?
        .ok_or_else(|| visit_not_found(visit_id))?;

    let visible: bool = match scope_for(claims) {
        VisitScope::All => true,
        VisitScope::Supervisor(id) => visit.supervisor_id == id,
        VisitScope::Technician(id) => visit.technician_id == id,
    };
    if !visible {
        return Err(visit_not_found(visit_id));
    }
    Ok(visit)
}

/// Lists the check-in/check-out log for a visit the caller may see.
///
/// # Errors
///
/// Returns `ResourceNotFound` for nonexistent and out-of-scope visits
/// alike.
pub fn get_visit_logs(
    persistence: &mut Persistence,
    claims: &Claims,
    visit_id: i64,
) -> Result<Vec<VisitLogData>, ApiError> {
    get_visit(persistence, claims, visit_id)?;
    Ok(persistence.list_visit_logs(visit_id)?)
}

/// Checks the calling technician in to a visit.
///
/// The transition `PENDING` → `IN_PROGRESS` and the geolocated log row are
/// written in one transaction; on failure nothing is written.
///
/// # Errors
///
/// Returns an error if the caller is not a TECHNICIAN, the coordinates are
/// invalid, or the visit is missing, assigned elsewhere, or not `PENDING`.
pub fn check_in(
    persistence: &mut Persistence,
    claims: &Claims,
    visit_id: i64,
    request: &CheckInRequest,
) -> Result<VisitData, ApiError> {
    authorize(claims, "check_in", &[Role::Technician])?;
    validate_coordinates(request.lat, request.lng).map_err(translate_domain_error)?;

    persistence.check_in(visit_id, claims.id, request.lat, request.lng)?;

    let visit: VisitData = fetch_created(persistence, visit_id)?;
    info!(visit_id, technician_id = claims.id, "Checked in");
    Ok(visit)
}

/// Checks the calling technician out of a visit.
///
/// The transition `IN_PROGRESS` → `FINISHED`, the geolocated log row, and
/// the visit report are written in one transaction; on failure nothing is
/// written.
///
/// # Errors
///
/// Returns an error if the caller is not a TECHNICIAN, a report field or
/// coordinate is invalid, or the visit is missing, assigned elsewhere, or
/// not `IN_PROGRESS`.
pub fn check_out(
    persistence: &mut Persistence,
    claims: &Claims,
    visit_id: i64,
    request: &CheckOutRequest,
) -> Result<VisitData, ApiError> {
    authorize(claims, "check_out", &[Role::Technician])?;
    validate_coordinates(request.lat, request.lng).map_err(translate_domain_error)?;
    validate_report_fields(&request.summary, request.minutes_spent)
        .map_err(translate_domain_error)?;

    persistence.check_out(
        visit_id,
        claims.id,
        request.lat,
        request.lng,
        &request.summary,
        request.minutes_spent,
    )?;

    let visit: VisitData = fetch_created(persistence, visit_id)?;
    info!(visit_id, technician_id = claims.id, "Checked out");
    Ok(visit)
}

/// Normalizes a parsed timestamp to the stored UTC rendering.
fn canonical_planned_at(value: OffsetDateTime) -> Result<String, ApiError> {
    value
        .to_offset(UtcOffset::UTC)
        .format(PLANNED_AT_FORMAT)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to format planned_at: {e}"),
        })
}

fn visit_not_found(visit_id: i64) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from("Visit"),
        message: format!("Visit {visit_id} does not exist"),
    }
}

/// Re-reads a visit that a mutation just touched.
fn fetch_created(
    persistence: &mut Persistence,
    visit_id: i64,
) -> Result<VisitData, ApiError> {
    persistence
        .get_visit(visit_id)?
        .ok_or_else(|| ApiError::Internal {
            message: format!("Visit {visit_id} missing immediately after write"),
        })
}
