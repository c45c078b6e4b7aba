// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Report listing and export (CSV and PDF). ADMIN and SUPERVISOR only;
//! supervisors see their own team's reports.

use std::str::FromStr;

use tracing::{debug, info};

use fieldops_domain::{Claims, Role, VisitScope, VisitStatus};
use fieldops_persistence::{Persistence, ReportData, VisitFilters};

use crate::access::{authorize, sanitize_filters, scope_for};
use crate::error::{ApiError, translate_domain_error};
use crate::{pdf, visits};

/// Lists reports visible to the caller, newest first.
///
/// # Errors
///
/// Returns an error if the caller may not read reports, a filter is
/// invalid, or the query fails.
pub fn list_reports(
    persistence: &mut Persistence,
    claims: &Claims,
    filters: &VisitFilters,
) -> Result<Vec<ReportData>, ApiError> {
    authorize(claims, "list_reports", &[Role::Admin, Role::Supervisor])?;
    let scope: VisitScope = scope_for(claims);
    let filters: VisitFilters = sanitize_filters(claims, filters);
    if let Some(status) = &filters.status {
        VisitStatus::from_str(status).map_err(translate_domain_error)?;
    }
    Ok(persistence.list_reports(scope, &filters)?)
}

/// Exports the caller's visible reports as CSV.
///
/// The column order is fixed: `report_id`, `visit_id`, `client_name`,
/// `technician_name`, `supervisor_name`, `status`, `planned_at`,
/// `minutes_spent`, `summary`, `created_at`.
///
/// # Errors
///
/// Returns [`ApiError::EmptyExport`] when no rows match, so the caller
/// never receives a header-only file.
pub fn export_reports_csv(
    persistence: &mut Persistence,
    claims: &Claims,
    filters: &VisitFilters,
) -> Result<Vec<u8>, ApiError> {
    let reports: Vec<ReportData> = list_reports(persistence, claims, filters)?;
    if reports.is_empty() {
        debug!("CSV export requested with no matching reports");
        return Err(ApiError::EmptyExport);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    for report in &reports {
        writer.serialize(report).map_err(|e| ApiError::Internal {
            message: format!("Failed to serialize report row: {e}"),
        })?;
    }

    let bytes: Vec<u8> = writer.into_inner().map_err(|e| ApiError::Internal {
        message: format!("Failed to flush CSV export: {e}"),
    })?;

    info!(rows = reports.len(), "Exported reports as CSV");
    Ok(bytes)
}

/// Renders the report for one visit as a single-page PDF.
///
/// # Errors
///
/// Returns an error if the caller may not read reports, or
/// `ResourceNotFound` if the visit is missing, out of the caller's scope,
/// or has no report yet.
pub fn render_report_pdf(
    persistence: &mut Persistence,
    claims: &Claims,
    visit_id: i64,
) -> Result<Vec<u8>, ApiError> {
    authorize(claims, "render_report_pdf", &[Role::Admin, Role::Supervisor])?;
    // Scope check first so an out-of-scope report is indistinguishable
    // from a missing one.
    visits::get_visit(persistence, claims, visit_id)?;

    let report: ReportData = persistence
        .get_report_by_visit(visit_id)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Report"),
            message: format!("Visit {visit_id} has no report yet"),
        })?;

    info!(visit_id, "Rendered report as PDF");
    Ok(pdf::render_report(&report))
}
