// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Plain data carriers returned by the persistence layer.
//!
//! These structs are deliberately decoupled from the Diesel row structs used
//! inside `queries/` and `mutations/` so that callers never depend on schema
//! details. Timestamps are ISO 8601 strings as stored.

use serde::{Deserialize, Serialize};

/// A user account row.
///
/// Carries the stored `password_hash`; the API layer is responsible for
/// never serializing it outward.
#[derive(Debug, Clone, PartialEq)]
pub struct UserData {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub supervisor_id: Option<i64>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// A client (service location) row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientData {
    pub client_id: i64,
    pub name: String,
    pub address: Option<String>,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

/// A visit row denormalized with the client, technician, and supervisor
/// display names callers always need alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitData {
    pub visit_id: i64,
    pub client_id: i64,
    pub client_name: String,
    pub technician_id: i64,
    pub technician_name: String,
    pub supervisor_id: i64,
    pub supervisor_name: String,
    pub planned_at: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// An append-only check-in/check-out log row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitLogData {
    pub visit_log_id: i64,
    pub visit_id: i64,
    pub event_type: String,
    pub lat: f64,
    pub lng: f64,
    pub logged_at: String,
}

/// A visit report joined with its visit context.
///
/// Field order here matches the CSV export column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    pub report_id: i64,
    pub visit_id: i64,
    pub client_name: String,
    pub technician_name: String,
    pub supervisor_name: String,
    pub status: String,
    pub planned_at: String,
    pub minutes_spent: i32,
    pub summary: String,
    pub created_at: String,
}

/// A session row.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: i64,
    pub created_at: String,
    pub expires_at: String,
}

/// Optional row filters for visit and report listings.
///
/// Filters compose conjunctively with the caller's [`VisitScope`]; the API
/// layer sanitizes them before they reach a query (non-ADMIN callers never
/// carry an explicit `supervisor_id` here).
///
/// [`VisitScope`]: fieldops_domain::VisitScope
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitFilters {
    /// Exact status match.
    pub status: Option<String>,
    /// Exact technician match.
    pub technician_id: Option<i64>,
    /// Exact supervisor match (ADMIN only).
    pub supervisor_id: Option<i64>,
    /// Inclusive lower bound on the DATE portion of `planned_at` (YYYY-MM-DD).
    pub start_date: Option<String>,
    /// Inclusive upper bound on the DATE portion of `planned_at` (YYYY-MM-DD).
    pub end_date: Option<String>,
}

/// Per-status visit counts for one day or one scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub finished: i64,
}

/// A `(name, completed_count)` pair for performance breakdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedByName {
    pub name: String,
    pub completed_count: i64,
}

/// The next scheduled visit shown on the technician dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextVisitData {
    pub visit_id: i64,
    pub client_name: String,
    pub address: Option<String>,
    pub planned_at: String,
}
