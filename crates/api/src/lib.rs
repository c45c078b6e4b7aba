// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the FieldOps service backend.
//!
//! This crate sits between the HTTP server and the persistence layer. It
//! owns authentication, role-based authorization, field validation, and the
//! request/response shapes exposed outward. Every operation takes the
//! caller's [`Claims`] and enforces role visibility before touching the
//! store.
//!
//! [`Claims`]: fieldops_domain::Claims

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod access;
mod auth;
mod clients;
mod dashboard;
mod error;
mod pdf;
mod reports;
mod request_response;
mod users;
mod visits;

#[cfg(test)]
mod tests;

pub use access::{authorize, sanitize_filters, scope_for};
pub use auth::AuthenticationService;
pub use clients::{create_client, delete_client, get_client, list_clients, update_client};
pub use dashboard::{
    AdminCharts, AdminDashboard, ChartPoint, DashboardResponse, DayPoint, MyVisitCounts,
    NextVisit, StatusSlice, SupervisorCharts, SupervisorDashboard, TeamTechnician,
    TechnicianCharts, TechnicianDashboard, TodayCounts, dashboard_for,
};
pub use error::{ApiError, AuthError, translate_domain_error};
pub use reports::{export_reports_csv, list_reports, render_report_pdf};
pub use request_response::{
    ChangePasswordRequest, CheckInRequest, CheckOutRequest, ClientRequest, CreateUserRequest,
    CreateVisitRequest, LoginRequest, LoginResponse, UpdateUserRequest, UserResponse,
    VisitFilterQuery,
};
pub use users::{
    change_password, get_user, list_users, register_user, remove_user, update_user_account,
};
pub use visits::{check_in, check_out, create_visit, get_visit, get_visit_logs, list_visits};
