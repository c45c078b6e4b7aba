// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role-shaped dashboard assembly.
//!
//! Each role receives a different response shape built from the scoped
//! aggregates in the persistence layer. Dashboards are pure reads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};

use fieldops_domain::{Claims, Role, VisitScope, VisitStatus};
use fieldops_persistence::{
    CompletedByName, NextVisitData, Persistence, StatusCounts, UserData,
};

use crate::error::ApiError;

const DAY_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Days of history shown in the supervisor's team performance chart.
const TEAM_PERFORMANCE_WINDOW_DAYS: i64 = 30;
/// Days shown in the technician's weekly performance chart.
const WEEKLY_WINDOW_DAYS: i64 = 7;

/// One slice of a per-status breakdown chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSlice {
    /// The visit status.
    pub status: String,
    /// Number of visits in that status.
    pub count: i64,
}

/// One bar of a completed-visits breakdown chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Supervisor or technician display name.
    pub name: String,
    /// Completed visit count.
    pub count: i64,
}

impl From<CompletedByName> for ChartPoint {
    fn from(row: CompletedByName) -> Self {
        Self {
            name: row.name,
            count: row.completed_count,
        }
    }
}

/// One day of a zero-filled daily series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPoint {
    /// The day (YYYY-MM-DD).
    pub date: String,
    /// Completed visit count on that day.
    pub count: i64,
}

/// Per-status counts for visits planned today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayCounts {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub finished: i64,
}

impl From<StatusCounts> for TodayCounts {
    fn from(counts: StatusCounts) -> Self {
        Self {
            total: counts.total,
            pending: counts.pending,
            in_progress: counts.in_progress,
            finished: counts.finished,
        }
    }
}

/// One team technician's standing on the supervisor dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamTechnician {
    /// The technician's user id.
    pub id: i64,
    /// The technician's display name.
    pub name: String,
    /// `IN_PROGRESS` while on site today, `PENDING` between visits.
    pub status: String,
    /// The client the technician is currently with, if any.
    pub current_visit_client: Option<String>,
}

/// The technician's next scheduled visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextVisit {
    /// The visit id.
    pub visit_id: i64,
    /// The client's display name.
    pub client_name: String,
    /// The service location address.
    pub address: Option<String>,
    /// When the visit is planned (ISO 8601).
    pub planned_at: String,
}

impl From<NextVisitData> for NextVisit {
    fn from(next: NextVisitData) -> Self {
        Self {
            visit_id: next.visit_id,
            client_name: next.client_name,
            address: next.address,
            planned_at: next.planned_at,
        }
    }
}

/// Today's visit counters on the technician dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MyVisitCounts {
    /// Visits planned today.
    pub total: i64,
    /// Visits finished today.
    pub completed: i64,
    /// Visits still to do today.
    pub remaining: i64,
}

/// ADMIN dashboard: global counters and system-wide charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    /// Active user accounts.
    pub user_count: i64,
    /// Registered clients.
    pub client_count: i64,
    /// Pending visits across all teams.
    pub pending_visits_global: i64,
    pub charts: AdminCharts,
}

/// Charts on the ADMIN dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCharts {
    /// Completed visits per supervisor, highest first.
    pub visits_by_supervisor: Vec<ChartPoint>,
    /// System-wide visit status breakdown.
    pub global_status: Vec<StatusSlice>,
}

/// SUPERVISOR dashboard: today's team figures and team charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorDashboard {
    /// Per-status counts for the team's visits planned today.
    pub team_visits_today: TodayCounts,
    /// Pending visits for the team, regardless of day.
    pub total_pending_visits: i64,
    /// Each active team technician and what they are doing right now.
    pub team_technicians: Vec<TeamTechnician>,
    pub charts: SupervisorCharts,
}

/// Charts on the SUPERVISOR dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorCharts {
    /// Completed visits per team technician over the last 30 days.
    pub team_performance: Vec<ChartPoint>,
    /// Team visit status breakdown.
    pub team_status: Vec<StatusSlice>,
}

/// TECHNICIAN dashboard: personal day counters and a weekly series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicianDashboard {
    /// Today's visit counters.
    pub my_visits: MyVisitCounts,
    /// The earliest pending visit, if any.
    pub next_visit: Option<NextVisit>,
    pub charts: TechnicianCharts,
}

/// Charts on the TECHNICIAN dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicianCharts {
    /// Zero-filled completed-visit counts for the last seven days.
    pub weekly_performance: Vec<DayPoint>,
    /// Personal visit status breakdown.
    pub my_status: Vec<StatusSlice>,
}

/// The dashboard payload, shaped by the caller's role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DashboardResponse {
    Admin(AdminDashboard),
    Supervisor(SupervisorDashboard),
    Technician(TechnicianDashboard),
}

/// Builds the dashboard for the caller's role as of today (UTC).
///
/// # Errors
///
/// Returns an error if any aggregate query fails.
pub fn dashboard_for(
    persistence: &mut Persistence,
    claims: &Claims,
) -> Result<DashboardResponse, ApiError> {
    build_dashboard(persistence, claims, OffsetDateTime::now_utc().date())
}

/// Builds the dashboard pinned to a given day. Split out so tests control
/// the clock.
pub(crate) fn build_dashboard(
    persistence: &mut Persistence,
    claims: &Claims,
    today: Date,
) -> Result<DashboardResponse, ApiError> {
    match claims.role {
        Role::Admin => Ok(DashboardResponse::Admin(admin_dashboard(persistence)?)),
        Role::Supervisor => Ok(DashboardResponse::Supervisor(supervisor_dashboard(
            persistence,
            claims.id,
            today,
        )?)),
        Role::Technician => Ok(DashboardResponse::Technician(technician_dashboard(
            persistence,
            claims.id,
            today,
        )?)),
    }
}

fn admin_dashboard(persistence: &mut Persistence) -> Result<AdminDashboard, ApiError> {
    let user_count: i64 = persistence.count_active_users()?;
    let client_count: i64 = persistence.count_clients()?;
    let pending_visits_global: i64 = persistence
        .count_visits_with_status(VisitScope::All, VisitStatus::Pending.as_str())?;

    let visits_by_supervisor: Vec<ChartPoint> = persistence
        .completed_by_supervisor()?
        .into_iter()
        .map(ChartPoint::from)
        .collect();
    let global_status: Vec<StatusSlice> =
        status_slices(persistence.status_histogram(VisitScope::All)?);

    Ok(AdminDashboard {
        user_count,
        client_count,
        pending_visits_global,
        charts: AdminCharts {
            visits_by_supervisor,
            global_status,
        },
    })
}

fn supervisor_dashboard(
    persistence: &mut Persistence,
    supervisor_id: i64,
    today: Date,
) -> Result<SupervisorDashboard, ApiError> {
    let scope: VisitScope = VisitScope::Supervisor(supervisor_id);
    let today_str: String = format_day(today)?;

    let team_visits_today: TodayCounts =
        persistence.day_status_counts(scope, &today_str)?.into();
    let total_pending_visits: i64 =
        persistence.count_visits_with_status(scope, VisitStatus::Pending.as_str())?;

    let since: Date = offset_day(today, -TEAM_PERFORMANCE_WINDOW_DAYS)?;
    let team_performance: Vec<ChartPoint> = persistence
        .completed_by_technician_since(supervisor_id, &format_day(since)?)?
        .into_iter()
        .map(ChartPoint::from)
        .collect();

    let mut current_clients: BTreeMap<i64, String> = persistence
        .in_progress_clients_for_team(supervisor_id, &today_str)?
        .into_iter()
        .collect();
    let team_technicians: Vec<TeamTechnician> = persistence
        .list_team_technicians(supervisor_id)?
        .into_iter()
        .map(|technician: UserData| {
            let current_visit_client: Option<String> =
                current_clients.remove(&technician.user_id);
            let status: &str = if current_visit_client.is_some() {
                VisitStatus::InProgress.as_str()
            } else {
                VisitStatus::Pending.as_str()
            };
            TeamTechnician {
                id: technician.user_id,
                name: technician.name,
                status: status.to_string(),
                current_visit_client,
            }
        })
        .collect();

    let team_status: Vec<StatusSlice> = status_slices(persistence.status_histogram(scope)?);

    Ok(SupervisorDashboard {
        team_visits_today,
        total_pending_visits,
        team_technicians,
        charts: SupervisorCharts {
            team_performance,
            team_status,
        },
    })
}

fn technician_dashboard(
    persistence: &mut Persistence,
    technician_id: i64,
    today: Date,
) -> Result<TechnicianDashboard, ApiError> {
    let scope: VisitScope = VisitScope::Technician(technician_id);
    let today_str: String = format_day(today)?;

    let counts: StatusCounts = persistence.day_status_counts(scope, &today_str)?;
    let my_visits: MyVisitCounts = MyVisitCounts {
        total: counts.total,
        completed: counts.finished,
        remaining: counts.total - counts.finished,
    };

    let next_visit: Option<NextVisit> = persistence
        .next_pending_visit(technician_id)?
        .map(NextVisit::from);

    let from: Date = offset_day(today, -(WEEKLY_WINDOW_DAYS - 1))?;
    let to_exclusive: Date = offset_day(today, 1)?;
    let completed_dates: Vec<String> = persistence.completed_visit_dates(
        technician_id,
        &format_day(from)?,
        &format_day(to_exclusive)?,
    )?;

    let mut counts_by_day: BTreeMap<String, i64> = BTreeMap::new();
    for date in completed_dates {
        *counts_by_day.entry(date).or_insert(0) += 1;
    }

    let mut weekly_performance: Vec<DayPoint> =
        Vec::with_capacity(usize::try_from(WEEKLY_WINDOW_DAYS).unwrap_or(0));
    for offset in 0..WEEKLY_WINDOW_DAYS {
        let date: String = format_day(offset_day(from, offset)?)?;
        let count: i64 = counts_by_day.get(&date).copied().unwrap_or(0);
        weekly_performance.push(DayPoint { date, count });
    }

    let my_status: Vec<StatusSlice> = status_slices(persistence.status_histogram(scope)?);

    Ok(TechnicianDashboard {
        my_visits,
        next_visit,
        charts: TechnicianCharts {
            weekly_performance,
            my_status,
        },
    })
}

fn status_slices(histogram: Vec<(String, i64)>) -> Vec<StatusSlice> {
    histogram
        .into_iter()
        .map(|(status, count)| StatusSlice { status, count })
        .collect()
}

fn format_day(day: Date) -> Result<String, ApiError> {
    day.format(DAY_FORMAT).map_err(|e| ApiError::Internal {
        message: format!("Failed to format date: {e}"),
    })
}

fn offset_day(day: Date, days: i64) -> Result<Date, ApiError> {
    day.checked_add(Duration::days(days))
        .ok_or_else(|| ApiError::Internal {
            message: String::from("Date arithmetic overflow"),
        })
}
