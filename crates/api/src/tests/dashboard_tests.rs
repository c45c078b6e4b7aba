// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role-shaped dashboard tests.
//!
//! These pin "today" through `build_dashboard` so the assertions are
//! independent of the wall clock.

use time::Date;
use time::macros::date;

use crate::dashboard::{DashboardResponse, build_dashboard};
use crate::tests::{finish_visit, schedule_visit, setup};

const TODAY: Date = date!(2026 - 08 - 24);

#[test]
fn test_admin_dashboard_counts_and_charts() {
    let mut ctx = setup();
    let finished = schedule_visit(&mut ctx, "2026-08-24T09:00:00Z");
    schedule_visit(&mut ctx, "2026-08-24T11:00:00Z");
    finish_visit(&mut ctx, finished);

    let dashboard = build_dashboard(&mut ctx.persistence, &ctx.admin.clone(), TODAY)
        .expect("Dashboard failed");

    let DashboardResponse::Admin(admin) = dashboard else {
        panic!("Expected the admin shape");
    };
    assert_eq!(admin.user_count, 3);
    assert_eq!(admin.client_count, 1);
    assert_eq!(admin.pending_visits_global, 1);
    assert_eq!(admin.charts.visits_by_supervisor.len(), 1);
    assert_eq!(admin.charts.visits_by_supervisor[0].name, "Sam Supervisor");
    assert_eq!(admin.charts.visits_by_supervisor[0].count, 1);
    let statuses: Vec<&str> = admin
        .charts
        .global_status
        .iter()
        .map(|slice| slice.status.as_str())
        .collect();
    assert_eq!(statuses, vec!["PENDING", "FINISHED"]);
}

#[test]
fn test_supervisor_dashboard_reflects_todays_team() {
    let mut ctx = setup();
    let in_progress = schedule_visit(&mut ctx, "2026-08-24T09:00:00Z");
    schedule_visit(&mut ctx, "2026-08-24T11:00:00Z");
    // A visit on another day stays out of today's counters.
    schedule_visit(&mut ctx, "2026-08-25T09:00:00Z");
    crate::check_in(
        &mut ctx.persistence,
        &ctx.technician.clone(),
        in_progress,
        &crate::request_response::CheckInRequest { lat: 14.6, lng: -90.5 },
    )
    .expect("Check-in failed");

    let dashboard = build_dashboard(&mut ctx.persistence, &ctx.supervisor.clone(), TODAY)
        .expect("Dashboard failed");

    let DashboardResponse::Supervisor(supervisor) = dashboard else {
        panic!("Expected the supervisor shape");
    };
    assert_eq!(supervisor.team_visits_today.total, 2);
    assert_eq!(supervisor.team_visits_today.in_progress, 1);
    assert_eq!(supervisor.total_pending_visits, 2);
    assert_eq!(supervisor.team_technicians.len(), 1);
    assert_eq!(supervisor.team_technicians[0].status, "IN_PROGRESS");
    assert_eq!(
        supervisor.team_technicians[0].current_visit_client.as_deref(),
        Some("Acme Networks")
    );
}

#[test]
fn test_supervisor_dashboard_idle_technician_is_pending() {
    let mut ctx = setup();

    let dashboard = build_dashboard(&mut ctx.persistence, &ctx.supervisor.clone(), TODAY)
        .expect("Dashboard failed");

    let DashboardResponse::Supervisor(supervisor) = dashboard else {
        panic!("Expected the supervisor shape");
    };
    assert_eq!(supervisor.team_technicians.len(), 1);
    assert_eq!(supervisor.team_technicians[0].status, "PENDING");
    assert!(supervisor.team_technicians[0].current_visit_client.is_none());
}

#[test]
fn test_supervisor_team_performance_window_is_thirty_days() {
    let mut ctx = setup();
    let recent = schedule_visit(&mut ctx, "2026-08-20T09:00:00Z");
    let old = schedule_visit(&mut ctx, "2026-06-01T09:00:00Z");
    finish_visit(&mut ctx, recent);
    finish_visit(&mut ctx, old);

    let dashboard = build_dashboard(&mut ctx.persistence, &ctx.supervisor.clone(), TODAY)
        .expect("Dashboard failed");

    let DashboardResponse::Supervisor(supervisor) = dashboard else {
        panic!("Expected the supervisor shape");
    };
    assert_eq!(supervisor.charts.team_performance.len(), 1);
    assert_eq!(supervisor.charts.team_performance[0].count, 1);
}

#[test]
fn test_technician_dashboard_day_counters_and_next_visit() {
    let mut ctx = setup();
    let finished = schedule_visit(&mut ctx, "2026-08-24T09:00:00Z");
    schedule_visit(&mut ctx, "2026-08-24T11:00:00Z");
    let upcoming = schedule_visit(&mut ctx, "2026-08-24T10:00:00Z");
    finish_visit(&mut ctx, finished);

    let dashboard = build_dashboard(&mut ctx.persistence, &ctx.technician.clone(), TODAY)
        .expect("Dashboard failed");

    let DashboardResponse::Technician(technician) = dashboard else {
        panic!("Expected the technician shape");
    };
    assert_eq!(technician.my_visits.total, 3);
    assert_eq!(technician.my_visits.completed, 1);
    assert_eq!(technician.my_visits.remaining, 2);
    // Earliest pending visit wins.
    let next = technician.next_visit.expect("Expected a next visit");
    assert_eq!(next.visit_id, upcoming);
    assert_eq!(next.client_name, "Acme Networks");
}

#[test]
fn test_technician_weekly_series_is_zero_filled() {
    let mut ctx = setup();
    let inside = schedule_visit(&mut ctx, "2026-08-20T09:00:00Z");
    let outside = schedule_visit(&mut ctx, "2026-08-10T09:00:00Z");
    finish_visit(&mut ctx, inside);
    finish_visit(&mut ctx, outside);

    let dashboard = build_dashboard(&mut ctx.persistence, &ctx.technician.clone(), TODAY)
        .expect("Dashboard failed");

    let DashboardResponse::Technician(technician) = dashboard else {
        panic!("Expected the technician shape");
    };
    let weekly = &technician.charts.weekly_performance;
    assert_eq!(weekly.len(), 7);
    assert_eq!(weekly[0].date, "2026-08-18");
    assert_eq!(weekly[6].date, "2026-08-24");
    assert_eq!(weekly.iter().map(|day| day.count).sum::<i64>(), 1);
    let hit = weekly
        .iter()
        .find(|day| day.date == "2026-08-20")
        .expect("Expected the finished day");
    assert_eq!(hit.count, 1);
}

#[test]
fn test_dashboard_shapes_serialize_with_camel_case_keys() {
    let mut ctx = setup();

    let dashboard = build_dashboard(&mut ctx.persistence, &ctx.admin.clone(), TODAY)
        .expect("Dashboard failed");
    let json = serde_json::to_value(&dashboard).expect("Serialization failed");

    assert!(json.get("userCount").is_some());
    assert!(json.get("pendingVisitsGlobal").is_some());
    assert!(json["charts"].get("visitsBySupervisor").is_some());

    let dashboard = build_dashboard(&mut ctx.persistence, &ctx.technician.clone(), TODAY)
        .expect("Dashboard failed");
    let json = serde_json::to_value(&dashboard).expect("Serialization failed");

    assert!(json.get("myVisits").is_some());
    assert!(json["charts"].get("weeklyPerformance").is_some());
}
