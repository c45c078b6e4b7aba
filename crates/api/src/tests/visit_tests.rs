// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Visit scheduling, scoping, and lifecycle tests.

use fieldops_persistence::VisitFilters;

use crate::error::ApiError;
use crate::request_response::{CheckInRequest, CheckOutRequest, CreateVisitRequest};
use crate::tests::{claims_for, finish_visit, schedule_visit, setup};

#[test]
fn test_technician_cannot_schedule_visits() {
    let mut ctx = setup();
    let request = CreateVisitRequest {
        client_id: ctx.client_id,
        technician_id: ctx.technician.id,
        supervisor_id: None,
        planned_at: String::from("2026-08-24T09:00:00Z"),
    };

    let result = crate::create_visit(&mut ctx.persistence, &ctx.technician.clone(), &request);

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_supervisor_schedules_for_own_team() {
    let mut ctx = setup();
    let request = CreateVisitRequest {
        client_id: ctx.client_id,
        technician_id: ctx.technician.id,
        // An explicit supervisor_id from a SUPERVISOR caller is ignored.
        supervisor_id: Some(99999),
        planned_at: String::from("2026-08-24T09:00:00Z"),
    };

    let visit = crate::create_visit(&mut ctx.persistence, &ctx.supervisor.clone(), &request)
        .expect("Create failed");

    assert_eq!(visit.supervisor_id, ctx.supervisor.id);
    assert_eq!(visit.status, "PENDING");
}

#[test]
fn test_admin_must_name_a_supervisor() {
    let mut ctx = setup();
    let request = CreateVisitRequest {
        client_id: ctx.client_id,
        technician_id: ctx.technician.id,
        supervisor_id: None,
        planned_at: String::from("2026-08-24T09:00:00Z"),
    };

    let result = crate::create_visit(&mut ctx.persistence, &ctx.admin.clone(), &request);

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { field, .. }) if field == "supervisor_id"
    ));
}

#[test]
fn test_admin_schedules_with_explicit_supervisor() {
    let mut ctx = setup();
    let request = CreateVisitRequest {
        client_id: ctx.client_id,
        technician_id: ctx.technician.id,
        supervisor_id: Some(ctx.supervisor.id),
        planned_at: String::from("2026-08-24T09:00:00Z"),
    };

    let visit = crate::create_visit(&mut ctx.persistence, &ctx.admin.clone(), &request)
        .expect("Create failed");

    assert_eq!(visit.supervisor_id, ctx.supervisor.id);
    assert_eq!(visit.client_name, "Acme Networks");
}

#[test]
fn test_missing_client_is_rejected() {
    let mut ctx = setup();
    let request = CreateVisitRequest {
        client_id: 99999,
        technician_id: ctx.technician.id,
        supervisor_id: None,
        planned_at: String::from("2026-08-24T09:00:00Z"),
    };

    let result = crate::create_visit(&mut ctx.persistence, &ctx.supervisor.clone(), &request);

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_assignee_must_hold_the_technician_role() {
    let mut ctx = setup();
    let request = CreateVisitRequest {
        client_id: ctx.client_id,
        technician_id: ctx.admin.id,
        supervisor_id: None,
        planned_at: String::from("2026-08-24T09:00:00Z"),
    };

    let result = crate::create_visit(&mut ctx.persistence, &ctx.supervisor.clone(), &request);

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { field, .. }) if field == "technician_id"
    ));
}

#[test]
fn test_supervisor_cannot_schedule_for_another_team() {
    let mut ctx = setup();
    let other_supervisor_id = ctx
        .persistence
        .create_user(
            "Olive Overseer",
            "olive@fieldops.example",
            "secret-pw",
            "SUPERVISOR",
            None,
        )
        .expect("Create failed");
    let other_supervisor = claims_for(&mut ctx.persistence, other_supervisor_id);

    let request = CreateVisitRequest {
        client_id: ctx.client_id,
        technician_id: ctx.technician.id,
        supervisor_id: None,
        planned_at: String::from("2026-08-24T09:00:00Z"),
    };
    let result = crate::create_visit(&mut ctx.persistence, &other_supervisor, &request);

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { field, .. }) if field == "technician_id"
    ));
}

#[test]
fn test_malformed_planned_at_is_rejected() {
    let mut ctx = setup();
    let request = CreateVisitRequest {
        client_id: ctx.client_id,
        technician_id: ctx.technician.id,
        supervisor_id: None,
        planned_at: String::from("tomorrow-ish"),
    };

    let result = crate::create_visit(&mut ctx.persistence, &ctx.supervisor.clone(), &request);

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { field, .. }) if field == "planned_at"
    ));
}

#[test]
fn test_full_lifecycle_through_the_api() {
    let mut ctx = setup();
    let visit_id = schedule_visit(&mut ctx, "2026-08-24T09:00:00Z");

    let technician = ctx.technician.clone();
    let after_check_in = crate::check_in(
        &mut ctx.persistence,
        &technician,
        visit_id,
        &CheckInRequest { lat: 14.6, lng: -90.5 },
    )
    .expect("Check-in failed");
    assert_eq!(after_check_in.status, "IN_PROGRESS");

    let after_check_out = crate::check_out(
        &mut ctx.persistence,
        &technician,
        visit_id,
        &CheckOutRequest {
            lat: 14.6,
            lng: -90.5,
            summary: String::from("Replaced router"),
            minutes_spent: 45,
        },
    )
    .expect("Check-out failed");
    assert_eq!(after_check_out.status, "FINISHED");

    let logs =
        crate::get_visit_logs(&mut ctx.persistence, &technician, visit_id).expect("Logs failed");
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].event_type, "CHECKIN");
    assert_eq!(logs[1].event_type, "CHECKOUT");
}

#[test]
fn test_check_in_by_unassigned_technician_is_not_found() {
    let mut ctx = setup();
    let visit_id = schedule_visit(&mut ctx, "2026-08-24T09:00:00Z");
    let other_id = ctx
        .persistence
        .create_user(
            "Omar Operator",
            "omar@fieldops.example",
            "secret-pw",
            "TECHNICIAN",
            Some(ctx.supervisor.id),
        )
        .expect("Create failed");
    let other = claims_for(&mut ctx.persistence, other_id);

    let result = crate::check_in(
        &mut ctx.persistence,
        &other,
        visit_id,
        &CheckInRequest { lat: 14.6, lng: -90.5 },
    );

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
    // The visit is untouched.
    let visit = crate::get_visit(&mut ctx.persistence, &ctx.admin.clone(), visit_id)
        .expect("Get failed");
    assert_eq!(visit.status, "PENDING");
}

#[test]
fn test_check_in_rejects_out_of_range_coordinates() {
    let mut ctx = setup();
    let visit_id = schedule_visit(&mut ctx, "2026-08-24T09:00:00Z");

    let result = crate::check_in(
        &mut ctx.persistence,
        &ctx.technician.clone(),
        visit_id,
        &CheckInRequest { lat: 95.0, lng: 0.0 },
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { field, .. }) if field == "coordinates"
    ));
}

#[test]
fn test_check_out_requires_a_summary() {
    let mut ctx = setup();
    let visit_id = schedule_visit(&mut ctx, "2026-08-24T09:00:00Z");
    let technician = ctx.technician.clone();
    crate::check_in(
        &mut ctx.persistence,
        &technician,
        visit_id,
        &CheckInRequest { lat: 14.6, lng: -90.5 },
    )
    .expect("Check-in failed");

    let result = crate::check_out(
        &mut ctx.persistence,
        &technician,
        visit_id,
        &CheckOutRequest {
            lat: 14.6,
            lng: -90.5,
            summary: String::from("   "),
            minutes_spent: 45,
        },
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { field, .. }) if field == "summary"
    ));
}

#[test]
fn test_supervisor_cannot_check_in() {
    let mut ctx = setup();
    let visit_id = schedule_visit(&mut ctx, "2026-08-24T09:00:00Z");

    let result = crate::check_in(
        &mut ctx.persistence,
        &ctx.supervisor.clone(),
        visit_id,
        &CheckInRequest { lat: 14.6, lng: -90.5 },
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_get_visit_hides_out_of_scope_rows() {
    let mut ctx = setup();
    let visit_id = schedule_visit(&mut ctx, "2026-08-24T09:00:00Z");

    let other_supervisor_id = ctx
        .persistence
        .create_user(
            "Olive Overseer",
            "olive@fieldops.example",
            "secret-pw",
            "SUPERVISOR",
            None,
        )
        .expect("Create failed");
    let other_supervisor = claims_for(&mut ctx.persistence, other_supervisor_id);

    let result = crate::get_visit(&mut ctx.persistence, &other_supervisor, visit_id);

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_technician_filters_cannot_widen_visibility() {
    let mut ctx = setup();
    schedule_visit(&mut ctx, "2026-08-24T09:00:00Z");
    let other_id = ctx
        .persistence
        .create_user(
            "Omar Operator",
            "omar@fieldops.example",
            "secret-pw",
            "TECHNICIAN",
            Some(ctx.supervisor.id),
        )
        .expect("Create failed");
    ctx.persistence
        .create_visit(
            ctx.client_id,
            other_id,
            ctx.supervisor.id,
            "2026-08-24T11:00:00Z",
        )
        .expect("Create failed");

    // Asking for someone else's rows still returns only the caller's own.
    let filters = VisitFilters {
        technician_id: Some(other_id),
        ..VisitFilters::default()
    };
    let visits = crate::list_visits(&mut ctx.persistence, &ctx.technician.clone(), &filters)
        .expect("List failed");

    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].technician_id, ctx.technician.id);
}

#[test]
fn test_invalid_status_filter_is_rejected() {
    let mut ctx = setup();
    let filters = VisitFilters {
        status: Some(String::from("DONE")),
        ..VisitFilters::default()
    };

    let result = crate::list_visits(&mut ctx.persistence, &ctx.admin.clone(), &filters);

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { field, .. }) if field == "status"
    ));
}

#[test]
fn test_finished_visit_has_a_report() {
    let mut ctx = setup();
    let visit_id = schedule_visit(&mut ctx, "2026-08-24T09:00:00Z");
    finish_visit(&mut ctx, visit_id);

    let report = ctx
        .persistence
        .get_report_by_visit(visit_id)
        .expect("Query failed")
        .expect("Report not found");

    assert_eq!(report.summary, "Replaced router");
    assert_eq!(report.minutes_spent, 45);
}

#[test]
fn test_planned_at_is_stored_as_utc_and_orders_by_instant() {
    let mut ctx = setup();
    // 09:00-06:00 is 15:00Z, the later instant despite the smaller local time.
    let offset_visit = schedule_visit(&mut ctx, "2026-08-24T09:00:00-06:00");
    let utc_visit = schedule_visit(&mut ctx, "2026-08-24T12:00:00Z");

    let stored = crate::get_visit(&mut ctx.persistence, &ctx.admin.clone(), offset_visit)
        .expect("Get failed");
    assert_eq!(stored.planned_at, "2026-08-24T15:00:00Z");

    let visits = crate::list_visits(
        &mut ctx.persistence,
        &ctx.admin.clone(),
        &VisitFilters::default(),
    )
    .expect("List failed");
    assert_eq!(visits[0].visit_id, offset_visit);
    assert_eq!(visits[1].visit_id, utc_visit);
}
