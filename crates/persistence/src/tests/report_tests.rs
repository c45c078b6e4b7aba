// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Report join tests.

use fieldops_domain::VisitScope;

use crate::VisitFilters;
use crate::tests::{create_fixture_visit, setup};

#[test]
fn test_report_carries_full_visit_context() {
    let (mut persistence, fixture) = setup();
    let visit_id = create_fixture_visit(&mut persistence, &fixture, "2026-08-24T09:00:00Z");
    persistence
        .check_in(visit_id, fixture.technician_id, 1.0, 1.0)
        .expect("Check-in failed");
    persistence
        .check_out(visit_id, fixture.technician_id, 1.0, 1.0, "Swapped PSU", 60)
        .expect("Check-out failed");

    let report = persistence
        .get_report_by_visit(visit_id)
        .expect("Query failed")
        .expect("Report not found");

    assert_eq!(report.visit_id, visit_id);
    assert_eq!(report.client_name, "Acme Networks");
    assert_eq!(report.technician_name, "Tess Technician");
    assert_eq!(report.supervisor_name, "Sam Supervisor");
    assert_eq!(report.status, "FINISHED");
    assert_eq!(report.planned_at, "2026-08-24T09:00:00Z");
    assert_eq!(report.minutes_spent, 60);
    assert_eq!(report.summary, "Swapped PSU");
}

#[test]
fn test_get_report_for_unfinished_visit_returns_none() {
    let (mut persistence, fixture) = setup();
    let visit_id = create_fixture_visit(&mut persistence, &fixture, "2026-08-24T09:00:00Z");

    let report = persistence.get_report_by_visit(visit_id).expect("Query failed");

    assert!(report.is_none());
}

#[test]
fn test_reports_ordered_newest_first() {
    let (mut persistence, fixture) = setup();
    let first_visit = create_fixture_visit(&mut persistence, &fixture, "2026-08-20T09:00:00Z");
    let second_visit = create_fixture_visit(&mut persistence, &fixture, "2026-08-21T09:00:00Z");

    for visit_id in [first_visit, second_visit] {
        persistence
            .check_in(visit_id, fixture.technician_id, 1.0, 1.0)
            .expect("Check-in failed");
        persistence
            .check_out(visit_id, fixture.technician_id, 1.0, 1.0, "Done", 15)
            .expect("Check-out failed");
    }

    let reports = persistence
        .list_reports(VisitScope::All, &VisitFilters::default())
        .expect("Query failed");

    assert_eq!(reports.len(), 2);
    // created_at ties resolve by insertion order within the same second; the
    // ordering column is the report's own created_at.
    assert!(reports[0].created_at >= reports[1].created_at);
}

#[test]
fn test_report_status_filter() {
    let (mut persistence, fixture) = setup();
    let visit_id = create_fixture_visit(&mut persistence, &fixture, "2026-08-24T09:00:00Z");
    persistence
        .check_in(visit_id, fixture.technician_id, 1.0, 1.0)
        .expect("Check-in failed");
    persistence
        .check_out(visit_id, fixture.technician_id, 1.0, 1.0, "Done", 15)
        .expect("Check-out failed");

    let filters = VisitFilters {
        status: Some(String::from("PENDING")),
        ..VisitFilters::default()
    };
    let reports = persistence
        .list_reports(VisitScope::All, &filters)
        .expect("Query failed");

    // Reports belong to finished visits, so a PENDING filter excludes all.
    assert!(reports.is_empty());
}
