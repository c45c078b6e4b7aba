// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API layer tests.

mod auth_tests;
mod dashboard_tests;
mod visit_tests;

use std::str::FromStr;

use fieldops_domain::{Claims, Role};
use fieldops_persistence::Persistence;

use crate::request_response::{CheckInRequest, CheckOutRequest, CreateVisitRequest};

/// One seeded team plus an admin and a client, with ready-made claims.
pub struct TestContext {
    pub persistence: Persistence,
    pub admin: Claims,
    pub supervisor: Claims,
    pub technician: Claims,
    pub client_id: i64,
}

/// Builds claims for a user the test created directly in the store.
pub fn claims_for(persistence: &mut Persistence, user_id: i64) -> Claims {
    let user = persistence
        .get_user_by_id(user_id)
        .expect("Query failed")
        .expect("User not found");
    let role = Role::from_str(&user.role).expect("Invalid role");
    Claims::new(user.user_id, user.name, role)
}

/// Seeds one admin, one supervisor, one technician, and one client.
pub fn setup() -> TestContext {
    let mut persistence = Persistence::new_in_memory().expect("Failed to create persistence");

    let admin_id = persistence
        .create_user("Alice Admin", "alice@fieldops.example", "secret-pw", "ADMIN", None)
        .expect("Failed to create admin");
    let supervisor_id = persistence
        .create_user(
            "Sam Supervisor",
            "sam@fieldops.example",
            "secret-pw",
            "SUPERVISOR",
            None,
        )
        .expect("Failed to create supervisor");
    let technician_id = persistence
        .create_user(
            "Tess Technician",
            "tess@fieldops.example",
            "secret-pw",
            "TECHNICIAN",
            Some(supervisor_id),
        )
        .expect("Failed to create technician");
    let client_id = persistence
        .create_client(&fieldops_persistence::ClientFields {
            name: String::from("Acme Networks"),
            address: Some(String::from("12 Main St")),
            ..fieldops_persistence::ClientFields::default()
        })
        .expect("Failed to create client");

    let admin = claims_for(&mut persistence, admin_id);
    let supervisor = claims_for(&mut persistence, supervisor_id);
    let technician = claims_for(&mut persistence, technician_id);

    TestContext {
        persistence,
        admin,
        supervisor,
        technician,
        client_id,
    }
}

/// Schedules a visit through the API as the context's supervisor.
pub fn schedule_visit(ctx: &mut TestContext, planned_at: &str) -> i64 {
    let request = CreateVisitRequest {
        client_id: ctx.client_id,
        technician_id: ctx.technician.id,
        supervisor_id: None,
        planned_at: planned_at.to_string(),
    };
    crate::create_visit(&mut ctx.persistence, &ctx.supervisor.clone(), &request)
        .expect("Failed to schedule visit")
        .visit_id
}

/// Runs the full check-in/check-out lifecycle for a visit.
pub fn finish_visit(ctx: &mut TestContext, visit_id: i64) {
    let technician = ctx.technician.clone();
    crate::check_in(
        &mut ctx.persistence,
        &technician,
        visit_id,
        &CheckInRequest { lat: 14.6, lng: -90.5 },
    )
    .expect("Check-in failed");
    crate::check_out(
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
}
