// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod report_tests;
mod user_client_tests;

use crate::{ClientFields, Persistence};

/// IDs of the fixture rows shared by most tests.
pub struct Fixture {
    pub admin_id: i64,
    pub supervisor_id: i64,
    pub technician_id: i64,
    pub client_id: i64,
}

/// Creates an in-memory store with an admin, a supervisor, one technician
/// reporting to that supervisor, and a client.
pub fn setup() -> (Persistence, Fixture) {
    let mut persistence = Persistence::new_in_memory().expect("Failed to create database");

    let admin_id = persistence
        .create_user("Alice Admin", "alice@fieldops.example", "secret", "ADMIN", None)
        .expect("Failed to create admin");
    let supervisor_id = persistence
        .create_user(
            "Sam Supervisor",
            "sam@fieldops.example",
            "secret",
            "SUPERVISOR",
            None,
        )
        .expect("Failed to create supervisor");
    let technician_id = persistence
        .create_user(
            "Tess Technician",
            "tess@fieldops.example",
            "secret",
            "TECHNICIAN",
            Some(supervisor_id),
        )
        .expect("Failed to create technician");
    let client_id = persistence
        .create_client(&ClientFields {
            name: String::from("Acme Networks"),
            address: Some(String::from("12 Main St")),
            ..ClientFields::default()
        })
        .expect("Failed to create client");

    (
        persistence,
        Fixture {
            admin_id,
            supervisor_id,
            technician_id,
            client_id,
        },
    )
}

/// Creates a visit for the fixture client/technician/supervisor.
pub fn create_fixture_visit(
    persistence: &mut Persistence,
    fixture: &Fixture,
    planned_at: &str,
) -> i64 {
    persistence
        .create_visit(
            fixture.client_id,
            fixture.technician_id,
            fixture.supervisor_id,
            planned_at,
        )
        .expect("Failed to create visit")
}
