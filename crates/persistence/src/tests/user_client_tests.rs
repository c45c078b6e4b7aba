// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User and client mutation tests.

use crate::tests::{create_fixture_visit, setup};
use crate::{ClientFields, PersistenceError};

#[test]
fn test_create_user_hashes_password() {
    let (mut persistence, fixture) = setup();

    let user = persistence
        .get_user_by_id(fixture.admin_id)
        .expect("Query failed")
        .expect("User not found");

    assert_ne!(user.password_hash, "secret");
    assert!(
        persistence
            .verify_password("secret", &user.password_hash)
            .expect("Verify failed")
    );
    assert!(
        !persistence
            .verify_password("wrong", &user.password_hash)
            .expect("Verify failed")
    );
}

#[test]
fn test_duplicate_email_is_rejected() {
    let (mut persistence, _fixture) = setup();

    let result = persistence.create_user(
        "Duplicate",
        "alice@fieldops.example",
        "secret",
        "ADMIN",
        None,
    );

    assert!(matches!(result, Err(PersistenceError::DatabaseError(_))));
}

#[test]
fn test_get_user_by_email() {
    let (mut persistence, fixture) = setup();

    let user = persistence
        .get_user_by_email("tess@fieldops.example")
        .expect("Query failed")
        .expect("User not found");

    assert_eq!(user.user_id, fixture.technician_id);
    assert_eq!(user.role, "TECHNICIAN");
    assert_eq!(user.supervisor_id, Some(fixture.supervisor_id));
    assert!(user.is_active);

    let missing = persistence
        .get_user_by_email("nobody@fieldops.example")
        .expect("Query failed");
    assert!(missing.is_none());
}

#[test]
fn test_update_user_with_nonexistent_id_returns_not_found() {
    let (mut persistence, _fixture) = setup();

    let result = persistence.update_user(
        99999,
        "Ghost",
        "ghost@fieldops.example",
        "TECHNICIAN",
        None,
        true,
    );

    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_delete_user_with_nonexistent_id_returns_not_found() {
    let (mut persistence, _fixture) = setup();

    let result = persistence.delete_user(99999);

    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_delete_user_referenced_by_visits_is_restricted() {
    let (mut persistence, fixture) = setup();
    create_fixture_visit(&mut persistence, &fixture, "2026-08-24T09:00:00Z");

    let result = persistence.delete_user(fixture.technician_id);

    assert!(matches!(result, Err(PersistenceError::DatabaseError(_))));
}

#[test]
fn test_list_team_technicians_filters_role_and_activity() {
    let (mut persistence, fixture) = setup();
    let inactive = persistence
        .create_user(
            "Ida Idle",
            "ida@fieldops.example",
            "secret",
            "TECHNICIAN",
            Some(fixture.supervisor_id),
        )
        .expect("Create failed");
    persistence
        .update_user(
            inactive,
            "Ida Idle",
            "ida@fieldops.example",
            "TECHNICIAN",
            Some(fixture.supervisor_id),
            false,
        )
        .expect("Update failed");

    let team = persistence
        .list_team_technicians(fixture.supervisor_id)
        .expect("Query failed");

    assert_eq!(team.len(), 1);
    assert_eq!(team[0].user_id, fixture.technician_id);
}

#[test]
fn test_client_crud_round_trip() {
    let (mut persistence, _fixture) = setup();

    let client_id = persistence
        .create_client(&ClientFields {
            name: String::from("Borealis Labs"),
            phone: Some(String::from("555-0101")),
            lat: Some(14.62),
            lng: Some(-90.52),
            ..ClientFields::default()
        })
        .expect("Create failed");

    let client = persistence
        .get_client_by_id(client_id)
        .expect("Query failed")
        .expect("Client not found");
    assert_eq!(client.name, "Borealis Labs");
    assert_eq!(client.address, None);

    persistence
        .update_client(
            client_id,
            &ClientFields {
                name: String::from("Borealis Labs"),
                address: Some(String::from("9 Harbor Way")),
                ..ClientFields::default()
            },
        )
        .expect("Update failed");

    let updated = persistence
        .get_client_by_id(client_id)
        .expect("Query failed")
        .expect("Client not found");
    assert_eq!(updated.address.as_deref(), Some("9 Harbor Way"));
    // Fields omitted from the update are cleared, not preserved.
    assert!(updated.phone.is_none());

    persistence.delete_client(client_id).expect("Delete failed");
    assert!(
        persistence
            .get_client_by_id(client_id)
            .expect("Query failed")
            .is_none()
    );
}

#[test]
fn test_delete_client_with_visits_is_restricted() {
    let (mut persistence, fixture) = setup();
    create_fixture_visit(&mut persistence, &fixture, "2026-08-24T09:00:00Z");

    let result = persistence.delete_client(fixture.client_id);

    assert!(matches!(result, Err(PersistenceError::DatabaseError(_))));
}
