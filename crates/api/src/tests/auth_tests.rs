// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication service tests.

use fieldops_domain::Role;

use crate::AuthenticationService;
use crate::error::AuthError;
use crate::tests::setup;

#[test]
fn test_login_returns_token_and_claims() {
    let mut ctx = setup();

    let (token, claims, user) = AuthenticationService::login(
        &mut ctx.persistence,
        "tess@fieldops.example",
        "secret-pw",
    )
    .expect("Login failed");

    assert_eq!(token.len(), 64);
    assert_eq!(claims.id, ctx.technician.id);
    assert_eq!(claims.role, Role::Technician);
    assert_eq!(user.email, "tess@fieldops.example");
}

#[test]
fn test_bad_credentials_are_indistinguishable() {
    let mut ctx = setup();

    let unknown_email = AuthenticationService::login(
        &mut ctx.persistence,
        "nobody@fieldops.example",
        "secret-pw",
    )
    .expect_err("Expected failure");
    let wrong_password = AuthenticationService::login(
        &mut ctx.persistence,
        "tess@fieldops.example",
        "wrong",
    )
    .expect_err("Expected failure");

    ctx.persistence
        .update_user(
            ctx.technician.id,
            "Tess Technician",
            "tess@fieldops.example",
            "TECHNICIAN",
            Some(ctx.supervisor.id),
            false,
        )
        .expect("Update failed");
    let deactivated = AuthenticationService::login(
        &mut ctx.persistence,
        "tess@fieldops.example",
        "secret-pw",
    )
    .expect_err("Expected failure");

    assert_eq!(unknown_email, wrong_password);
    assert_eq!(wrong_password, deactivated);
}

#[test]
fn test_validate_session_round_trip() {
    let mut ctx = setup();

    let (token, login_claims, _user) = AuthenticationService::login(
        &mut ctx.persistence,
        "sam@fieldops.example",
        "secret-pw",
    )
    .expect("Login failed");

    let claims = AuthenticationService::validate_session(&mut ctx.persistence, &token)
        .expect("Validation failed");

    assert_eq!(claims, login_claims);
}

#[test]
fn test_unknown_token_is_rejected() {
    let mut ctx = setup();

    let result =
        AuthenticationService::validate_session(&mut ctx.persistence, "never-issued");

    assert!(matches!(
        result,
        Err(AuthError::AuthenticationFailed { .. })
    ));
}

#[test]
fn test_expired_session_is_rejected_and_purged() {
    let mut ctx = setup();
    ctx.persistence
        .create_session("stale-token", ctx.admin.id, "2020-01-01T00:00:00Z")
        .expect("Create failed");

    let result =
        AuthenticationService::validate_session(&mut ctx.persistence, "stale-token");

    assert!(matches!(
        result,
        Err(AuthError::AuthenticationFailed { .. })
    ));
    // The opportunistic purge removed the row entirely.
    assert!(
        ctx.persistence
            .get_session_by_token("stale-token")
            .expect("Query failed")
            .is_none()
    );
}

#[test]
fn test_deactivated_user_session_is_rejected() {
    let mut ctx = setup();
    let (token, _claims, _user) = AuthenticationService::login(
        &mut ctx.persistence,
        "tess@fieldops.example",
        "secret-pw",
    )
    .expect("Login failed");

    ctx.persistence
        .update_user(
            ctx.technician.id,
            "Tess Technician",
            "tess@fieldops.example",
            "TECHNICIAN",
            Some(ctx.supervisor.id),
            false,
        )
        .expect("Update failed");

    let result = AuthenticationService::validate_session(&mut ctx.persistence, &token);

    assert!(matches!(
        result,
        Err(AuthError::AuthenticationFailed { .. })
    ));
}

#[test]
fn test_logout_invalidates_the_session() {
    let mut ctx = setup();
    let (token, _claims, _user) = AuthenticationService::login(
        &mut ctx.persistence,
        "alice@fieldops.example",
        "secret-pw",
    )
    .expect("Login failed");

    AuthenticationService::logout(&mut ctx.persistence, &token).expect("Logout failed");

    let result = AuthenticationService::validate_session(&mut ctx.persistence, &token);
    assert!(matches!(
        result,
        Err(AuthError::AuthenticationFailed { .. })
    ));

    // Logout is idempotent.
    AuthenticationService::logout(&mut ctx.persistence, &token).expect("Logout failed");
}
