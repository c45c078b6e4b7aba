// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User account management. ADMIN only, except that supervisors may list
//! their own technicians when scheduling.

use std::str::FromStr;

use tracing::info;

use fieldops_domain::{Claims, Role, validate_email, validate_name};
use fieldops_persistence::{Persistence, UserData};

use crate::access::authorize;
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{CreateUserRequest, UpdateUserRequest, UserResponse};

/// Minimum accepted password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Registers a new user account.
///
/// # Errors
///
/// Returns an error if the caller is not an ADMIN, a field fails
/// validation, the email is already in use, or a technician is registered
/// without a valid supervisor.
pub fn register_user(
    persistence: &mut Persistence,
    claims: &Claims,
    request: &CreateUserRequest,
) -> Result<UserResponse, ApiError> {
    authorize(claims, "register_user", &[Role::Admin])?;

    validate_name(&request.name).map_err(translate_domain_error)?;
    validate_email(&request.email).map_err(translate_domain_error)?;
    validate_password(&request.password)?;
    let role: Role = Role::from_str(&request.role).map_err(translate_domain_error)?;

    ensure_email_unused(persistence, &request.email, None)?;
    let supervisor_id: Option<i64> =
        resolve_supervisor(persistence, role, request.supervisor_id)?;

    let user_id: i64 = persistence.create_user(
        &request.name,
        &request.email,
        &request.password,
        role.as_str(),
        supervisor_id,
    )?;

    let user: UserData = persistence
        .get_user_by_id(user_id)?
        .ok_or_else(|| ApiError::Internal {
            message: format!("User {user_id} missing immediately after creation"),
        })?;

    info!(user_id, role = %role, "User registered");
    Ok(UserResponse::from(user))
}

/// Lists user accounts ordered by name.
///
/// An ADMIN sees every account; a SUPERVISOR sees only their own active
/// technicians (the scheduling picker).
///
/// # Errors
///
/// Returns an error if the caller is a TECHNICIAN or the query fails.
pub fn list_users(
    persistence: &mut Persistence,
    claims: &Claims,
) -> Result<Vec<UserResponse>, ApiError> {
    authorize(claims, "list_users", &[Role::Admin, Role::Supervisor])?;
    let users: Vec<UserData> = if claims.role == Role::Supervisor {
        persistence.list_team_technicians(claims.id)?
    } else {
        persistence.list_users()?
    };
    Ok(users.into_iter().map(UserResponse::from).collect())
}

/// Retrieves a single user account.
///
/// # Errors
///
/// Returns an error if the caller is not an ADMIN or the user does not
/// exist.
pub fn get_user(
    persistence: &mut Persistence,
    claims: &Claims,
    user_id: i64,
) -> Result<UserResponse, ApiError> {
    authorize(claims, "get_user", &[Role::Admin])?;
    let user: UserData =
        persistence
            .get_user_by_id(user_id)?
            .ok_or_else(|| ApiError::ResourceNotFound {
                resource_type: String::from("User"),
                message: format!("User {user_id} does not exist"),
            })?;
    Ok(UserResponse::from(user))
}

/// Updates a user account's mutable fields.
///
/// # Errors
///
/// Returns an error if the caller is not an ADMIN, a field fails
/// validation, or the user does not exist.
pub fn update_user_account(
    persistence: &mut Persistence,
    claims: &Claims,
    user_id: i64,
    request: &UpdateUserRequest,
) -> Result<UserResponse, ApiError> {
    authorize(claims, "update_user", &[Role::Admin])?;

    validate_name(&request.name).map_err(translate_domain_error)?;
    validate_email(&request.email).map_err(translate_domain_error)?;
    let role: Role = Role::from_str(&request.role).map_err(translate_domain_error)?;

    ensure_email_unused(persistence, &request.email, Some(user_id))?;
    let supervisor_id: Option<i64> =
        resolve_supervisor(persistence, role, request.supervisor_id)?;

    match persistence.update_user(
        user_id,
        &request.name,
        &request.email,
        role.as_str(),
        supervisor_id,
        request.is_active,
    ) {
        Ok(()) => {}
        Err(fieldops_persistence::PersistenceError::NotFound(_)) => {
            return Err(ApiError::ResourceNotFound {
                resource_type: String::from("User"),
                message: format!("User {user_id} does not exist"),
            });
        }
        Err(err) => return Err(err.into()),
    }

    let user: UserData = persistence
        .get_user_by_id(user_id)?
        .ok_or_else(|| ApiError::Internal {
            message: format!("User {user_id} missing immediately after update"),
        })?;

    info!(user_id, "User updated");
    Ok(UserResponse::from(user))
}

/// Changes a user's password. Callers may change their own; ADMINs may
/// change anyone's.
///
/// # Errors
///
/// Returns an error if the caller may not change this password, the new
/// password is too short, or the user does not exist.
pub fn change_password(
    persistence: &mut Persistence,
    claims: &Claims,
    user_id: i64,
    new_password: &str,
) -> Result<(), ApiError> {
    if claims.id != user_id {
        authorize(claims, "change_password", &[Role::Admin])?;
    }
    validate_password(new_password)?;

    match persistence.update_password(user_id, new_password) {
        Ok(()) => {
            info!(user_id, "Password changed");
            Ok(())
        }
        Err(fieldops_persistence::PersistenceError::NotFound(_)) => {
            Err(ApiError::ResourceNotFound {
                resource_type: String::from("User"),
                message: format!("User {user_id} does not exist"),
            })
        }
        Err(err) => Err(err.into()),
    }
}

/// Deletes a user account.
///
/// # Errors
///
/// Returns an error if the caller is not an ADMIN, the user does not
/// exist, or the user is still referenced by visits.
pub fn remove_user(
    persistence: &mut Persistence,
    claims: &Claims,
    user_id: i64,
) -> Result<(), ApiError> {
    authorize(claims, "delete_user", &[Role::Admin])?;

    match persistence.delete_user(user_id) {
        Ok(()) => {
            info!(user_id, "User deleted");
            Ok(())
        }
        Err(fieldops_persistence::PersistenceError::NotFound(_)) => {
            Err(ApiError::ResourceNotFound {
                resource_type: String::from("User"),
                message: format!("User {user_id} does not exist"),
            })
        }
        Err(fieldops_persistence::PersistenceError::DatabaseError(msg))
            if msg.contains("FOREIGN KEY") =>
        {
            Err(ApiError::InvalidInput {
                field: String::from("user_id"),
                message: format!("User {user_id} is still referenced by visits"),
            })
        }
        Err(err) => Err(err.into()),
    }
}

/// Validates password length.
fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::InvalidInput {
            field: String::from("password"),
            message: format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        });
    }
    Ok(())
}

/// Rejects an email already held by a different account.
fn ensure_email_unused(
    persistence: &mut Persistence,
    email: &str,
    exclude_user_id: Option<i64>,
) -> Result<(), ApiError> {
    if let Some(existing) = persistence.get_user_by_email(email)? {
        if exclude_user_id != Some(existing.user_id) {
            return Err(ApiError::InvalidInput {
                field: String::from("email"),
                message: format!("Email address '{email}' is already in use"),
            });
        }
    }
    Ok(())
}

/// Resolves the supervisor assignment for a role.
///
/// Technicians must report to an existing, active SUPERVISOR account.
/// Other roles never carry a supervisor.
fn resolve_supervisor(
    persistence: &mut Persistence,
    role: Role,
    supervisor_id: Option<i64>,
) -> Result<Option<i64>, ApiError> {
    if role != Role::Technician {
        return Ok(None);
    }

    let supervisor_id: i64 = supervisor_id.ok_or_else(|| ApiError::InvalidInput {
        field: String::from("supervisor_id"),
        message: String::from("A technician must be assigned to a supervisor"),
    })?;

    let supervisor: UserData = persistence
        .get_user_by_id(supervisor_id)?
        .ok_or_else(|| ApiError::InvalidInput {
            field: String::from("supervisor_id"),
            message: format!("User {supervisor_id} does not exist"),
        })?;

    if supervisor.role != Role::Supervisor.as_str() {
        return Err(ApiError::InvalidInput {
            field: String::from("supervisor_id"),
            message: format!("User {supervisor_id} is not a supervisor"),
        });
    }

    Ok(Some(supervisor_id))
}
