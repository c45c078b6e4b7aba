// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Client (service location) management. ADMIN and SUPERVISOR only,
//! reads included.

use tracing::info;

use fieldops_domain::{Claims, Role, validate_coordinates, validate_email, validate_name};
use fieldops_persistence::{ClientData, Persistence, PersistenceError};

use crate::access::authorize;
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::ClientRequest;

/// Creates a new client.
///
/// # Errors
///
/// Returns an error if the caller may not manage clients or a field fails
/// validation.
pub fn create_client(
    persistence: &mut Persistence,
    claims: &Claims,
    request: &ClientRequest,
) -> Result<ClientData, ApiError> {
    authorize(claims, "create_client", &[Role::Admin, Role::Supervisor])?;
    validate_client_fields(request)?;

    let client_id: i64 = persistence.create_client(&request.to_fields())?;
    let client: ClientData = persistence
        .get_client_by_id(client_id)?
        .ok_or_else(|| ApiError::Internal {
            message: format!("Client {client_id} missing immediately after creation"),
        })?;

    info!(client_id, "Client created");
    Ok(client)
}

/// Lists all clients ordered by name.
///
/// # Errors
///
/// Returns an error if the caller may not read clients or the query fails.
pub fn list_clients(
    persistence: &mut Persistence,
    claims: &Claims,
) -> Result<Vec<ClientData>, ApiError> {
    authorize(claims, "list_clients", &[Role::Admin, Role::Supervisor])?;
    Ok(persistence.list_clients()?)
}

/// Retrieves a single client.
///
/// # Errors
///
/// Returns an error if the caller may not read clients or the client does
/// not exist.
pub fn get_client(
    persistence: &mut Persistence,
    claims: &Claims,
    client_id: i64,
) -> Result<ClientData, ApiError> {
    authorize(claims, "get_client", &[Role::Admin, Role::Supervisor])?;
    persistence
        .get_client_by_id(client_id)?
        .ok_or_else(|| client_not_found(client_id))
}

/// Replaces a client's fields.
///
/// # Errors
///
/// Returns an error if the caller may not manage clients, a field fails
/// validation, or the client does not exist.
pub fn update_client(
    persistence: &mut Persistence,
    claims: &Claims,
    client_id: i64,
    request: &ClientRequest,
) -> Result<ClientData, ApiError> {
    authorize(claims, "update_client", &[Role::Admin, Role::Supervisor])?;
    validate_client_fields(request)?;

    match persistence.update_client(client_id, &request.to_fields()) {
        Ok(()) => {}
        Err(PersistenceError::NotFound(_)) => return Err(client_not_found(client_id)),
        Err(err) => return Err(err.into()),
    }

    let client: ClientData = persistence
        .get_client_by_id(client_id)?
        .ok_or_else(|| ApiError::Internal {
            message: format!("Client {client_id} missing immediately after update"),
        })?;

    info!(client_id, "Client updated");
    Ok(client)
}

/// Deletes a client.
///
/// # Errors
///
/// Returns an error if the caller may not manage clients, the client does
/// not exist, or the client is still referenced by visits.
pub fn delete_client(
    persistence: &mut Persistence,
    claims: &Claims,
    client_id: i64,
) -> Result<(), ApiError> {
    authorize(claims, "delete_client", &[Role::Admin, Role::Supervisor])?;

    match persistence.delete_client(client_id) {
        Ok(()) => {
            info!(client_id, "Client deleted");
            Ok(())
        }
        Err(PersistenceError::NotFound(_)) => Err(client_not_found(client_id)),
        Err(PersistenceError::DatabaseError(msg)) if msg.contains("FOREIGN KEY") => {
            Err(ApiError::InvalidInput {
                field: String::from("client_id"),
                message: format!("Client {client_id} is still referenced by visits"),
            })
        }
        Err(err) => Err(err.into()),
    }
}

fn client_not_found(client_id: i64) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from("Client"),
        message: format!("Client {client_id} does not exist"),
    }
}

/// Structural validation shared by create and update.
fn validate_client_fields(request: &ClientRequest) -> Result<(), ApiError> {
    validate_name(&request.name).map_err(translate_domain_error)?;
    if let Some(email) = &request.email {
        validate_email(email).map_err(translate_domain_error)?;
    }
    match (request.lat, request.lng) {
        (None, None) => Ok(()),
        (Some(lat), Some(lng)) => {
            validate_coordinates(lat, lng).map_err(translate_domain_error)
        }
        _ => Err(ApiError::InvalidInput {
            field: String::from("coordinates"),
            message: String::from("Latitude and longitude must be provided together"),
        }),
    }
}
