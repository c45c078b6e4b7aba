// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Client mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::{debug, info};

use crate::sqlite::last_insert_rowid;
use crate::diesel_schema::clients;
use crate::error::PersistenceError;

/// The mutable field set shared by client create and update.
#[derive(Debug, Clone, Default)]
pub struct ClientFields {
    pub name: String,
    pub address: Option<String>,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Creates a new client.
///
/// # Errors
///
/// Returns an error if the client cannot be created.
pub fn create_client(
    conn: &mut SqliteConnection,
    fields: &ClientFields,
) -> Result<i64, PersistenceError> {
    info!("Creating client: {}", fields.name);

    diesel::insert_into(clients::table)
        .values((
            clients::name.eq(&fields.name),
            clients::address.eq(&fields.address),
            clients::contact_name.eq(&fields.contact_name),
            clients::phone.eq(&fields.phone),
            clients::email.eq(&fields.email),
            clients::lat.eq(fields.lat),
            clients::lng.eq(fields.lng),
        ))
        .execute(conn)?;

    let client_id: i64 = last_insert_rowid(conn)?;

    info!(client_id, "Client created successfully");

    Ok(client_id)
}

/// Updates a client.
///
/// # Errors
///
/// Returns `NotFound` if no client has the given ID, or an error if the
/// update fails.
pub fn update_client(
    conn: &mut SqliteConnection,
    client_id: i64,
    fields: &ClientFields,
) -> Result<(), PersistenceError> {
    debug!("Updating client ID: {}", client_id);

    let rows_affected: usize = diesel::update(clients::table)
        .filter(clients::client_id.eq(client_id))
        .set((
            clients::name.eq(&fields.name),
            clients::address.eq(&fields.address),
            clients::contact_name.eq(&fields.contact_name),
            clients::phone.eq(&fields.phone),
            clients::email.eq(&fields.email),
            clients::lat.eq(fields.lat),
            clients::lng.eq(fields.lng),
            clients::updated_at
                .eq(diesel::dsl::sql::<diesel::sql_types::Text>("CURRENT_TIMESTAMP")),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Client with ID {client_id} not found"
        )));
    }

    Ok(())
}

/// Deletes a client.
///
/// Foreign key constraints from visits restrict deletion of clients with
/// scheduled visits; those surface as database errors.
///
/// # Errors
///
/// Returns `NotFound` if no client has the given ID, or an error if the
/// delete fails.
pub fn delete_client(conn: &mut SqliteConnection, client_id: i64) -> Result<(), PersistenceError> {
    info!("Deleting client ID: {}", client_id);

    let rows_affected: usize = diesel::delete(clients::table)
        .filter(clients::client_id.eq(client_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Client with ID {client_id} not found"
        )));
    }

    Ok(())
}
