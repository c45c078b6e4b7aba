// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Client queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::ClientData;
use crate::diesel_schema::clients;
use crate::error::PersistenceError;

/// Diesel Queryable struct for client rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = clients)]
pub(crate) struct ClientRow {
    pub client_id: i64,
    pub name: String,
    pub address: Option<String>,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ClientRow> for ClientData {
    fn from(row: ClientRow) -> Self {
        Self {
            client_id: row.client_id,
            name: row.name,
            address: row.address,
            contact_name: row.contact_name,
            phone: row.phone,
            email: row.email,
            lat: row.lat,
            lng: row.lng,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Retrieves a client by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the client is not found.
pub fn get_client_by_id(
    conn: &mut SqliteConnection,
    client_id: i64,
) -> Result<Option<ClientData>, PersistenceError> {
    debug!("Looking up client by ID: {}", client_id);

    let result: Result<ClientRow, diesel::result::Error> = clients::table
        .filter(clients::client_id.eq(client_id))
        .select(ClientRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists all clients ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_clients(conn: &mut SqliteConnection) -> Result<Vec<ClientData>, PersistenceError> {
    debug!("Listing all clients");

    let rows: Vec<ClientRow> = clients::table
        .select(ClientRow::as_select())
        .order_by(clients::name.asc())
        .load(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Counts all clients.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_clients(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    use diesel::dsl::count;

    let count: i64 = clients::table.select(count(clients::client_id)).first(conn)?;

    Ok(count)
}
