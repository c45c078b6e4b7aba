// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types for the API boundary.

use serde::{Deserialize, Serialize};

use fieldops_persistence::{ClientFields, UserData, VisitFilters};

/// Request to authenticate a user.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginRequest {
    /// The account email address.
    pub email: String,
    /// The account password.
    pub password: String,
}

/// A user account as exposed outward.
///
/// This never carries the stored password hash.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserResponse {
    /// The user's id.
    pub user_id: i64,
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
    /// The user's role (`ADMIN`, `SUPERVISOR`, or `TECHNICIAN`).
    pub role: String,
    /// The supervisor this user reports to, for technicians.
    pub supervisor_id: Option<i64>,
    /// Whether the account can log in.
    pub is_active: bool,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
}

impl From<UserData> for UserResponse {
    fn from(user: UserData) -> Self {
        Self {
            user_id: user.user_id,
            name: user.name,
            email: user.email,
            role: user.role,
            supervisor_id: user.supervisor_id,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// Response to a successful login.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginResponse {
    /// The opaque session token.
    pub token: String,
    /// The authenticated account.
    pub user: UserResponse,
}

/// Request to register a new user account.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateUserRequest {
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
    /// The initial password.
    pub password: String,
    /// The role to assign (`ADMIN`, `SUPERVISOR`, or `TECHNICIAN`).
    pub role: String,
    /// The supervisor a technician reports to. Required for technicians,
    /// ignored for other roles.
    pub supervisor_id: Option<i64>,
}

/// Request to update a user account's mutable fields.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateUserRequest {
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
    /// The role to assign.
    pub role: String,
    /// The supervisor a technician reports to.
    pub supervisor_id: Option<i64>,
    /// Whether the account can log in.
    pub is_active: bool,
}

/// Request to change a user's password.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChangePasswordRequest {
    /// The new password.
    pub new_password: String,
}

/// Request to create or replace a client.
///
/// Updates replace every field; omitted optional fields are cleared.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientRequest {
    /// The client's display name.
    pub name: String,
    /// Street address of the service location.
    pub address: Option<String>,
    /// On-site contact person.
    pub contact_name: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Contact email address.
    pub email: Option<String>,
    /// Service location latitude.
    pub lat: Option<f64>,
    /// Service location longitude.
    pub lng: Option<f64>,
}

impl ClientRequest {
    /// Converts this request into the persistence field set.
    #[must_use]
    pub fn to_fields(&self) -> ClientFields {
        ClientFields {
            name: self.name.clone(),
            address: self.address.clone(),
            contact_name: self.contact_name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// Request to schedule a visit.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateVisitRequest {
    /// The client to visit.
    pub client_id: i64,
    /// The technician assigned to the visit.
    pub technician_id: i64,
    /// The responsible supervisor. Required for ADMIN callers; ignored for
    /// SUPERVISOR callers, who always schedule for their own team.
    pub supervisor_id: Option<i64>,
    /// When the visit is planned (ISO 8601).
    pub planned_at: String,
}

/// Request to check in to a visit.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckInRequest {
    /// Latitude recorded at arrival.
    pub lat: f64,
    /// Longitude recorded at arrival.
    pub lng: f64,
}

/// Request to check out of a visit.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckOutRequest {
    /// Latitude recorded at departure.
    pub lat: f64,
    /// Longitude recorded at departure.
    pub lng: f64,
    /// What was done during the visit.
    pub summary: String,
    /// How long the visit took, in minutes.
    pub minutes_spent: i32,
}

/// Query parameters accepted by visit and report listings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VisitFilterQuery {
    /// Exact status match.
    pub status: Option<String>,
    /// Exact technician match.
    pub technician_id: Option<i64>,
    /// Exact supervisor match (honored for ADMIN callers only).
    pub supervisor_id: Option<i64>,
    /// Inclusive lower bound on the DATE portion of `planned_at`
    /// (YYYY-MM-DD).
    pub start_date: Option<String>,
    /// Inclusive upper bound on the DATE portion of `planned_at`
    /// (YYYY-MM-DD).
    pub end_date: Option<String>,
}

impl VisitFilterQuery {
    /// Converts the query into persistence-layer filters.
    ///
    /// The result still needs [`sanitize_filters`] before it reaches a
    /// query.
    ///
    /// [`sanitize_filters`]: crate::access::sanitize_filters
    #[must_use]
    pub fn to_filters(&self) -> VisitFilters {
        VisitFilters {
            status: self.status.clone(),
            technician_id: self.technician_id,
            supervisor_id: self.supervisor_id,
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
        }
    }
}
