// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Roles a user account can hold.
///
/// The role decides which operations a caller may perform and which rows of
/// visit-shaped data the caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full access: user management, client management, all visits, all
    /// reports, global dashboard. No implicit row restriction.
    #[serde(rename = "ADMIN")]
    Admin,
    /// Manages clients and schedules visits for their own team. Sees only
    /// rows where `supervisor_id` equals their own id.
    #[serde(rename = "SUPERVISOR")]
    Supervisor,
    /// Executes assigned visits via check-in/check-out. Sees only rows where
    /// `technician_id` equals their own id; no user or client management.
    #[serde(rename = "TECHNICIAN")]
    Technician,
}

impl Role {
    /// Converts this role to its canonical string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Supervisor => "SUPERVISOR",
            Self::Technician => "TECHNICIAN",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "SUPERVISOR" => Ok(Self::Supervisor),
            "TECHNICIAN" => Ok(Self::Technician),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a visit.
///
/// Transitions are linear: `Pending` → `InProgress` → `Finished`. There is
/// no cancellation state and no backward transition; the only writers are
/// the guarded check-in and check-out updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VisitStatus {
    /// Scheduled but not yet started.
    #[default]
    #[serde(rename = "PENDING")]
    Pending,
    /// The assigned technician has checked in.
    #[serde(rename = "IN_PROGRESS")]
    InProgress,
    /// The assigned technician has checked out and a report exists.
    #[serde(rename = "FINISHED")]
    Finished,
}

impl VisitStatus {
    /// Converts this status to its canonical string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Finished => "FINISHED",
        }
    }
}

impl FromStr for VisitStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "FINISHED" => Ok(Self::Finished),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Geolocated lifecycle event recorded in the append-only visit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisitEvent {
    /// Technician arrived on site; visit moved to `InProgress`.
    #[serde(rename = "CHECKIN")]
    CheckIn,
    /// Technician finished the visit; visit moved to `Finished`.
    #[serde(rename = "CHECKOUT")]
    CheckOut,
}

impl VisitEvent {
    /// Converts this event to its canonical string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CheckIn => "CHECKIN",
            Self::CheckOut => "CHECKOUT",
        }
    }
}

impl FromStr for VisitEvent {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CHECKIN" => Ok(Self::CheckIn),
            "CHECKOUT" => Ok(Self::CheckOut),
            _ => Err(DomainError::InvalidEvent(s.to_string())),
        }
    }
}

impl std::fmt::Display for VisitEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity and role claims carried by a validated access token.
///
/// Claims are derived once per request at the authentication boundary and
/// passed down to every scoped operation. They never contain credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated user's id.
    pub id: i64,
    /// The authenticated user's display name.
    pub name: String,
    /// The authenticated user's role.
    pub role: Role,
}

impl Claims {
    /// Creates a new set of claims.
    #[must_use]
    pub const fn new(id: i64, name: String, role: Role) -> Self {
        Self { id, name, role }
    }
}

/// Implicit row-visibility restriction a role imposes on visit-shaped
/// queries.
///
/// Derived from [`Claims`] in exactly one place (the access-control module)
/// and consumed unchanged by visit listing, report aggregation, and
/// dashboard aggregation, so the three surfaces can never drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitScope {
    /// No implicit restriction (ADMIN).
    All,
    /// Rows where `supervisor_id` equals the given user id.
    Supervisor(i64),
    /// Rows where `technician_id` equals the given user id.
    Technician(i64),
}
