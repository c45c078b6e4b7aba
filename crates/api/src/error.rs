// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use fieldops_domain::DomainError;
use fieldops_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/persistence errors and represent the API
/// contract. The server layer maps each variant to one HTTP status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the caller does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ///
    /// Rows outside the caller's scope are reported with this variant too,
    /// so out-of-scope and nonexistent rows are indistinguishable.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An export was requested but no rows matched.
    EmptyExport,
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::EmptyExport => {
                write!(f, "No rows match the requested export")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound(message) => Self::ResourceNotFound {
                resource_type: String::from("Record"),
                message,
            },
            PersistenceError::VisitNotOwned {
                visit_id,
                technician_id,
            } => Self::ResourceNotFound {
                resource_type: String::from("Visit"),
                message: format!(
                    "Visit {visit_id} not found, not assigned to technician {technician_id}, \
                     or not in the required status"
                ),
            },
            PersistenceError::SessionNotFound(reason)
            | PersistenceError::SessionExpired(reason) => Self::AuthenticationFailed { reason },
            other => Self::Internal {
                message: other.to_string(),
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked
/// directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidRole(role) => ApiError::InvalidInput {
            field: String::from("role"),
            message: format!("Invalid role: '{role}'. Must be ADMIN, SUPERVISOR, or TECHNICIAN"),
        },
        DomainError::InvalidStatus(status) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!(
                "Invalid status: '{status}'. Must be PENDING, IN_PROGRESS, or FINISHED"
            ),
        },
        DomainError::InvalidEvent(event) => ApiError::InvalidInput {
            field: String::from("event_type"),
            message: format!("Invalid event type: '{event}'. Must be CHECKIN or CHECKOUT"),
        },
        DomainError::InvalidEmail(email) => ApiError::InvalidInput {
            field: String::from("email"),
            message: format!("Invalid email address: '{email}'"),
        },
        DomainError::EmptyName => ApiError::InvalidInput {
            field: String::from("name"),
            message: String::from("Name cannot be empty"),
        },
        DomainError::InvalidCoordinates { lat, lng } => ApiError::InvalidInput {
            field: String::from("coordinates"),
            message: format!(
                "Invalid coordinates: lat={lat}, lng={lng}. Latitude must be within \
                 [-90, 90] and longitude within [-180, 180]"
            ),
        },
        DomainError::InvalidMinutes(minutes) => ApiError::InvalidInput {
            field: String::from("minutes_spent"),
            message: format!("Invalid minutes_spent: {minutes}. Must be greater than 0"),
        },
        DomainError::EmptySummary => ApiError::InvalidInput {
            field: String::from("summary"),
            message: String::from("Summary cannot be empty"),
        },
        DomainError::InvalidTimestamp { value, reason } => ApiError::InvalidInput {
            field: String::from("planned_at"),
            message: format!("Invalid timestamp '{value}': {reason}"),
        },
    }
}
