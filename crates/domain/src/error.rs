// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// The role string is not one of ADMIN, SUPERVISOR, TECHNICIAN.
    #[error("invalid role: '{0}'")]
    InvalidRole(String),
    /// The visit status string is not one of PENDING, IN_PROGRESS, FINISHED.
    #[error("invalid visit status: '{0}'")]
    InvalidStatus(String),
    /// The visit log event string is not one of CHECKIN, CHECKOUT.
    #[error("invalid visit event: '{0}'")]
    InvalidEvent(String),
    /// The email address is empty or malformed.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    /// The name field is empty.
    #[error("name cannot be empty")]
    EmptyName,
    /// Latitude/longitude pair is outside the valid WGS84 range.
    #[error("invalid coordinates: lat={lat}, lng={lng}")]
    InvalidCoordinates {
        /// The rejected latitude.
        lat: f64,
        /// The rejected longitude.
        lng: f64,
    },
    /// The reported visit duration is not a positive minute count.
    #[error("invalid minutes_spent: {0} (must be greater than 0)")]
    InvalidMinutes(i32),
    /// The check-out summary is empty.
    #[error("summary cannot be empty")]
    EmptySummary,
    /// A timestamp string could not be parsed as ISO 8601.
    #[error("invalid timestamp '{value}': {reason}")]
    InvalidTimestamp {
        /// The rejected timestamp string.
        value: String,
        /// Why parsing failed.
        reason: String,
    },
}
