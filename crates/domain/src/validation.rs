// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field-level validation rules shared by the API boundary.
//!
//! These checks cover structural validity only. Referential rules
//! (technician exists, supervisor role matches) require store context and
//! live at the API layer.

use crate::error::DomainError;
use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;

/// Validates an email address.
///
/// The rule is intentionally shallow: non-empty, contains exactly one `@`
/// with characters on both sides. Deliverability is not a domain concern.
///
/// # Errors
///
/// Returns [`DomainError::InvalidEmail`] if the address fails the check.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let trimmed: &str = email.trim();
    let valid: bool = matches!(
        trimmed.split('@').collect::<Vec<&str>>().as_slice(),
        [local, domain] if !local.is_empty() && !domain.is_empty()
    );
    if valid {
        Ok(())
    } else {
        Err(DomainError::InvalidEmail(email.to_string()))
    }
}

/// Validates a display name.
///
/// # Errors
///
/// Returns [`DomainError::EmptyName`] if the name is empty or whitespace.
pub fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::EmptyName);
    }
    Ok(())
}

/// Validates a WGS84 coordinate pair recorded at check-in/check-out.
///
/// # Errors
///
/// Returns [`DomainError::InvalidCoordinates`] if latitude is outside
/// [-90, 90] or longitude outside [-180, 180], or either is not finite.
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), DomainError> {
    let lat_ok: bool = lat.is_finite() && (-90.0..=90.0).contains(&lat);
    let lng_ok: bool = lng.is_finite() && (-180.0..=180.0).contains(&lng);
    if lat_ok && lng_ok {
        Ok(())
    } else {
        Err(DomainError::InvalidCoordinates { lat, lng })
    }
}

/// Validates the check-out report fields.
///
/// # Errors
///
/// Returns an error if the summary is empty or `minutes_spent` is not a
/// positive minute count.
pub fn validate_report_fields(summary: &str, minutes_spent: i32) -> Result<(), DomainError> {
    if summary.trim().is_empty() {
        return Err(DomainError::EmptySummary);
    }
    if minutes_spent <= 0 {
        return Err(DomainError::InvalidMinutes(minutes_spent));
    }
    Ok(())
}

/// Parses an ISO 8601 timestamp string into an [`OffsetDateTime`].
///
/// Used to validate `planned_at` on visit creation before the string is
/// stored canonically.
///
/// # Errors
///
/// Returns [`DomainError::InvalidTimestamp`] if the string does not parse.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, DomainError> {
    OffsetDateTime::parse(value, &Iso8601::DEFAULT).map_err(|e| DomainError::InvalidTimestamp {
        value: value.to_string(),
        reason: e.to_string(),
    })
}
