// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    DomainError, parse_timestamp, validate_coordinates, validate_email, validate_name,
    validate_report_fields,
};

#[test]
fn test_validate_email_accepts_plain_address() {
    assert!(validate_email("tech@fieldops.example").is_ok());
}

#[test]
fn test_validate_email_rejects_empty() {
    assert_eq!(
        validate_email(""),
        Err(DomainError::InvalidEmail(String::new()))
    );
}

#[test]
fn test_validate_email_rejects_missing_at() {
    assert!(validate_email("tech.fieldops.example").is_err());
}

#[test]
fn test_validate_email_rejects_missing_local_part() {
    assert!(validate_email("@fieldops.example").is_err());
}

#[test]
fn test_validate_email_rejects_missing_domain() {
    assert!(validate_email("tech@").is_err());
}

#[test]
fn test_validate_email_rejects_multiple_at_signs() {
    assert!(validate_email("tech@field@ops").is_err());
}

#[test]
fn test_validate_name_accepts_nonempty() {
    assert!(validate_name("Dana Ruiz").is_ok());
}

#[test]
fn test_validate_name_rejects_whitespace_only() {
    assert_eq!(validate_name("   "), Err(DomainError::EmptyName));
}

#[test]
fn test_validate_coordinates_accepts_in_range() {
    assert!(validate_coordinates(0.0, 0.0).is_ok());
    assert!(validate_coordinates(-90.0, -180.0).is_ok());
    assert!(validate_coordinates(90.0, 180.0).is_ok());
}

#[test]
fn test_validate_coordinates_rejects_out_of_range_latitude() {
    assert_eq!(
        validate_coordinates(90.5, 0.0),
        Err(DomainError::InvalidCoordinates { lat: 90.5, lng: 0.0 })
    );
}

#[test]
fn test_validate_coordinates_rejects_out_of_range_longitude() {
    assert!(validate_coordinates(0.0, -180.1).is_err());
}

#[test]
fn test_validate_coordinates_rejects_non_finite() {
    assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    assert!(validate_coordinates(0.0, f64::INFINITY).is_err());
}

#[test]
fn test_validate_report_fields_accepts_valid_report() {
    assert!(validate_report_fields("Replaced compressor relay", 45).is_ok());
}

#[test]
fn test_validate_report_fields_rejects_empty_summary() {
    assert_eq!(
        validate_report_fields("  ", 45),
        Err(DomainError::EmptySummary)
    );
}

#[test]
fn test_validate_report_fields_rejects_zero_minutes() {
    assert_eq!(
        validate_report_fields("Done", 0),
        Err(DomainError::InvalidMinutes(0))
    );
}

#[test]
fn test_validate_report_fields_rejects_negative_minutes() {
    assert!(validate_report_fields("Done", -10).is_err());
}

#[test]
fn test_parse_timestamp_accepts_iso8601() {
    let parsed = parse_timestamp("2026-08-24T09:30:00Z").unwrap();
    assert_eq!(parsed.year(), 2026);
    assert_eq!(parsed.hour(), 9);
}

#[test]
fn test_parse_timestamp_accepts_offset() {
    assert!(parse_timestamp("2026-08-24T09:30:00-05:00").is_ok());
}

#[test]
fn test_parse_timestamp_rejects_garbage() {
    let result = parse_timestamp("next tuesday");
    assert!(matches!(
        result,
        Err(DomainError::InvalidTimestamp { value, .. }) if value == "next tuesday"
    ));
}
