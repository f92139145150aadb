// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    DomainError, normalize_business_date, parse_business_date, validate_date_range,
    validate_email, validate_otp_format, validate_required,
};
use time::OffsetDateTime;
use time::macros::datetime;

#[test]
fn test_required_field_rejects_blank() {
    assert!(validate_required("incoterm", "FOB").is_ok());
    assert!(matches!(
        validate_required("incoterm", "   "),
        Err(DomainError::InvalidField { .. })
    ));
}

#[test]
fn test_email_shape() {
    assert!(validate_email("email", "sales@freight.lk").is_ok());
    assert!(validate_email("email", "sales@freight").is_err());
    assert!(validate_email("email", "@freight.lk").is_err());
    assert!(validate_email("email", "sa les@freight.lk").is_err());
    assert!(validate_email("email", "a@b@freight.lk").is_err());
}

#[test]
fn test_otp_must_be_six_digits() {
    assert!(validate_otp_format("123456").is_ok());
    assert_eq!(validate_otp_format("12345"), Err(DomainError::InvalidOtpFormat));
    assert_eq!(validate_otp_format("12a456"), Err(DomainError::InvalidOtpFormat));
    assert_eq!(validate_otp_format("1234567"), Err(DomainError::InvalidOtpFormat));
}

#[test]
fn test_business_date_accepts_plain_dates() {
    let parsed: OffsetDateTime = parse_business_date("2024-02-01").unwrap();
    assert_eq!(parsed, datetime!(2024-02-01 00:00 UTC));
}

#[test]
fn test_business_date_normalizes_offsets_to_utc() {
    let stored: String = normalize_business_date("eta", "2024-02-15T13:30:00+05:30").unwrap();
    assert_eq!(stored, "2024-02-15T08:00:00Z");
}

#[test]
fn test_business_date_rejects_garbage() {
    match normalize_business_date("validTo", "next tuesday") {
        Err(DomainError::InvalidField { field, .. }) => assert_eq!(field, "validTo"),
        other => panic!("Expected InvalidField, got {other:?}"),
    }
}

#[test]
fn test_date_range_order() {
    let start: OffsetDateTime = datetime!(2024-01-01 00:00 UTC);
    let end: OffsetDateTime = datetime!(2024-12-31 23:59:59 UTC);
    assert!(validate_date_range("validFrom", start, "validTo", end).is_ok());
    assert!(validate_date_range("validFrom", end, "validTo", start).is_err());
}
