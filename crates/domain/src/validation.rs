// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

/// Number of digits in a password reset OTP.
pub const OTP_LENGTH: usize = 6;

/// Validates that a required text field is present.
///
/// # Errors
///
/// Returns `DomainError::InvalidField` if the value is empty or whitespace.
pub fn validate_required(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidField {
            field: field.to_string(),
            message: format!("{field} should not be empty"),
        });
    }
    Ok(())
}

/// Performs a shape check on an e-mail address.
///
/// # Errors
///
/// Returns `DomainError::InvalidField` unless the address has a local part,
/// an `@`, and a dotted domain, with no whitespace.
pub fn validate_email(field: &str, email: &str) -> Result<(), DomainError> {
    let invalid = || DomainError::InvalidField {
        field: field.to_string(),
        message: format!("{field} must be an email"),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    let domain_ok: bool = domain
        .split_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'));

    if local.is_empty() || domain.contains('@') || !domain_ok {
        return Err(invalid());
    }
    Ok(())
}

/// Validates that an OTP is exactly six ASCII digits.
///
/// # Errors
///
/// Returns `DomainError::InvalidOtpFormat` otherwise.
pub fn validate_otp_format(otp: &str) -> Result<(), DomainError> {
    if otp.len() == OTP_LENGTH && otp.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(DomainError::InvalidOtpFormat)
    }
}

/// Parses a client-supplied business date.
///
/// Accepts an RFC 3339 date-time or a bare `YYYY-MM-DD` date, which is read
/// as midnight UTC.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if neither form matches.
pub fn parse_business_date(value: &str) -> Result<OffsetDateTime, DomainError> {
    if let Ok(parsed) = OffsetDateTime::parse(value, &Rfc3339) {
        return Ok(parsed);
    }

    let date_format = format_description!("[year]-[month]-[day]");
    Date::parse(value, &date_format)
        .map(|date| PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_utc())
        .map_err(|e| DomainError::DateParseError {
            date_string: value.to_string(),
            error: e.to_string(),
        })
}

/// Formats a timestamp the way business dates are stored.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the timestamp cannot be
/// represented in RFC 3339.
pub fn format_business_date(value: OffsetDateTime) -> Result<String, DomainError> {
    value
        .to_offset(time::UtcOffset::UTC)
        .format(&Rfc3339)
        .map_err(|e| DomainError::DateParseError {
            date_string: value.to_string(),
            error: e.to_string(),
        })
}

/// Parses a business date and returns its stored form.
///
/// # Errors
///
/// Returns `DomainError::InvalidField` naming `field` if the value does not parse.
pub fn normalize_business_date(field: &str, value: &str) -> Result<String, DomainError> {
    let parsed: OffsetDateTime =
        parse_business_date(value).map_err(|_| DomainError::InvalidField {
            field: field.to_string(),
            message: format!("{field} must be a valid ISO 8601 date string"),
        })?;
    format_business_date(parsed)
}

/// Checks that a range does not end before it starts.
///
/// # Errors
///
/// Returns `DomainError::InvalidDateRange` if `start` is after `end`.
pub fn validate_date_range(
    start_field: &str,
    start: OffsetDateTime,
    end_field: &str,
    end: OffsetDateTime,
) -> Result<(), DomainError> {
    if start > end {
        return Err(DomainError::InvalidDateRange {
            start_field: start_field.to_string(),
            end_field: end_field.to_string(),
        });
    }
    Ok(())
}
