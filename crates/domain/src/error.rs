// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field is missing or a field value is malformed.
    InvalidField {
        /// The name of the offending field, as seen by clients.
        field: String,
        /// A human-readable description of the problem.
        message: String,
    },
    /// A status string does not name a known status.
    InvalidStatus {
        /// The entity the status belongs to.
        entity: &'static str,
        /// The unrecognized status string.
        status: String,
    },
    /// An enumerated value (mode, channel, role, ...) is not recognized.
    InvalidValue {
        /// The kind of value being parsed.
        kind: &'static str,
        /// The unrecognized value.
        value: String,
    },
    /// A status transition is not permitted by the lifecycle rules.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition is not allowed.
        reason: String,
    },
    /// A workflow action was attempted from a state that does not allow it.
    TransitionRejected {
        /// The entity the action targets.
        entity: &'static str,
        /// The attempted action.
        action: &'static str,
        /// The state the entity was in.
        from: String,
        /// The message shown to the caller.
        message: String,
    },
    /// The actor does not own the record being changed.
    NotOwner {
        /// The message shown to the caller.
        message: String,
    },
    /// Vessel details are required but some are missing.
    MissingVesselDetails {
        /// The fields that were absent.
        missing: Vec<String>,
    },
    /// Flat rack and open top equipment needs pallet dimensions.
    PalletDimensionsRequired,
    /// The quoted rate has lapsed and the caller did not override validity.
    RateValidityExpired {
        /// When the quote expired (RFC 3339).
        valid_to: String,
    },
    /// An OTP was not exactly six digits.
    InvalidOtpFormat,
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// A date range ends before it starts.
    InvalidDateRange {
        /// The field holding the start of the range.
        start_field: String,
        /// The field holding the end of the range.
        end_field: String,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidField { message, .. }
            | Self::TransitionRejected { message, .. }
            | Self::NotOwner { message } => write!(f, "{message}"),
            Self::InvalidStatus { entity, status } => {
                write!(f, "Invalid {entity} status: {status}")
            }
            Self::InvalidValue { kind, value } => write!(f, "Invalid {kind}: {value}"),
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Invalid status transition from {from} to {to}: {reason}")
            }
            Self::MissingVesselDetails { .. } => {
                write!(f, "Vessel details are required for this rate request")
            }
            Self::PalletDimensionsRequired => write!(
                f,
                "Pallet dimensions are required for Flat Rack/Open Top equipment"
            ),
            Self::RateValidityExpired { .. } => write!(
                f,
                "Quoted rate has expired; confirm with overrideValidity to proceed"
            ),
            Self::InvalidOtpFormat => write!(f, "Invalid OTP format"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::InvalidDateRange {
                start_field,
                end_field,
            } => write!(f, "{start_field} must not be after {end_field}"),
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
