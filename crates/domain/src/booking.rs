// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking request lifecycle.
//!
//! A booking request is confirmed from `PENDING` only. `CANCELLED` is
//! reachable from any non-terminal state and is itself terminal. Release
//! orders and ERP jobs can only hang off a `CONFIRMED` booking.

use crate::error::DomainError;
use crate::lifecycle::LifecycleStatus;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Booking request status states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Raised by sales, not yet confirmed.
    Pending,
    /// Confirmed; release orders and jobs may be attached.
    Confirmed,
    /// Withdrawn.
    Cancelled,
}

impl BookingStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Returns true if this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "CONFIRMED" => Ok(Self::Confirmed),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidStatus {
                entity: Self::ENTITY,
                status: s.to_string(),
            }),
        }
    }
}

impl LifecycleStatus for BookingStatus {
    const ENTITY: &'static str = "booking_request";

    fn as_str(&self) -> &'static str {
        Self::as_str(self)
    }

    fn is_terminal(&self) -> bool {
        Self::is_terminal(self)
    }

    fn can_transition_to(&self, next: Self) -> bool {
        match self {
            Self::Pending => matches!(next, Self::Confirmed | Self::Cancelled),
            Self::Confirmed => matches!(next, Self::Cancelled),
            Self::Cancelled => false,
        }
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// Where the rate behind a booking came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateSource {
    /// A standing lane rate published by pricing.
    Predefined,
    /// An ad-hoc rate request answered by pricing.
    Request,
}

impl RateSource {
    /// Returns the string representation of the source.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Predefined => "PREDEFINED",
            Self::Request => "REQUEST",
        }
    }
}

impl FromStr for RateSource {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PREDEFINED" => Ok(Self::Predefined),
            "REQUEST" => Ok(Self::Request),
            _ => Err(DomainError::InvalidValue {
                kind: "rateSource",
                value: s.to_string(),
            }),
        }
    }
}

/// The rate record a booking is raised against.
///
/// Exactly one of the two links is ever set; this type makes the other
/// state unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLink {
    /// Link to a predefined rate.
    Predefined(i64),
    /// Link to a rate request.
    Request(i64),
}

impl RateLink {
    /// Builds a link from a source and the linked record id.
    #[must_use]
    pub const fn new(source: RateSource, link_id: i64) -> Self {
        match source {
            RateSource::Predefined => Self::Predefined(link_id),
            RateSource::Request => Self::Request(link_id),
        }
    }

    /// Rebuilds a link from its persisted columns.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidField` if the columns do not agree with
    /// the declared source.
    pub fn from_columns(
        source: &str,
        predefined_rate_id: Option<i64>,
        rate_request_id: Option<i64>,
    ) -> Result<Self, DomainError> {
        match (source.parse::<RateSource>()?, predefined_rate_id, rate_request_id) {
            (RateSource::Predefined, Some(id), None) => Ok(Self::Predefined(id)),
            (RateSource::Request, None, Some(id)) => Ok(Self::Request(id)),
            _ => Err(DomainError::InvalidField {
                field: String::from("rateSource"),
                message: format!("Booking rate link does not match source {source}"),
            }),
        }
    }

    /// Returns the source discriminator.
    #[must_use]
    pub const fn source(&self) -> RateSource {
        match self {
            Self::Predefined(_) => RateSource::Predefined,
            Self::Request(_) => RateSource::Request,
        }
    }

    /// Returns the linked record id.
    #[must_use]
    pub const fn link_id(&self) -> i64 {
        match self {
            Self::Predefined(id) | Self::Request(id) => *id,
        }
    }

    /// Returns the predefined rate id, if this is a predefined link.
    #[must_use]
    pub const fn predefined_rate_id(&self) -> Option<i64> {
        match self {
            Self::Predefined(id) => Some(*id),
            Self::Request(_) => None,
        }
    }

    /// Returns the rate request id, if this is a request link.
    #[must_use]
    pub const fn rate_request_id(&self) -> Option<i64> {
        match self {
            Self::Request(id) => Some(*id),
            Self::Predefined(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_reachable_from_every_non_terminal_state() {
        assert!(
            BookingStatus::Pending
                .validate_transition(BookingStatus::Cancelled)
                .is_ok()
        );
        assert!(
            BookingStatus::Confirmed
                .validate_transition(BookingStatus::Cancelled)
                .is_ok()
        );
        assert!(
            BookingStatus::Cancelled
                .validate_transition(BookingStatus::Cancelled)
                .is_err()
        );
    }

    #[test]
    fn test_confirm_only_from_pending() {
        assert!(
            BookingStatus::Pending
                .validate_transition(BookingStatus::Confirmed)
                .is_ok()
        );
        assert!(
            BookingStatus::Confirmed
                .validate_transition(BookingStatus::Confirmed)
                .is_err()
        );
    }

    #[test]
    fn test_rate_link_from_columns() {
        assert_eq!(
            RateLink::from_columns("PREDEFINED", Some(4), None),
            Ok(RateLink::Predefined(4))
        );
        assert_eq!(
            RateLink::from_columns("REQUEST", None, Some(9)),
            Ok(RateLink::Request(9))
        );
        assert!(RateLink::from_columns("REQUEST", Some(4), Some(9)).is_err());
        assert!(RateLink::from_columns("QUOTE", Some(4), None).is_err());
    }

    #[test]
    fn test_rate_link_accessors() {
        let link: RateLink = RateLink::new(RateSource::Request, 12);
        assert_eq!(link.source(), RateSource::Request);
        assert_eq!(link.link_id(), 12);
        assert_eq!(link.rate_request_id(), Some(12));
        assert_eq!(link.predefined_rate_id(), None);
    }
}
