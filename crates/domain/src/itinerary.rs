// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Weekly sales itinerary lifecycle.
//!
//! Itineraries are edited by their owner while `DRAFT`, submitted for
//! review, and then approved or rejected by an SBU head. A decided
//! itinerary is frozen.

use crate::error::DomainError;
use crate::lifecycle::LifecycleStatus;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Itinerary status states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItineraryStatus {
    /// Being prepared by its owner.
    Draft,
    /// Waiting for an approver.
    Submitted,
    /// Accepted by an approver.
    Approved,
    /// Turned down by an approver.
    Rejected,
}

impl ItineraryStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Submitted => "SUBMITTED",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Returns true if this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "DRAFT" => Ok(Self::Draft),
            "SUBMITTED" => Ok(Self::Submitted),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidStatus {
                entity: Self::ENTITY,
                status: s.to_string(),
            }),
        }
    }
}

impl LifecycleStatus for ItineraryStatus {
    const ENTITY: &'static str = "itinerary";

    fn as_str(&self) -> &'static str {
        Self::as_str(self)
    }

    fn is_terminal(&self) -> bool {
        Self::is_terminal(self)
    }

    fn can_transition_to(&self, next: Self) -> bool {
        match self {
            Self::Draft => matches!(next, Self::Submitted),
            Self::Submitted => matches!(next, Self::Approved | Self::Rejected),
            Self::Approved | Self::Rejected => false,
        }
    }
}

impl FromStr for ItineraryStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// Whose calendar an itinerary plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItineraryType {
    /// Salesperson visit plan.
    Sp,
    /// Customer service executive plan.
    Cse,
}

impl ItineraryType {
    /// Returns the string representation of the type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sp => "SP",
            Self::Cse => "CSE",
        }
    }
}

impl FromStr for ItineraryType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SP" => Ok(Self::Sp),
            "CSE" => Ok(Self::Cse),
            _ => Err(DomainError::InvalidValue {
                kind: "itinerary type",
                value: s.to_string(),
            }),
        }
    }
}
