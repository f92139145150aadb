// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared lifecycle vocabulary for the workflow entities.
//!
//! Rate requests, booking requests, itineraries and customers each carry a
//! small status machine. The machines differ in their states and edges but
//! are validated the same way, so the shared rules live here.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// A status enum that drives a workflow entity's lifecycle.
pub trait LifecycleStatus: Copy + Eq + std::fmt::Debug + 'static {
    /// The entity name used in error messages and audit subjects.
    const ENTITY: &'static str;

    /// Returns the persisted representation of the status.
    fn as_str(&self) -> &'static str;

    /// Returns true if no transition may leave this status.
    fn is_terminal(&self) -> bool;

    /// Returns true if the lifecycle has an edge from `self` to `next`.
    fn can_transition_to(&self, next: Self) -> bool;

    /// Validates if a transition from this status to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the transition is not allowed.
    fn validate_transition(&self, next: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: next.as_str().to_string(),
                reason: String::from("cannot transition from terminal state"),
            });
        }

        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: next.as_str().to_string(),
                reason: String::from("transition not permitted by status lifecycle rules"),
            })
        }
    }
}

/// An approver's decision on a submitted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// The record is accepted.
    Approve,
    /// The record is turned down.
    Reject,
}

impl Decision {
    /// Builds a decision from an `approved` flag.
    #[must_use]
    pub const fn from_approved(approved: bool) -> Self {
        if approved { Self::Approve } else { Self::Reject }
    }

    /// Returns true for [`Decision::Approve`].
    #[must_use]
    pub const fn is_approval(&self) -> bool {
        matches!(self, Self::Approve)
    }
}
