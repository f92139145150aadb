// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use freight_desk_audit::AuditEvent;
use freight_desk_domain::{
    BookingStatus, CustomerApprovalStatus, ItineraryStatus, LifecycleStatus, RateRequestStatus,
};

/// The current state of a workflow record, as loaded immediately before a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowSubject {
    /// A rate request and its status.
    RateRequest {
        /// The rate request id.
        id: i64,
        /// The loaded status.
        status: RateRequestStatus,
    },
    /// A booking request and its status.
    BookingRequest {
        /// The booking request id.
        id: i64,
        /// The loaded status.
        status: BookingStatus,
    },
    /// An itinerary, its status and its owner.
    Itinerary {
        /// The itinerary id.
        id: i64,
        /// The loaded status.
        status: ItineraryStatus,
        /// The user who owns the itinerary.
        owner_id: i64,
    },
    /// A customer and its approval status.
    Customer {
        /// The customer id.
        id: i64,
        /// The loaded approval status.
        status: CustomerApprovalStatus,
    },
}

impl WorkflowSubject {
    /// Returns the entity name of the subject.
    #[must_use]
    pub const fn entity(&self) -> &'static str {
        match self {
            Self::RateRequest { .. } => RateRequestStatus::ENTITY,
            Self::BookingRequest { .. } => BookingStatus::ENTITY,
            Self::Itinerary { .. } => ItineraryStatus::ENTITY,
            Self::Customer { .. } => CustomerApprovalStatus::ENTITY,
        }
    }

    /// Returns the id of the subject.
    #[must_use]
    pub const fn id(&self) -> i64 {
        match self {
            Self::RateRequest { id, .. }
            | Self::BookingRequest { id, .. }
            | Self::Itinerary { id, .. }
            | Self::Customer { id, .. } => *id,
        }
    }
}

/// The result of a successful transition check.
///
/// Nothing has been written yet: the persistence layer applies the status
/// change with a conditional update on `expected_from` and records
/// `audit_event` in the same transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The entity name, e.g. `booking_request`.
    pub entity: &'static str,
    /// The id of the record being changed.
    pub entity_id: i64,
    /// The status the record was loaded in.
    pub from: &'static str,
    /// The status the record moves to.
    pub to: &'static str,
    /// Statuses the record may still be in when the update runs.
    pub expected_from: Vec<&'static str>,
    /// Message to report if the record moved on before the update ran.
    pub rejection: &'static str,
    /// The command that produced this result.
    pub command: Command,
    /// The user performing the transition.
    pub actor_user_id: Option<i64>,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}
