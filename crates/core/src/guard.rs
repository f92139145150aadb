// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transition guards for the workflow entities.
//!
//! Every workflow operation follows the same shape: load the current
//! state, assert a precondition on it, mutate, and optionally notify.
//! A [`TransitionGuard`] captures the precondition and target of one
//! status-changing operation. A [`StateRequirement`] captures the
//! precondition of an operation that writes related records without
//! changing the status (attaching a release order, editing itinerary
//! items, ...).
//!
//! The persistence layer uses [`TransitionGuard::allowed_from_strs`] to
//! repeat the check atomically in its conditional update.

use freight_desk_domain::{
    BookingStatus, CustomerApprovalStatus, DomainError, ItineraryStatus, LifecycleStatus,
    RateRequestStatus,
};

/// Precondition and target of one status-changing operation.
#[derive(Debug, Clone, Copy)]
pub struct TransitionGuard<S: 'static> {
    /// The operation name, e.g. `confirm`.
    pub action: &'static str,
    /// Statuses the operation may start from.
    pub allowed_from: &'static [S],
    /// The status the operation moves to.
    pub target: S,
    /// Message returned when the current status is not allowed.
    pub rejection: &'static str,
    /// Status-specific messages that replace `rejection`.
    pub overrides: &'static [(S, &'static str)],
}

impl<S: LifecycleStatus> TransitionGuard<S> {
    /// Returns the rejection message for a given current status.
    #[must_use]
    pub fn rejection_for(&self, current: S) -> &'static str {
        self.overrides
            .iter()
            .find(|(status, _)| *status == current)
            .map_or(self.rejection, |(_, message)| message)
    }

    /// Checks that the operation may run from `current`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TransitionRejected` carrying the caller-facing
    /// message if `current` is not an allowed source status.
    pub fn check(&self, current: S) -> Result<(), DomainError> {
        if self.allowed_from.contains(&current) {
            return Ok(());
        }

        Err(DomainError::TransitionRejected {
            entity: S::ENTITY,
            action: self.action,
            from: current.as_str().to_string(),
            message: self.rejection_for(current).to_string(),
        })
    }

    /// Returns the persisted form of every allowed source status.
    #[must_use]
    pub fn allowed_from_strs(&self) -> Vec<&'static str> {
        self.allowed_from.iter().map(LifecycleStatus::as_str).collect()
    }
}

/// Precondition on the status of a record that is written without a status change.
#[derive(Debug, Clone, Copy)]
pub struct StateRequirement<S: 'static> {
    /// The operation name, e.g. `add_ro_document`.
    pub action: &'static str,
    /// Statuses in which the operation is allowed.
    pub allowed: &'static [S],
    /// Message returned when the current status is not allowed.
    pub rejection: &'static str,
}

impl<S: LifecycleStatus> StateRequirement<S> {
    /// Checks that the operation may run while the record is in `current`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TransitionRejected` carrying the caller-facing
    /// message if `current` is not allowed.
    pub fn check(&self, current: S) -> Result<(), DomainError> {
        if self.allowed.contains(&current) {
            return Ok(());
        }

        Err(DomainError::TransitionRejected {
            entity: S::ENTITY,
            action: self.action,
            from: current.as_str().to_string(),
            message: self.rejection.to_string(),
        })
    }

    /// Returns true if `current` satisfies the requirement.
    #[must_use]
    pub fn is_satisfied_by(&self, current: S) -> bool {
        self.allowed.contains(&current)
    }
}

/// Checks that the acting user owns a record.
///
/// # Errors
///
/// Returns `DomainError::NotOwner` with `message` if `actor_user_id` is not `owner_id`.
pub fn ensure_owner(
    owner_id: i64,
    actor_user_id: Option<i64>,
    message: &str,
) -> Result<(), DomainError> {
    if actor_user_id == Some(owner_id) {
        Ok(())
    } else {
        Err(DomainError::NotOwner {
            message: message.to_string(),
        })
    }
}

/// Checks that the acting user is not the owner of a record they decide on.
///
/// # Errors
///
/// Returns `DomainError::NotOwner` with `message` if `actor_user_id` is `owner_id`.
pub fn ensure_not_owner(
    owner_id: i64,
    actor_user_id: Option<i64>,
    message: &str,
) -> Result<(), DomainError> {
    if actor_user_id == Some(owner_id) {
        Err(DomainError::NotOwner {
            message: message.to_string(),
        })
    } else {
        Ok(())
    }
}

pub const RATE_REQUEST_RESPOND: TransitionGuard<RateRequestStatus> = TransitionGuard {
    action: "respond",
    allowed_from: &[RateRequestStatus::Pending],
    target: RateRequestStatus::Processing,
    rejection: "Rate request is not pending",
    overrides: &[],
};

pub const RATE_REQUEST_COMPLETE: TransitionGuard<RateRequestStatus> = TransitionGuard {
    action: "complete",
    allowed_from: &[RateRequestStatus::Processing],
    target: RateRequestStatus::Completed,
    rejection: "Rate request cannot be completed",
    overrides: &[(
        RateRequestStatus::Completed,
        "Rate request is already completed",
    )],
};

pub const RATE_REQUEST_REJECT: TransitionGuard<RateRequestStatus> = TransitionGuard {
    action: "reject",
    allowed_from: &[RateRequestStatus::Pending, RateRequestStatus::Processing],
    target: RateRequestStatus::Rejected,
    rejection: "Rate request cannot be rejected",
    overrides: &[],
};

pub const BOOKING_CONFIRM: TransitionGuard<BookingStatus> = TransitionGuard {
    action: "confirm",
    allowed_from: &[BookingStatus::Pending],
    target: BookingStatus::Confirmed,
    rejection: "Booking request is not pending",
    overrides: &[],
};

pub const BOOKING_CANCEL: TransitionGuard<BookingStatus> = TransitionGuard {
    action: "cancel",
    allowed_from: &[BookingStatus::Pending, BookingStatus::Confirmed],
    target: BookingStatus::Cancelled,
    rejection: "Booking request is already cancelled",
    overrides: &[],
};

pub const BOOKING_ADD_RO_DOCUMENT: StateRequirement<BookingStatus> = StateRequirement {
    action: "add_ro_document",
    allowed: &[BookingStatus::Confirmed],
    rejection: "Booking request must be confirmed to add RO document",
};

pub const BOOKING_OPEN_JOB: StateRequirement<BookingStatus> = StateRequirement {
    action: "open_erp_job",
    allowed: &[BookingStatus::Confirmed],
    rejection: "Booking request must be confirmed to open ERP job",
};

pub const ITINERARY_SUBMIT: TransitionGuard<ItineraryStatus> = TransitionGuard {
    action: "submit",
    allowed_from: &[ItineraryStatus::Draft],
    target: ItineraryStatus::Submitted,
    rejection: "Can only submit draft itineraries",
    overrides: &[],
};

pub const ITINERARY_APPROVE: TransitionGuard<ItineraryStatus> = TransitionGuard {
    action: "approve",
    allowed_from: &[ItineraryStatus::Submitted],
    target: ItineraryStatus::Approved,
    rejection: "Can only approve submitted itineraries",
    overrides: &[],
};

pub const ITINERARY_REJECT: TransitionGuard<ItineraryStatus> = TransitionGuard {
    action: "reject",
    allowed_from: &[ItineraryStatus::Submitted],
    target: ItineraryStatus::Rejected,
    rejection: "Can only approve submitted itineraries",
    overrides: &[],
};

pub const ITINERARY_UPDATE: StateRequirement<ItineraryStatus> = StateRequirement {
    action: "update",
    allowed: &[ItineraryStatus::Draft],
    rejection: "Can only update draft itineraries",
};

pub const ITINERARY_DELETE: StateRequirement<ItineraryStatus> = StateRequirement {
    action: "delete",
    allowed: &[ItineraryStatus::Draft],
    rejection: "Can only delete draft itineraries",
};

pub const ITINERARY_ADD_ITEM: StateRequirement<ItineraryStatus> = StateRequirement {
    action: "add_item",
    allowed: &[ItineraryStatus::Draft],
    rejection: "Can only add items to draft itineraries",
};

pub const ITINERARY_UPDATE_ITEM: StateRequirement<ItineraryStatus> = StateRequirement {
    action: "update_item",
    allowed: &[ItineraryStatus::Draft],
    rejection: "Can only update items of draft itineraries",
};

pub const ITINERARY_REMOVE_ITEM: StateRequirement<ItineraryStatus> = StateRequirement {
    action: "remove_item",
    allowed: &[ItineraryStatus::Draft],
    rejection: "Can only remove items from draft itineraries",
};

pub const CUSTOMER_APPROVE: TransitionGuard<CustomerApprovalStatus> = TransitionGuard {
    action: "approve",
    allowed_from: &[CustomerApprovalStatus::Pending],
    target: CustomerApprovalStatus::Approved,
    rejection: "Customer is not pending approval",
    overrides: &[],
};

pub const CUSTOMER_REJECT: TransitionGuard<CustomerApprovalStatus> = TransitionGuard {
    action: "reject",
    allowed_from: &[CustomerApprovalStatus::Pending],
    target: CustomerApprovalStatus::Rejected,
    rejection: "Customer is not pending approval",
    overrides: &[],
};

pub const CUSTOMER_UPDATE: StateRequirement<CustomerApprovalStatus> = StateRequirement {
    action: "update",
    allowed: &[
        CustomerApprovalStatus::Pending,
        CustomerApprovalStatus::Rejected,
    ],
    rejection: "Cannot update approved customer",
};
