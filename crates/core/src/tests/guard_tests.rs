// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The guard tables must never allow a transition the lifecycle forbids.

use crate::guard::{
    BOOKING_ADD_RO_DOCUMENT, BOOKING_CANCEL, BOOKING_CONFIRM, BOOKING_OPEN_JOB, CUSTOMER_APPROVE,
    CUSTOMER_REJECT, CUSTOMER_UPDATE, ITINERARY_ADD_ITEM, ITINERARY_APPROVE, ITINERARY_REJECT,
    ITINERARY_SUBMIT, RATE_REQUEST_COMPLETE, RATE_REQUEST_REJECT, RATE_REQUEST_RESPOND,
};
use crate::{TransitionGuard, ensure_not_owner, ensure_owner};
use freight_desk_domain::{
    BookingStatus, CustomerApprovalStatus, DomainError, ItineraryStatus, LifecycleStatus,
    RateRequestStatus,
};

fn assert_guard_matches_lifecycle<S: LifecycleStatus>(guard: &TransitionGuard<S>) {
    for from in guard.allowed_from {
        assert!(
            from.validate_transition(guard.target).is_ok(),
            "guard {} allows {} -> {} which the lifecycle forbids",
            guard.action,
            from.as_str(),
            guard.target.as_str()
        );
    }
}

#[test]
fn test_every_guard_agrees_with_its_lifecycle() {
    assert_guard_matches_lifecycle(&RATE_REQUEST_RESPOND);
    assert_guard_matches_lifecycle(&RATE_REQUEST_COMPLETE);
    assert_guard_matches_lifecycle(&RATE_REQUEST_REJECT);
    assert_guard_matches_lifecycle(&BOOKING_CONFIRM);
    assert_guard_matches_lifecycle(&BOOKING_CANCEL);
    assert_guard_matches_lifecycle(&ITINERARY_SUBMIT);
    assert_guard_matches_lifecycle(&ITINERARY_APPROVE);
    assert_guard_matches_lifecycle(&ITINERARY_REJECT);
    assert_guard_matches_lifecycle(&CUSTOMER_APPROVE);
    assert_guard_matches_lifecycle(&CUSTOMER_REJECT);
}

#[test]
fn test_complete_uses_specific_message_when_already_completed() {
    let err: DomainError = RATE_REQUEST_COMPLETE
        .check(RateRequestStatus::Completed)
        .unwrap_err();
    assert_eq!(err.to_string(), "Rate request is already completed");

    let err: DomainError = RATE_REQUEST_COMPLETE
        .check(RateRequestStatus::Pending)
        .unwrap_err();
    assert_eq!(err.to_string(), "Rate request cannot be completed");
}

#[test]
fn test_reject_allowed_from_pending_and_processing() {
    assert!(RATE_REQUEST_REJECT.check(RateRequestStatus::Pending).is_ok());
    assert!(
        RATE_REQUEST_REJECT
            .check(RateRequestStatus::Processing)
            .is_ok()
    );
    assert!(
        RATE_REQUEST_REJECT
            .check(RateRequestStatus::Rejected)
            .is_err()
    );
    assert_eq!(
        RATE_REQUEST_REJECT.allowed_from_strs(),
        vec!["PENDING", "PROCESSING"]
    );
}

#[test]
fn test_cancel_rejected_only_when_already_cancelled() {
    assert!(BOOKING_CANCEL.check(BookingStatus::Pending).is_ok());
    assert!(BOOKING_CANCEL.check(BookingStatus::Confirmed).is_ok());

    match BOOKING_CANCEL.check(BookingStatus::Cancelled) {
        Err(DomainError::TransitionRejected {
            entity,
            action,
            from,
            message,
        }) => {
            assert_eq!(entity, "booking_request");
            assert_eq!(action, "cancel");
            assert_eq!(from, "CANCELLED");
            assert_eq!(message, "Booking request is already cancelled");
        }
        other => panic!("Expected TransitionRejected, got {other:?}"),
    }
}

#[test]
fn test_attachments_require_confirmed_booking() {
    for status in [BookingStatus::Pending, BookingStatus::Cancelled] {
        assert!(!BOOKING_ADD_RO_DOCUMENT.is_satisfied_by(status));
        assert!(BOOKING_OPEN_JOB.check(status).is_err());
    }
    assert!(BOOKING_ADD_RO_DOCUMENT.check(BookingStatus::Confirmed).is_ok());
    assert!(BOOKING_OPEN_JOB.check(BookingStatus::Confirmed).is_ok());
}

#[test]
fn test_item_changes_require_draft_itinerary() {
    assert!(ITINERARY_ADD_ITEM.check(ItineraryStatus::Draft).is_ok());
    let err: DomainError = ITINERARY_ADD_ITEM
        .check(ItineraryStatus::Submitted)
        .unwrap_err();
    assert_eq!(err.to_string(), "Can only add items to draft itineraries");
}

#[test]
fn test_customer_update_blocked_once_approved() {
    assert!(CUSTOMER_UPDATE.check(CustomerApprovalStatus::Pending).is_ok());
    let err: DomainError = CUSTOMER_UPDATE
        .check(CustomerApprovalStatus::Approved)
        .unwrap_err();
    assert_eq!(err.to_string(), "Cannot update approved customer");
}

#[test]
fn test_ensure_owner() {
    assert!(ensure_owner(5, Some(5), "not yours").is_ok());
    assert_eq!(
        ensure_owner(5, Some(6), "not yours"),
        Err(DomainError::NotOwner {
            message: String::from("not yours")
        })
    );
    assert!(ensure_owner(5, None, "not yours").is_err());
}

#[test]
fn test_ensure_not_owner() {
    assert!(ensure_not_owner(5, Some(6), "your own").is_ok());
    assert!(ensure_not_owner(5, None, "your own").is_ok());
    assert_eq!(
        ensure_not_owner(5, Some(5), "your own"),
        Err(DomainError::NotOwner {
            message: String::from("your own")
        })
    );
}
