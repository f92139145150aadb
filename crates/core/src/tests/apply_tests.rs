// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Command, CoreError, TransitionResult, WorkflowSubject, apply};
use freight_desk_domain::{
    BookingStatus, CustomerApprovalStatus, Decision, DomainError, ItineraryStatus,
    RateRequestStatus,
};

use super::helpers::{OTHER_USER_ID, OWNER_ID, create_test_actor, create_test_cause};

fn itinerary(status: ItineraryStatus) -> WorkflowSubject {
    WorkflowSubject::Itinerary {
        id: 3,
        status,
        owner_id: OWNER_ID,
    }
}

#[test]
fn test_respond_moves_pending_request_to_processing() {
    let result: TransitionResult = apply(
        WorkflowSubject::RateRequest {
            id: 9,
            status: RateRequestStatus::Pending,
        },
        Command::RespondToRateRequest,
        create_test_actor(4, "PRICING"),
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(result.entity, "rate_request");
    assert_eq!(result.entity_id, 9);
    assert_eq!(result.from, "PENDING");
    assert_eq!(result.to, "PROCESSING");
    assert_eq!(result.expected_from, vec!["PENDING"]);
    assert_eq!(result.actor_user_id, Some(4));
    assert_eq!(result.audit_event.action.name, "RespondToRateRequest");
    assert_eq!(result.audit_event.before.data, "status=PENDING");
    assert_eq!(result.audit_event.after.data, "status=PROCESSING");
    let subject = result.audit_event.subject.unwrap();
    assert_eq!(subject.entity_type, "rate_request");
    assert_eq!(subject.entity_id, 9);
}

#[test]
fn test_respond_rejected_unless_pending() {
    for status in [
        RateRequestStatus::Processing,
        RateRequestStatus::Completed,
        RateRequestStatus::Rejected,
    ] {
        let result: Result<TransitionResult, CoreError> = apply(
            WorkflowSubject::RateRequest { id: 9, status },
            Command::RespondToRateRequest,
            create_test_actor(4, "PRICING"),
            create_test_cause(),
        );
        let err: CoreError = result.unwrap_err();
        assert_eq!(
            err,
            CoreError::DomainViolation(DomainError::TransitionRejected {
                entity: "rate_request",
                action: "respond",
                from: status.as_str().to_string(),
                message: String::from("Rate request is not pending"),
            })
        );
    }
}

#[test]
fn test_reject_records_remark_in_audit_details() {
    let result: TransitionResult = apply(
        WorkflowSubject::RateRequest {
            id: 9,
            status: RateRequestStatus::Processing,
        },
        Command::RejectRateRequest {
            remark: String::from("No space on vessel"),
        },
        create_test_actor(4, "PRICING"),
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(result.to, "REJECTED");
    assert_eq!(result.expected_from, vec!["PENDING", "PROCESSING"]);
    let details: String = result.audit_event.action.details.unwrap();
    assert!(details.ends_with("No space on vessel"));
}

#[test]
fn test_confirm_rejected_for_cancelled_booking() {
    let err: CoreError = apply(
        WorkflowSubject::BookingRequest {
            id: 1,
            status: BookingStatus::Cancelled,
        },
        Command::ConfirmBookingRequest,
        create_test_actor(2, "SALES"),
        create_test_cause(),
    )
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Domain violation: Booking request is not pending"
    );
}

#[test]
fn test_cancel_from_confirmed() {
    let result: TransitionResult = apply(
        WorkflowSubject::BookingRequest {
            id: 1,
            status: BookingStatus::Confirmed,
        },
        Command::CancelBookingRequest {
            reason: String::from("Customer withdrew"),
        },
        create_test_actor(2, "SALES"),
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(result.from, "CONFIRMED");
    assert_eq!(result.to, "CANCELLED");
}

#[test]
fn test_submit_requires_owner_before_status() {
    // A non-owner hears about ownership even when the itinerary is not a draft
    let err: CoreError = apply(
        itinerary(ItineraryStatus::Approved),
        Command::SubmitItinerary,
        create_test_actor(OTHER_USER_ID, "SALES"),
        create_test_cause(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        CoreError::DomainViolation(DomainError::NotOwner {
            message: String::from("You can only submit your own itineraries"),
        })
    );

    let err: CoreError = apply(
        itinerary(ItineraryStatus::Submitted),
        Command::SubmitItinerary,
        create_test_actor(OWNER_ID, "SALES"),
        create_test_cause(),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Domain violation: Can only submit draft itineraries"
    );
}

#[test]
fn test_submit_draft_by_owner() {
    let result: TransitionResult = apply(
        itinerary(ItineraryStatus::Draft),
        Command::SubmitItinerary,
        create_test_actor(OWNER_ID, "CSE"),
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(result.to, "SUBMITTED");
    assert_eq!(result.audit_event.actor.actor_type, "CSE");
}

#[test]
fn test_itinerary_decision_targets() {
    let approve: TransitionResult = apply(
        itinerary(ItineraryStatus::Submitted),
        Command::DecideItinerary {
            decision: Decision::Approve,
            note: Some(String::from("Good plan")),
        },
        create_test_actor(OTHER_USER_ID, "SBU_HEAD"),
        create_test_cause(),
    )
    .unwrap();
    assert_eq!(approve.to, "APPROVED");
    assert_eq!(approve.audit_event.action.name, "ApproveItinerary");

    let reject: TransitionResult = apply(
        itinerary(ItineraryStatus::Submitted),
        Command::DecideItinerary {
            decision: Decision::Reject,
            note: None,
        },
        create_test_actor(OTHER_USER_ID, "SBU_HEAD"),
        create_test_cause(),
    )
    .unwrap();
    assert_eq!(reject.to, "REJECTED");

    let err: CoreError = apply(
        itinerary(ItineraryStatus::Draft),
        Command::DecideItinerary {
            decision: Decision::Approve,
            note: None,
        },
        create_test_actor(OTHER_USER_ID, "SBU_HEAD"),
        create_test_cause(),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Domain violation: Can only approve submitted itineraries"
    );
}

#[test]
fn test_owner_cannot_decide_own_itinerary() {
    for (decision, message) in [
        (Decision::Approve, "You cannot approve your own itinerary"),
        (Decision::Reject, "You cannot reject your own itinerary"),
    ] {
        let err: CoreError = apply(
            itinerary(ItineraryStatus::Submitted),
            Command::DecideItinerary {
                decision,
                note: None,
            },
            create_test_actor(OWNER_ID, "ADMIN"),
            create_test_cause(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            CoreError::DomainViolation(DomainError::NotOwner {
                message: String::from(message)
            })
        );
    }
}

#[test]
fn test_customer_decision_only_from_pending() {
    let err: CoreError = apply(
        WorkflowSubject::Customer {
            id: 5,
            status: CustomerApprovalStatus::Approved,
        },
        Command::DecideCustomer {
            decision: Decision::Reject,
            note: None,
        },
        create_test_actor(1, "ADMIN"),
        create_test_cause(),
    )
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Domain violation: Customer is not pending approval"
    );
}

#[test]
fn test_command_for_other_entity_is_not_applicable() {
    let err: CoreError = apply(
        WorkflowSubject::Customer {
            id: 5,
            status: CustomerApprovalStatus::Pending,
        },
        Command::ConfirmBookingRequest,
        create_test_actor(1, "ADMIN"),
        create_test_cause(),
    )
    .unwrap_err();

    assert_eq!(
        err,
        CoreError::CommandNotApplicable {
            command: "ConfirmBookingRequest",
            entity: "customer",
        }
    );
}
