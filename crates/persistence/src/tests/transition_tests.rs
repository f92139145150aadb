// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for conditional status updates and their audit events.

use crate::tests::{
    actor_for, create_test_cause, create_test_customer, create_test_rate_request, demo_user,
    seeded_persistence,
};
use crate::{NewBookingRequest, NewLineQuote, NewRateResponse, Persistence, PersistenceError};
use freight_desk::{Command, TransitionResult, WorkflowSubject, apply};
use freight_desk_domain::{
    BookingStatus, CustomerApprovalStatus, Decision, ItineraryStatus, ItineraryType, RateLink,
    RateRequestStatus,
};
use serde_json::json;

fn test_response(responded_by_id: i64) -> NewRateResponse {
    NewRateResponse {
        line_no: 1,
        requested_line_id: None,
        requested_equipment_type_id: None,
        vessel_name: Some(String::from("MSC Aurora")),
        eta: None,
        etd: None,
        fcl_cutoff: None,
        doc_cutoff: None,
        valid_to: String::from("2026-12-31T00:00:00Z"),
        charges: json!({ "oceanFreight": 1450.0, "currency": "USD" }),
        responded_by_id,
    }
}

/// Creates a rate request and moves it to `PROCESSING` with one response.
fn responded_request(persistence: &mut Persistence) -> i64 {
    let sales = demo_user(persistence, "sales@freight.com");
    let pricing = demo_user(persistence, "pricing@freight.com");
    let customer_id = create_test_customer(persistence, sales.user_id);
    let rate_request_id =
        create_test_rate_request(persistence, "RR-TEST-0001", sales.user_id, customer_id);

    let result: TransitionResult = apply(
        WorkflowSubject::RateRequest {
            id: rate_request_id,
            status: RateRequestStatus::Pending,
        },
        Command::RespondToRateRequest,
        actor_for(&pricing),
        create_test_cause(),
    )
    .unwrap();
    persistence
        .persist_rate_response(&result, &test_response(pricing.user_id))
        .unwrap();
    rate_request_id
}

#[test]
fn test_response_moves_request_to_processing() {
    let mut persistence = seeded_persistence();
    let rate_request_id = responded_request(&mut persistence);

    let request = persistence.get_rate_request(rate_request_id).unwrap().unwrap();
    assert_eq!(request.status, RateRequestStatus::Processing);

    let responses = persistence.responses_for_request(rate_request_id).unwrap();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].vessel_name.as_deref(), Some("MSC Aurora"));
    assert_eq!(responses[0].charges["oceanFreight"], json!(1450.0));

    let events = persistence
        .audit_events_for_entity("rate_request", rate_request_id)
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action.name, "RespondToRateRequest");
    assert_eq!(events[0].before.data, "status=PENDING");
    assert_eq!(events[0].after.data, "status=PROCESSING");
}

#[test]
fn test_second_response_from_stale_state_is_rejected() {
    let mut persistence = seeded_persistence();
    let rate_request_id = responded_request(&mut persistence);
    let pricing = demo_user(&mut persistence, "pricing@freight.com");

    // Built from the status loaded before the first response landed
    let stale: TransitionResult = apply(
        WorkflowSubject::RateRequest {
            id: rate_request_id,
            status: RateRequestStatus::Pending,
        },
        Command::RespondToRateRequest,
        actor_for(&pricing),
        create_test_cause(),
    )
    .unwrap();

    let result = persistence.persist_rate_response(&stale, &test_response(pricing.user_id));
    assert!(matches!(
        result,
        Err(PersistenceError::StaleTransition { .. })
    ));

    // Nothing from the failed write is kept
    assert_eq!(persistence.responses_for_request(rate_request_id).unwrap().len(), 1);
    assert_eq!(
        persistence
            .audit_events_for_entity("rate_request", rate_request_id)
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_reject_records_remark() {
    let mut persistence = seeded_persistence();
    let rate_request_id = responded_request(&mut persistence);
    let pricing = demo_user(&mut persistence, "pricing@freight.com");

    let result = apply(
        WorkflowSubject::RateRequest {
            id: rate_request_id,
            status: RateRequestStatus::Processing,
        },
        Command::RejectRateRequest {
            remark: String::from("No space on requested sailing"),
        },
        actor_for(&pricing),
        create_test_cause(),
    )
    .unwrap();
    persistence.persist_transition(&result).unwrap();

    let request = persistence.get_rate_request(rate_request_id).unwrap().unwrap();
    assert_eq!(request.status, RateRequestStatus::Rejected);
    assert_eq!(
        request.rejection_remark.as_deref(),
        Some("No space on requested sailing")
    );
}

#[test]
fn test_booking_confirm_then_stale_confirm() {
    let mut persistence = seeded_persistence();
    let rate_request_id = responded_request(&mut persistence);
    let cse = demo_user(&mut persistence, "cse@freight.com");
    let request = persistence.get_rate_request(rate_request_id).unwrap().unwrap();

    let booking_id = persistence
        .create_booking_request(&NewBookingRequest {
            customer_id: request.customer_id,
            link: RateLink::Request(rate_request_id),
            raised_by_id: cse.user_id,
        })
        .unwrap();

    let loaded = WorkflowSubject::BookingRequest {
        id: booking_id,
        status: BookingStatus::Pending,
    };
    let first = apply(
        loaded,
        Command::ConfirmBookingRequest,
        actor_for(&cse),
        create_test_cause(),
    )
    .unwrap();
    let second = first.clone();

    persistence.persist_transition(&first).unwrap();
    let result = persistence.persist_transition(&second);
    assert!(matches!(
        result,
        Err(PersistenceError::StaleTransition {
            entity: "booking_request",
            ..
        })
    ));

    let booking = persistence.get_booking_request(booking_id).unwrap().unwrap();
    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(booking.confirmed_by_id, Some(cse.user_id));
    assert!(booking.confirmed_at.is_some());
    assert_eq!(booking.link, RateLink::Request(rate_request_id));
}

#[test]
fn test_customer_approval_records_approver() {
    let mut persistence = seeded_persistence();
    let sales = demo_user(&mut persistence, "sales@freight.com");
    let head = demo_user(&mut persistence, "sbuhead@freight.com");
    let customer_id = create_test_customer(&mut persistence, sales.user_id);

    // Pending customers are hidden from the default listing
    assert!(persistence.list_customers(false).unwrap().is_empty());

    let result = apply(
        WorkflowSubject::Customer {
            id: customer_id,
            status: CustomerApprovalStatus::Pending,
        },
        Command::DecideCustomer {
            decision: Decision::Approve,
            note: Some(String::from("Verified trade licence")),
        },
        actor_for(&head),
        create_test_cause(),
    )
    .unwrap();
    persistence.persist_transition(&result).unwrap();

    let customer = persistence.get_customer(customer_id).unwrap().unwrap();
    assert_eq!(customer.approval_status, CustomerApprovalStatus::Approved);
    assert_eq!(customer.approved_by_id, Some(head.user_id));
    assert_eq!(customer.approval_note.as_deref(), Some("Verified trade licence"));
    assert_eq!(persistence.list_customers(false).unwrap().len(), 1);
}

#[test]
fn test_itinerary_submit_and_reject() {
    let mut persistence = seeded_persistence();
    let sales = demo_user(&mut persistence, "sales@freight.com");
    let head = demo_user(&mut persistence, "sbuhead@freight.com");
    let itinerary_id = persistence
        .create_itinerary(sales.user_id, ItineraryType::Sp, "2026-03-02T00:00:00Z")
        .unwrap();

    let submit = apply(
        WorkflowSubject::Itinerary {
            id: itinerary_id,
            status: ItineraryStatus::Draft,
            owner_id: sales.user_id,
        },
        Command::SubmitItinerary,
        actor_for(&sales),
        create_test_cause(),
    )
    .unwrap();
    persistence.persist_transition(&submit).unwrap();

    let reject = apply(
        WorkflowSubject::Itinerary {
            id: itinerary_id,
            status: ItineraryStatus::Submitted,
            owner_id: sales.user_id,
        },
        Command::DecideItinerary {
            decision: Decision::Reject,
            note: Some(String::from("Add the Kandy visits")),
        },
        actor_for(&head),
        create_test_cause(),
    )
    .unwrap();
    persistence.persist_transition(&reject).unwrap();

    let itinerary = persistence.get_itinerary(itinerary_id).unwrap().unwrap();
    assert_eq!(itinerary.status, ItineraryStatus::Rejected);
    assert!(itinerary.submitted_at.is_some());
    assert_eq!(itinerary.approver_id, Some(head.user_id));
    assert_eq!(itinerary.approve_note.as_deref(), Some("Add the Kandy visits"));

    let actions: Vec<String> = persistence
        .audit_events_for_entity("itinerary", itinerary_id)
        .unwrap()
        .into_iter()
        .map(|event| event.action.name)
        .collect();
    assert_eq!(actions, vec!["SubmitItinerary", "RejectItinerary"]);
}

#[test]
fn test_only_one_line_quote_is_selected() {
    let mut persistence = seeded_persistence();
    let rate_request_id = responded_request(&mut persistence);
    let lines = persistence.list_shipping_lines().unwrap();

    let quote = |shipping_line_id: i64| NewLineQuote {
        shipping_line_id,
        equipment_type_id: None,
        terms: json!({ "freeDays": 14 }),
        valid_to: String::from("2026-12-31T00:00:00Z"),
        selected: true,
    };

    persistence
        .add_line_quote(rate_request_id, &quote(lines[0].shipping_line_id))
        .unwrap();
    let second = persistence
        .add_line_quote(rate_request_id, &quote(lines[1].shipping_line_id))
        .unwrap();

    let quotes = persistence.line_quotes_for_request(rate_request_id).unwrap();
    assert_eq!(quotes.len(), 2);
    assert_eq!(quotes.iter().filter(|quote| quote.selected).count(), 1);

    let selected = persistence
        .selected_line_quote(rate_request_id)
        .unwrap()
        .unwrap();
    assert_eq!(selected.line_quote_id, second);
}
