// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for writes that depend on a parent's status.

use crate::tests::{
    actor_for, create_test_cause, create_test_customer, create_test_rate_request, demo_user,
    seeded_persistence,
};
use crate::{
    CustomerPatch, ItineraryItemPatch, NewBookingRequest, NewItineraryItem, Persistence,
    PersistenceError,
};
use freight_desk::guard::{
    BOOKING_ADD_RO_DOCUMENT, BOOKING_OPEN_JOB, CUSTOMER_UPDATE, ITINERARY_ADD_ITEM,
    ITINERARY_DELETE, ITINERARY_REMOVE_ITEM, ITINERARY_UPDATE_ITEM,
};
use freight_desk::{Command, WorkflowSubject, apply};
use freight_desk_domain::{
    BookingStatus, CustomerApprovalStatus, Decision, ItineraryStatus, ItineraryType, RateLink,
};
use serde_json::json;

fn pending_booking(persistence: &mut Persistence) -> (i64, i64) {
    let sales = demo_user(persistence, "sales@freight.com");
    let cse = demo_user(persistence, "cse@freight.com");
    let customer_id = create_test_customer(persistence, sales.user_id);
    let rate_request_id =
        create_test_rate_request(persistence, "RR-GUARD-0001", sales.user_id, customer_id);
    let booking_id = persistence
        .create_booking_request(&NewBookingRequest {
            customer_id,
            link: RateLink::Request(rate_request_id),
            raised_by_id: cse.user_id,
        })
        .unwrap();
    (booking_id, cse.user_id)
}

fn confirm(persistence: &mut Persistence, booking_id: i64) {
    let cse = demo_user(persistence, "cse@freight.com");
    let result = apply(
        WorkflowSubject::BookingRequest {
            id: booking_id,
            status: BookingStatus::Pending,
        },
        Command::ConfirmBookingRequest,
        actor_for(&cse),
        create_test_cause(),
    )
    .unwrap();
    persistence.persist_transition(&result).unwrap();
}

fn draft_itinerary_with_item(persistence: &mut Persistence) -> (i64, i64, i64) {
    let sales = demo_user(persistence, "sales@freight.com");
    let itinerary_id = persistence
        .create_itinerary(sales.user_id, ItineraryType::Sp, "2026-03-02T00:00:00Z")
        .unwrap();
    let item_id = persistence
        .add_itinerary_item(
            itinerary_id,
            &NewItineraryItem {
                date: String::from("2026-03-03T00:00:00Z"),
                purpose: String::from("Quarterly review"),
                location: Some(String::from("Colombo 03")),
                ..NewItineraryItem::default()
            },
            &ITINERARY_ADD_ITEM,
        )
        .unwrap();
    (itinerary_id, item_id, sales.user_id)
}

#[test]
fn test_ro_document_requires_confirmed_booking() {
    let mut persistence = seeded_persistence();
    let (booking_id, _) = pending_booking(&mut persistence);

    let result = persistence.add_ro_document(booking_id, "RO-1", None, &BOOKING_ADD_RO_DOCUMENT);
    match result {
        Err(PersistenceError::StaleState { message, .. }) => {
            assert_eq!(message, "Booking request must be confirmed to add RO document");
        }
        other => panic!("expected StaleState, got {other:?}"),
    }

    confirm(&mut persistence, booking_id);
    persistence
        .add_ro_document(
            booking_id,
            "RO-1",
            Some("https://files.example/ro-1.pdf"),
            &BOOKING_ADD_RO_DOCUMENT,
        )
        .unwrap();
    let documents = persistence.ro_documents_for_booking(booking_id).unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].number, "RO-1");
}

#[test]
fn test_job_open_and_complete() {
    let mut persistence = seeded_persistence();
    let (booking_id, cse_id) = pending_booking(&mut persistence);

    let refused = persistence.open_job(booking_id, "ERP-77", cse_id, &BOOKING_OPEN_JOB);
    assert!(matches!(refused, Err(PersistenceError::StaleState { .. })));

    confirm(&mut persistence, booking_id);
    let job_id = persistence
        .open_job(booking_id, "ERP-77", cse_id, &BOOKING_OPEN_JOB)
        .unwrap();
    persistence
        .complete_job(job_id, &json!({ "blNumber": "BL-123" }), cse_id)
        .unwrap();

    let completions = persistence.completions_for_job(job_id).unwrap();
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0].details["blNumber"], json!("BL-123"));
    assert_eq!(persistence.list_jobs(Some(cse_id)).unwrap().len(), 1);
}

#[test]
fn test_itinerary_items_are_frozen_after_submit() {
    let mut persistence = seeded_persistence();
    let (itinerary_id, item_id, owner_id) = draft_itinerary_with_item(&mut persistence);
    let owner = persistence.get_user_by_id(owner_id).unwrap().unwrap();

    persistence
        .update_itinerary_item(
            item_id,
            &ItineraryItemPatch {
                purpose: Some(String::from("Contract renewal")),
                ..ItineraryItemPatch::default()
            },
            &ITINERARY_UPDATE_ITEM,
        )
        .unwrap();
    let item = persistence.get_itinerary_item(item_id).unwrap().unwrap();
    assert_eq!(item.purpose, "Contract renewal");

    let submit = apply(
        WorkflowSubject::Itinerary {
            id: itinerary_id,
            status: ItineraryStatus::Draft,
            owner_id,
        },
        Command::SubmitItinerary,
        actor_for(&owner),
        create_test_cause(),
    )
    .unwrap();
    persistence.persist_transition(&submit).unwrap();

    let add = persistence.add_itinerary_item(
        itinerary_id,
        &NewItineraryItem {
            date: String::from("2026-03-04T00:00:00Z"),
            purpose: String::from("Late addition"),
            ..NewItineraryItem::default()
        },
        &ITINERARY_ADD_ITEM,
    );
    assert!(matches!(add, Err(PersistenceError::StaleState { .. })));

    let remove = persistence.remove_itinerary_item(item_id, &ITINERARY_REMOVE_ITEM);
    assert!(matches!(remove, Err(PersistenceError::StaleState { .. })));

    let delete = persistence.delete_itinerary(itinerary_id, &ITINERARY_DELETE);
    assert!(matches!(delete, Err(PersistenceError::StaleState { .. })));
    assert_eq!(persistence.items_for_itinerary(itinerary_id).unwrap().len(), 1);
}

#[test]
fn test_draft_itinerary_delete_removes_items() {
    let mut persistence = seeded_persistence();
    let (itinerary_id, item_id, _) = draft_itinerary_with_item(&mut persistence);

    persistence
        .delete_itinerary(itinerary_id, &ITINERARY_DELETE)
        .unwrap();
    assert!(persistence.get_itinerary(itinerary_id).unwrap().is_none());
    assert!(persistence.get_itinerary_item(item_id).unwrap().is_none());
}

#[test]
fn test_approved_customer_cannot_be_edited() {
    let mut persistence = seeded_persistence();
    let sales = demo_user(&mut persistence, "sales@freight.com");
    let head = demo_user(&mut persistence, "sbuhead@freight.com");
    let customer_id = create_test_customer(&mut persistence, sales.user_id);

    let patch = CustomerPatch {
        city: Some(String::from("Negombo")),
        ..CustomerPatch::default()
    };
    persistence
        .update_customer(customer_id, &patch, &CUSTOMER_UPDATE)
        .unwrap();
    assert_eq!(
        persistence
            .get_customer(customer_id)
            .unwrap()
            .unwrap()
            .city
            .as_deref(),
        Some("Negombo")
    );

    let approve = apply(
        WorkflowSubject::Customer {
            id: customer_id,
            status: CustomerApprovalStatus::Pending,
        },
        Command::DecideCustomer {
            decision: Decision::Approve,
            note: None,
        },
        actor_for(&head),
        create_test_cause(),
    )
    .unwrap();
    persistence.persist_transition(&approve).unwrap();

    let result = persistence.update_customer(customer_id, &patch, &CUSTOMER_UPDATE);
    match result {
        Err(PersistenceError::StaleState { message, .. }) => {
            assert_eq!(message, "Cannot update approved customer");
        }
        other => panic!("expected StaleState, got {other:?}"),
    }
}
