// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use freight_desk_domain::{BookingStatus, RateSource};
use freight_desk_persistence::{BookingRequestData, CustomerData, Persistence};
use serde_json::json;

use super::helpers::{
    ADMIN_EMAIL, CSE_EMAIL, PRICING_EMAIL, RecordingQueue, SALES_EMAIL, actor, approved_customer,
    create_test_cause, pricing_response, sea_request, seeded_persistence,
};
use crate::handlers::bookings::{
    add_ro_document, cancel_booking_request, complete_job, confirm_booking_request,
    create_booking_request, get_booking_request, list_booking_requests, list_jobs, open_erp_job,
};
use crate::handlers::customers::delete_customer;
use crate::handlers::rate_requests::{create_rate_request, respond_to_rate_request};
use crate::{
    AddRoDocumentRequest, ApiError, BookingQuery, CancelBookingRequest, CompleteJobRequest,
    ConfirmBookingRequest, CreateBookingRequestRequest, OpenJobRequest,
};

/// Raises a rate request, answers it with `valid_to` and books against it.
fn booking_with_quote(
    persistence: &mut Persistence,
    queue: &RecordingQueue,
    valid_to: &str,
) -> BookingRequestData {
    let customer: CustomerData = approved_customer(persistence);
    let sales = actor(persistence, SALES_EMAIL);
    let pricing = actor(persistence, PRICING_EMAIL);

    let rate_request = create_rate_request(
        persistence,
        queue,
        &sales,
        &sea_request(customer.customer_id),
    )
    .unwrap();
    respond_to_rate_request(
        persistence,
        queue,
        &pricing,
        rate_request.rate_request_id,
        &pricing_response(valid_to),
        create_test_cause(),
    )
    .unwrap();

    create_booking_request(
        persistence,
        &sales,
        CreateBookingRequestRequest {
            customer_id: customer.customer_id,
            rate_source: RateSource::Request,
            link_id: rate_request.rate_request_id,
        },
    )
    .unwrap()
}

fn confirm(
    persistence: &mut Persistence,
    queue: &RecordingQueue,
    booking_request_id: i64,
    override_validity: bool,
) -> Result<BookingRequestData, ApiError> {
    let sales = actor(persistence, SALES_EMAIL);
    confirm_booking_request(
        persistence,
        queue,
        &sales,
        booking_request_id,
        ConfirmBookingRequest { override_validity },
        create_test_cause(),
    )
}

fn cancel(
    persistence: &mut Persistence,
    booking_request_id: i64,
) -> Result<BookingRequestData, ApiError> {
    let sales = actor(persistence, SALES_EMAIL);
    cancel_booking_request(
        persistence,
        &sales,
        booking_request_id,
        &CancelBookingRequest {
            reason: String::from("Customer withdrew"),
        },
        create_test_cause(),
    )
}

fn ro_document() -> AddRoDocumentRequest {
    AddRoDocumentRequest {
        number: String::from("RO-7781"),
        file_url: None,
    }
}

#[test]
fn test_new_booking_is_pending() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();

    let booking = booking_with_quote(&mut persistence, &queue, "2099-12-31");

    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.rate_source, RateSource::Request);
    assert!(booking.rate_request_id.is_some());
    assert_eq!(booking.predefined_rate_id, None);
}

#[test]
fn test_booking_against_unknown_rate_is_not_found() {
    let mut persistence = seeded_persistence();
    let customer = approved_customer(&mut persistence);
    let sales = actor(&mut persistence, SALES_EMAIL);

    let err = create_booking_request(
        &mut persistence,
        &sales,
        CreateBookingRequestRequest {
            customer_id: customer.customer_id,
            rate_source: RateSource::Predefined,
            link_id: 77,
        },
    )
    .unwrap_err();

    assert_eq!(err.to_string(), "Predefined rate not found");
}

#[test]
fn test_confirm_with_valid_quote_notifies_raiser() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let booking = booking_with_quote(&mut persistence, &queue, "2099-12-31");

    let confirmed = confirm(&mut persistence, &queue, booking.booking_request_id, false).unwrap();

    assert_eq!(confirmed.status, BookingStatus::Confirmed);
    assert!(confirmed.confirmed_by_id.is_some());
    let inbox = persistence
        .list_system_notifications(booking.raised_by_id, None)
        .unwrap();
    assert!(
        inbox
            .iter()
            .any(|n| n.subject == "Booking Request Confirmed")
    );
}

#[test]
fn test_confirm_with_expired_quote_requires_override() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let booking = booking_with_quote(&mut persistence, &queue, "2020-01-01");

    let err = confirm(&mut persistence, &queue, booking.booking_request_id, false).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "overrideValidity"));
    let unchanged = get_booking_request(&mut persistence, booking.booking_request_id).unwrap();
    assert_eq!(unchanged.booking.status, BookingStatus::Pending);

    let confirmed = confirm(&mut persistence, &queue, booking.booking_request_id, true).unwrap();
    assert_eq!(confirmed.status, BookingStatus::Confirmed);
}

#[test]
fn test_confirm_only_from_pending() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let booking = booking_with_quote(&mut persistence, &queue, "2099-12-31");
    confirm(&mut persistence, &queue, booking.booking_request_id, false).unwrap();

    let err = confirm(&mut persistence, &queue, booking.booking_request_id, false).unwrap_err();

    assert_eq!(
        err,
        ApiError::Forbidden {
            message: String::from("Booking request is not pending")
        }
    );
}

#[test]
fn test_cancel_allowed_until_already_cancelled() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let booking = booking_with_quote(&mut persistence, &queue, "2099-12-31");
    confirm(&mut persistence, &queue, booking.booking_request_id, false).unwrap();

    let cancelled = cancel(&mut persistence, booking.booking_request_id).unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert_eq!(cancelled.cancel_reason.as_deref(), Some("Customer withdrew"));

    let err = cancel(&mut persistence, booking.booking_request_id).unwrap_err();
    assert_eq!(err.to_string(), "Booking request is already cancelled");
}

#[test]
fn test_cancel_requires_reason() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let booking = booking_with_quote(&mut persistence, &queue, "2099-12-31");
    let sales = actor(&mut persistence, SALES_EMAIL);

    let result = cancel_booking_request(
        &mut persistence,
        &sales,
        booking.booking_request_id,
        &CancelBookingRequest {
            reason: String::new(),
        },
        create_test_cause(),
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_ro_document_and_job_require_confirmed_booking() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let booking = booking_with_quote(&mut persistence, &queue, "2099-12-31");
    let cse = actor(&mut persistence, CSE_EMAIL);

    let err = add_ro_document(
        &mut persistence,
        &queue,
        &cse,
        booking.booking_request_id,
        &ro_document(),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Booking request must be confirmed to add RO document"
    );

    let err = open_erp_job(
        &mut persistence,
        &cse,
        booking.booking_request_id,
        &OpenJobRequest {
            erp_job_no: String::from("ERP-1001"),
        },
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Booking request must be confirmed to open ERP job");

    cancel(&mut persistence, booking.booking_request_id).unwrap();
    let err = add_ro_document(
        &mut persistence,
        &queue,
        &cse,
        booking.booking_request_id,
        &ro_document(),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden { .. }));
}

#[test]
fn test_confirmed_booking_runs_through_ro_document_and_job() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let booking = booking_with_quote(&mut persistence, &queue, "2099-12-31");
    confirm(&mut persistence, &queue, booking.booking_request_id, false).unwrap();
    let cse = actor(&mut persistence, CSE_EMAIL);

    let document = add_ro_document(
        &mut persistence,
        &queue,
        &cse,
        booking.booking_request_id,
        &ro_document(),
    )
    .unwrap();
    assert_eq!(document.number, "RO-7781");
    let cse_inbox = persistence
        .list_system_notifications(cse.user_id, None)
        .unwrap();
    assert_eq!(cse_inbox[0].subject, "RO Document Received");

    let job = open_erp_job(
        &mut persistence,
        &cse,
        booking.booking_request_id,
        &OpenJobRequest {
            erp_job_no: String::from("ERP-1001"),
        },
    )
    .unwrap();
    let completion = complete_job(
        &mut persistence,
        &cse,
        job.job_id,
        &CompleteJobRequest {
            details: json!({ "blNumber": "MSCU1234567" }),
        },
    )
    .unwrap();
    assert_eq!(completion.job_id, job.job_id);

    let detail = get_booking_request(&mut persistence, booking.booking_request_id).unwrap();
    assert_eq!(detail.ro_documents.len(), 1);
    assert_eq!(detail.jobs.len(), 1);
    assert_eq!(detail.jobs[0].completions.len(), 1);

    let jobs = list_jobs(&mut persistence, &cse).unwrap();
    assert_eq!(jobs.len(), 1);
}

#[test]
fn test_sales_cannot_open_jobs() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let booking = booking_with_quote(&mut persistence, &queue, "2099-12-31");
    confirm(&mut persistence, &queue, booking.booking_request_id, false).unwrap();
    let sales = actor(&mut persistence, SALES_EMAIL);

    let err = open_erp_job(
        &mut persistence,
        &sales,
        booking.booking_request_id,
        &OpenJobRequest {
            erp_job_no: String::from("ERP-1002"),
        },
    )
    .unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { .. }));
}

#[test]
fn test_booking_listing_filters_by_status() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let first = booking_with_quote(&mut persistence, &queue, "2099-12-31");
    booking_with_quote(&mut persistence, &queue, "2099-12-31");
    confirm(&mut persistence, &queue, first.booking_request_id, false).unwrap();
    let admin = actor(&mut persistence, ADMIN_EMAIL);

    let confirmed = list_booking_requests(
        &mut persistence,
        &admin,
        BookingQuery {
            status: Some(BookingStatus::Confirmed),
            mine: None,
        },
    )
    .unwrap();

    assert_eq!(confirmed.len(), 1);
    assert_eq!(confirmed[0].booking_request_id, first.booking_request_id);
}

#[test]
fn test_customer_with_bookings_cannot_be_deleted() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let booking = booking_with_quote(&mut persistence, &queue, "2099-12-31");
    let admin = actor(&mut persistence, ADMIN_EMAIL);

    let err = delete_customer(&mut persistence, &admin, booking.customer_id).unwrap_err();

    assert!(matches!(err, ApiError::Forbidden { .. }));
    assert!(persistence.get_customer(booking.customer_id).unwrap().is_some());
}
