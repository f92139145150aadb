// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use freight_desk_domain::{RateRequestStatus, TransportMode};
use freight_desk_persistence::{CustomerData, LineQuoteData, Persistence, RateRequestData};

use super::helpers::{
    COLOMBO_PORT_ID, CSE_EMAIL, DRY_40FT_ID, FLAT_RACK_ID, MAERSK_LINE_ID, MSC_LINE_ID,
    PRICING_EMAIL, RecordingQueue, SALES_EMAIL, actor, approved_customer, create_test_cause,
    pricing_response, sea_request, seeded_persistence,
};
use crate::handlers::rate_requests::{
    add_line_quote, complete_rate_request, create_rate_request, get_processed_percentage,
    get_rate_request, list_rate_requests, reject_rate_request, respond_to_rate_request,
};
use crate::{
    AddLineQuoteRequest, ApiError, AuthenticatedActor, CreateRateRequestRequest, DeliveryJob,
    RateRequestQuery, RejectRateRequestRequest, RespondToRateRequestRequest,
};

fn raise_request(
    persistence: &mut Persistence,
    queue: &RecordingQueue,
    request: &CreateRateRequestRequest,
) -> RateRequestData {
    let sales: AuthenticatedActor = actor(persistence, SALES_EMAIL);
    create_rate_request(persistence, queue, &sales, request).expect("rate request")
}

fn respond(
    persistence: &mut Persistence,
    queue: &RecordingQueue,
    rate_request_id: i64,
    response: &RespondToRateRequestRequest,
) -> Result<freight_desk_persistence::RateResponseData, ApiError> {
    let pricing: AuthenticatedActor = actor(persistence, PRICING_EMAIL);
    respond_to_rate_request(
        persistence,
        queue,
        &pricing,
        rate_request_id,
        response,
        create_test_cause(),
    )
}

#[test]
fn test_sea_request_without_origin_defaults_to_colombo_hub() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let customer: CustomerData = approved_customer(&mut persistence);

    let created: RateRequestData =
        raise_request(&mut persistence, &queue, &sea_request(customer.customer_id));

    assert_eq!(created.pol_id, Some(COLOMBO_PORT_ID));
    assert_eq!(created.status, RateRequestStatus::Pending);
    let (prefix, digits) = created.ref_no.split_at(2);
    assert_eq!(prefix, "RR");
    assert_eq!(digits.len(), 8);
    assert!(digits.chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn test_air_request_without_origin_keeps_it_empty() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let customer: CustomerData = approved_customer(&mut persistence);
    let mut request = sea_request(customer.customer_id);
    request.mode = TransportMode::Air;

    let created: RateRequestData = raise_request(&mut persistence, &queue, &request);

    assert_eq!(created.pol_id, None);
}

#[test]
fn test_create_notifies_every_pricing_user() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let customer: CustomerData = approved_customer(&mut persistence);

    let created: RateRequestData =
        raise_request(&mut persistence, &queue, &sea_request(customer.customer_id));

    let pricing = actor(&mut persistence, PRICING_EMAIL);
    let inbox = persistence
        .list_system_notifications(pricing.user_id, None)
        .unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].subject, "New Rate Request Created");
    assert_eq!(inbox[0].meta.as_ref().unwrap()["refNo"], created.ref_no);
    // SYSTEM and EMAIL records for the one pricing user
    assert_eq!(queue.jobs().len(), 2);
}

#[test]
fn test_flat_rack_without_pallet_dimensions_is_rejected() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let customer: CustomerData = approved_customer(&mut persistence);
    let sales = actor(&mut persistence, SALES_EMAIL);
    let mut request = sea_request(customer.customer_id);
    request.equipment_type_id = Some(FLAT_RACK_ID);

    let err = create_rate_request(&mut persistence, &queue, &sales, &request).unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "palletDims"));
    assert_eq!(
        err.to_string(),
        "Pallet dimensions are required for Flat Rack/Open Top equipment"
    );

    request.pallet_dims = Some(String::from("120x100x150"));
    assert!(create_rate_request(&mut persistence, &queue, &sales, &request).is_ok());
}

#[test]
fn test_unknown_references_are_not_found() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let customer: CustomerData = approved_customer(&mut persistence);
    let sales = actor(&mut persistence, SALES_EMAIL);

    let mut request = sea_request(9_999);
    let err = create_rate_request(&mut persistence, &queue, &sales, &request).unwrap_err();
    assert_eq!(err.to_string(), "Customer not found");

    request = sea_request(customer.customer_id);
    request.pod_id = 9_999;
    let err = create_rate_request(&mut persistence, &queue, &sales, &request).unwrap_err();
    assert_eq!(err.to_string(), "Port not found");

    request = sea_request(customer.customer_id);
    request.preferred_line_id = Some(9_999);
    let err = create_rate_request(&mut persistence, &queue, &sales, &request).unwrap_err();
    assert_eq!(err.to_string(), "Shipping line not found");
}

#[test]
fn test_cse_cannot_raise_rate_requests() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let customer: CustomerData = approved_customer(&mut persistence);
    let cse = actor(&mut persistence, CSE_EMAIL);

    let err = create_rate_request(&mut persistence, &queue, &cse, &sea_request(customer.customer_id))
        .unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { .. }));
}

#[test]
fn test_respond_moves_pending_to_processing_and_notifies_salesperson() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let customer: CustomerData = approved_customer(&mut persistence);
    let created = raise_request(&mut persistence, &queue, &sea_request(customer.customer_id));
    queue.clear();

    let response = respond(
        &mut persistence,
        &queue,
        created.rate_request_id,
        &pricing_response("2099-12-31"),
    )
    .unwrap();

    assert_eq!(response.rate_request_id, created.rate_request_id);
    let reloaded = get_rate_request(&mut persistence, created.rate_request_id).unwrap();
    assert_eq!(reloaded.request.status, RateRequestStatus::Processing);
    assert_eq!(reloaded.responses.len(), 1);

    // The salesperson has a phone, so SYSTEM, EMAIL and SMS records are queued
    let stored: Vec<DeliveryJob> = queue.jobs();
    assert_eq!(stored.len(), 3);
    let inbox = persistence
        .list_system_notifications(created.salesperson_id, None)
        .unwrap();
    assert_eq!(inbox[0].subject, "Rate Request Response Received");
}

#[test]
fn test_respond_requires_pending() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let customer: CustomerData = approved_customer(&mut persistence);
    let created = raise_request(&mut persistence, &queue, &sea_request(customer.customer_id));
    respond(
        &mut persistence,
        &queue,
        created.rate_request_id,
        &pricing_response("2099-12-31"),
    )
    .unwrap();

    let err = respond(
        &mut persistence,
        &queue,
        created.rate_request_id,
        &pricing_response("2099-12-31"),
    )
    .unwrap_err();

    assert_eq!(
        err,
        ApiError::Forbidden {
            message: String::from("Rate request is not pending")
        }
    );
    let responses = persistence
        .responses_for_request(created.rate_request_id)
        .unwrap();
    assert_eq!(responses.len(), 1);
}

#[test]
fn test_respond_requires_vessel_details_when_flagged() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let customer: CustomerData = approved_customer(&mut persistence);
    let mut request = sea_request(customer.customer_id);
    request.vessel_required = true;
    let created = raise_request(&mut persistence, &queue, &request);

    let mut response = pricing_response("2099-12-31");
    response.vessel_name = Some(String::from("MSC Oscar"));
    response.eta = Some(String::from("2026-11-20"));
    let err = respond(&mut persistence, &queue, created.rate_request_id, &response).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Vessel details are required for this rate request"
    );
    let unchanged = persistence
        .get_rate_request(created.rate_request_id)
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.status, RateRequestStatus::Pending);

    response.etd = Some(String::from("2026-11-05"));
    assert!(respond(&mut persistence, &queue, created.rate_request_id, &response).is_ok());
}

#[test]
fn test_selected_line_quote_clears_earlier_selection() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let customer: CustomerData = approved_customer(&mut persistence);
    let created = raise_request(&mut persistence, &queue, &sea_request(customer.customer_id));
    let pricing = actor(&mut persistence, PRICING_EMAIL);

    let quote = |line: i64| AddLineQuoteRequest {
        shipping_line_id: line,
        equipment_type_id: Some(DRY_40FT_ID),
        terms: serde_json::json!({ "freeDays": 14 }),
        valid_to: String::from("2099-06-30"),
        selected: true,
    };
    add_line_quote(&mut persistence, &pricing, created.rate_request_id, &quote(MSC_LINE_ID))
        .unwrap();
    let second: LineQuoteData = add_line_quote(
        &mut persistence,
        &pricing,
        created.rate_request_id,
        &quote(MAERSK_LINE_ID),
    )
    .unwrap();

    let quotes = persistence
        .line_quotes_for_request(created.rate_request_id)
        .unwrap();
    let selected: Vec<&LineQuoteData> = quotes.iter().filter(|q| q.selected).collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].line_quote_id, second.line_quote_id);
}

#[test]
fn test_complete_and_reject_rules() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let customer: CustomerData = approved_customer(&mut persistence);
    let pricing = actor(&mut persistence, PRICING_EMAIL);
    let created = raise_request(&mut persistence, &queue, &sea_request(customer.customer_id));

    let err = complete_rate_request(
        &mut persistence,
        &pricing,
        created.rate_request_id,
        create_test_cause(),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Rate request cannot be completed");

    respond(
        &mut persistence,
        &queue,
        created.rate_request_id,
        &pricing_response("2099-12-31"),
    )
    .unwrap();
    let completed = complete_rate_request(
        &mut persistence,
        &pricing,
        created.rate_request_id,
        create_test_cause(),
    )
    .unwrap();
    assert_eq!(completed.status, RateRequestStatus::Completed);

    let err = complete_rate_request(
        &mut persistence,
        &pricing,
        created.rate_request_id,
        create_test_cause(),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Rate request is already completed");

    let err = reject_rate_request(
        &mut persistence,
        &pricing,
        created.rate_request_id,
        &RejectRateRequestRequest {
            remark: String::from("Too late"),
        },
        create_test_cause(),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Rate request cannot be rejected");
}

#[test]
fn test_reject_records_remark() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let customer: CustomerData = approved_customer(&mut persistence);
    let pricing = actor(&mut persistence, PRICING_EMAIL);
    let created = raise_request(&mut persistence, &queue, &sea_request(customer.customer_id));

    let blank = reject_rate_request(
        &mut persistence,
        &pricing,
        created.rate_request_id,
        &RejectRateRequestRequest {
            remark: String::from("   "),
        },
        create_test_cause(),
    );
    assert!(matches!(blank, Err(ApiError::InvalidInput { .. })));

    let rejected = reject_rate_request(
        &mut persistence,
        &pricing,
        created.rate_request_id,
        &RejectRateRequestRequest {
            remark: String::from("No capacity on this lane"),
        },
        create_test_cause(),
    )
    .unwrap();
    assert_eq!(rejected.status, RateRequestStatus::Rejected);
    assert_eq!(
        rejected.rejection_remark.as_deref(),
        Some("No capacity on this lane")
    );
}

#[test]
fn test_transitions_write_audit_events() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let customer: CustomerData = approved_customer(&mut persistence);
    let created = raise_request(&mut persistence, &queue, &sea_request(customer.customer_id));
    respond(
        &mut persistence,
        &queue,
        created.rate_request_id,
        &pricing_response("2099-12-31"),
    )
    .unwrap();

    let events = persistence
        .audit_events_for_entity("rate_request", created.rate_request_id)
        .unwrap();
    assert_eq!(events.len(), 1);
}

#[test]
fn test_processed_percentage_counts_matching_responses() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let customer: CustomerData = approved_customer(&mut persistence);
    let created = raise_request(&mut persistence, &queue, &sea_request(customer.customer_id));

    let empty = get_processed_percentage(&mut persistence, created.rate_request_id).unwrap();
    assert_eq!(empty.percentage, 0);

    respond(
        &mut persistence,
        &queue,
        created.rate_request_id,
        &pricing_response("2099-12-31"),
    )
    .unwrap();
    let after = get_processed_percentage(&mut persistence, created.rate_request_id).unwrap();
    assert_eq!(after.percentage, 20);

    let mut without_line = sea_request(customer.customer_id);
    without_line.preferred_line_id = None;
    let other = raise_request(&mut persistence, &queue, &without_line);
    let none = get_processed_percentage(&mut persistence, other.rate_request_id).unwrap();
    assert_eq!(none.percentage, 0);
}

#[test]
fn test_sales_listing_is_scoped_to_own_requests() {
    let mut persistence = seeded_persistence();
    let queue = RecordingQueue::default();
    let customer: CustomerData = approved_customer(&mut persistence);
    raise_request(&mut persistence, &queue, &sea_request(customer.customer_id));

    let admin = actor(&mut persistence, super::helpers::ADMIN_EMAIL);
    let admin_request = sea_request(customer.customer_id);
    create_rate_request(&mut persistence, &queue, &admin, &admin_request).unwrap();

    let sales = actor(&mut persistence, SALES_EMAIL);
    let own = list_rate_requests(&mut persistence, &sales, RateRequestQuery::default()).unwrap();
    assert_eq!(own.len(), 1);

    let all = list_rate_requests(&mut persistence, &admin, RateRequestQuery::default()).unwrap();
    assert_eq!(all.len(), 2);

    let mine = list_rate_requests(
        &mut persistence,
        &admin,
        RateRequestQuery {
            mine: Some(true),
            status: None,
        },
    )
    .unwrap();
    assert_eq!(mine.len(), 1);
}

#[test]
fn test_unknown_rate_request_is_not_found() {
    let mut persistence = seeded_persistence();
    let err = get_rate_request(&mut persistence, 404).unwrap_err();
    assert_eq!(err.to_string(), "Rate request not found");
}
