// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{Router, http::StatusCode};
use serde_json::{Value, json};

use super::{ADMIN, CSE, PRICING, SALES, login, send, test_app};
use crate::live::LiveEvent;

const HAMBURG_PORT_ID: i64 = 4;
const FLAT_RACK_ID: i64 = 4;

/// Creates a customer as SALES and approves it as ADMIN.
async fn approved_customer(app: &Router, sales: &str, admin: &str) -> i64 {
    let (status, customer) = send(
        app,
        "POST",
        "/customers",
        Some(sales),
        Some(json!({
            "companyName": "Ceylon Tea Exports",
            "contactPerson": "Nimal Perera",
            "email": "nimal@ceylontea.lk"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(customer["approvalStatus"], "PENDING");
    let id = customer["customerId"].as_i64().unwrap();

    let (status, decided) = send(
        app,
        "PATCH",
        &format!("/customers/{id}/approve"),
        Some(admin),
        Some(json!({ "approved": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decided["approvalStatus"], "APPROVED");
    id
}

fn sea_request(customer_id: i64) -> Value {
    json!({
        "customerId": customer_id,
        "mode": "SEA",
        "type": "FCL",
        "podId": HAMBURG_PORT_ID,
        "preferredLineId": 1,
        "equipmentTypeId": 2,
        "weightTons": 18.5,
        "incoterm": "FOB"
    })
}

#[tokio::test]
async fn test_rate_request_round_trip() {
    let app = test_app();
    let mut events = app.state.live.subscribe();
    let sales = login(&app.router, SALES).await;
    let admin = login(&app.router, ADMIN).await;
    let pricing = login(&app.router, PRICING).await;
    let customer_id = approved_customer(&app.router, &sales, &admin).await;

    let (status, created) = send(
        &app.router,
        "POST",
        "/rates/requests",
        Some(&sales),
        Some(sea_request(customer_id)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "PENDING");
    assert_eq!(created["polId"], 1);
    let ref_no = created["refNo"].as_str().unwrap();
    assert_eq!(ref_no.len(), 10);
    assert!(ref_no.starts_with("RR"));
    let id = created["rateRequestId"].as_i64().unwrap();

    let mut saw_created = false;
    while let Ok(event) = events.try_recv() {
        if matches!(event, LiveEvent::RateRequestCreated { rate_request_id, .. } if rate_request_id == id)
        {
            saw_created = true;
        }
    }
    assert!(saw_created);

    let response = json!({
        "requestedLineId": 1,
        "requestedEquipmentTypeId": 2,
        "validTo": "2099-12-31",
        "charges": { "oceanFreight": 1375, "currency": "USD" }
    });
    let uri = format!("/rates/requests/{id}/respond");

    let (status, body) = send(&app.router, "POST", &uri, Some(&sales), Some(response.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], true);

    let (status, _) = send(&app.router, "POST", &uri, Some(&pricing), Some(response.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app.router, "POST", &uri, Some(&pricing), Some(response)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Rate request is not pending");

    let (status, detail) = send(
        &app.router,
        "GET",
        &format!("/rates/requests/{id}"),
        Some(&sales),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["status"], "PROCESSING");
    assert_eq!(detail["responses"].as_array().unwrap().len(), 1);

    let (_, progress) = send(
        &app.router,
        "GET",
        &format!("/rates/requests/{id}/processed-percentage"),
        Some(&sales),
        None,
    )
    .await;
    assert_eq!(progress["percentage"], 20);

    let (status, done) = send(
        &app.router,
        "POST",
        &format!("/rates/requests/{id}/complete"),
        Some(&pricing),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "COMPLETED");
}

#[tokio::test]
async fn test_rate_request_validation_errors() {
    let app = test_app();
    let sales = login(&app.router, SALES).await;
    let admin = login(&app.router, ADMIN).await;
    let customer_id = approved_customer(&app.router, &sales, &admin).await;

    let mut flat_rack = sea_request(customer_id);
    flat_rack["equipmentTypeId"] = json!(FLAT_RACK_ID);
    let (status, body) = send(
        &app.router,
        "POST",
        "/rates/requests",
        Some(&sales),
        Some(flat_rack),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);

    let (status, body) = send(
        &app.router,
        "GET",
        "/rates/requests/9999",
        Some(&sales),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Rate request not found");
}

#[tokio::test]
async fn test_rate_request_listing_is_scoped() {
    let app = test_app();
    let sales = login(&app.router, SALES).await;
    let admin = login(&app.router, ADMIN).await;
    let customer_id = approved_customer(&app.router, &sales, &admin).await;
    for token in [&sales, &admin] {
        let (status, _) = send(
            &app.router,
            "POST",
            "/rates/requests",
            Some(token),
            Some(sea_request(customer_id)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, mine) = send(&app.router, "GET", "/rates/requests", Some(&sales), None).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let (_, all) = send(&app.router, "GET", "/rates/requests", Some(&admin), None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, pending) = send(
        &app.router,
        "GET",
        "/rates/requests?mine=true&status=PENDING",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(pending.as_array().unwrap().len(), 1);
}

/// Raises, prices and books a sea request; returns the pending booking id.
async fn pending_booking(app: &Router, sales: &str, admin: &str) -> i64 {
    let pricing = login(app, PRICING).await;
    let customer_id = approved_customer(app, sales, admin).await;

    let (_, created) = send(
        app,
        "POST",
        "/rates/requests",
        Some(sales),
        Some(sea_request(customer_id)),
    )
    .await;
    let rate_request_id = created["rateRequestId"].as_i64().unwrap();
    send(
        app,
        "POST",
        &format!("/rates/requests/{rate_request_id}/respond"),
        Some(&pricing),
        Some(json!({ "requestedLineId": 1, "validTo": "2099-12-31" })),
    )
    .await;

    let (status, booking) = send(
        app,
        "POST",
        "/booking-requests",
        Some(sales),
        Some(json!({
            "customerId": customer_id,
            "rateSource": "REQUEST",
            "linkId": rate_request_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking["status"], "PENDING");
    booking["bookingRequestId"].as_i64().unwrap()
}

#[tokio::test]
async fn test_booking_through_erp_job() {
    let app = test_app();
    let sales = login(&app.router, SALES).await;
    let admin = login(&app.router, ADMIN).await;
    let cse = login(&app.router, CSE).await;
    let id = pending_booking(&app.router, &sales, &admin).await;

    let (status, body) = send(
        &app.router,
        "POST",
        &format!("/booking-requests/{id}/open-erp-job"),
        Some(&cse),
        Some(json!({ "erpJobNo": "JOB-0001" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], true);

    let (status, confirmed) = send(
        &app.router,
        "POST",
        &format!("/booking-requests/{id}/confirm"),
        Some(&sales),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["status"], "CONFIRMED");

    let (status, _) = send(
        &app.router,
        "POST",
        &format!("/booking-requests/{id}/ro"),
        Some(&sales),
        Some(json!({ "number": "RO-7781" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app.router,
        "POST",
        &format!("/booking-requests/{id}/open-erp-job"),
        Some(&sales),
        Some(json!({ "erpJobNo": "JOB-0001" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, job) = send(
        &app.router,
        "POST",
        &format!("/booking-requests/{id}/open-erp-job"),
        Some(&cse),
        Some(json!({ "erpJobNo": "JOB-0001" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(job["erpJobNo"], "JOB-0001");

    let (status, jobs) = send(
        &app.router,
        "GET",
        "/booking-requests/jobs",
        Some(&cse),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(jobs.as_array().unwrap().len(), 1);

    let (_, detail) = send(
        &app.router,
        "GET",
        &format!("/booking-requests/{id}"),
        Some(&sales),
        None,
    )
    .await;
    assert_eq!(detail["roDocuments"].as_array().unwrap().len(), 1);
    assert_eq!(detail["jobs"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_confirm_accepts_an_explicit_body() {
    let app = test_app();
    let sales = login(&app.router, SALES).await;
    let admin = login(&app.router, ADMIN).await;
    let id = pending_booking(&app.router, &sales, &admin).await;

    let (status, confirmed) = send(
        &app.router,
        "POST",
        &format!("/booking-requests/{id}/confirm"),
        Some(&sales),
        Some(json!({ "overrideValidity": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["status"], "CONFIRMED");

    let (status, body) = send(
        &app.router,
        "POST",
        &format!("/booking-requests/{id}/confirm"),
        Some(&sales),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn test_itinerary_item_routes() {
    let app = test_app();
    let sales = login(&app.router, SALES).await;

    let (status, itinerary) = send(
        &app.router,
        "POST",
        "/itineraries",
        Some(&sales),
        Some(json!({ "type": "SP", "weekStart": "2026-11-02" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(itinerary["status"], "DRAFT");
    let id = itinerary["itineraryId"].as_i64().unwrap();

    let (status, item) = send(
        &app.router,
        "POST",
        &format!("/itineraries/{id}/items"),
        Some(&sales),
        Some(json!({
            "date": "2026-11-03",
            "leadId": "LEAD-42",
            "purpose": "Introduce reefer service"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let item_id = item["itemId"].as_i64().unwrap();

    let (status, updated) = send(
        &app.router,
        "PATCH",
        &format!("/itineraries/items/{item_id}"),
        Some(&sales),
        Some(json!({ "location": "Galle" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["location"], "Galle");

    let (status, submitted) = send(
        &app.router,
        "POST",
        &format!("/itineraries/{id}/submit"),
        Some(&sales),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(submitted["status"], "SUBMITTED");

    let (status, body) = send(
        &app.router,
        "DELETE",
        &format!("/itineraries/items/{item_id}"),
        Some(&sales),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Can only remove items from draft itineraries");
}

#[tokio::test]
async fn test_masters_require_a_session() {
    let app = test_app();
    let cse = login(&app.router, CSE).await;

    let (status, _) = send(&app.router, "GET", "/masters/ports", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, ports) = send(&app.router, "GET", "/masters/ports", Some(&cse), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ports.as_array().unwrap().len(), 5);

    let (_, found) = send(
        &app.router,
        "GET",
        "/masters/ports/search?q=hamburg",
        Some(&cse),
        None,
    )
    .await;
    assert_eq!(found[0]["portId"], HAMBURG_PORT_ID);

    let (status, _) = send(&app.router, "GET", "/masters/sbus/42", Some(&cse), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reports_are_role_gated() {
    let app = test_app();
    let sales = login(&app.router, SALES).await;
    let admin = login(&app.router, ADMIN).await;

    let (status, _) = send(&app.router, "GET", "/reports/status-cards", Some(&sales), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, cards) =
        send(&app.router, "GET", "/reports/status-cards", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cards["total"], 0);

    let (status, stats) = send(&app.router, "GET", "/admin/stats", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["users"], 6);

    let (status, body) = send(
        &app.router,
        "GET",
        "/admin/audit-logs?from=yesterday",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
}
