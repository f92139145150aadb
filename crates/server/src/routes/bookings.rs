// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking request, release order and ERP job routes.

use axum::{
    Json,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
};
use freight_desk_api::{
    AddRoDocumentRequest, BookingQuery, BookingRequestDetail, CancelBookingRequest,
    CompleteJobRequest, ConfirmBookingRequest, CreateBookingRequestRequest, JobDetail,
    OpenJobRequest, handlers::bookings,
};
use freight_desk_persistence::{BookingRequestData, JobCompletionData, JobData, RoDocumentData};
use tracing::info;

use super::http_cause;
use crate::AppState;
use crate::error::HttpError;
use crate::live::LiveEvent;
use crate::session::SessionUser;

fn status_changed(app_state: &AppState, booking: &BookingRequestData) {
    app_state.live.broadcast(&LiveEvent::BookingRequestStatusChanged {
        booking_request_id: booking.booking_request_id,
        status: booking.status.as_str().to_string(),
    });
}

/// Handler for POST /booking-requests endpoint.
pub async fn handle_create_booking_request(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Json(req): Json<CreateBookingRequestRequest>,
) -> Result<(StatusCode, Json<BookingRequestData>), HttpError> {
    info!(
        user_id = actor.user_id,
        customer_id = req.customer_id,
        rate_source = ?req.rate_source,
        link_id = req.link_id,
        "Handling create booking request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let booking: BookingRequestData =
        bookings::create_booking_request(&mut persistence, &actor, req)?;
    drop(persistence);

    info!(booking_request_id = booking.booking_request_id, "Created booking request");
    status_changed(&app_state, &booking);
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Handler for GET /booking-requests endpoint.
pub async fn handle_list_booking_requests(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Query(query): Query<BookingQuery>,
) -> Result<Json<Vec<BookingRequestData>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let requests: Vec<BookingRequestData> =
        bookings::list_booking_requests(&mut persistence, &actor, query)?;
    drop(persistence);
    Ok(Json(requests))
}

/// Handler for GET /booking-requests/{id} endpoint.
pub async fn handle_get_booking_request(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(_actor, _user): SessionUser,
    Path(id): Path<i64>,
) -> Result<Json<BookingRequestDetail>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let detail: BookingRequestDetail = bookings::get_booking_request(&mut persistence, id)?;
    drop(persistence);
    Ok(Json(detail))
}

/// Handler for POST /booking-requests/{id}/confirm endpoint.
///
/// The body is optional. Confirming against a lapsed quote requires
/// `overrideValidity`.
pub async fn handle_confirm_booking_request(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(id): Path<i64>,
    body: Option<Json<ConfirmBookingRequest>>,
) -> Result<Json<BookingRequestData>, HttpError> {
    let req: ConfirmBookingRequest = body.map(|Json(req)| req).unwrap_or_default();
    info!(
        user_id = actor.user_id,
        booking_request_id = id,
        override_validity = req.override_validity,
        "Handling confirm booking request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let booking: BookingRequestData = bookings::confirm_booking_request(
        &mut persistence,
        app_state.queue.as_ref(),
        &actor,
        id,
        req,
        http_cause("Confirm booking request"),
    )?;
    drop(persistence);

    status_changed(&app_state, &booking);
    Ok(Json(booking))
}

/// Handler for POST /booking-requests/{id}/cancel endpoint.
pub async fn handle_cancel_booking_request(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(id): Path<i64>,
    Json(req): Json<CancelBookingRequest>,
) -> Result<Json<BookingRequestData>, HttpError> {
    info!(user_id = actor.user_id, booking_request_id = id, "Handling cancel booking request");

    let mut persistence = app_state.persistence.lock().await;
    let booking: BookingRequestData = bookings::cancel_booking_request(
        &mut persistence,
        &actor,
        id,
        &req,
        http_cause("Cancel booking request"),
    )?;
    drop(persistence);

    status_changed(&app_state, &booking);
    Ok(Json(booking))
}

/// Handler for POST /booking-requests/{id}/ro endpoint.
pub async fn handle_add_ro_document(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(id): Path<i64>,
    Json(req): Json<AddRoDocumentRequest>,
) -> Result<(StatusCode, Json<RoDocumentData>), HttpError> {
    info!(user_id = actor.user_id, booking_request_id = id, number = %req.number, "Handling RO upload");

    let mut persistence = app_state.persistence.lock().await;
    let document: RoDocumentData = bookings::add_ro_document(
        &mut persistence,
        app_state.queue.as_ref(),
        &actor,
        id,
        &req,
    )?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(document)))
}

/// Handler for POST /booking-requests/{id}/open-erp-job endpoint.
pub async fn handle_open_erp_job(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(id): Path<i64>,
    Json(req): Json<OpenJobRequest>,
) -> Result<(StatusCode, Json<JobData>), HttpError> {
    info!(user_id = actor.user_id, booking_request_id = id, erp_job_no = %req.erp_job_no, "Handling open ERP job");

    let mut persistence = app_state.persistence.lock().await;
    let job: JobData = bookings::open_erp_job(&mut persistence, &actor, id, &req)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(job)))
}

/// Handler for GET /booking-requests/jobs endpoint.
pub async fn handle_list_jobs(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> Result<Json<Vec<JobDetail>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let jobs: Vec<JobDetail> = bookings::list_jobs(&mut persistence, &actor)?;
    drop(persistence);
    Ok(Json(jobs))
}

/// Handler for POST /booking-requests/jobs/{id}/complete endpoint.
pub async fn handle_complete_job(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(id): Path<i64>,
    Json(req): Json<CompleteJobRequest>,
) -> Result<(StatusCode, Json<JobCompletionData>), HttpError> {
    info!(user_id = actor.user_id, job_id = id, "Handling job completion");

    let mut persistence = app_state.persistence.lock().await;
    let completion: JobCompletionData = bookings::complete_job(&mut persistence, &actor, id, &req)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(completion)))
}
