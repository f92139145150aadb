// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rate request and predefined rate routes.

use axum::{
    Json,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
};
use freight_desk_api::{
    AddLineQuoteRequest, CreatePredefinedRateRequest, CreateRateRequestRequest,
    PredefinedRateInfo, PredefinedRateQuery, ProcessedPercentageResponse, RateRequestDetail,
    RateRequestQuery, RateUpdateRequestedResponse, RejectRateRequestRequest,
    RespondToRateRequestRequest,
    handlers::{predefined_rates, rate_requests},
};
use freight_desk_domain::RateRequestStatus;
use freight_desk_persistence::{LineQuoteData, RateRequestData, RateResponseData};
use tracing::info;

use super::http_cause;
use crate::AppState;
use crate::error::HttpError;
use crate::live::LiveEvent;
use crate::session::SessionUser;

fn status_changed(app_state: &AppState, request: &RateRequestData) {
    app_state.live.broadcast(&LiveEvent::RateRequestStatusChanged {
        rate_request_id: request.rate_request_id,
        status: request.status.as_str().to_string(),
    });
}

/// Handler for POST /rates/requests endpoint.
pub async fn handle_create_rate_request(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Json(req): Json<CreateRateRequestRequest>,
) -> Result<(StatusCode, Json<RateRequestData>), HttpError> {
    info!(
        user_id = actor.user_id,
        customer_id = req.customer_id,
        pod_id = req.pod_id,
        "Handling create rate request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let created: RateRequestData = rate_requests::create_rate_request(
        &mut persistence,
        app_state.queue.as_ref(),
        &actor,
        &req,
    )?;
    drop(persistence);

    info!(rate_request_id = created.rate_request_id, ref_no = %created.ref_no, "Created rate request");
    app_state.live.broadcast(&LiveEvent::RateRequestCreated {
        rate_request_id: created.rate_request_id,
        ref_no: created.ref_no.clone(),
    });
    Ok((StatusCode::CREATED, Json(created)))
}

/// Handler for GET /rates/requests endpoint.
///
/// SALES and CSE callers only ever see their own requests.
pub async fn handle_list_rate_requests(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Query(query): Query<RateRequestQuery>,
) -> Result<Json<Vec<RateRequestData>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let requests: Vec<RateRequestData> =
        rate_requests::list_rate_requests(&mut persistence, &actor, query)?;
    drop(persistence);
    Ok(Json(requests))
}

/// Handler for GET /rates/requests/{id} endpoint.
pub async fn handle_get_rate_request(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(_actor, _user): SessionUser,
    Path(id): Path<i64>,
) -> Result<Json<RateRequestDetail>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let detail: RateRequestDetail = rate_requests::get_rate_request(&mut persistence, id)?;
    drop(persistence);
    Ok(Json(detail))
}

/// Handler for POST /rates/requests/{id}/respond endpoint.
pub async fn handle_respond_to_rate_request(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(id): Path<i64>,
    Json(req): Json<RespondToRateRequestRequest>,
) -> Result<(StatusCode, Json<RateResponseData>), HttpError> {
    info!(user_id = actor.user_id, rate_request_id = id, "Handling rate response");

    let mut persistence = app_state.persistence.lock().await;
    let response: RateResponseData = rate_requests::respond_to_rate_request(
        &mut persistence,
        app_state.queue.as_ref(),
        &actor,
        id,
        &req,
        http_cause("Respond to rate request"),
    )?;
    drop(persistence);

    app_state.live.broadcast(&LiveEvent::RateRequestStatusChanged {
        rate_request_id: id,
        status: RateRequestStatus::Processing.as_str().to_string(),
    });
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST /rates/requests/{id}/line-quotes endpoint.
pub async fn handle_add_line_quote(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(id): Path<i64>,
    Json(req): Json<AddLineQuoteRequest>,
) -> Result<(StatusCode, Json<LineQuoteData>), HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let quote: LineQuoteData = rate_requests::add_line_quote(&mut persistence, &actor, id, &req)?;
    drop(persistence);
    Ok((StatusCode::CREATED, Json(quote)))
}

/// Handler for POST /rates/requests/{id}/complete endpoint.
pub async fn handle_complete_rate_request(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(id): Path<i64>,
) -> Result<Json<RateRequestData>, HttpError> {
    info!(user_id = actor.user_id, rate_request_id = id, "Handling complete rate request");

    let mut persistence = app_state.persistence.lock().await;
    let request: RateRequestData = rate_requests::complete_rate_request(
        &mut persistence,
        &actor,
        id,
        http_cause("Complete rate request"),
    )?;
    drop(persistence);

    status_changed(&app_state, &request);
    Ok(Json(request))
}

/// Handler for POST /rates/requests/{id}/reject endpoint.
pub async fn handle_reject_rate_request(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(id): Path<i64>,
    Json(req): Json<RejectRateRequestRequest>,
) -> Result<Json<RateRequestData>, HttpError> {
    info!(user_id = actor.user_id, rate_request_id = id, "Handling reject rate request");

    let mut persistence = app_state.persistence.lock().await;
    let request: RateRequestData = rate_requests::reject_rate_request(
        &mut persistence,
        &actor,
        id,
        &req,
        http_cause("Reject rate request"),
    )?;
    drop(persistence);

    status_changed(&app_state, &request);
    Ok(Json(request))
}

/// Handler for GET /rates/requests/{id}/processed-percentage endpoint.
pub async fn handle_processed_percentage(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(_actor, _user): SessionUser,
    Path(id): Path<i64>,
) -> Result<Json<ProcessedPercentageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ProcessedPercentageResponse =
        rate_requests::get_processed_percentage(&mut persistence, id)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for POST /rates/predefined endpoint.
pub async fn handle_create_predefined_rate(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Json(req): Json<CreatePredefinedRateRequest>,
) -> Result<(StatusCode, Json<PredefinedRateInfo>), HttpError> {
    info!(user_id = actor.user_id, pod_id = req.pod_id, "Handling create predefined rate");

    let mut persistence = app_state.persistence.lock().await;
    let rate: PredefinedRateInfo =
        predefined_rates::create_predefined_rate(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(rate)))
}

/// Handler for GET /rates/predefined endpoint.
pub async fn handle_list_predefined_rates(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(_actor, _user): SessionUser,
    Query(query): Query<PredefinedRateQuery>,
) -> Result<Json<Vec<PredefinedRateInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let rates: Vec<PredefinedRateInfo> =
        predefined_rates::list_predefined_rates(&mut persistence, &query)?;
    drop(persistence);
    Ok(Json(rates))
}

/// Handler for GET /rates/predefined/{id} endpoint.
pub async fn handle_get_predefined_rate(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(_actor, _user): SessionUser,
    Path(id): Path<i64>,
) -> Result<Json<PredefinedRateInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let rate: PredefinedRateInfo = predefined_rates::get_predefined_rate(&mut persistence, id)?;
    drop(persistence);
    Ok(Json(rate))
}

/// Handler for POST /rates/predefined/{id}/request-update endpoint.
pub async fn handle_request_rate_update(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(id): Path<i64>,
) -> Result<Json<RateUpdateRequestedResponse>, HttpError> {
    info!(user_id = actor.user_id, predefined_rate_id = id, "Handling rate update request");

    let mut persistence = app_state.persistence.lock().await;
    let response: RateUpdateRequestedResponse = predefined_rates::request_rate_update(
        &mut persistence,
        app_state.queue.as_ref(),
        &actor,
        id,
    )?;
    drop(persistence);

    Ok(Json(response))
}
