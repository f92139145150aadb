// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Weekly itinerary routes.

use axum::{
    Json,
    extract::{Path, State as AxumState},
    http::StatusCode,
};
use freight_desk_api::{
    AddItineraryItemRequest, CreateItineraryRequest, DecisionRequest, ItineraryDetail,
    UpdateItineraryItemRequest, UpdateItineraryRequest, handlers::itineraries,
};
use freight_desk_persistence::{ItineraryData, ItineraryItemData};
use tracing::info;

use super::http_cause;
use crate::AppState;
use crate::error::HttpError;
use crate::live::LiveEvent;
use crate::session::SessionUser;

fn status_changed(app_state: &AppState, itinerary: &ItineraryData) {
    app_state.live.broadcast(&LiveEvent::ItineraryStatusChanged {
        itinerary_id: itinerary.itinerary_id,
        status: itinerary.status.as_str().to_string(),
    });
}

/// Handler for POST /itineraries endpoint.
pub async fn handle_create_itinerary(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Json(req): Json<CreateItineraryRequest>,
) -> Result<(StatusCode, Json<ItineraryData>), HttpError> {
    info!(user_id = actor.user_id, week_start = %req.week_start, "Handling create itinerary");

    let mut persistence = app_state.persistence.lock().await;
    let itinerary: ItineraryData = itineraries::create_itinerary(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(itinerary)))
}

/// Handler for GET /itineraries endpoint.
pub async fn handle_list_itineraries(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> Result<Json<Vec<ItineraryData>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let list: Vec<ItineraryData> = itineraries::list_itineraries(&mut persistence, &actor)?;
    drop(persistence);
    Ok(Json(list))
}

/// Handler for GET /itineraries/{id} endpoint.
pub async fn handle_get_itinerary(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(_actor, _user): SessionUser,
    Path(id): Path<i64>,
) -> Result<Json<ItineraryDetail>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let detail: ItineraryDetail = itineraries::get_itinerary(&mut persistence, id)?;
    drop(persistence);
    Ok(Json(detail))
}

/// Handler for PATCH /itineraries/{id} endpoint.
pub async fn handle_update_itinerary(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateItineraryRequest>,
) -> Result<Json<ItineraryData>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let itinerary: ItineraryData =
        itineraries::update_itinerary(&mut persistence, &actor, id, &req)?;
    drop(persistence);
    Ok(Json(itinerary))
}

/// Handler for POST /itineraries/{id}/submit endpoint.
pub async fn handle_submit_itinerary(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(id): Path<i64>,
) -> Result<Json<ItineraryData>, HttpError> {
    info!(user_id = actor.user_id, itinerary_id = id, "Handling submit itinerary");

    let mut persistence = app_state.persistence.lock().await;
    let itinerary: ItineraryData = itineraries::submit_itinerary(
        &mut persistence,
        app_state.queue.as_ref(),
        &actor,
        id,
        http_cause("Submit itinerary"),
    )?;
    drop(persistence);

    status_changed(&app_state, &itinerary);
    Ok(Json(itinerary))
}

/// Handler for POST /itineraries/{id}/approve endpoint.
///
/// `{ "approved": false }` rejects the itinerary.
pub async fn handle_approve_itinerary(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(id): Path<i64>,
    Json(req): Json<DecisionRequest>,
) -> Result<Json<ItineraryData>, HttpError> {
    info!(
        user_id = actor.user_id,
        itinerary_id = id,
        approved = req.approved,
        "Handling itinerary decision"
    );

    let mut persistence = app_state.persistence.lock().await;
    let itinerary: ItineraryData = itineraries::approve_itinerary(
        &mut persistence,
        &actor,
        id,
        &req,
        http_cause("Decide itinerary"),
    )?;
    drop(persistence);

    status_changed(&app_state, &itinerary);
    Ok(Json(itinerary))
}

/// Handler for DELETE /itineraries/{id} endpoint.
pub async fn handle_delete_itinerary(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    info!(user_id = actor.user_id, itinerary_id = id, "Handling delete itinerary");

    let mut persistence = app_state.persistence.lock().await;
    itineraries::delete_itinerary(&mut persistence, &actor, id)?;
    drop(persistence);

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST /itineraries/{id}/items endpoint.
pub async fn handle_add_item(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(id): Path<i64>,
    Json(req): Json<AddItineraryItemRequest>,
) -> Result<(StatusCode, Json<ItineraryItemData>), HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let item: ItineraryItemData =
        itineraries::add_itinerary_item(&mut persistence, &actor, id, &req)?;
    drop(persistence);
    Ok((StatusCode::CREATED, Json(item)))
}

/// Handler for PATCH /itineraries/items/{item_id} endpoint.
pub async fn handle_update_item(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(item_id): Path<i64>,
    Json(req): Json<UpdateItineraryItemRequest>,
) -> Result<Json<ItineraryItemData>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let item: ItineraryItemData =
        itineraries::update_itinerary_item(&mut persistence, &actor, item_id, &req)?;
    drop(persistence);
    Ok(Json(item))
}

/// Handler for DELETE /itineraries/items/{item_id} endpoint.
pub async fn handle_remove_item(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(item_id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    itineraries::remove_itinerary_item(&mut persistence, &actor, item_id)?;
    drop(persistence);
    Ok(StatusCode::NO_CONTENT)
}
