// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Customer routes.

use axum::{
    Json,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
};
use freight_desk_api::{
    CreateCustomerRequest, CustomerQuery, DecisionRequest, SearchQuery, UpdateCustomerRequest,
    handlers::customers,
};
use freight_desk_persistence::CustomerData;
use tracing::info;

use super::http_cause;
use crate::AppState;
use crate::error::HttpError;
use crate::live::LiveEvent;
use crate::session::SessionUser;

/// Handler for POST /customers endpoint.
///
/// New customers start PENDING until an admin decides.
pub async fn handle_create_customer(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Json(req): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerData>), HttpError> {
    info!(user_id = actor.user_id, company = %req.company_name, "Handling create customer");

    let mut persistence = app_state.persistence.lock().await;
    let customer: CustomerData = customers::create_customer(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(customer)))
}

/// Handler for GET /customers endpoint.
pub async fn handle_list_customers(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(_actor, _user): SessionUser,
    Query(query): Query<CustomerQuery>,
) -> Result<Json<Vec<CustomerData>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let list: Vec<CustomerData> = customers::list_customers(&mut persistence, query)?;
    drop(persistence);
    Ok(Json(list))
}

/// Handler for GET /customers/search endpoint.
pub async fn handle_search_customers(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(_actor, _user): SessionUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<CustomerData>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let list: Vec<CustomerData> = customers::search_customers(&mut persistence, &query.q)?;
    drop(persistence);
    Ok(Json(list))
}

/// Handler for GET /customers/{id} endpoint.
pub async fn handle_get_customer(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(_actor, _user): SessionUser,
    Path(id): Path<i64>,
) -> Result<Json<CustomerData>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let customer: CustomerData = customers::get_customer(&mut persistence, id)?;
    drop(persistence);
    Ok(Json(customer))
}

/// Handler for PATCH /customers/{id} endpoint.
pub async fn handle_update_customer(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateCustomerRequest>,
) -> Result<Json<CustomerData>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let customer: CustomerData = customers::update_customer(&mut persistence, &actor, id, &req)?;
    drop(persistence);
    Ok(Json(customer))
}

/// Handler for PATCH /customers/{id}/approve endpoint.
pub async fn handle_approve_customer(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(id): Path<i64>,
    Json(req): Json<DecisionRequest>,
) -> Result<Json<CustomerData>, HttpError> {
    info!(
        user_id = actor.user_id,
        customer_id = id,
        approved = req.approved,
        "Handling customer decision"
    );

    let mut persistence = app_state.persistence.lock().await;
    let customer: CustomerData = customers::approve_customer(
        &mut persistence,
        &actor,
        id,
        &req,
        http_cause("Decide customer"),
    )?;
    drop(persistence);

    app_state.live.broadcast(&LiveEvent::CustomerDecided {
        customer_id: customer.customer_id,
        status: customer.approval_status.as_str().to_string(),
    });
    Ok(Json(customer))
}

/// Handler for DELETE /customers/{id} endpoint.
pub async fn handle_delete_customer(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    info!(user_id = actor.user_id, customer_id = id, "Handling delete customer");

    let mut persistence = app_state.persistence.lock().await;
    customers::delete_customer(&mut persistence, &actor, id)?;
    drop(persistence);

    Ok(StatusCode::NO_CONTENT)
}
