// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Management reports and admin tooling.

use axum::{
    Json,
    extract::{Query, State as AxumState},
};
use freight_desk_api::{
    AuditLogQuery, GlobalSearchResponse, ResponseTimeReport, SearchQuery, StatusCardsResponse,
    TopSalespersonEntry,
    handlers::{admin, reports},
};
use freight_desk_persistence::{AuditLogEntry, SystemCounts};
use tracing::info;

use crate::AppState;
use crate::error::HttpError;
use crate::session::SessionUser;

/// Handler for GET /reports/response-time endpoint.
pub async fn handle_response_time(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> Result<Json<ResponseTimeReport>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let report: ResponseTimeReport = reports::response_time(&mut persistence, &actor)?;
    drop(persistence);
    Ok(Json(report))
}

/// Handler for GET /reports/top-sps endpoint.
pub async fn handle_top_salespeople(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> Result<Json<Vec<TopSalespersonEntry>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let ranking: Vec<TopSalespersonEntry> = reports::top_salespeople(&mut persistence, &actor)?;
    drop(persistence);
    Ok(Json(ranking))
}

/// Handler for GET /reports/status-cards endpoint.
pub async fn handle_status_cards(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> Result<Json<StatusCardsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let cards: StatusCardsResponse = reports::rate_request_status_cards(&mut persistence, &actor)?;
    drop(persistence);
    Ok(Json(cards))
}

/// Handler for GET /reports/booking-status-cards endpoint.
pub async fn handle_booking_status_cards(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> Result<Json<StatusCardsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let cards: StatusCardsResponse = reports::booking_status_cards(&mut persistence, &actor)?;
    drop(persistence);
    Ok(Json(cards))
}

/// Handler for GET /reports/itinerary-status-cards endpoint.
pub async fn handle_itinerary_status_cards(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> Result<Json<StatusCardsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let cards: StatusCardsResponse = reports::itinerary_status_cards(&mut persistence, &actor)?;
    drop(persistence);
    Ok(Json(cards))
}

/// Handler for GET /admin/stats endpoint.
pub async fn handle_system_stats(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> Result<Json<SystemCounts>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let counts: SystemCounts = admin::system_stats(&mut persistence, &actor)?;
    drop(persistence);
    Ok(Json(counts))
}

/// Handler for GET /admin/audit-logs endpoint.
///
/// Returns the newest matching entries first.
pub async fn handle_audit_logs(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Query(query): Query<AuditLogQuery>,
) -> Result<Json<Vec<AuditLogEntry>>, HttpError> {
    info!(
        user_id = actor.user_id,
        entity_type = ?query.entity_type,
        action = ?query.action,
        "Handling audit log query"
    );

    let mut persistence = app_state.persistence.lock().await;
    let entries: Vec<AuditLogEntry> = admin::audit_logs(&mut persistence, &actor, &query)?;
    drop(persistence);

    Ok(Json(entries))
}

/// Handler for GET /admin/search endpoint.
pub async fn handle_global_search(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<GlobalSearchResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let results: GlobalSearchResponse = admin::global_search(&mut persistence, &actor, &query.q)?;
    drop(persistence);
    Ok(Json(results))
}
