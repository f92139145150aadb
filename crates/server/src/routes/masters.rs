// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only reference data routes.

use axum::{
    Json,
    extract::{Path, Query, State as AxumState},
};
use freight_desk_api::{SearchQuery, handlers::masters};
use freight_desk_persistence::{
    EquipmentTypeData, PortData, SbuData, ShippingLineData, TradeLaneData,
};

use crate::AppState;
use crate::error::HttpError;
use crate::session::SessionUser;

/// Handler for GET /masters/ports endpoint.
pub async fn handle_list_ports(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionUser,
) -> Result<Json<Vec<PortData>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let ports: Vec<PortData> = masters::list_ports(&mut persistence)?;
    drop(persistence);
    Ok(Json(ports))
}

/// Handler for GET /masters/ports/{id} endpoint.
pub async fn handle_get_port(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionUser,
    Path(id): Path<i64>,
) -> Result<Json<PortData>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let port: PortData = masters::get_port(&mut persistence, id)?;
    drop(persistence);
    Ok(Json(port))
}

/// Handler for GET /masters/ports/search endpoint.
pub async fn handle_search_ports(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<PortData>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let ports: Vec<PortData> = masters::search_ports(&mut persistence, &query.q)?;
    drop(persistence);
    Ok(Json(ports))
}

/// Handler for GET /masters/trade-lanes endpoint.
pub async fn handle_list_trade_lanes(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionUser,
) -> Result<Json<Vec<TradeLaneData>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let lanes: Vec<TradeLaneData> = masters::list_trade_lanes(&mut persistence)?;
    drop(persistence);
    Ok(Json(lanes))
}

/// Handler for GET /masters/trade-lanes/{id} endpoint.
pub async fn handle_get_trade_lane(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionUser,
    Path(id): Path<i64>,
) -> Result<Json<TradeLaneData>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let lane: TradeLaneData = masters::get_trade_lane(&mut persistence, id)?;
    drop(persistence);
    Ok(Json(lane))
}

/// Handler for GET /masters/trade-lanes/search endpoint.
pub async fn handle_search_trade_lanes(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<TradeLaneData>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let lanes: Vec<TradeLaneData> = masters::search_trade_lanes(&mut persistence, &query.q)?;
    drop(persistence);
    Ok(Json(lanes))
}

/// Handler for GET /masters/equipment-types endpoint.
pub async fn handle_list_equipment_types(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionUser,
) -> Result<Json<Vec<EquipmentTypeData>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let types: Vec<EquipmentTypeData> = masters::list_equipment_types(&mut persistence)?;
    drop(persistence);
    Ok(Json(types))
}

/// Handler for GET /masters/equipment-types/{id} endpoint.
pub async fn handle_get_equipment_type(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionUser,
    Path(id): Path<i64>,
) -> Result<Json<EquipmentTypeData>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let equipment: EquipmentTypeData = masters::get_equipment_type(&mut persistence, id)?;
    drop(persistence);
    Ok(Json(equipment))
}

/// Handler for GET /masters/shipping-lines endpoint.
pub async fn handle_list_shipping_lines(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionUser,
) -> Result<Json<Vec<ShippingLineData>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let lines: Vec<ShippingLineData> = masters::list_shipping_lines(&mut persistence)?;
    drop(persistence);
    Ok(Json(lines))
}

/// Handler for GET /masters/shipping-lines/{id} endpoint.
pub async fn handle_get_shipping_line(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionUser,
    Path(id): Path<i64>,
) -> Result<Json<ShippingLineData>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let line: ShippingLineData = masters::get_shipping_line(&mut persistence, id)?;
    drop(persistence);
    Ok(Json(line))
}

/// Handler for GET /masters/shipping-lines/search endpoint.
pub async fn handle_search_shipping_lines(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ShippingLineData>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let lines: Vec<ShippingLineData> = masters::search_shipping_lines(&mut persistence, &query.q)?;
    drop(persistence);
    Ok(Json(lines))
}

/// Handler for GET /masters/sbus endpoint.
pub async fn handle_list_sbus(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionUser,
) -> Result<Json<Vec<SbuData>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let sbus: Vec<SbuData> = masters::list_sbus(&mut persistence)?;
    drop(persistence);
    Ok(Json(sbus))
}

/// Handler for GET /masters/sbus/{id} endpoint.
pub async fn handle_get_sbu(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionUser,
    Path(id): Path<i64>,
) -> Result<Json<SbuData>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let sbu: SbuData = masters::get_sbu(&mut persistence, id)?;
    drop(persistence);
    Ok(Json(sbu))
}
