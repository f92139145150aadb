// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only master data: ports, trade lanes, equipment, shipping lines
//! and business units.

use freight_desk_persistence::{
    EquipmentTypeData, Persistence, PortData, SbuData, ShippingLineData, TradeLaneData,
};

use super::require_query;
use crate::error::ApiError;

/// # Errors
///
/// Returns an error if the query fails.
pub fn list_ports(persistence: &mut Persistence) -> Result<Vec<PortData>, ApiError> {
    Ok(persistence.list_ports()?)
}

/// # Errors
///
/// Returns `ResourceNotFound` ("Port not found") for an unknown ID.
pub fn get_port(persistence: &mut Persistence, port_id: i64) -> Result<PortData, ApiError> {
    persistence
        .get_port(port_id)?
        .ok_or_else(|| ApiError::not_found("Port", "Port not found"))
}

/// # Errors
///
/// Returns `InvalidInput` for a blank query.
pub fn search_ports(persistence: &mut Persistence, q: &str) -> Result<Vec<PortData>, ApiError> {
    Ok(persistence.search_ports(require_query(q)?)?)
}

/// # Errors
///
/// Returns an error if the query fails.
pub fn list_trade_lanes(persistence: &mut Persistence) -> Result<Vec<TradeLaneData>, ApiError> {
    Ok(persistence.list_trade_lanes()?)
}

/// # Errors
///
/// Returns `ResourceNotFound` ("Trade lane not found") for an unknown ID.
pub fn get_trade_lane(
    persistence: &mut Persistence,
    trade_lane_id: i64,
) -> Result<TradeLaneData, ApiError> {
    persistence
        .get_trade_lane(trade_lane_id)?
        .ok_or_else(|| ApiError::not_found("Trade lane", "Trade lane not found"))
}

/// # Errors
///
/// Returns `InvalidInput` for a blank query.
pub fn search_trade_lanes(
    persistence: &mut Persistence,
    q: &str,
) -> Result<Vec<TradeLaneData>, ApiError> {
    Ok(persistence.search_trade_lanes(require_query(q)?)?)
}

/// # Errors
///
/// Returns an error if the query fails.
pub fn list_equipment_types(
    persistence: &mut Persistence,
) -> Result<Vec<EquipmentTypeData>, ApiError> {
    Ok(persistence.list_equipment_types()?)
}

/// # Errors
///
/// Returns `ResourceNotFound` ("Equipment type not found") for an unknown ID.
pub fn get_equipment_type(
    persistence: &mut Persistence,
    equipment_type_id: i64,
) -> Result<EquipmentTypeData, ApiError> {
    super::rate_requests::load_equipment_type(persistence, equipment_type_id)
}

/// # Errors
///
/// Returns an error if the query fails.
pub fn list_shipping_lines(
    persistence: &mut Persistence,
) -> Result<Vec<ShippingLineData>, ApiError> {
    Ok(persistence.list_shipping_lines()?)
}

/// # Errors
///
/// Returns `ResourceNotFound` ("Shipping line not found") for an unknown ID.
pub fn get_shipping_line(
    persistence: &mut Persistence,
    shipping_line_id: i64,
) -> Result<ShippingLineData, ApiError> {
    persistence
        .get_shipping_line(shipping_line_id)?
        .ok_or_else(|| ApiError::not_found("Shipping line", "Shipping line not found"))
}

/// # Errors
///
/// Returns `InvalidInput` for a blank query.
pub fn search_shipping_lines(
    persistence: &mut Persistence,
    q: &str,
) -> Result<Vec<ShippingLineData>, ApiError> {
    Ok(persistence.search_shipping_lines(require_query(q)?)?)
}

/// # Errors
///
/// Returns an error if the query fails.
pub fn list_sbus(persistence: &mut Persistence) -> Result<Vec<SbuData>, ApiError> {
    Ok(persistence.list_sbus()?)
}

/// # Errors
///
/// Returns `ResourceNotFound` ("SBU not found") for an unknown ID.
pub fn get_sbu(persistence: &mut Persistence, sbu_id: i64) -> Result<SbuData, ApiError> {
    persistence
        .get_sbu(sbu_id)?
        .ok_or_else(|| ApiError::not_found("SBU", "SBU not found"))
}
