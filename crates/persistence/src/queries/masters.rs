// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Master data queries: ports, trade lanes, equipment types, shipping
//! lines and SBUs.
//!
//! Searches are case-insensitive (`LIKE` in `SQLite` folds ASCII case).

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::{EquipmentTypeData, PortData, SbuData, ShippingLineData, TradeLaneData};
use crate::diesel_schema::{equipment_types, ports, sbus, shipping_lines, trade_lanes};
use crate::error::PersistenceError;

/// Maximum rows returned by a master-data search.
pub const SEARCH_LIMIT: i64 = 10;

#[derive(Queryable, Selectable)]
#[diesel(table_name = ports)]
struct PortRow {
    port_id: i64,
    unlocode: String,
    name: String,
    country: String,
}

impl From<PortRow> for PortData {
    fn from(row: PortRow) -> Self {
        Self {
            port_id: row.port_id,
            unlocode: row.unlocode,
            name: row.name,
            country: row.country,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = trade_lanes)]
struct TradeLaneRow {
    trade_lane_id: i64,
    name: String,
    code: String,
    region: String,
}

impl From<TradeLaneRow> for TradeLaneData {
    fn from(row: TradeLaneRow) -> Self {
        Self {
            trade_lane_id: row.trade_lane_id,
            name: row.name,
            code: row.code,
            region: row.region,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = equipment_types)]
struct EquipmentTypeRow {
    equipment_type_id: i64,
    name: String,
    is_flat_rack_open_top: i32,
}

impl From<EquipmentTypeRow> for EquipmentTypeData {
    fn from(row: EquipmentTypeRow) -> Self {
        Self {
            equipment_type_id: row.equipment_type_id,
            name: row.name,
            is_flat_rack_open_top: row.is_flat_rack_open_top != 0,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = shipping_lines)]
struct ShippingLineRow {
    shipping_line_id: i64,
    name: String,
    code: String,
}

impl From<ShippingLineRow> for ShippingLineData {
    fn from(row: ShippingLineRow) -> Self {
        Self {
            shipping_line_id: row.shipping_line_id,
            name: row.name,
            code: row.code,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = sbus)]
struct SbuRow {
    sbu_id: i64,
    name: String,
    head_user_id: Option<i64>,
}

impl From<SbuRow> for SbuData {
    fn from(row: SbuRow) -> Self {
        Self {
            sbu_id: row.sbu_id,
            name: row.name,
            head_user_id: row.head_user_id,
        }
    }
}

fn like_pattern(query: &str) -> String {
    format!("%{}%", query.trim())
}

/// Maps a single-row lookup onto `Option`.
fn optional<R, T: From<R>>(
    result: Result<R, diesel::result::Error>,
) -> Result<Option<T>, PersistenceError> {
    match result {
        Ok(row) => Ok(Some(T::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

// ============================================================================
// Ports
// ============================================================================

/// Lists all ports ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_ports(conn: &mut SqliteConnection) -> Result<Vec<PortData>, PersistenceError> {
    let rows: Vec<PortRow> = ports::table
        .order(ports::name.asc())
        .select(PortRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(PortData::from).collect())
}

/// Retrieves a port by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_port(
    conn: &mut SqliteConnection,
    port_id: i64,
) -> Result<Option<PortData>, PersistenceError> {
    debug!("Looking up port by ID: {}", port_id);
    optional(
        ports::table
            .filter(ports::port_id.eq(port_id))
            .select(PortRow::as_select())
            .first(conn),
    )
}

/// Retrieves a port by UN/LOCODE.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_port_by_unlocode(
    conn: &mut SqliteConnection,
    unlocode: &str,
) -> Result<Option<PortData>, PersistenceError> {
    debug!("Looking up port by UN/LOCODE: {}", unlocode);
    optional(
        ports::table
            .filter(ports::unlocode.eq(unlocode.trim().to_uppercase()))
            .select(PortRow::as_select())
            .first(conn),
    )
}

/// Searches ports by name, UN/LOCODE or country.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn search_ports(
    conn: &mut SqliteConnection,
    query: &str,
) -> Result<Vec<PortData>, PersistenceError> {
    let pattern: String = like_pattern(query);
    let rows: Vec<PortRow> = ports::table
        .filter(
            ports::name
                .like(&pattern)
                .or(ports::unlocode.like(&pattern))
                .or(ports::country.like(&pattern)),
        )
        .order(ports::name.asc())
        .limit(SEARCH_LIMIT)
        .select(PortRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(PortData::from).collect())
}

// ============================================================================
// Trade lanes
// ============================================================================

/// Lists all trade lanes ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_trade_lanes(
    conn: &mut SqliteConnection,
) -> Result<Vec<TradeLaneData>, PersistenceError> {
    let rows: Vec<TradeLaneRow> = trade_lanes::table
        .order(trade_lanes::name.asc())
        .select(TradeLaneRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(TradeLaneData::from).collect())
}

/// Retrieves a trade lane by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_trade_lane(
    conn: &mut SqliteConnection,
    trade_lane_id: i64,
) -> Result<Option<TradeLaneData>, PersistenceError> {
    optional(
        trade_lanes::table
            .filter(trade_lanes::trade_lane_id.eq(trade_lane_id))
            .select(TradeLaneRow::as_select())
            .first(conn),
    )
}

/// Searches trade lanes by name, code or region.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn search_trade_lanes(
    conn: &mut SqliteConnection,
    query: &str,
) -> Result<Vec<TradeLaneData>, PersistenceError> {
    let pattern: String = like_pattern(query);
    let rows: Vec<TradeLaneRow> = trade_lanes::table
        .filter(
            trade_lanes::name
                .like(&pattern)
                .or(trade_lanes::code.like(&pattern))
                .or(trade_lanes::region.like(&pattern)),
        )
        .order(trade_lanes::name.asc())
        .limit(SEARCH_LIMIT)
        .select(TradeLaneRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(TradeLaneData::from).collect())
}

// ============================================================================
// Equipment types
// ============================================================================

/// Lists all equipment types ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_equipment_types(
    conn: &mut SqliteConnection,
) -> Result<Vec<EquipmentTypeData>, PersistenceError> {
    let rows: Vec<EquipmentTypeRow> = equipment_types::table
        .order(equipment_types::name.asc())
        .select(EquipmentTypeRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(EquipmentTypeData::from).collect())
}

/// Retrieves an equipment type by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_equipment_type(
    conn: &mut SqliteConnection,
    equipment_type_id: i64,
) -> Result<Option<EquipmentTypeData>, PersistenceError> {
    optional(
        equipment_types::table
            .filter(equipment_types::equipment_type_id.eq(equipment_type_id))
            .select(EquipmentTypeRow::as_select())
            .first(conn),
    )
}

// ============================================================================
// Shipping lines
// ============================================================================

/// Lists all shipping lines ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_shipping_lines(
    conn: &mut SqliteConnection,
) -> Result<Vec<ShippingLineData>, PersistenceError> {
    let rows: Vec<ShippingLineRow> = shipping_lines::table
        .order(shipping_lines::name.asc())
        .select(ShippingLineRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(ShippingLineData::from).collect())
}

/// Retrieves a shipping line by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_shipping_line(
    conn: &mut SqliteConnection,
    shipping_line_id: i64,
) -> Result<Option<ShippingLineData>, PersistenceError> {
    optional(
        shipping_lines::table
            .filter(shipping_lines::shipping_line_id.eq(shipping_line_id))
            .select(ShippingLineRow::as_select())
            .first(conn),
    )
}

/// Searches shipping lines by name or code.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn search_shipping_lines(
    conn: &mut SqliteConnection,
    query: &str,
) -> Result<Vec<ShippingLineData>, PersistenceError> {
    let pattern: String = like_pattern(query);
    let rows: Vec<ShippingLineRow> = shipping_lines::table
        .filter(
            shipping_lines::name
                .like(&pattern)
                .or(shipping_lines::code.like(&pattern)),
        )
        .order(shipping_lines::name.asc())
        .limit(SEARCH_LIMIT)
        .select(ShippingLineRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(ShippingLineData::from).collect())
}

// ============================================================================
// SBUs
// ============================================================================

/// Lists all SBUs ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_sbus(conn: &mut SqliteConnection) -> Result<Vec<SbuData>, PersistenceError> {
    let rows: Vec<SbuRow> = sbus::table
        .order(sbus::name.asc())
        .select(SbuRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(SbuData::from).collect())
}

/// Retrieves an SBU by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_sbu(
    conn: &mut SqliteConnection,
    sbu_id: i64,
) -> Result<Option<SbuData>, PersistenceError> {
    optional(
        sbus::table
            .filter(sbus::sbu_id.eq(sbu_id))
            .select(SbuRow::as_select())
            .first(conn),
    )
}
