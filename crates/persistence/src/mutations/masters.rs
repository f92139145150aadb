// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Master data mutations. Used by seeding and administrative setup.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{
    equipment_types, ports, pricing_assignments, sbus, shipping_lines, trade_lanes,
};
use crate::error::PersistenceError;

/// Creates an SBU without a head.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_sbu(conn: &mut SqliteConnection, name: &str) -> Result<i64, PersistenceError> {
    diesel::insert_into(sbus::table)
        .values(sbus::name.eq(name))
        .execute(conn)?;

    let sbu_id: i64 = conn.get_last_insert_rowid()?;
    info!(sbu_id, name, "Created SBU");
    Ok(sbu_id)
}

/// Sets the head of an SBU.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the SBU does not exist.
pub fn set_sbu_head(
    conn: &mut SqliteConnection,
    sbu_id: i64,
    head_user_id: i64,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(sbus::table)
        .filter(sbus::sbu_id.eq(sbu_id))
        .set(sbus::head_user_id.eq(Some(head_user_id)))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("SBU {sbu_id}")));
    }
    Ok(())
}

/// Creates a port. The UN/LOCODE is stored uppercase.
///
/// # Errors
///
/// Returns an error if the insert fails or the UN/LOCODE already exists.
pub fn create_port(
    conn: &mut SqliteConnection,
    unlocode: &str,
    name: &str,
    country: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(ports::table)
        .values((
            ports::unlocode.eq(unlocode.trim().to_uppercase()),
            ports::name.eq(name),
            ports::country.eq(country),
        ))
        .execute(conn)?;

    Ok(conn.get_last_insert_rowid()?)
}

/// Creates a trade lane.
///
/// # Errors
///
/// Returns an error if the insert fails or the code already exists.
pub fn create_trade_lane(
    conn: &mut SqliteConnection,
    name: &str,
    code: &str,
    region: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(trade_lanes::table)
        .values((
            trade_lanes::name.eq(name),
            trade_lanes::code.eq(code),
            trade_lanes::region.eq(region),
        ))
        .execute(conn)?;

    Ok(conn.get_last_insert_rowid()?)
}

/// Creates an equipment type.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_equipment_type(
    conn: &mut SqliteConnection,
    name: &str,
    is_flat_rack_open_top: bool,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(equipment_types::table)
        .values((
            equipment_types::name.eq(name),
            equipment_types::is_flat_rack_open_top.eq(i32::from(is_flat_rack_open_top)),
        ))
        .execute(conn)?;

    Ok(conn.get_last_insert_rowid()?)
}

/// Creates a shipping line.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_shipping_line(
    conn: &mut SqliteConnection,
    name: &str,
    code: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(shipping_lines::table)
        .values((shipping_lines::name.eq(name), shipping_lines::code.eq(code)))
        .execute(conn)?;

    Ok(conn.get_last_insert_rowid()?)
}

/// Assigns a pricing user to a trade lane.
///
/// # Errors
///
/// Returns an error if the insert fails or the assignment already exists.
pub fn assign_pricing_user(
    conn: &mut SqliteConnection,
    trade_lane_id: i64,
    user_id: i64,
) -> Result<(), PersistenceError> {
    diesel::insert_into(pricing_assignments::table)
        .values((
            pricing_assignments::trade_lane_id.eq(trade_lane_id),
            pricing_assignments::user_id.eq(user_id),
        ))
        .execute(conn)?;

    info!(trade_lane_id, user_id, "Assigned pricing user to trade lane");
    Ok(())
}
