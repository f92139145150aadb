// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Predefined lane rate queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::{PredefinedRateData, PredefinedRateFilter};
use crate::diesel_schema::{predefined_rates, trade_lanes};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = predefined_rates)]
pub(crate) struct PredefinedRateRow {
    predefined_rate_id: i64,
    trade_lane_id: i64,
    pol_id: i64,
    pod_id: i64,
    service: String,
    equipment_type_id: i64,
    is_lcl: i32,
    valid_from: String,
    valid_to: String,
    notes: Option<String>,
    status: String,
    created_at: String,
    updated_at: String,
}

impl From<PredefinedRateRow> for PredefinedRateData {
    fn from(row: PredefinedRateRow) -> Self {
        Self {
            predefined_rate_id: row.predefined_rate_id,
            trade_lane_id: row.trade_lane_id,
            pol_id: row.pol_id,
            pod_id: row.pod_id,
            service: row.service,
            equipment_type_id: row.equipment_type_id,
            is_lcl: row.is_lcl != 0,
            valid_from: row.valid_from,
            valid_to: row.valid_to,
            notes: row.notes,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Retrieves a predefined rate by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the rate is not found.
pub fn get_predefined_rate(
    conn: &mut SqliteConnection,
    predefined_rate_id: i64,
) -> Result<Option<PredefinedRateData>, PersistenceError> {
    debug!("Looking up predefined rate by ID: {}", predefined_rate_id);

    let result: Result<PredefinedRateRow, diesel::result::Error> = predefined_rates::table
        .filter(predefined_rates::predefined_rate_id.eq(predefined_rate_id))
        .select(PredefinedRateRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(PredefinedRateData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists predefined rates matching a filter, soonest expiry first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_predefined_rates(
    conn: &mut SqliteConnection,
    filter: &PredefinedRateFilter,
) -> Result<Vec<PredefinedRateData>, PersistenceError> {
    let mut query = predefined_rates::table
        .select(PredefinedRateRow::as_select())
        .into_boxed();

    if let Some(region) = &filter.region {
        let lanes_in_region = trade_lanes::table
            .filter(trade_lanes::region.eq(region.clone()))
            .select(trade_lanes::trade_lane_id);
        query = query.filter(predefined_rates::trade_lane_id.eq_any(lanes_in_region));
    }
    if let Some(pol_id) = filter.pol_id {
        query = query.filter(predefined_rates::pol_id.eq(pol_id));
    }
    if let Some(pod_id) = filter.pod_id {
        query = query.filter(predefined_rates::pod_id.eq(pod_id));
    }
    if let Some(service) = &filter.service {
        query = query.filter(predefined_rates::service.like(format!("%{}%", service.trim())));
    }
    if let Some(equipment_type_id) = filter.equipment_type_id {
        query = query.filter(predefined_rates::equipment_type_id.eq(equipment_type_id));
    }
    if let Some(status) = &filter.status {
        query = query.filter(predefined_rates::status.eq(status.clone()));
    }

    let rows: Vec<PredefinedRateRow> = query
        .order((
            predefined_rates::valid_to.asc(),
            predefined_rates::predefined_rate_id.asc(),
        ))
        .load(conn)?;

    Ok(rows.into_iter().map(PredefinedRateData::from).collect())
}
