// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rate request, pricing response and line quote queries.

use diesel::SqliteConnection;
use diesel::dsl::count_star;
use diesel::prelude::*;
use freight_desk_domain::{RateRequestStatus, ShipmentType, TransportMode};
use serde_json::Value;
use tracing::debug;

use crate::data_models::{LineQuoteData, RateRequestData, RateRequestFilter, RateResponseData};
use crate::diesel_schema::{line_quotes, rate_request_responses, rate_requests};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = rate_requests)]
pub(crate) struct RateRequestRow {
    rate_request_id: i64,
    ref_no: String,
    mode: String,
    shipment_type: String,
    pol_id: Option<i64>,
    pod_id: i64,
    door_or_cy: Option<String>,
    us_zip: Option<String>,
    preferred_line_id: Option<i64>,
    equipment_type_id: Option<i64>,
    reefer_temp: Option<f64>,
    pallet_count: Option<i32>,
    pallet_dims: Option<String>,
    hs_code: Option<String>,
    weight_tons: f64,
    incoterm: String,
    market_rate: Option<f64>,
    special_instructions: Option<String>,
    cargo_ready_date: Option<String>,
    vessel_required: i32,
    detention_free_time: Option<String>,
    salesperson_id: i64,
    customer_id: i64,
    status: String,
    rejection_remark: Option<String>,
    created_at: String,
    updated_at: String,
}

impl RateRequestRow {
    pub(crate) fn into_data(self) -> Result<RateRequestData, PersistenceError> {
        Ok(RateRequestData {
            rate_request_id: self.rate_request_id,
            ref_no: self.ref_no,
            mode: self.mode.parse::<TransportMode>()?,
            shipment_type: self.shipment_type.parse::<ShipmentType>()?,
            pol_id: self.pol_id,
            pod_id: self.pod_id,
            door_or_cy: self.door_or_cy,
            us_zip: self.us_zip,
            preferred_line_id: self.preferred_line_id,
            equipment_type_id: self.equipment_type_id,
            reefer_temp: self.reefer_temp,
            pallet_count: self.pallet_count,
            pallet_dims: self.pallet_dims,
            hs_code: self.hs_code,
            weight_tons: self.weight_tons,
            incoterm: self.incoterm,
            market_rate: self.market_rate,
            special_instructions: self.special_instructions,
            cargo_ready_date: self.cargo_ready_date,
            vessel_required: self.vessel_required != 0,
            detention_free_time: self.detention_free_time,
            salesperson_id: self.salesperson_id,
            customer_id: self.customer_id,
            status: self.status.parse::<RateRequestStatus>()?,
            rejection_remark: self.rejection_remark,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = rate_request_responses)]
pub(crate) struct RateResponseRow {
    response_id: i64,
    rate_request_id: i64,
    line_no: i32,
    requested_line_id: Option<i64>,
    requested_equipment_type_id: Option<i64>,
    vessel_name: Option<String>,
    eta: Option<String>,
    etd: Option<String>,
    fcl_cutoff: Option<String>,
    doc_cutoff: Option<String>,
    valid_to: String,
    charges_json: String,
    responded_by_id: i64,
    created_at: String,
}

impl RateResponseRow {
    pub(crate) fn into_data(self) -> Result<RateResponseData, PersistenceError> {
        Ok(RateResponseData {
            response_id: self.response_id,
            rate_request_id: self.rate_request_id,
            line_no: self.line_no,
            requested_line_id: self.requested_line_id,
            requested_equipment_type_id: self.requested_equipment_type_id,
            vessel_name: self.vessel_name,
            eta: self.eta,
            etd: self.etd,
            fcl_cutoff: self.fcl_cutoff,
            doc_cutoff: self.doc_cutoff,
            valid_to: self.valid_to,
            charges: serde_json::from_str::<Value>(&self.charges_json)?,
            responded_by_id: self.responded_by_id,
            created_at: self.created_at,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = line_quotes)]
pub(crate) struct LineQuoteRow {
    line_quote_id: i64,
    rate_request_id: i64,
    shipping_line_id: i64,
    equipment_type_id: Option<i64>,
    terms_json: String,
    valid_to: String,
    selected: i32,
    created_at: String,
}

impl LineQuoteRow {
    pub(crate) fn into_data(self) -> Result<LineQuoteData, PersistenceError> {
        Ok(LineQuoteData {
            line_quote_id: self.line_quote_id,
            rate_request_id: self.rate_request_id,
            shipping_line_id: self.shipping_line_id,
            equipment_type_id: self.equipment_type_id,
            terms: serde_json::from_str::<Value>(&self.terms_json)?,
            valid_to: self.valid_to,
            selected: self.selected != 0,
            created_at: self.created_at,
        })
    }
}

/// Retrieves a rate request by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the rate request is not found.
pub fn get_rate_request(
    conn: &mut SqliteConnection,
    rate_request_id: i64,
) -> Result<Option<RateRequestData>, PersistenceError> {
    debug!("Looking up rate request by ID: {}", rate_request_id);

    let result: Result<RateRequestRow, diesel::result::Error> = rate_requests::table
        .filter(rate_requests::rate_request_id.eq(rate_request_id))
        .select(RateRequestRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_data()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists rate requests, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_rate_requests(
    conn: &mut SqliteConnection,
    filter: RateRequestFilter,
) -> Result<Vec<RateRequestData>, PersistenceError> {
    let mut query = rate_requests::table
        .select(RateRequestRow::as_select())
        .into_boxed();

    if let Some(salesperson_id) = filter.salesperson_id {
        query = query.filter(rate_requests::salesperson_id.eq(salesperson_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(rate_requests::status.eq(status.as_str()));
    }

    let rows: Vec<RateRequestRow> = query
        .order(rate_requests::rate_request_id.desc())
        .load(conn)?;

    rows.into_iter().map(RateRequestRow::into_data).collect()
}

/// Returns true if a reference number is already taken.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn ref_no_exists(conn: &mut SqliteConnection, ref_no: &str) -> Result<bool, PersistenceError> {
    let count: i64 = rate_requests::table
        .filter(rate_requests::ref_no.eq(ref_no))
        .select(count_star())
        .first(conn)?;
    Ok(count > 0)
}

/// Searches rate requests by reference number.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn search_by_ref_no(
    conn: &mut SqliteConnection,
    query: &str,
    limit: i64,
) -> Result<Vec<RateRequestData>, PersistenceError> {
    let pattern: String = format!("%{}%", query.trim());

    let rows: Vec<RateRequestRow> = rate_requests::table
        .filter(rate_requests::ref_no.like(&pattern))
        .order(rate_requests::rate_request_id.desc())
        .limit(limit)
        .select(RateRequestRow::as_select())
        .load(conn)?;

    rows.into_iter().map(RateRequestRow::into_data).collect()
}

/// Lists the responses recorded against a rate request, in line order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn responses_for_request(
    conn: &mut SqliteConnection,
    rate_request_id: i64,
) -> Result<Vec<RateResponseData>, PersistenceError> {
    let rows: Vec<RateResponseRow> = rate_request_responses::table
        .filter(rate_request_responses::rate_request_id.eq(rate_request_id))
        .order((
            rate_request_responses::line_no.asc(),
            rate_request_responses::response_id.asc(),
        ))
        .select(RateResponseRow::as_select())
        .load(conn)?;

    rows.into_iter().map(RateResponseRow::into_data).collect()
}

/// Retrieves the most recently recorded response of a rate request.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn latest_response(
    conn: &mut SqliteConnection,
    rate_request_id: i64,
) -> Result<Option<RateResponseData>, PersistenceError> {
    let result: Result<RateResponseRow, diesel::result::Error> = rate_request_responses::table
        .filter(rate_request_responses::rate_request_id.eq(rate_request_id))
        .order(rate_request_responses::response_id.desc())
        .select(RateResponseRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_data()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists the line quotes of a rate request.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn line_quotes_for_request(
    conn: &mut SqliteConnection,
    rate_request_id: i64,
) -> Result<Vec<LineQuoteData>, PersistenceError> {
    let rows: Vec<LineQuoteRow> = line_quotes::table
        .filter(line_quotes::rate_request_id.eq(rate_request_id))
        .order(line_quotes::line_quote_id.asc())
        .select(LineQuoteRow::as_select())
        .load(conn)?;

    rows.into_iter().map(LineQuoteRow::into_data).collect()
}

/// Retrieves the selected line quote of a rate request, if any.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn selected_line_quote(
    conn: &mut SqliteConnection,
    rate_request_id: i64,
) -> Result<Option<LineQuoteData>, PersistenceError> {
    let result: Result<LineQuoteRow, diesel::result::Error> = line_quotes::table
        .filter(line_quotes::rate_request_id.eq(rate_request_id))
        .filter(line_quotes::selected.eq(1))
        .select(LineQuoteRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_data()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
