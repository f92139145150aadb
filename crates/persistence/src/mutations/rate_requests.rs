// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rate request, line quote and predefined rate mutations.
//!
//! Status changes of rate requests go through
//! [`crate::mutations::transitions`]; this module only creates records.

use diesel::SqliteConnection;
use diesel::prelude::*;
use freight_desk_domain::{LifecycleStatus, RateRequestStatus};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::data_models::{NewLineQuote, NewPredefinedRate, NewRateRequest};
use crate::diesel_schema::{line_quotes, predefined_rates, rate_requests};
use crate::error::PersistenceError;

/// Creates a rate request in `PENDING` status.
///
/// # Errors
///
/// Returns an error if the insert fails, including a duplicate reference
/// number.
pub fn create_rate_request(
    conn: &mut SqliteConnection,
    request: &NewRateRequest,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(rate_requests::table)
        .values((
            rate_requests::ref_no.eq(&request.ref_no),
            rate_requests::mode.eq(request.mode.as_str()),
            rate_requests::shipment_type.eq(request.shipment_type.as_str()),
            rate_requests::pol_id.eq(request.pol_id),
            rate_requests::pod_id.eq(request.pod_id),
            rate_requests::door_or_cy.eq(request.door_or_cy.as_deref()),
            rate_requests::us_zip.eq(request.us_zip.as_deref()),
            rate_requests::preferred_line_id.eq(request.preferred_line_id),
            rate_requests::equipment_type_id.eq(request.equipment_type_id),
            rate_requests::reefer_temp.eq(request.reefer_temp),
            rate_requests::pallet_count.eq(request.pallet_count),
            rate_requests::pallet_dims.eq(request.pallet_dims.as_deref()),
            rate_requests::hs_code.eq(request.hs_code.as_deref()),
            rate_requests::weight_tons.eq(request.weight_tons),
            rate_requests::incoterm.eq(&request.incoterm),
            rate_requests::market_rate.eq(request.market_rate),
            rate_requests::special_instructions.eq(request.special_instructions.as_deref()),
            rate_requests::cargo_ready_date.eq(request.cargo_ready_date.as_deref()),
            rate_requests::vessel_required.eq(i32::from(request.vessel_required)),
            rate_requests::detention_free_time.eq(request.detention_free_time.as_deref()),
            rate_requests::salesperson_id.eq(request.salesperson_id),
            rate_requests::customer_id.eq(request.customer_id),
            rate_requests::status.eq(RateRequestStatus::Pending.as_str()),
        ))
        .execute(conn)?;

    let rate_request_id: i64 = conn.get_last_insert_rowid()?;

    info!(
        rate_request_id,
        ref_no = %request.ref_no,
        salesperson_id = request.salesperson_id,
        "Created rate request"
    );
    Ok(rate_request_id)
}

/// Adds a carrier line quote to a rate request.
///
/// When the new quote is selected, every other quote of the request is
/// deselected first, in the same transaction, so at most one quote per
/// request is ever selected.
///
/// # Errors
///
/// Returns an error if a database write fails.
pub fn add_line_quote(
    conn: &mut SqliteConnection,
    rate_request_id: i64,
    quote: &NewLineQuote,
) -> Result<i64, PersistenceError> {
    let terms_json: String = serde_json::to_string(&quote.terms)?;

    conn.immediate_transaction(|conn| {
        if quote.selected {
            let cleared: usize = diesel::update(line_quotes::table)
                .filter(line_quotes::rate_request_id.eq(rate_request_id))
                .filter(line_quotes::selected.eq(1))
                .set(line_quotes::selected.eq(0))
                .execute(conn)?;
            debug!(rate_request_id, cleared, "Cleared selected line quotes");
        }

        diesel::insert_into(line_quotes::table)
            .values((
                line_quotes::rate_request_id.eq(rate_request_id),
                line_quotes::shipping_line_id.eq(quote.shipping_line_id),
                line_quotes::equipment_type_id.eq(quote.equipment_type_id),
                line_quotes::terms_json.eq(&terms_json),
                line_quotes::valid_to.eq(&quote.valid_to),
                line_quotes::selected.eq(i32::from(quote.selected)),
            ))
            .execute(conn)?;

        let line_quote_id: i64 = conn.get_last_insert_rowid()?;
        info!(rate_request_id, line_quote_id, "Added line quote");
        Ok(line_quote_id)
    })
}

/// Creates a predefined rate.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_predefined_rate(
    conn: &mut SqliteConnection,
    rate: &NewPredefinedRate,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(predefined_rates::table)
        .values((
            predefined_rates::trade_lane_id.eq(rate.trade_lane_id),
            predefined_rates::pol_id.eq(rate.pol_id),
            predefined_rates::pod_id.eq(rate.pod_id),
            predefined_rates::service.eq(&rate.service),
            predefined_rates::equipment_type_id.eq(rate.equipment_type_id),
            predefined_rates::is_lcl.eq(i32::from(rate.is_lcl)),
            predefined_rates::valid_from.eq(&rate.valid_from),
            predefined_rates::valid_to.eq(&rate.valid_to),
            predefined_rates::notes.eq(rate.notes.as_deref()),
            predefined_rates::status.eq(&rate.status),
        ))
        .execute(conn)?;

    let predefined_rate_id: i64 = conn.get_last_insert_rowid()?;
    info!(predefined_rate_id, "Created predefined rate");
    Ok(predefined_rate_id)
}
