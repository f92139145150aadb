// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Atomic status transitions and guarded writes.
//!
//! A transition is written as `UPDATE ... SET status = target WHERE id = ?
//! AND status IN (expected)`. When another writer moved the record first,
//! the update matches no row and the transition fails with
//! `PersistenceError::StaleTransition` instead of overwriting the newer
//! state. The audit event is inserted in the same transaction.
//!
//! Writes that hang off a record without changing its status (release
//! orders, itinerary items, customer edits) re-read the parent status
//! inside an immediate transaction and check the same requirement the
//! caller already checked.

use std::str::FromStr;

use diesel::SqliteConnection;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use freight_desk::{Command, StateRequirement, TransitionResult};
use freight_desk_domain::{DomainError, LifecycleStatus};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::data_models::NewRateResponse;
use crate::diesel_schema::{
    booking_requests, customers, itineraries, rate_request_responses, rate_requests,
};
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;

fn now() -> diesel::expression::SqlLiteral<Text> {
    sql::<Text>("CURRENT_TIMESTAMP")
}

fn now_nullable() -> diesel::expression::SqlLiteral<Nullable<Text>> {
    sql::<Nullable<Text>>("CURRENT_TIMESTAMP")
}

/// Checks a stored status against a requirement inside a transaction.
///
/// # Errors
///
/// Returns `PersistenceError::StaleState` carrying the requirement's
/// message if the stored status no longer satisfies it, or
/// `PersistenceError::CorruptRecord` if the status cannot be parsed.
pub(crate) fn check_stored_status<S>(
    requirement: &StateRequirement<S>,
    stored_status: &str,
    entity_id: i64,
) -> Result<(), PersistenceError>
where
    S: LifecycleStatus + FromStr<Err = DomainError>,
{
    let status: S = stored_status.parse::<S>()?;
    requirement
        .check(status)
        .map_err(|e| PersistenceError::StaleState {
            entity: S::ENTITY,
            entity_id,
            message: e.to_string(),
        })
}

/// Runs the conditional status update for a transition.
fn apply_status_update(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
) -> Result<(), PersistenceError> {
    let id: i64 = result.entity_id;
    let expected: Vec<&'static str> = result.expected_from.clone();

    let rows_affected: usize = match &result.command {
        Command::RespondToRateRequest | Command::CompleteRateRequest => {
            diesel::update(
                rate_requests::table
                    .filter(rate_requests::rate_request_id.eq(id))
                    .filter(rate_requests::status.eq_any(expected)),
            )
            .set((
                rate_requests::status.eq(result.to),
                rate_requests::updated_at.eq(now()),
            ))
            .execute(conn)?
        }
        Command::RejectRateRequest { remark } => diesel::update(
            rate_requests::table
                .filter(rate_requests::rate_request_id.eq(id))
                .filter(rate_requests::status.eq_any(expected)),
        )
        .set((
            rate_requests::status.eq(result.to),
            rate_requests::rejection_remark.eq(Some(remark.as_str())),
            rate_requests::updated_at.eq(now()),
        ))
        .execute(conn)?,
        Command::ConfirmBookingRequest => diesel::update(
            booking_requests::table
                .filter(booking_requests::booking_request_id.eq(id))
                .filter(booking_requests::status.eq_any(expected)),
        )
        .set((
            booking_requests::status.eq(result.to),
            booking_requests::confirmed_by_id.eq(result.actor_user_id),
            booking_requests::confirmed_at.eq(now_nullable()),
            booking_requests::updated_at.eq(now()),
        ))
        .execute(conn)?,
        Command::CancelBookingRequest { reason } => diesel::update(
            booking_requests::table
                .filter(booking_requests::booking_request_id.eq(id))
                .filter(booking_requests::status.eq_any(expected)),
        )
        .set((
            booking_requests::status.eq(result.to),
            booking_requests::cancel_reason.eq(Some(reason.as_str())),
            booking_requests::updated_at.eq(now()),
        ))
        .execute(conn)?,
        Command::SubmitItinerary => diesel::update(
            itineraries::table
                .filter(itineraries::itinerary_id.eq(id))
                .filter(itineraries::status.eq_any(expected)),
        )
        .set((
            itineraries::status.eq(result.to),
            itineraries::submitted_at.eq(now_nullable()),
            itineraries::updated_at.eq(now()),
        ))
        .execute(conn)?,
        Command::DecideItinerary { note, .. } => diesel::update(
            itineraries::table
                .filter(itineraries::itinerary_id.eq(id))
                .filter(itineraries::status.eq_any(expected)),
        )
        .set((
            itineraries::status.eq(result.to),
            itineraries::approver_id.eq(result.actor_user_id),
            itineraries::approve_note.eq(note.as_deref()),
            itineraries::decided_at.eq(now_nullable()),
            itineraries::updated_at.eq(now()),
        ))
        .execute(conn)?,
        Command::DecideCustomer { note, .. } => diesel::update(
            customers::table
                .filter(customers::customer_id.eq(id))
                .filter(customers::approval_status.eq_any(expected)),
        )
        .set((
            customers::approval_status.eq(result.to),
            customers::approved_by_id.eq(result.actor_user_id),
            customers::approval_note.eq(note.as_deref()),
            customers::approved_at.eq(now_nullable()),
            customers::updated_at.eq(now()),
        ))
        .execute(conn)?,
    };

    if rows_affected == 0 {
        debug!(
            entity = result.entity,
            entity_id = id,
            from = result.from,
            "Conditional status update matched no row"
        );
        return Err(PersistenceError::StaleTransition {
            entity: result.entity,
            entity_id: id,
        });
    }

    Ok(())
}

/// Persists a transition: the conditional status update and its audit
/// event, atomically.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `result` - The transition produced by `freight_desk::apply`
///
/// # Returns
///
/// The ID of the audit event.
///
/// # Errors
///
/// Returns `PersistenceError::StaleTransition` if the record is no longer
/// in one of the expected source statuses, or a database error.
pub fn persist_transition(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction(|conn| {
        apply_status_update(conn, result)?;
        let event_id: i64 = persist_audit_event(conn, &result.audit_event)?;

        info!(
            entity = result.entity,
            entity_id = result.entity_id,
            from = result.from,
            to = result.to,
            event_id,
            "Persisted transition"
        );
        Ok(event_id)
    })
}

/// Persists a pricing response together with the transition it triggers.
///
/// The response insert, the `PENDING -> PROCESSING` update and the audit
/// event commit together or not at all.
///
/// # Returns
///
/// The ID of the new response.
///
/// # Errors
///
/// Returns `PersistenceError::StaleTransition` if the request is no longer
/// pending, or a database error.
pub fn persist_rate_response(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
    response: &NewRateResponse,
) -> Result<i64, PersistenceError> {
    let charges_json: String = serde_json::to_string(&response.charges)?;

    conn.immediate_transaction(|conn| {
        apply_status_update(conn, result)?;

        diesel::insert_into(rate_request_responses::table)
            .values((
                rate_request_responses::rate_request_id.eq(result.entity_id),
                rate_request_responses::line_no.eq(response.line_no),
                rate_request_responses::requested_line_id.eq(response.requested_line_id),
                rate_request_responses::requested_equipment_type_id
                    .eq(response.requested_equipment_type_id),
                rate_request_responses::vessel_name.eq(response.vessel_name.as_deref()),
                rate_request_responses::eta.eq(response.eta.as_deref()),
                rate_request_responses::etd.eq(response.etd.as_deref()),
                rate_request_responses::fcl_cutoff.eq(response.fcl_cutoff.as_deref()),
                rate_request_responses::doc_cutoff.eq(response.doc_cutoff.as_deref()),
                rate_request_responses::valid_to.eq(&response.valid_to),
                rate_request_responses::charges_json.eq(&charges_json),
                rate_request_responses::responded_by_id.eq(response.responded_by_id),
            ))
            .execute(conn)?;
        let response_id: i64 = conn.get_last_insert_rowid()?;

        let event_id: i64 = persist_audit_event(conn, &result.audit_event)?;

        info!(
            rate_request_id = result.entity_id,
            response_id, event_id, "Persisted rate request response"
        );
        Ok(response_id)
    })
}
