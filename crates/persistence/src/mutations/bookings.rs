// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking request, release order and job mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use freight_desk::StateRequirement;
use freight_desk_domain::{BookingStatus, LifecycleStatus};
use serde_json::Value;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::NewBookingRequest;
use crate::diesel_schema::{booking_requests, job_completions, jobs, ro_documents};
use crate::error::PersistenceError;
use crate::mutations::transitions::check_stored_status;

/// Re-reads a booking's status and checks it against `requirement`.
fn recheck_booking(
    conn: &mut SqliteConnection,
    booking_request_id: i64,
    requirement: &StateRequirement<BookingStatus>,
) -> Result<(), PersistenceError> {
    let stored: String = booking_requests::table
        .filter(booking_requests::booking_request_id.eq(booking_request_id))
        .select(booking_requests::status)
        .first::<String>(conn)
        .optional()?
        .ok_or_else(|| {
            PersistenceError::NotFound(format!("Booking request {booking_request_id}"))
        })?;

    check_stored_status(requirement, &stored, booking_request_id)
}

/// Raises a booking request in `PENDING` status.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_booking_request(
    conn: &mut SqliteConnection,
    booking: &NewBookingRequest,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(booking_requests::table)
        .values((
            booking_requests::customer_id.eq(booking.customer_id),
            booking_requests::rate_source.eq(booking.link.source().as_str()),
            booking_requests::predefined_rate_id.eq(booking.link.predefined_rate_id()),
            booking_requests::rate_request_id.eq(booking.link.rate_request_id()),
            booking_requests::raised_by_id.eq(booking.raised_by_id),
            booking_requests::status.eq(BookingStatus::Pending.as_str()),
        ))
        .execute(conn)?;

    let booking_request_id: i64 = conn.get_last_insert_rowid()?;

    info!(
        booking_request_id,
        rate_source = booking.link.source().as_str(),
        link_id = booking.link.link_id(),
        "Created booking request"
    );
    Ok(booking_request_id)
}

/// Attaches a release order document to a booking.
///
/// # Errors
///
/// Returns `PersistenceError::StaleState` if the booking's status no
/// longer satisfies `requirement`, `PersistenceError::NotFound` if it does
/// not exist, or a database error.
pub fn add_ro_document(
    conn: &mut SqliteConnection,
    booking_request_id: i64,
    number: &str,
    file_url: Option<&str>,
    requirement: &StateRequirement<BookingStatus>,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction(|conn| {
        recheck_booking(conn, booking_request_id, requirement)?;

        diesel::insert_into(ro_documents::table)
            .values((
                ro_documents::booking_request_id.eq(booking_request_id),
                ro_documents::number.eq(number),
                ro_documents::file_url.eq(file_url),
            ))
            .execute(conn)?;

        let ro_document_id: i64 = conn.get_last_insert_rowid()?;
        info!(booking_request_id, ro_document_id, "Added RO document");
        Ok(ro_document_id)
    })
}

/// Records an ERP job opened against a booking.
///
/// # Errors
///
/// Returns `PersistenceError::StaleState` if the booking's status no
/// longer satisfies `requirement`, `PersistenceError::NotFound` if it does
/// not exist, or a database error.
pub fn open_job(
    conn: &mut SqliteConnection,
    booking_request_id: i64,
    erp_job_no: &str,
    opened_by_id: i64,
    requirement: &StateRequirement<BookingStatus>,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction(|conn| {
        recheck_booking(conn, booking_request_id, requirement)?;

        diesel::insert_into(jobs::table)
            .values((
                jobs::booking_request_id.eq(booking_request_id),
                jobs::erp_job_no.eq(erp_job_no),
                jobs::opened_by_id.eq(opened_by_id),
            ))
            .execute(conn)?;

        let job_id: i64 = conn.get_last_insert_rowid()?;
        info!(booking_request_id, job_id, erp_job_no, "Opened ERP job");
        Ok(job_id)
    })
}

/// Appends a completion record to a job.
///
/// # Errors
///
/// Returns an error if the details cannot be serialized or the insert fails.
pub fn complete_job(
    conn: &mut SqliteConnection,
    job_id: i64,
    details: &Value,
    completed_by_id: i64,
) -> Result<i64, PersistenceError> {
    let details_json: String = serde_json::to_string(details)?;

    diesel::insert_into(job_completions::table)
        .values((
            job_completions::job_id.eq(job_id),
            job_completions::details_json.eq(&details_json),
            job_completions::completed_by_id.eq(completed_by_id),
        ))
        .execute(conn)?;

    let completion_id: i64 = conn.get_last_insert_rowid()?;
    info!(job_id, completion_id, "Recorded job completion");
    Ok(completion_id)
}
