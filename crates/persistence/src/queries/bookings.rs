// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking request, release order and ERP job queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use freight_desk_domain::{BookingStatus, RateLink};
use serde_json::Value;
use tracing::debug;

use crate::data_models::{
    BookingFilter, BookingRequestData, JobCompletionData, JobData, RoDocumentData,
};
use crate::diesel_schema::{booking_requests, job_completions, jobs, ro_documents};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = booking_requests)]
pub(crate) struct BookingRequestRow {
    booking_request_id: i64,
    customer_id: i64,
    rate_source: String,
    predefined_rate_id: Option<i64>,
    rate_request_id: Option<i64>,
    raised_by_id: i64,
    status: String,
    cancel_reason: Option<String>,
    confirmed_by_id: Option<i64>,
    confirmed_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl BookingRequestRow {
    pub(crate) fn into_data(self) -> Result<BookingRequestData, PersistenceError> {
        let link: RateLink =
            RateLink::from_columns(&self.rate_source, self.predefined_rate_id, self.rate_request_id)?;

        Ok(BookingRequestData {
            booking_request_id: self.booking_request_id,
            customer_id: self.customer_id,
            rate_source: link.source(),
            link,
            predefined_rate_id: link.predefined_rate_id(),
            rate_request_id: link.rate_request_id(),
            raised_by_id: self.raised_by_id,
            status: self.status.parse::<BookingStatus>()?,
            cancel_reason: self.cancel_reason,
            confirmed_by_id: self.confirmed_by_id,
            confirmed_at: self.confirmed_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = ro_documents)]
struct RoDocumentRow {
    ro_document_id: i64,
    booking_request_id: i64,
    number: String,
    file_url: Option<String>,
    created_at: String,
}

impl From<RoDocumentRow> for RoDocumentData {
    fn from(row: RoDocumentRow) -> Self {
        Self {
            ro_document_id: row.ro_document_id,
            booking_request_id: row.booking_request_id,
            number: row.number,
            file_url: row.file_url,
            created_at: row.created_at,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = jobs)]
struct JobRow {
    job_id: i64,
    booking_request_id: i64,
    erp_job_no: String,
    opened_by_id: i64,
    created_at: String,
}

impl From<JobRow> for JobData {
    fn from(row: JobRow) -> Self {
        Self {
            job_id: row.job_id,
            booking_request_id: row.booking_request_id,
            erp_job_no: row.erp_job_no,
            opened_by_id: row.opened_by_id,
            created_at: row.created_at,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = job_completions)]
struct JobCompletionRow {
    completion_id: i64,
    job_id: i64,
    details_json: String,
    completed_by_id: i64,
    created_at: String,
}

impl JobCompletionRow {
    fn into_data(self) -> Result<JobCompletionData, PersistenceError> {
        Ok(JobCompletionData {
            completion_id: self.completion_id,
            job_id: self.job_id,
            details: serde_json::from_str::<Value>(&self.details_json)?,
            completed_by_id: self.completed_by_id,
            created_at: self.created_at,
        })
    }
}

/// Retrieves a booking request by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored rate link
/// is inconsistent.
/// Returns `Ok(None)` if the booking request is not found.
pub fn get_booking_request(
    conn: &mut SqliteConnection,
    booking_request_id: i64,
) -> Result<Option<BookingRequestData>, PersistenceError> {
    debug!("Looking up booking request by ID: {}", booking_request_id);

    let result: Result<BookingRequestRow, diesel::result::Error> = booking_requests::table
        .filter(booking_requests::booking_request_id.eq(booking_request_id))
        .select(BookingRequestRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_data()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists booking requests, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_booking_requests(
    conn: &mut SqliteConnection,
    filter: BookingFilter,
) -> Result<Vec<BookingRequestData>, PersistenceError> {
    let mut query = booking_requests::table
        .select(BookingRequestRow::as_select())
        .into_boxed();

    if let Some(raised_by_id) = filter.raised_by_id {
        query = query.filter(booking_requests::raised_by_id.eq(raised_by_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(booking_requests::status.eq(status.as_str()));
    }

    let rows: Vec<BookingRequestRow> = query
        .order(booking_requests::booking_request_id.desc())
        .load(conn)?;

    rows.into_iter().map(BookingRequestRow::into_data).collect()
}

/// Lists the release order documents of a booking.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn ro_documents_for_booking(
    conn: &mut SqliteConnection,
    booking_request_id: i64,
) -> Result<Vec<RoDocumentData>, PersistenceError> {
    let rows: Vec<RoDocumentRow> = ro_documents::table
        .filter(ro_documents::booking_request_id.eq(booking_request_id))
        .order(ro_documents::ro_document_id.asc())
        .select(RoDocumentRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(RoDocumentData::from).collect())
}

/// Retrieves a release order document by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_ro_document(
    conn: &mut SqliteConnection,
    ro_document_id: i64,
) -> Result<Option<RoDocumentData>, PersistenceError> {
    let result: Result<RoDocumentRow, diesel::result::Error> = ro_documents::table
        .filter(ro_documents::ro_document_id.eq(ro_document_id))
        .select(RoDocumentRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(RoDocumentData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists the ERP jobs opened against a booking.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn jobs_for_booking(
    conn: &mut SqliteConnection,
    booking_request_id: i64,
) -> Result<Vec<JobData>, PersistenceError> {
    let rows: Vec<JobRow> = jobs::table
        .filter(jobs::booking_request_id.eq(booking_request_id))
        .order(jobs::job_id.asc())
        .select(JobRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(JobData::from).collect())
}

/// Retrieves an ERP job by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the job is not found.
pub fn get_job(conn: &mut SqliteConnection, job_id: i64) -> Result<Option<JobData>, PersistenceError> {
    debug!("Looking up job by ID: {}", job_id);

    let result: Result<JobRow, diesel::result::Error> = jobs::table
        .filter(jobs::job_id.eq(job_id))
        .select(JobRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(JobData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists ERP jobs, newest first, optionally only those opened by one user.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_jobs(
    conn: &mut SqliteConnection,
    opened_by_id: Option<i64>,
) -> Result<Vec<JobData>, PersistenceError> {
    let mut query = jobs::table.select(JobRow::as_select()).into_boxed();
    if let Some(opened_by_id) = opened_by_id {
        query = query.filter(jobs::opened_by_id.eq(opened_by_id));
    }

    let rows: Vec<JobRow> = query.order(jobs::job_id.desc()).load(conn)?;
    Ok(rows.into_iter().map(JobData::from).collect())
}

/// Lists the completion records of an ERP job, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn completions_for_job(
    conn: &mut SqliteConnection,
    job_id: i64,
) -> Result<Vec<JobCompletionData>, PersistenceError> {
    let rows: Vec<JobCompletionRow> = job_completions::table
        .filter(job_completions::job_id.eq(job_id))
        .order(job_completions::completion_id.asc())
        .select(JobCompletionRow::as_select())
        .load(conn)?;
    rows.into_iter().map(JobCompletionRow::into_data).collect()
}

/// Retrieves a job completion record by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_job_completion(
    conn: &mut SqliteConnection,
    completion_id: i64,
) -> Result<Option<JobCompletionData>, PersistenceError> {
    let result: Result<JobCompletionRow, diesel::result::Error> = job_completions::table
        .filter(job_completions::completion_id.eq(completion_id))
        .select(JobCompletionRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_data()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
