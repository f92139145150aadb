// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Aggregate queries backing the dashboard, reports and admin overview.

use diesel::SqliteConnection;
use diesel::dsl::{count, count_star};
use diesel::prelude::*;
use freight_desk_domain::RateRequestStatus;

use crate::data_models::{SettledRateRequest, SystemCounts};
use crate::diesel_schema::{
    booking_requests, customers, itineraries, rate_requests, sales_activities, users,
};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = rate_requests)]
struct SettledRow {
    rate_request_id: i64,
    ref_no: String,
    status: String,
    created_at: String,
    updated_at: String,
}

/// Counts rate requests, optionally only those raised by one salesperson.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_rate_requests(
    conn: &mut SqliteConnection,
    salesperson_id: Option<i64>,
) -> Result<i64, PersistenceError> {
    let mut query = rate_requests::table.select(count_star()).into_boxed();
    if let Some(salesperson_id) = salesperson_id {
        query = query.filter(rate_requests::salesperson_id.eq(salesperson_id));
    }
    Ok(query.first(conn)?)
}

/// Counts booking requests, optionally only those raised by one user.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_booking_requests(
    conn: &mut SqliteConnection,
    raised_by_id: Option<i64>,
) -> Result<i64, PersistenceError> {
    let mut query = booking_requests::table.select(count_star()).into_boxed();
    if let Some(raised_by_id) = raised_by_id {
        query = query.filter(booking_requests::raised_by_id.eq(raised_by_id));
    }
    Ok(query.first(conn)?)
}

/// Counts itineraries, optionally only those owned by one user.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_itineraries(
    conn: &mut SqliteConnection,
    owner_id: Option<i64>,
) -> Result<i64, PersistenceError> {
    let mut query = itineraries::table.select(count_star()).into_boxed();
    if let Some(owner_id) = owner_id {
        query = query.filter(itineraries::owner_id.eq(owner_id));
    }
    Ok(query.first(conn)?)
}

/// Counts rate requests per status.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn rate_request_status_counts(
    conn: &mut SqliteConnection,
) -> Result<Vec<(String, i64)>, PersistenceError> {
    Ok(rate_requests::table
        .group_by(rate_requests::status)
        .select((rate_requests::status, count(rate_requests::rate_request_id)))
        .load(conn)?)
}

/// Counts booking requests per status.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn booking_status_counts(
    conn: &mut SqliteConnection,
) -> Result<Vec<(String, i64)>, PersistenceError> {
    Ok(booking_requests::table
        .group_by(booking_requests::status)
        .select((
            booking_requests::status,
            count(booking_requests::booking_request_id),
        ))
        .load(conn)?)
}

/// Counts itineraries per status.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn itinerary_status_counts(
    conn: &mut SqliteConnection,
) -> Result<Vec<(String, i64)>, PersistenceError> {
    Ok(itineraries::table
        .group_by(itineraries::status)
        .select((itineraries::status, count(itineraries::itinerary_id)))
        .load(conn)?)
}

/// Counts rate requests per salesperson.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn rate_request_counts_by_salesperson(
    conn: &mut SqliteConnection,
) -> Result<Vec<(i64, i64)>, PersistenceError> {
    Ok(rate_requests::table
        .group_by(rate_requests::salesperson_id)
        .select((
            rate_requests::salesperson_id,
            count(rate_requests::rate_request_id),
        ))
        .load(conn)?)
}

/// Lists completed or rejected rate requests created at or after `since`.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `since` - Lower bound in `YYYY-MM-DD HH:MM:SS` form
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn settled_rate_requests_since(
    conn: &mut SqliteConnection,
    since: &str,
) -> Result<Vec<SettledRateRequest>, PersistenceError> {
    let settled: [&str; 2] = [
        RateRequestStatus::Completed.as_str(),
        RateRequestStatus::Rejected.as_str(),
    ];

    let rows: Vec<SettledRow> = rate_requests::table
        .filter(rate_requests::status.eq_any(settled))
        .filter(rate_requests::created_at.ge(since))
        .order(rate_requests::rate_request_id.asc())
        .select(SettledRow::as_select())
        .load(conn)?;

    rows.into_iter()
        .map(|row| {
            Ok(SettledRateRequest {
                rate_request_id: row.rate_request_id,
                ref_no: row.ref_no,
                status: row.status.parse::<RateRequestStatus>()?,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
        })
        .collect()
}

/// Counts the rows of every business table.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn system_counts(conn: &mut SqliteConnection) -> Result<SystemCounts, PersistenceError> {
    Ok(SystemCounts {
        users: users::table.select(count_star()).first(conn)?,
        customers: customers::table.select(count_star()).first(conn)?,
        rate_requests: rate_requests::table.select(count_star()).first(conn)?,
        booking_requests: booking_requests::table.select(count_star()).first(conn)?,
        itineraries: itineraries::table.select(count_star()).first(conn)?,
        activities: sales_activities::table.select(count_star()).first(conn)?,
    })
}
