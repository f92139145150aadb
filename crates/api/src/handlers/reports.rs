// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Management reports.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use freight_desk_domain::{BookingStatus, ItineraryStatus, RateRequestStatus};
use freight_desk_persistence::{
    Persistence, SettledRateRequest, UserData, format_sql_timestamp, parse_sql_timestamp,
};
use time::{Duration, OffsetDateTime};

use super::rate_requests::{RATE_REQUEST_STATUSES, settled_since};
use crate::auth::{AuthenticatedActor, assert_role};
use crate::capabilities::REPORT_VIEWERS;
use crate::error::ApiError;
use crate::request_response::{
    ResponseTimeEntry, ResponseTimeReport, StatusCardsResponse, TopSalespersonEntry,
};

const RESPONSE_TIME_WINDOW: Duration = Duration::days(30);
const TOP_SALESPEOPLE: usize = 10;

const BOOKING_STATUSES: [BookingStatus; 3] = [
    BookingStatus::Pending,
    BookingStatus::Confirmed,
    BookingStatus::Cancelled,
];

const ITINERARY_STATUSES: [ItineraryStatus; 4] = [
    ItineraryStatus::Draft,
    ItineraryStatus::Submitted,
    ItineraryStatus::Approved,
    ItineraryStatus::Rejected,
];

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn turnaround(settled: SettledRateRequest) -> Result<ResponseTimeEntry, ApiError> {
    let created: OffsetDateTime = parse_sql_timestamp(&settled.created_at)?;
    let updated: OffsetDateTime = parse_sql_timestamp(&settled.updated_at)?;
    let hours: f64 = (updated - created).as_seconds_f64() / 3600.0;
    Ok(ResponseTimeEntry {
        rate_request_id: settled.rate_request_id,
        ref_no: settled.ref_no,
        status: settled.status,
        hours: round_hundredths(hours),
    })
}

/// Pricing turnaround for requests settled in the last 30 days.
///
/// # Errors
///
/// Returns an error if the actor may not view reports or a stored
/// timestamp is unreadable.
pub fn response_time(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ResponseTimeReport, ApiError> {
    assert_role(actor, REPORT_VIEWERS, "view_response_time_report")?;
    let since: String = format_sql_timestamp(OffsetDateTime::now_utc() - RESPONSE_TIME_WINDOW)?;

    let items: Vec<ResponseTimeEntry> = settled_since(persistence, &since)?
        .into_iter()
        .map(turnaround)
        .collect::<Result<_, _>>()?;

    let average_hours: f64 = if items.is_empty() {
        0.0
    } else {
        let total: f64 = items.iter().map(|item| item.hours).sum();
        round_hundredths(total / f64::from(u32::try_from(items.len()).unwrap_or(u32::MAX)))
    };

    Ok(ResponseTimeReport {
        items,
        average_hours,
    })
}

/// The ten salespeople with the most rate requests.
///
/// # Errors
///
/// Returns an error if the actor may not view reports or a query fails.
pub fn top_salespeople(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<Vec<TopSalespersonEntry>, ApiError> {
    assert_role(actor, REPORT_VIEWERS, "view_top_salespeople")?;

    let mut counts: Vec<(i64, i64)> = persistence.rate_request_counts_by_salesperson()?;
    counts.sort_by_key(|&(user_id, count)| (Reverse(count), user_id));
    counts.truncate(TOP_SALESPEOPLE);

    let mut entries: Vec<TopSalespersonEntry> = Vec::with_capacity(counts.len());
    for (user_id, rate_requests) in counts {
        let Some(user) = persistence.get_user_by_id(user_id)? else {
            continue;
        };
        let UserData { name, email, .. } = user;
        entries.push(TopSalespersonEntry {
            user_id,
            name,
            email,
            rate_requests,
        });
    }
    Ok(entries)
}

/// Zero-fills the known statuses, then adds the stored counts.
fn status_cards(known: &[&str], rows: Vec<(String, i64)>) -> StatusCardsResponse {
    let mut counts: BTreeMap<String, i64> =
        known.iter().map(|status| ((*status).to_string(), 0)).collect();
    for (status, count) in rows {
        *counts.entry(status).or_insert(0) += count;
    }
    let total: i64 = counts.values().sum();
    StatusCardsResponse { counts, total }
}

/// Rate request counts per status.
///
/// # Errors
///
/// Returns an error if the actor may not view reports or the query fails.
pub fn rate_request_status_cards(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<StatusCardsResponse, ApiError> {
    assert_role(actor, REPORT_VIEWERS, "view_status_cards")?;
    let known: Vec<&str> = RATE_REQUEST_STATUSES.iter().map(RateRequestStatus::as_str).collect();
    Ok(status_cards(&known, persistence.rate_request_status_counts()?))
}

/// Booking request counts per status.
///
/// # Errors
///
/// Returns an error if the actor may not view reports or the query fails.
pub fn booking_status_cards(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<StatusCardsResponse, ApiError> {
    assert_role(actor, REPORT_VIEWERS, "view_booking_status_cards")?;
    let known: Vec<&str> = BOOKING_STATUSES.iter().map(BookingStatus::as_str).collect();
    Ok(status_cards(&known, persistence.booking_status_counts()?))
}

/// Itinerary counts per status.
///
/// # Errors
///
/// Returns an error if the actor may not view reports or the query fails.
pub fn itinerary_status_cards(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<StatusCardsResponse, ApiError> {
    assert_role(actor, REPORT_VIEWERS, "view_itinerary_status_cards")?;
    let known: Vec<&str> = ITINERARY_STATUSES.iter().map(ItineraryStatus::as_str).collect();
    Ok(status_cards(&known, persistence.itinerary_status_counts()?))
}
