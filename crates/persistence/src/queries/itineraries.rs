// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Itinerary and itinerary item queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use freight_desk_domain::{ItineraryStatus, ItineraryType};
use tracing::debug;

use crate::data_models::{ItineraryData, ItineraryFilter, ItineraryItemData};
use crate::diesel_schema::{itineraries, itinerary_items, users};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = itineraries)]
pub(crate) struct ItineraryRow {
    itinerary_id: i64,
    owner_id: i64,
    itinerary_type: String,
    week_start: String,
    status: String,
    submitted_at: Option<String>,
    approver_id: Option<i64>,
    approve_note: Option<String>,
    decided_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl ItineraryRow {
    pub(crate) fn into_data(self) -> Result<ItineraryData, PersistenceError> {
        Ok(ItineraryData {
            itinerary_id: self.itinerary_id,
            owner_id: self.owner_id,
            itinerary_type: self.itinerary_type.parse::<ItineraryType>()?,
            week_start: self.week_start,
            status: self.status.parse::<ItineraryStatus>()?,
            submitted_at: self.submitted_at,
            approver_id: self.approver_id,
            approve_note: self.approve_note,
            decided_at: self.decided_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = itinerary_items)]
struct ItineraryItemRow {
    item_id: i64,
    itinerary_id: i64,
    item_date: String,
    customer_id: Option<i64>,
    lead_id: Option<String>,
    purpose: String,
    planned_time: Option<String>,
    location: Option<String>,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
}

impl From<ItineraryItemRow> for ItineraryItemData {
    fn from(row: ItineraryItemRow) -> Self {
        Self {
            item_id: row.item_id,
            itinerary_id: row.itinerary_id,
            date: row.item_date,
            customer_id: row.customer_id,
            lead_id: row.lead_id,
            purpose: row.purpose,
            planned_time: row.planned_time,
            location: row.location,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Retrieves an itinerary by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the itinerary is not found.
pub fn get_itinerary(
    conn: &mut SqliteConnection,
    itinerary_id: i64,
) -> Result<Option<ItineraryData>, PersistenceError> {
    debug!("Looking up itinerary by ID: {}", itinerary_id);

    let result: Result<ItineraryRow, diesel::result::Error> = itineraries::table
        .filter(itineraries::itinerary_id.eq(itinerary_id))
        .select(ItineraryRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_data()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists itineraries, most recent week first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_itineraries(
    conn: &mut SqliteConnection,
    filter: ItineraryFilter,
) -> Result<Vec<ItineraryData>, PersistenceError> {
    let mut query = itineraries::table
        .select(ItineraryRow::as_select())
        .into_boxed();

    if let Some(owner_id) = filter.owner_id {
        query = query.filter(itineraries::owner_id.eq(owner_id));
    }
    if let Some(sbu_id) = filter.sbu_id {
        let members = users::table
            .filter(users::sbu_id.eq(sbu_id))
            .select(users::user_id);
        query = query.filter(itineraries::owner_id.eq_any(members));
    }

    let rows: Vec<ItineraryRow> = query
        .order((
            itineraries::week_start.desc(),
            itineraries::itinerary_id.desc(),
        ))
        .load(conn)?;

    rows.into_iter().map(ItineraryRow::into_data).collect()
}

/// Lists the items of an itinerary by date.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn items_for_itinerary(
    conn: &mut SqliteConnection,
    itinerary_id: i64,
) -> Result<Vec<ItineraryItemData>, PersistenceError> {
    let rows: Vec<ItineraryItemRow> = itinerary_items::table
        .filter(itinerary_items::itinerary_id.eq(itinerary_id))
        .order((itinerary_items::item_date.asc(), itinerary_items::item_id.asc()))
        .select(ItineraryItemRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(ItineraryItemData::from).collect())
}

/// Retrieves an itinerary item by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the item is not found.
pub fn get_itinerary_item(
    conn: &mut SqliteConnection,
    item_id: i64,
) -> Result<Option<ItineraryItemData>, PersistenceError> {
    let result: Result<ItineraryItemRow, diesel::result::Error> = itinerary_items::table
        .filter(itinerary_items::item_id.eq(item_id))
        .select(ItineraryItemRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(ItineraryItemData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
