// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Itinerary and itinerary item mutations.
//!
//! Every write re-reads the itinerary status inside an immediate
//! transaction; edits are only possible while the itinerary is a draft.
//! Ownership is checked by the caller.

use diesel::SqliteConnection;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Text;
use freight_desk::StateRequirement;
use freight_desk_domain::{ItineraryStatus, ItineraryType, LifecycleStatus};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::{ItineraryItemPatch, ItineraryPatch, NewItineraryItem};
use crate::diesel_schema::{itineraries, itinerary_items};
use crate::error::PersistenceError;
use crate::mutations::transitions::check_stored_status;

#[derive(AsChangeset)]
#[diesel(table_name = itineraries)]
struct ItineraryChangeset<'a> {
    itinerary_type: Option<&'a str>,
    week_start: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = itinerary_items)]
struct ItineraryItemChangeset<'a> {
    item_date: Option<&'a str>,
    customer_id: Option<i64>,
    lead_id: Option<&'a str>,
    purpose: Option<&'a str>,
    planned_time: Option<&'a str>,
    location: Option<&'a str>,
    notes: Option<&'a str>,
}

impl<'a> From<&'a ItineraryItemPatch> for ItineraryItemChangeset<'a> {
    fn from(patch: &'a ItineraryItemPatch) -> Self {
        Self {
            item_date: patch.date.as_deref(),
            customer_id: patch.customer_id,
            lead_id: patch.lead_id.as_deref(),
            purpose: patch.purpose.as_deref(),
            planned_time: patch.planned_time.as_deref(),
            location: patch.location.as_deref(),
            notes: patch.notes.as_deref(),
        }
    }
}

fn recheck_itinerary(
    conn: &mut SqliteConnection,
    itinerary_id: i64,
    requirement: &StateRequirement<ItineraryStatus>,
) -> Result<(), PersistenceError> {
    let stored: String = itineraries::table
        .filter(itineraries::itinerary_id.eq(itinerary_id))
        .select(itineraries::status)
        .first::<String>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Itinerary {itinerary_id}")))?;

    check_stored_status(requirement, &stored, itinerary_id)
}

fn parent_of_item(conn: &mut SqliteConnection, item_id: i64) -> Result<i64, PersistenceError> {
    itinerary_items::table
        .filter(itinerary_items::item_id.eq(item_id))
        .select(itinerary_items::itinerary_id)
        .first::<i64>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Itinerary item {item_id}")))
}

/// Creates a draft itinerary.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_itinerary(
    conn: &mut SqliteConnection,
    owner_id: i64,
    itinerary_type: ItineraryType,
    week_start: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(itineraries::table)
        .values((
            itineraries::owner_id.eq(owner_id),
            itineraries::itinerary_type.eq(itinerary_type.as_str()),
            itineraries::week_start.eq(week_start),
            itineraries::status.eq(ItineraryStatus::Draft.as_str()),
        ))
        .execute(conn)?;

    let itinerary_id: i64 = conn.get_last_insert_rowid()?;
    info!(itinerary_id, owner_id, "Created itinerary");
    Ok(itinerary_id)
}

/// Updates the type or week of an itinerary.
///
/// # Errors
///
/// Returns `PersistenceError::StaleState` if the itinerary no longer
/// satisfies `requirement`, `PersistenceError::NotFound` if it does not
/// exist, or a database error.
pub fn update_itinerary(
    conn: &mut SqliteConnection,
    itinerary_id: i64,
    patch: &ItineraryPatch,
    requirement: &StateRequirement<ItineraryStatus>,
) -> Result<(), PersistenceError> {
    let changes: ItineraryChangeset<'_> = ItineraryChangeset {
        itinerary_type: patch.itinerary_type.as_ref().map(ItineraryType::as_str),
        week_start: patch.week_start.as_deref(),
    };

    conn.immediate_transaction(|conn| {
        recheck_itinerary(conn, itinerary_id, requirement)?;

        diesel::update(itineraries::table)
            .filter(itineraries::itinerary_id.eq(itinerary_id))
            .set((
                changes,
                itineraries::updated_at.eq(sql::<Text>("CURRENT_TIMESTAMP")),
            ))
            .execute(conn)?;
        Ok(())
    })
}

/// Deletes an itinerary and its items.
///
/// # Errors
///
/// Returns `PersistenceError::StaleState` if the itinerary no longer
/// satisfies `requirement`, `PersistenceError::NotFound` if it does not
/// exist, or a database error.
pub fn delete_itinerary(
    conn: &mut SqliteConnection,
    itinerary_id: i64,
    requirement: &StateRequirement<ItineraryStatus>,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        recheck_itinerary(conn, itinerary_id, requirement)?;

        diesel::delete(itinerary_items::table)
            .filter(itinerary_items::itinerary_id.eq(itinerary_id))
            .execute(conn)?;
        diesel::delete(itineraries::table)
            .filter(itineraries::itinerary_id.eq(itinerary_id))
            .execute(conn)?;

        info!(itinerary_id, "Deleted itinerary");
        Ok(())
    })
}

/// Adds an item to an itinerary.
///
/// # Errors
///
/// Returns `PersistenceError::StaleState` if the itinerary no longer
/// satisfies `requirement`, `PersistenceError::NotFound` if it does not
/// exist, or a database error.
pub fn add_itinerary_item(
    conn: &mut SqliteConnection,
    itinerary_id: i64,
    item: &NewItineraryItem,
    requirement: &StateRequirement<ItineraryStatus>,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction(|conn| {
        recheck_itinerary(conn, itinerary_id, requirement)?;

        diesel::insert_into(itinerary_items::table)
            .values((
                itinerary_items::itinerary_id.eq(itinerary_id),
                itinerary_items::item_date.eq(&item.date),
                itinerary_items::customer_id.eq(item.customer_id),
                itinerary_items::lead_id.eq(item.lead_id.as_deref()),
                itinerary_items::purpose.eq(&item.purpose),
                itinerary_items::planned_time.eq(item.planned_time.as_deref()),
                itinerary_items::location.eq(item.location.as_deref()),
                itinerary_items::notes.eq(item.notes.as_deref()),
            ))
            .execute(conn)?;

        let item_id: i64 = conn.get_last_insert_rowid()?;
        info!(itinerary_id, item_id, "Added itinerary item");
        Ok(item_id)
    })
}

/// Edits an itinerary item.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the item does not exist,
/// `PersistenceError::StaleState` if its itinerary no longer satisfies
/// `requirement`, or a database error.
pub fn update_itinerary_item(
    conn: &mut SqliteConnection,
    item_id: i64,
    patch: &ItineraryItemPatch,
    requirement: &StateRequirement<ItineraryStatus>,
) -> Result<(), PersistenceError> {
    let changes: ItineraryItemChangeset<'_> = ItineraryItemChangeset::from(patch);

    conn.immediate_transaction(|conn| {
        let itinerary_id: i64 = parent_of_item(conn, item_id)?;
        recheck_itinerary(conn, itinerary_id, requirement)?;

        diesel::update(itinerary_items::table)
            .filter(itinerary_items::item_id.eq(item_id))
            .set((
                changes,
                itinerary_items::updated_at.eq(sql::<Text>("CURRENT_TIMESTAMP")),
            ))
            .execute(conn)?;
        Ok(())
    })
}

/// Removes an itinerary item.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the item does not exist,
/// `PersistenceError::StaleState` if its itinerary no longer satisfies
/// `requirement`, or a database error.
pub fn remove_itinerary_item(
    conn: &mut SqliteConnection,
    item_id: i64,
    requirement: &StateRequirement<ItineraryStatus>,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        let itinerary_id: i64 = parent_of_item(conn, item_id)?;
        recheck_itinerary(conn, itinerary_id, requirement)?;

        diesel::delete(itinerary_items::table)
            .filter(itinerary_items::item_id.eq(item_id))
            .execute(conn)?;

        info!(itinerary_id, item_id, "Removed itinerary item");
        Ok(())
    })
}
