// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Sales activity mutations.

use diesel::SqliteConnection;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Text;
use freight_desk_domain::ActivityType;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::{ActivityPatch, NewActivity};
use crate::diesel_schema::sales_activities;
use crate::error::PersistenceError;

#[derive(AsChangeset)]
#[diesel(table_name = sales_activities)]
struct ActivityChangeset<'a> {
    customer_id: Option<i64>,
    lead_id: Option<&'a str>,
    activity_type: Option<&'a str>,
    activity_date: Option<&'a str>,
    notes: Option<&'a str>,
    outcome: Option<&'a str>,
    next_action_date: Option<&'a str>,
}

/// Records a sales activity.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_activity(
    conn: &mut SqliteConnection,
    activity: &NewActivity,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(sales_activities::table)
        .values((
            sales_activities::user_id.eq(activity.user_id),
            sales_activities::customer_id.eq(activity.customer_id),
            sales_activities::lead_id.eq(activity.lead_id.as_deref()),
            sales_activities::activity_type.eq(activity.activity_type.as_str()),
            sales_activities::activity_date.eq(&activity.date),
            sales_activities::notes.eq(activity.notes.as_deref()),
            sales_activities::outcome.eq(activity.outcome.as_deref()),
            sales_activities::next_action_date.eq(activity.next_action_date.as_deref()),
        ))
        .execute(conn)?;

    let activity_id: i64 = conn.get_last_insert_rowid()?;
    info!(activity_id, user_id = activity.user_id, "Recorded sales activity");
    Ok(activity_id)
}

/// Edits a sales activity.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the activity does not exist.
pub fn update_activity(
    conn: &mut SqliteConnection,
    activity_id: i64,
    patch: &ActivityPatch,
) -> Result<(), PersistenceError> {
    let changes: ActivityChangeset<'_> = ActivityChangeset {
        customer_id: patch.customer_id,
        lead_id: patch.lead_id.as_deref(),
        activity_type: patch.activity_type.as_ref().map(ActivityType::as_str),
        activity_date: patch.date.as_deref(),
        notes: patch.notes.as_deref(),
        outcome: patch.outcome.as_deref(),
        next_action_date: patch.next_action_date.as_deref(),
    };

    let updated: usize = diesel::update(sales_activities::table)
        .filter(sales_activities::activity_id.eq(activity_id))
        .set((
            changes,
            sales_activities::updated_at.eq(sql::<Text>("CURRENT_TIMESTAMP")),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("Activity {activity_id}")));
    }
    Ok(())
}

/// Deletes a sales activity.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the activity does not exist.
pub fn delete_activity(
    conn: &mut SqliteConnection,
    activity_id: i64,
) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(sales_activities::table)
        .filter(sales_activities::activity_id.eq(activity_id))
        .execute(conn)?;

    if deleted == 0 {
        return Err(PersistenceError::NotFound(format!("Activity {activity_id}")));
    }

    info!(activity_id, "Deleted sales activity");
    Ok(())
}
