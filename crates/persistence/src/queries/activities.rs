// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Sales activity queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use freight_desk_domain::ActivityType;

use crate::data_models::ActivityData;
use crate::diesel_schema::sales_activities;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = sales_activities)]
struct ActivityRow {
    activity_id: i64,
    user_id: i64,
    customer_id: Option<i64>,
    lead_id: Option<String>,
    activity_type: String,
    activity_date: String,
    notes: Option<String>,
    outcome: Option<String>,
    next_action_date: Option<String>,
    created_at: String,
    updated_at: String,
}

impl ActivityRow {
    fn into_data(self) -> Result<ActivityData, PersistenceError> {
        Ok(ActivityData {
            activity_id: self.activity_id,
            user_id: self.user_id,
            customer_id: self.customer_id,
            lead_id: self.lead_id,
            activity_type: self.activity_type.parse::<ActivityType>()?,
            date: self.activity_date,
            notes: self.notes,
            outcome: self.outcome,
            next_action_date: self.next_action_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Retrieves a sales activity by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the activity is not found.
pub fn get_activity(
    conn: &mut SqliteConnection,
    activity_id: i64,
) -> Result<Option<ActivityData>, PersistenceError> {
    let result: Result<ActivityRow, diesel::result::Error> = sales_activities::table
        .filter(sales_activities::activity_id.eq(activity_id))
        .select(ActivityRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_data()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists sales activities, most recent date first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - Only activities logged by this user, when set
/// * `limit` - Maximum number of rows, when set
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_activities(
    conn: &mut SqliteConnection,
    user_id: Option<i64>,
    limit: Option<i64>,
) -> Result<Vec<ActivityData>, PersistenceError> {
    let mut query = sales_activities::table
        .select(ActivityRow::as_select())
        .into_boxed();

    if let Some(user_id) = user_id {
        query = query.filter(sales_activities::user_id.eq(user_id));
    }
    if let Some(limit) = limit {
        query = query.limit(limit);
    }

    let rows: Vec<ActivityRow> = query
        .order((
            sales_activities::activity_date.desc(),
            sales_activities::activity_id.desc(),
        ))
        .load(conn)?;

    rows.into_iter().map(ActivityRow::into_data).collect()
}
