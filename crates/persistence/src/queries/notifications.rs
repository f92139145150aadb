// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use freight_desk_domain::{NotificationChannel, NotificationStatus};
use serde_json::Value;

use crate::data_models::NotificationData;
use crate::diesel_schema::notifications;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = notifications)]
struct NotificationRow {
    notification_id: i64,
    user_id: i64,
    channel: String,
    subject: String,
    body: String,
    meta_json: Option<String>,
    status: String,
    sent_at: Option<String>,
    read_at: Option<String>,
    created_at: String,
}

impl NotificationRow {
    fn into_data(self) -> Result<NotificationData, PersistenceError> {
        let meta: Option<Value> = match self.meta_json {
            Some(json) => Some(serde_json::from_str::<Value>(&json)?),
            None => None,
        };

        Ok(NotificationData {
            notification_id: self.notification_id,
            user_id: self.user_id,
            channel: self.channel.parse::<NotificationChannel>()?,
            subject: self.subject,
            body: self.body,
            meta,
            status: self.status.parse::<NotificationStatus>()?,
            sent_at: self.sent_at,
            read_at: self.read_at,
            created_at: self.created_at,
        })
    }
}

/// Retrieves a notification by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the notification is not found.
pub fn get_notification(
    conn: &mut SqliteConnection,
    notification_id: i64,
) -> Result<Option<NotificationData>, PersistenceError> {
    let result: Result<NotificationRow, diesel::result::Error> = notifications::table
        .filter(notifications::notification_id.eq(notification_id))
        .select(NotificationRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_data()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists a user's in-app (`SYSTEM`) notifications, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_system_notifications(
    conn: &mut SqliteConnection,
    user_id: i64,
    limit: Option<i64>,
) -> Result<Vec<NotificationData>, PersistenceError> {
    let mut query = notifications::table
        .select(NotificationRow::as_select())
        .filter(notifications::user_id.eq(user_id))
        .filter(notifications::channel.eq(NotificationChannel::System.as_str()))
        .into_boxed();

    if let Some(limit) = limit {
        query = query.limit(limit);
    }

    let rows: Vec<NotificationRow> = query
        .order(notifications::notification_id.desc())
        .load(conn)?;

    rows.into_iter().map(NotificationRow::into_data).collect()
}

/// Lists every notification addressed to a user on any channel.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_notifications_for_user(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Vec<NotificationData>, PersistenceError> {
    let rows: Vec<NotificationRow> = notifications::table
        .filter(notifications::user_id.eq(user_id))
        .order(notifications::notification_id.asc())
        .select(NotificationRow::as_select())
        .load(conn)?;

    rows.into_iter().map(NotificationRow::into_data).collect()
}
