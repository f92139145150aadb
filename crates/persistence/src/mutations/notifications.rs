// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification mutations.

use diesel::SqliteConnection;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use freight_desk_domain::NotificationStatus;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::NewNotification;
use crate::diesel_schema::notifications;
use crate::error::PersistenceError;

/// Stores a notification in `PENDING` status.
///
/// # Errors
///
/// Returns an error if the metadata cannot be serialized or the insert fails.
pub fn create_notification(
    conn: &mut SqliteConnection,
    notification: &NewNotification,
) -> Result<i64, PersistenceError> {
    let meta_json: Option<String> = match &notification.meta {
        Some(meta) => Some(serde_json::to_string(meta)?),
        None => None,
    };

    diesel::insert_into(notifications::table)
        .values((
            notifications::user_id.eq(notification.user_id),
            notifications::channel.eq(notification.channel.as_str()),
            notifications::subject.eq(&notification.subject),
            notifications::body.eq(&notification.body),
            notifications::meta_json.eq(meta_json.as_deref()),
            notifications::status.eq(NotificationStatus::Pending.as_str()),
        ))
        .execute(conn)?;

    let notification_id: i64 = conn.get_last_insert_rowid()?;
    debug!(
        notification_id,
        user_id = notification.user_id,
        channel = notification.channel.as_str(),
        "Stored notification"
    );
    Ok(notification_id)
}

/// Records the outcome of a delivery attempt.
///
/// `SENT` also stamps `sent_at`.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the notification does not exist.
pub fn set_notification_status(
    conn: &mut SqliteConnection,
    notification_id: i64,
    status: NotificationStatus,
) -> Result<(), PersistenceError> {
    let target = notifications::table.filter(notifications::notification_id.eq(notification_id));

    let updated: usize = if status == NotificationStatus::Sent {
        diesel::update(target)
            .set((
                notifications::status.eq(status.as_str()),
                notifications::sent_at.eq(sql::<Nullable<Text>>("CURRENT_TIMESTAMP")),
            ))
            .execute(conn)?
    } else {
        diesel::update(target)
            .set(notifications::status.eq(status.as_str()))
            .execute(conn)?
    };

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Notification {notification_id}"
        )));
    }
    Ok(())
}

/// Marks one of a user's notifications as read.
///
/// Reading an already-read notification keeps its first read time.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the notification does not
/// exist or belongs to another user.
pub fn mark_notification_read(
    conn: &mut SqliteConnection,
    notification_id: i64,
    user_id: i64,
) -> Result<(), PersistenceError> {
    let owned: i64 = notifications::table
        .filter(notifications::notification_id.eq(notification_id))
        .filter(notifications::user_id.eq(user_id))
        .count()
        .get_result(conn)?;
    if owned == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Notification {notification_id}"
        )));
    }

    diesel::update(notifications::table)
        .filter(notifications::notification_id.eq(notification_id))
        .filter(notifications::read_at.is_null())
        .set(notifications::read_at.eq(sql::<Nullable<Text>>("CURRENT_TIMESTAMP")))
        .execute(conn)?;
    Ok(())
}

/// Marks every unread notification of a user as read.
///
/// # Returns
///
/// The number of notifications marked.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn mark_all_notifications_read(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<usize, PersistenceError> {
    let marked: usize = diesel::update(notifications::table)
        .filter(notifications::user_id.eq(user_id))
        .filter(notifications::read_at.is_null())
        .set(notifications::read_at.eq(sql::<Nullable<Text>>("CURRENT_TIMESTAMP")))
        .execute(conn)?;

    debug!(user_id, marked, "Marked notifications read");
    Ok(marked)
}
