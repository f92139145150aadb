// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The in-app notification inbox.

use freight_desk_persistence::{NotificationData, Persistence, PersistenceError};
use tracing::debug;

use crate::auth::AuthenticatedActor;
use crate::error::ApiError;
use crate::request_response::MarkAllReadResponse;

/// Lists the actor's in-app notifications, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_notifications(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<Vec<NotificationData>, ApiError> {
    Ok(persistence.list_system_notifications(actor.user_id, None)?)
}

/// Marks one of the actor's notifications read.
///
/// # Errors
///
/// Returns `ResourceNotFound` ("Notification not found") when the
/// notification does not exist or belongs to someone else.
pub fn mark_notification_read(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    notification_id: i64,
) -> Result<NotificationData, ApiError> {
    match persistence.mark_notification_read(notification_id, actor.user_id) {
        Ok(()) => {}
        Err(PersistenceError::NotFound(_)) => {
            return Err(ApiError::not_found("Notification", "Notification not found"));
        }
        Err(other) => return Err(other.into()),
    }
    debug!(notification_id, user_id = actor.user_id, "Notification read");

    persistence
        .get_notification(notification_id)?
        .ok_or_else(|| ApiError::not_found("Notification", "Notification not found"))
}

/// Marks every unread notification of the actor read.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn mark_all_notifications_read(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<MarkAllReadResponse, ApiError> {
    let marked: usize = persistence.mark_all_notifications_read(actor.user_id)?;
    debug!(user_id = actor.user_id, marked, "Notifications read");
    Ok(MarkAllReadResponse { marked })
}
