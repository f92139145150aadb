// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event persistence.

use diesel::SqliteConnection;
use diesel::prelude::*;
use freight_desk_audit::AuditEvent;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Persists an audit event.
///
/// Callers that change state invoke this inside the same transaction as
/// the change, so an event exists exactly when the change committed.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `event` - The audit event to persist
///
/// # Returns
///
/// The event ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn persist_audit_event(
    conn: &mut SqliteConnection,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    let (entity_type, entity_id): (Option<&str>, Option<i64>) = event
        .subject
        .as_ref()
        .map_or((None, None), |subject| {
            (Some(subject.entity_type.as_str()), Some(subject.entity_id))
        });

    diesel::insert_into(audit_events::table)
        .values((
            audit_events::actor_user_id.eq(event.actor.user_id),
            audit_events::actor_type.eq(&event.actor.actor_type),
            audit_events::cause_id.eq(&event.cause.id),
            audit_events::cause_description.eq(&event.cause.description),
            audit_events::action.eq(&event.action.name),
            audit_events::action_details.eq(event.action.details.as_deref()),
            audit_events::before_snapshot.eq(&event.before.data),
            audit_events::after_snapshot.eq(&event.after.data),
            audit_events::entity_type.eq(entity_type),
            audit_events::entity_id.eq(entity_id),
        ))
        .execute(conn)?;

    let event_id: i64 = conn.get_last_insert_rowid()?;
    debug!(event_id, action = %event.action.name, "Persisted audit event");

    Ok(event_id)
}
