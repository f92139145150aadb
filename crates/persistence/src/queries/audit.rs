// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit log queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use freight_desk_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot, Subject};

use crate::data_models::{AuditLogEntry, AuditLogFilter};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Maximum rows returned by an audit log query.
pub const AUDIT_LOG_LIMIT: i64 = 100;

#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
struct AuditEventRow {
    event_id: i64,
    actor_user_id: Option<i64>,
    actor_type: String,
    cause_id: String,
    cause_description: String,
    action: String,
    action_details: Option<String>,
    before_snapshot: String,
    after_snapshot: String,
    entity_type: Option<String>,
    entity_id: Option<i64>,
    created_at: String,
}

impl From<AuditEventRow> for AuditLogEntry {
    fn from(row: AuditEventRow) -> Self {
        Self {
            event_id: row.event_id,
            actor_user_id: row.actor_user_id,
            actor_type: row.actor_type,
            cause_id: row.cause_id,
            cause_description: row.cause_description,
            action: row.action,
            action_details: row.action_details,
            before: row.before_snapshot,
            after: row.after_snapshot,
            entity_type: row.entity_type,
            entity_id: row.entity_id,
            created_at: row.created_at,
        }
    }
}

impl From<AuditEventRow> for AuditEvent {
    fn from(row: AuditEventRow) -> Self {
        let actor: Actor = Actor {
            user_id: row.actor_user_id,
            actor_type: row.actor_type,
        };
        let cause: Cause = Cause::new(row.cause_id, row.cause_description);
        let action: Action = Action::new(row.action, row.action_details);
        let before: StateSnapshot = StateSnapshot::new(row.before_snapshot);
        let after: StateSnapshot = StateSnapshot::new(row.after_snapshot);

        match (row.entity_type, row.entity_id) {
            (Some(entity_type), Some(entity_id)) => AuditEvent::new(
                actor,
                cause,
                action,
                before,
                after,
                Subject::new(entity_type, entity_id),
            ),
            _ => AuditEvent::new_global(actor, cause, action, before, after),
        }
    }
}

/// Queries the audit log, newest first, at most [`AUDIT_LOG_LIMIT`] rows.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn query_audit_log(
    conn: &mut SqliteConnection,
    filter: &AuditLogFilter,
) -> Result<Vec<AuditLogEntry>, PersistenceError> {
    let mut query = audit_events::table
        .select(AuditEventRow::as_select())
        .into_boxed();

    if let Some(actor_user_id) = filter.actor_user_id {
        query = query.filter(audit_events::actor_user_id.eq(actor_user_id));
    }
    if let Some(entity_type) = &filter.entity_type {
        query = query.filter(audit_events::entity_type.eq(entity_type.clone()));
    }
    if let Some(action) = &filter.action {
        query = query.filter(audit_events::action.eq(action.clone()));
    }
    if let Some(from) = &filter.from {
        query = query.filter(audit_events::created_at.ge(from.clone()));
    }
    if let Some(to) = &filter.to {
        query = query.filter(audit_events::created_at.le(to.clone()));
    }

    let rows: Vec<AuditEventRow> = query
        .order(audit_events::event_id.desc())
        .limit(AUDIT_LOG_LIMIT)
        .load(conn)?;

    Ok(rows.into_iter().map(AuditLogEntry::from).collect())
}

/// Retrieves every audit event recorded for one record, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn audit_events_for_entity(
    conn: &mut SqliteConnection,
    entity_type: &str,
    entity_id: i64,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let rows: Vec<AuditEventRow> = audit_events::table
        .filter(audit_events::entity_type.eq(entity_type))
        .filter(audit_events::entity_id.eq(entity_id))
        .order(audit_events::event_id.asc())
        .select(AuditEventRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(AuditEvent::from).collect())
}
