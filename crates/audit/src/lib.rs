// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

#[cfg(test)]
mod tests;

/// Represents the entity performing an action.
///
/// An actor is either a signed-in back-office user or the system itself
/// (seeding, scheduled housekeeping).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The user id of the actor, absent for system actions.
    pub user_id: Option<i64>,
    /// The type of actor: the user's role, or `SYSTEM`.
    pub actor_type: String,
}

impl Actor {
    /// Creates an Actor for a signed-in user.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user's id
    /// * `actor_type` - The user's role at the time of the action
    #[must_use]
    pub const fn new(user_id: i64, actor_type: String) -> Self {
        Self {
            user_id: Some(user_id),
            actor_type,
        }
    }

    /// Creates the Actor used for system-initiated changes.
    #[must_use]
    pub fn system() -> Self {
        Self {
            user_id: None,
            actor_type: String::from("SYSTEM"),
        }
    }
}

/// Represents the reason or trigger for an action.
///
/// A cause describes why a state change was initiated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID, event ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this action
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`ConfirmBookingRequest`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A snapshot of the audited record at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// A string representation of the state, e.g. `status=PENDING`.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    ///
    /// # Arguments
    ///
    /// * `data` - A string representation of the state
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }
}

/// The record an audit event is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    /// The entity type, e.g. `booking_request`.
    pub entity_type: String,
    /// The entity's id.
    pub entity_id: i64,
}

impl Subject {
    /// Creates a new Subject.
    #[must_use]
    pub const fn new(entity_type: String, entity_id: i64) -> Self {
        Self {
            entity_type,
            entity_id,
        }
    }
}

/// An immutable audit event representing a state transition.
///
/// Every successful state change must produce exactly one audit event.
/// Audit events are immutable once created and capture:
/// - Who performed the action (actor)
/// - Why it was performed (cause)
/// - What action was performed (action)
/// - The state before the transition (before)
/// - The state after the transition (after)
/// - Which record changed (subject), when the change targets one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The cause or reason for this state change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
    /// The record the change applies to.
    ///
    /// Session events (login, logout) have no subject.
    pub subject: Option<Subject>,
}

impl AuditEvent {
    /// Creates a new `AuditEvent` scoped to a record.
    ///
    /// # Arguments
    ///
    /// * `actor` - The actor who initiated the change
    /// * `cause` - The reason for the change
    /// * `action` - The action that was performed
    /// * `before` - The state before the transition
    /// * `after` - The state after the transition
    /// * `subject` - The record that changed
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
        subject: Subject,
    ) -> Self {
        Self {
            actor,
            cause,
            action,
            before,
            after,
            subject: Some(subject),
        }
    }

    /// Creates a new `AuditEvent` that is not tied to a record.
    #[must_use]
    pub const fn new_global(
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            actor,
            cause,
            action,
            before,
            after,
            subject: None,
        }
    }
}
