// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::guard::{
    BOOKING_CANCEL, BOOKING_CONFIRM, CUSTOMER_APPROVE, CUSTOMER_REJECT, ITINERARY_APPROVE,
    ITINERARY_REJECT, ITINERARY_SUBMIT, RATE_REQUEST_COMPLETE, RATE_REQUEST_REJECT,
    RATE_REQUEST_RESPOND, TransitionGuard, ensure_not_owner, ensure_owner,
};
use crate::state::{TransitionResult, WorkflowSubject};
use freight_desk_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot, Subject};
use freight_desk_domain::{Decision, LifecycleStatus};

/// Applies a workflow command to the loaded state of a record.
///
/// This function is pure: it checks ownership and the transition guard for
/// the command and describes the change, but writes nothing.
///
/// # Arguments
///
/// * `subject` - The record's current state
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Returns
///
/// * `Ok(TransitionResult)` describing the status change and its audit event
/// * `Err(CoreError)` if the command is rejected
///
/// # Errors
///
/// Returns an error if:
/// - The command does not apply to the subject's entity
/// - The actor does not own an itinerary they try to submit
/// - The actor owns an itinerary they try to approve or reject
/// - The current status does not allow the command
pub fn apply(
    subject: WorkflowSubject,
    command: Command,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    match (subject, &command) {
        (WorkflowSubject::RateRequest { id, status }, Command::RespondToRateRequest) => {
            transition(id, status, &RATE_REQUEST_RESPOND, command, actor, cause)
        }
        (WorkflowSubject::RateRequest { id, status }, Command::CompleteRateRequest) => {
            transition(id, status, &RATE_REQUEST_COMPLETE, command, actor, cause)
        }
        (WorkflowSubject::RateRequest { id, status }, Command::RejectRateRequest { .. }) => {
            transition(id, status, &RATE_REQUEST_REJECT, command, actor, cause)
        }
        (WorkflowSubject::BookingRequest { id, status }, Command::ConfirmBookingRequest) => {
            transition(id, status, &BOOKING_CONFIRM, command, actor, cause)
        }
        (WorkflowSubject::BookingRequest { id, status }, Command::CancelBookingRequest { .. }) => {
            transition(id, status, &BOOKING_CANCEL, command, actor, cause)
        }
        (
            WorkflowSubject::Itinerary {
                id,
                status,
                owner_id,
            },
            Command::SubmitItinerary,
        ) => {
            // Ownership is checked before status
            ensure_owner(
                owner_id,
                actor.user_id,
                "You can only submit your own itineraries",
            )?;
            transition(id, status, &ITINERARY_SUBMIT, command, actor, cause)
        }
        (
            WorkflowSubject::Itinerary {
                id,
                status,
                owner_id,
            },
            Command::DecideItinerary { decision, .. },
        ) => {
            let (guard, self_decision) = match decision {
                Decision::Approve => (
                    &ITINERARY_APPROVE,
                    "You cannot approve your own itinerary",
                ),
                Decision::Reject => (&ITINERARY_REJECT, "You cannot reject your own itinerary"),
            };
            ensure_not_owner(owner_id, actor.user_id, self_decision)?;
            transition(id, status, guard, command, actor, cause)
        }
        (WorkflowSubject::Customer { id, status }, Command::DecideCustomer { decision, .. }) => {
            let guard = match decision {
                Decision::Approve => &CUSTOMER_APPROVE,
                Decision::Reject => &CUSTOMER_REJECT,
            };
            transition(id, status, guard, command, actor, cause)
        }
        (subject, command) => Err(CoreError::CommandNotApplicable {
            command: command.name(),
            entity: subject.entity(),
        }),
    }
}

/// Checks a guard and builds the transition result for one record.
fn transition<S: LifecycleStatus>(
    id: i64,
    current: S,
    guard: &TransitionGuard<S>,
    command: Command,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    guard.check(current)?;

    // The guard tables must agree with the lifecycle edges
    current.validate_transition(guard.target)?;

    let before: StateSnapshot = StateSnapshot::new(format!("status={}", current.as_str()));
    let after: StateSnapshot = StateSnapshot::new(format!("status={}", guard.target.as_str()));

    let details: String = match &command {
        Command::RejectRateRequest { remark } => {
            format!("{} {} {id}: {remark}", guard.action, S::ENTITY)
        }
        Command::CancelBookingRequest { reason } => {
            format!("{} {} {id}: {reason}", guard.action, S::ENTITY)
        }
        Command::DecideItinerary {
            note: Some(note), ..
        }
        | Command::DecideCustomer {
            note: Some(note), ..
        } => format!("{} {} {id}: {note}", guard.action, S::ENTITY),
        _ => format!("{} {} {id}", guard.action, S::ENTITY),
    };
    let action: Action = Action::new(command.name().to_string(), Some(details));
    let subject: Subject = Subject::new(S::ENTITY.to_string(), id);

    let actor_user_id: Option<i64> = actor.user_id;
    let audit_event: AuditEvent = AuditEvent::new(actor, cause, action, before, after, subject);

    Ok(TransitionResult {
        entity: S::ENTITY,
        entity_id: id,
        from: current.as_str(),
        to: guard.target.as_str(),
        expected_from: guard.allowed_from_strs(),
        rejection: guard.rejection,
        command,
        actor_user_id,
        audit_event,
    })
}
