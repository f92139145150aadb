// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Weekly visit itineraries and their items.

use freight_desk::guard::{
    ITINERARY_ADD_ITEM, ITINERARY_DELETE, ITINERARY_REMOVE_ITEM, ITINERARY_UPDATE,
    ITINERARY_UPDATE_ITEM,
};
use freight_desk::{Command, StateRequirement, TransitionResult, WorkflowSubject, apply, ensure_owner};
use freight_desk_audit::Cause;
use freight_desk_domain::{
    Decision, ItineraryStatus, normalize_business_date, validate_required,
};
use freight_desk_persistence::{
    ItineraryData, ItineraryFilter, ItineraryItemData, ItineraryItemPatch, ItineraryPatch,
    NewItineraryItem, Persistence, UserData,
};
use serde_json::json;
use tracing::{debug, info};

use super::optional_date;
use crate::auth::{AuthenticatedActor, Role, assert_role};
use crate::capabilities::{ITINERARY_APPROVERS, ITINERARY_AUTHORS};
use crate::error::{ApiError, translate_transition_error};
use crate::notifications::{DeliveryQueue, Notice, log_dispatch_outcome, notify_user};
use crate::request_response::{
    AddItineraryItemRequest, CreateItineraryRequest, DecisionRequest, ItineraryDetail,
    UpdateItineraryItemRequest, UpdateItineraryRequest,
};

const UPDATE_OWNERSHIP: &str = "You can only update your own itineraries";
const DELETE_OWNERSHIP: &str = "You can only delete your own itineraries";

fn load_itinerary(
    persistence: &mut Persistence,
    itinerary_id: i64,
) -> Result<ItineraryData, ApiError> {
    persistence
        .get_itinerary(itinerary_id)?
        .ok_or_else(|| ApiError::not_found("Itinerary", "Itinerary not found"))
}

fn load_item(persistence: &mut Persistence, item_id: i64) -> Result<ItineraryItemData, ApiError> {
    persistence
        .get_itinerary_item(item_id)?
        .ok_or_else(|| ApiError::not_found("Itinerary item", "Itinerary item not found"))
}

/// Checks ownership, then the itinerary's status, in that order.
fn ensure_editable(
    itinerary: &ItineraryData,
    actor: &AuthenticatedActor,
    ownership_message: &str,
    requirement: &StateRequirement<ItineraryStatus>,
) -> Result<(), ApiError> {
    ensure_owner(itinerary.owner_id, Some(actor.user_id), ownership_message)?;
    requirement.check(itinerary.status)?;
    Ok(())
}

fn ensure_customer(persistence: &mut Persistence, customer_id: Option<i64>) -> Result<(), ApiError> {
    if let Some(customer_id) = customer_id
        && persistence.get_customer(customer_id)?.is_none()
    {
        return Err(ApiError::not_found("Customer", "Customer not found"));
    }
    Ok(())
}

/// Starts a DRAFT itinerary for the acting user.
///
/// # Errors
///
/// Returns an error if the actor may not author itineraries or the week
/// start is not a valid date.
pub fn create_itinerary(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateItineraryRequest,
) -> Result<ItineraryData, ApiError> {
    assert_role(actor, ITINERARY_AUTHORS, "create_itinerary")?;
    let week_start: String = normalize_business_date("weekStart", &request.week_start)?;

    let itinerary_id: i64 =
        persistence.create_itinerary(actor.user_id, request.itinerary_type, &week_start)?;
    info!(
        itinerary_id,
        owner_id = actor.user_id,
        itinerary_type = request.itinerary_type.as_str(),
        "Itinerary created"
    );
    load_itinerary(persistence, itinerary_id)
}

/// Lists the itineraries visible to the actor.
///
/// SBU heads see every itinerary owned by a member of their unit; everyone
/// else sees their own.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_itineraries(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<Vec<ItineraryData>, ApiError> {
    let filter: ItineraryFilter = match (actor.role, actor.sbu_id) {
        (Role::SbuHead, Some(sbu_id)) => ItineraryFilter {
            owner_id: None,
            sbu_id: Some(sbu_id),
        },
        _ => ItineraryFilter {
            owner_id: Some(actor.user_id),
            sbu_id: None,
        },
    };
    Ok(persistence.list_itineraries(filter)?)
}

/// Retrieves an itinerary with its owner, approver and items.
///
/// # Errors
///
/// Returns `ResourceNotFound` ("Itinerary not found") for an unknown ID.
pub fn get_itinerary(
    persistence: &mut Persistence,
    itinerary_id: i64,
) -> Result<ItineraryDetail, ApiError> {
    let itinerary: ItineraryData = load_itinerary(persistence, itinerary_id)?;
    let owner: Option<UserData> = persistence.get_user_by_id(itinerary.owner_id)?;
    let approver: Option<UserData> = match itinerary.approver_id {
        Some(approver_id) => persistence.get_user_by_id(approver_id)?,
        None => None,
    };
    let items: Vec<ItineraryItemData> = persistence.items_for_itinerary(itinerary_id)?;
    Ok(ItineraryDetail {
        itinerary,
        owner,
        approver,
        items,
    })
}

/// Edits the type or week of a DRAFT itinerary.
///
/// # Errors
///
/// Returns `Forbidden` ("You can only update your own itineraries") for a
/// non-owner and ("Can only update draft itineraries") unless DRAFT.
pub fn update_itinerary(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    itinerary_id: i64,
    request: &UpdateItineraryRequest,
) -> Result<ItineraryData, ApiError> {
    assert_role(actor, ITINERARY_AUTHORS, "update_itinerary")?;
    let current: ItineraryData = load_itinerary(persistence, itinerary_id)?;
    ensure_editable(&current, actor, UPDATE_OWNERSHIP, &ITINERARY_UPDATE)?;

    let patch: ItineraryPatch = ItineraryPatch {
        itinerary_type: request.itinerary_type,
        week_start: optional_date("weekStart", request.week_start.as_deref())?,
    };
    persistence.update_itinerary(itinerary_id, &patch, &ITINERARY_UPDATE)?;
    info!(itinerary_id, user_id = actor.user_id, "Itinerary updated");
    load_itinerary(persistence, itinerary_id)
}

/// Submits a DRAFT itinerary for approval.
///
/// The head of the owner's SBU, if there is one, is notified after commit.
///
/// # Errors
///
/// Returns `Forbidden` ("You can only submit your own itineraries") for a
/// non-owner and ("Can only submit draft itineraries") unless DRAFT.
pub fn submit_itinerary(
    persistence: &mut Persistence,
    queue: &dyn DeliveryQueue,
    actor: &AuthenticatedActor,
    itinerary_id: i64,
    cause: Cause,
) -> Result<ItineraryData, ApiError> {
    let current: ItineraryData = load_itinerary(persistence, itinerary_id)?;
    let result: TransitionResult = apply(
        WorkflowSubject::Itinerary {
            id: itinerary_id,
            status: current.status,
            owner_id: current.owner_id,
        },
        Command::SubmitItinerary,
        actor.to_audit_actor(),
        cause,
    )?;
    persistence
        .persist_transition(&result)
        .map_err(|e| translate_transition_error(e, result.rejection))?;
    info!(itinerary_id, owner_id = current.owner_id, "Itinerary submitted");

    let head_user_id: Option<i64> = match persistence
        .get_user_by_id(current.owner_id)?
        .and_then(|owner| owner.sbu_id)
    {
        Some(sbu_id) => persistence
            .get_sbu(sbu_id)?
            .and_then(|sbu| sbu.head_user_id),
        None => None,
    };
    match head_user_id {
        Some(head_user_id) => {
            let notice: Notice = Notice::new(
                "Itinerary Submitted for Approval",
                format!(
                    "{} submitted the itinerary for the week of {}",
                    actor.email, current.week_start
                ),
                Some(json!({ "itineraryId": itinerary_id })),
            );
            log_dispatch_outcome(
                &notice.subject,
                &notify_user(persistence, queue, head_user_id, &notice),
            );
        }
        None => debug!(itinerary_id, "Owner has no SBU head to notify"),
    }

    load_itinerary(persistence, itinerary_id)
}

/// Approves or rejects a SUBMITTED itinerary.
///
/// # Errors
///
/// Returns `Forbidden` ("You cannot approve your own itinerary") when the
/// approver owns it, `Forbidden` ("Can only approve submitted itineraries")
/// unless SUBMITTED, plus role and not-found errors.
pub fn approve_itinerary(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    itinerary_id: i64,
    request: &DecisionRequest,
    cause: Cause,
) -> Result<ItineraryData, ApiError> {
    assert_role(actor, ITINERARY_APPROVERS, "approve_itinerary")?;
    let current: ItineraryData = load_itinerary(persistence, itinerary_id)?;
    let decision: Decision = Decision::from_approved(request.approved);

    let result: TransitionResult = apply(
        WorkflowSubject::Itinerary {
            id: itinerary_id,
            status: current.status,
            owner_id: current.owner_id,
        },
        Command::DecideItinerary {
            decision,
            note: request.note.clone(),
        },
        actor.to_audit_actor(),
        cause,
    )?;
    persistence
        .persist_transition(&result)
        .map_err(|e| translate_transition_error(e, result.rejection))?;

    info!(
        itinerary_id,
        approver_id = actor.user_id,
        approved = decision.is_approval(),
        "Itinerary decided"
    );
    load_itinerary(persistence, itinerary_id)
}

/// Deletes a DRAFT itinerary and its items.
///
/// # Errors
///
/// Returns `Forbidden` ("You can only delete your own itineraries") for a
/// non-owner and ("Can only delete draft itineraries") unless DRAFT.
pub fn delete_itinerary(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    itinerary_id: i64,
) -> Result<(), ApiError> {
    let current: ItineraryData = load_itinerary(persistence, itinerary_id)?;
    ensure_editable(&current, actor, DELETE_OWNERSHIP, &ITINERARY_DELETE)?;
    persistence.delete_itinerary(itinerary_id, &ITINERARY_DELETE)?;
    info!(itinerary_id, user_id = actor.user_id, "Itinerary deleted");
    Ok(())
}

/// Adds a planned visit to a DRAFT itinerary.
///
/// # Errors
///
/// Returns `Forbidden` for a non-owner or a non-DRAFT itinerary,
/// `InvalidInput` for a blank purpose or malformed date, and
/// `ResourceNotFound` for an unknown itinerary or customer.
pub fn add_itinerary_item(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    itinerary_id: i64,
    request: &AddItineraryItemRequest,
) -> Result<ItineraryItemData, ApiError> {
    assert_role(actor, ITINERARY_AUTHORS, "add_itinerary_item")?;
    let itinerary: ItineraryData = load_itinerary(persistence, itinerary_id)?;
    ensure_editable(&itinerary, actor, UPDATE_OWNERSHIP, &ITINERARY_ADD_ITEM)?;

    validate_required("purpose", &request.purpose)?;
    ensure_customer(persistence, request.customer_id)?;
    let item: NewItineraryItem = NewItineraryItem {
        date: normalize_business_date("date", &request.date)?,
        customer_id: request.customer_id,
        lead_id: request.lead_id.clone(),
        purpose: request.purpose.trim().to_string(),
        planned_time: request.planned_time.clone(),
        location: request.location.clone(),
        notes: request.notes.clone(),
    };

    let item_id: i64 = persistence.add_itinerary_item(itinerary_id, &item, &ITINERARY_ADD_ITEM)?;
    info!(itinerary_id, item_id, "Itinerary item added");
    load_item(persistence, item_id)
}

/// Edits a planned visit on a DRAFT itinerary.
///
/// # Errors
///
/// Returns `ResourceNotFound` ("Itinerary item not found") for an unknown
/// item and `Forbidden` for a non-owner or a non-DRAFT itinerary.
pub fn update_itinerary_item(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    item_id: i64,
    request: &UpdateItineraryItemRequest,
) -> Result<ItineraryItemData, ApiError> {
    assert_role(actor, ITINERARY_AUTHORS, "update_itinerary_item")?;
    let item: ItineraryItemData = load_item(persistence, item_id)?;
    let itinerary: ItineraryData = load_itinerary(persistence, item.itinerary_id)?;
    ensure_editable(&itinerary, actor, UPDATE_OWNERSHIP, &ITINERARY_UPDATE_ITEM)?;

    if let Some(purpose) = &request.purpose {
        validate_required("purpose", purpose)?;
    }
    ensure_customer(persistence, request.customer_id)?;
    let patch: ItineraryItemPatch = ItineraryItemPatch {
        date: optional_date("date", request.date.as_deref())?,
        customer_id: request.customer_id,
        lead_id: request.lead_id.clone(),
        purpose: request.purpose.as_deref().map(|p| p.trim().to_string()),
        planned_time: request.planned_time.clone(),
        location: request.location.clone(),
        notes: request.notes.clone(),
    };

    persistence.update_itinerary_item(item_id, &patch, &ITINERARY_UPDATE_ITEM)?;
    debug!(item_id, itinerary_id = item.itinerary_id, "Itinerary item updated");
    load_item(persistence, item_id)
}

/// Removes a planned visit from a DRAFT itinerary.
///
/// # Errors
///
/// Returns `ResourceNotFound` ("Itinerary item not found") for an unknown
/// item and `Forbidden` for a non-owner or a non-DRAFT itinerary.
pub fn remove_itinerary_item(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    item_id: i64,
) -> Result<(), ApiError> {
    assert_role(actor, ITINERARY_AUTHORS, "remove_itinerary_item")?;
    let item: ItineraryItemData = load_item(persistence, item_id)?;
    let itinerary: ItineraryData = load_itinerary(persistence, item.itinerary_id)?;
    ensure_editable(&itinerary, actor, UPDATE_OWNERSHIP, &ITINERARY_REMOVE_ITEM)?;

    persistence.remove_itinerary_item(item_id, &ITINERARY_REMOVE_ITEM)?;
    debug!(item_id, itinerary_id = item.itinerary_id, "Itinerary item removed");
    Ok(())
}
