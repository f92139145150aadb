// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Sales activity log.

use freight_desk::ensure_owner;
use freight_desk_domain::normalize_business_date;
use freight_desk_persistence::{ActivityData, ActivityPatch, NewActivity, Persistence};
use tracing::info;

use super::{optional_date, own_records_filter};
use crate::auth::{AuthenticatedActor, Role, assert_role};
use crate::capabilities::{ACTIVITY_AUTHORS, SELF_SCOPED_ROLES};
use crate::error::ApiError;
use crate::request_response::{CreateActivityRequest, UpdateActivityRequest};

const OWNERSHIP: &str = "You can only modify your own activities";

fn load_activity(persistence: &mut Persistence, activity_id: i64) -> Result<ActivityData, ApiError> {
    persistence
        .get_activity(activity_id)?
        .ok_or_else(|| ApiError::not_found("Activity", "Activity not found"))
}

fn ensure_modifiable(activity: &ActivityData, actor: &AuthenticatedActor) -> Result<(), ApiError> {
    if actor.role == Role::Admin {
        return Ok(());
    }
    Ok(ensure_owner(activity.user_id, Some(actor.user_id), OWNERSHIP)?)
}

/// Logs a sales activity for the acting user.
///
/// # Errors
///
/// Returns an error if the actor may not log activities, a date is
/// malformed, or the customer does not exist.
pub fn create_activity(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateActivityRequest,
) -> Result<ActivityData, ApiError> {
    assert_role(actor, ACTIVITY_AUTHORS, "create_activity")?;
    if let Some(customer_id) = request.customer_id
        && persistence.get_customer(customer_id)?.is_none()
    {
        return Err(ApiError::not_found("Customer", "Customer not found"));
    }

    let activity_id: i64 = persistence.create_activity(&NewActivity {
        user_id: actor.user_id,
        customer_id: request.customer_id,
        lead_id: request.lead_id.clone(),
        activity_type: request.activity_type,
        date: normalize_business_date("date", &request.date)?,
        notes: request.notes.clone(),
        outcome: request.outcome.clone(),
        next_action_date: optional_date("nextActionDate", request.next_action_date.as_deref())?,
    })?;

    info!(
        activity_id,
        user_id = actor.user_id,
        activity_type = request.activity_type.as_str(),
        "Activity logged"
    );
    load_activity(persistence, activity_id)
}

/// Lists activities, newest first; SALES and CSE see their own.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_activities(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<Vec<ActivityData>, ApiError> {
    let user_id: Option<i64> = own_records_filter(actor, None, SELF_SCOPED_ROLES);
    Ok(persistence.list_activities(user_id, None)?)
}

/// Retrieves one activity.
///
/// # Errors
///
/// Returns `ResourceNotFound` ("Activity not found") for an unknown ID.
pub fn get_activity(persistence: &mut Persistence, activity_id: i64) -> Result<ActivityData, ApiError> {
    load_activity(persistence, activity_id)
}

/// Edits an activity owned by the actor (any activity for ADMIN).
///
/// # Errors
///
/// Returns `Forbidden` ("You can only modify your own activities") for a
/// non-owner, plus not-found and date errors.
pub fn update_activity(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    activity_id: i64,
    request: &UpdateActivityRequest,
) -> Result<ActivityData, ApiError> {
    let current: ActivityData = load_activity(persistence, activity_id)?;
    ensure_modifiable(&current, actor)?;

    let patch: ActivityPatch = ActivityPatch {
        customer_id: request.customer_id,
        lead_id: request.lead_id.clone(),
        activity_type: request.activity_type,
        date: optional_date("date", request.date.as_deref())?,
        notes: request.notes.clone(),
        outcome: request.outcome.clone(),
        next_action_date: optional_date("nextActionDate", request.next_action_date.as_deref())?,
    };
    persistence.update_activity(activity_id, &patch)?;
    load_activity(persistence, activity_id)
}

/// Deletes an activity owned by the actor (any activity for ADMIN).
///
/// # Errors
///
/// Returns `Forbidden` for a non-owner and `ResourceNotFound` for an
/// unknown ID.
pub fn delete_activity(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    activity_id: i64,
) -> Result<(), ApiError> {
    let current: ActivityData = load_activity(persistence, activity_id)?;
    ensure_modifiable(&current, actor)?;
    persistence.delete_activity(activity_id)?;
    info!(activity_id, user_id = actor.user_id, "Activity deleted");
    Ok(())
}
