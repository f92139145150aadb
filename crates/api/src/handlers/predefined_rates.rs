// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Predefined lane rates.

use freight_desk_domain::{
    DEFAULT_PREDEFINED_RATE_STATUS, ValidityStatus, normalize_business_date, parse_business_date,
    validate_date_range, validate_required, validity_status,
};
use freight_desk_persistence::{
    NewPredefinedRate, Persistence, PredefinedRateData, PredefinedRateFilter, UserData,
};
use serde_json::json;
use time::OffsetDateTime;
use tracing::info;

use super::rate_requests::load_equipment_type;
use crate::auth::{AuthenticatedActor, assert_role};
use crate::capabilities::{PREDEFINED_UPDATE_REQUESTERS, PRICING_TEAM};
use crate::error::ApiError;
use crate::notifications::{DeliveryQueue, Notice, log_dispatch_outcome, notify_users};
use crate::request_response::{
    CreatePredefinedRateRequest, PredefinedRateInfo, PredefinedRateQuery,
    RateUpdateRequestedResponse,
};

pub(crate) fn load_predefined_rate(
    persistence: &mut Persistence,
    predefined_rate_id: i64,
) -> Result<PredefinedRateData, ApiError> {
    persistence
        .get_predefined_rate(predefined_rate_id)?
        .ok_or_else(|| ApiError::not_found("Predefined rate", "Predefined rate not found"))
}

fn with_validity(
    rate: PredefinedRateData,
    now: OffsetDateTime,
) -> Result<PredefinedRateInfo, ApiError> {
    let valid_to: OffsetDateTime = parse_business_date(&rate.valid_to)?;
    let validity: ValidityStatus = validity_status(valid_to, now);
    Ok(PredefinedRateInfo {
        rate,
        validity_status: validity,
    })
}

/// Publishes a predefined rate for a lane.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not PRICING or ADMIN
/// - The trade lane, either port or the equipment type does not exist
/// - The service name is blank
/// - A validity date is malformed or `validTo` precedes `validFrom`
pub fn create_predefined_rate(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreatePredefinedRateRequest,
) -> Result<PredefinedRateInfo, ApiError> {
    assert_role(actor, PRICING_TEAM, "create_predefined_rate")?;
    validate_required("service", &request.service)?;

    if persistence.get_trade_lane(request.trade_lane_id)?.is_none() {
        return Err(ApiError::not_found("Trade lane", "Trade lane not found"));
    }
    for port_id in [request.pol_id, request.pod_id] {
        if persistence.get_port(port_id)?.is_none() {
            return Err(ApiError::not_found("Port", "Port not found"));
        }
    }
    load_equipment_type(persistence, request.equipment_type_id)?;

    let valid_from: String = normalize_business_date("validFrom", &request.valid_from)?;
    let valid_to: String = normalize_business_date("validTo", &request.valid_to)?;
    validate_date_range(
        "validFrom",
        parse_business_date(&valid_from)?,
        "validTo",
        parse_business_date(&valid_to)?,
    )?;

    let status: String = request
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_PREDEFINED_RATE_STATUS)
        .to_uppercase();

    let predefined_rate_id: i64 = persistence.create_predefined_rate(&NewPredefinedRate {
        trade_lane_id: request.trade_lane_id,
        pol_id: request.pol_id,
        pod_id: request.pod_id,
        service: request.service.trim().to_string(),
        equipment_type_id: request.equipment_type_id,
        is_lcl: request.is_lcl,
        valid_from,
        valid_to,
        notes: request.notes.clone(),
        status,
    })?;

    info!(
        predefined_rate_id,
        trade_lane_id = request.trade_lane_id,
        created_by = actor.user_id,
        "Predefined rate published"
    );

    let rate: PredefinedRateData = load_predefined_rate(persistence, predefined_rate_id)?;
    with_validity(rate, OffsetDateTime::now_utc())
}

/// Lists predefined rates matching the query, each with its validity.
///
/// # Errors
///
/// Returns an error if the query fails or a stored date is unreadable.
pub fn list_predefined_rates(
    persistence: &mut Persistence,
    query: &PredefinedRateQuery,
) -> Result<Vec<PredefinedRateInfo>, ApiError> {
    let filter: PredefinedRateFilter = PredefinedRateFilter {
        region: query.region.clone(),
        pol_id: query.pol,
        pod_id: query.pod,
        service: query.service.clone(),
        equipment_type_id: query.equip,
        status: query.status.as_deref().map(str::to_uppercase),
    };
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    persistence
        .list_predefined_rates(&filter)?
        .into_iter()
        .map(|rate| with_validity(rate, now))
        .collect()
}

/// Retrieves one predefined rate with its validity.
///
/// # Errors
///
/// Returns `ResourceNotFound` ("Predefined rate not found") for an unknown ID.
pub fn get_predefined_rate(
    persistence: &mut Persistence,
    predefined_rate_id: i64,
) -> Result<PredefinedRateInfo, ApiError> {
    let rate: PredefinedRateData = load_predefined_rate(persistence, predefined_rate_id)?;
    with_validity(rate, OffsetDateTime::now_utc())
}

/// Asks the pricing users assigned to the rate's lane to refresh it.
///
/// # Errors
///
/// Returns an error if the actor is not SALES or the rate does not exist.
pub fn request_rate_update(
    persistence: &mut Persistence,
    queue: &dyn DeliveryQueue,
    actor: &AuthenticatedActor,
    predefined_rate_id: i64,
) -> Result<RateUpdateRequestedResponse, ApiError> {
    assert_role(actor, PREDEFINED_UPDATE_REQUESTERS, "request_rate_update")?;
    let rate: PredefinedRateData = load_predefined_rate(persistence, predefined_rate_id)?;

    let recipients: Vec<UserData> = persistence.pricing_users_for_lane(rate.trade_lane_id)?;
    let notice: Notice = Notice::new(
        "Rate Update Requested",
        format!(
            "{} has asked for an update to predefined rate {} ({})",
            actor.email, predefined_rate_id, rate.service
        ),
        Some(json!({
            "predefinedRateId": predefined_rate_id,
            "tradeLaneId": rate.trade_lane_id,
            "requestedBy": actor.user_id,
        })),
    );
    let outcome: Result<usize, ApiError> = notify_users(persistence, queue, &recipients, &notice);
    log_dispatch_outcome(&notice.subject, &outcome);

    info!(
        predefined_rate_id,
        requested_by = actor.user_id,
        recipients = recipients.len(),
        "Rate update requested"
    );

    Ok(RateUpdateRequestedResponse {
        predefined_rate_id,
        notified: outcome.unwrap_or(0),
    })
}
