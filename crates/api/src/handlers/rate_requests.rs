// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rate request lifecycle: creation, pricing responses, line quotes,
//! completion and rejection.

use freight_desk::{Command, TransitionResult, WorkflowSubject, apply};
use freight_desk_audit::Cause;
use freight_desk_domain::{
    COLOMBO_HUB_UNLOCODE, CargoFigures, RateRequestStatus, TransportMode, VesselDetails,
    generate_reference_number, normalize_business_date, processed_percentage,
    validate_cargo_figures, validate_pallet_dimensions, validate_required,
    validate_vessel_details,
};
use freight_desk_persistence::{
    EquipmentTypeData, LineQuoteData, NewLineQuote, NewRateRequest, NewRateResponse, Persistence,
    PortData, RateRequestData, RateRequestFilter, RateResponseData, SettledRateRequest,
};
use serde_json::json;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info};

use super::{optional_date, own_records_filter};
use crate::auth::{AuthenticatedActor, Role, assert_role};
use crate::capabilities::{PRICING_TEAM, RATE_REQUEST_CREATORS};
use crate::error::{ApiError, translate_transition_error};
use crate::notifications::{DeliveryQueue, Notice, log_dispatch_outcome, notify_role, notify_user};
use crate::request_response::{
    AddLineQuoteRequest, CreateRateRequestRequest, ProcessedPercentageResponse,
    RateRequestDetail, RateRequestQuery, RejectRateRequestRequest, RespondToRateRequestRequest,
};

/// How many consecutive milliseconds to try before giving up on a
/// collision-free reference number.
const REFERENCE_NUMBER_ATTEMPTS: u32 = 1_000;

pub(crate) fn load_rate_request(
    persistence: &mut Persistence,
    rate_request_id: i64,
) -> Result<RateRequestData, ApiError> {
    persistence
        .get_rate_request(rate_request_id)?
        .ok_or_else(|| ApiError::not_found("Rate request", "Rate request not found"))
}

fn load_port(persistence: &mut Persistence, port_id: i64) -> Result<PortData, ApiError> {
    persistence
        .get_port(port_id)?
        .ok_or_else(|| ApiError::not_found("Port", "Port not found"))
}

pub(crate) fn ensure_shipping_line(
    persistence: &mut Persistence,
    shipping_line_id: i64,
) -> Result<(), ApiError> {
    persistence
        .get_shipping_line(shipping_line_id)?
        .map(|_| ())
        .ok_or_else(|| ApiError::not_found("Shipping line", "Shipping line not found"))
}

pub(crate) fn load_equipment_type(
    persistence: &mut Persistence,
    equipment_type_id: i64,
) -> Result<EquipmentTypeData, ApiError> {
    persistence
        .get_equipment_type(equipment_type_id)?
        .ok_or_else(|| ApiError::not_found("Equipment type", "Equipment type not found"))
}

fn next_reference_number(persistence: &mut Persistence) -> Result<String, ApiError> {
    let mut at: OffsetDateTime = OffsetDateTime::now_utc();
    for _ in 0..REFERENCE_NUMBER_ATTEMPTS {
        let candidate: String = generate_reference_number(at);
        if !persistence.ref_no_exists(&candidate)? {
            return Ok(candidate);
        }
        at += Duration::milliseconds(1);
    }
    Err(ApiError::Internal {
        message: String::from("Could not allocate a unique reference number"),
    })
}

/// Raises a new rate request for the acting salesperson.
///
/// SEA requests without an origin port default to the Colombo hub.
/// Every PRICING user is notified after the request is stored.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not SALES or ADMIN
/// - Cargo figures or the incoterm are invalid
/// - The customer, a port, the preferred line or the equipment type does not exist
/// - The equipment needs pallet dimensions and none were given
pub fn create_rate_request(
    persistence: &mut Persistence,
    queue: &dyn DeliveryQueue,
    actor: &AuthenticatedActor,
    request: &CreateRateRequestRequest,
) -> Result<RateRequestData, ApiError> {
    assert_role(actor, RATE_REQUEST_CREATORS, "create_rate_request")?;

    validate_required("incoterm", &request.incoterm)?;
    validate_cargo_figures(&CargoFigures {
        weight_tons: request.weight_tons,
        reefer_temp: request.reefer_temp,
        pallet_count: request.pallet_count,
        market_rate: request.market_rate,
    })?;

    if persistence.get_customer(request.customer_id)?.is_none() {
        return Err(ApiError::not_found("Customer", "Customer not found"));
    }

    load_port(persistence, request.pod_id)?;
    let pol_id: Option<i64> = match request.pol_id {
        Some(pol_id) => Some(load_port(persistence, pol_id)?.port_id),
        None if request.mode == TransportMode::Sea => {
            let hub: PortData = persistence
                .get_port_by_unlocode(COLOMBO_HUB_UNLOCODE)?
                .ok_or_else(|| ApiError::not_found("Port", "Port not found"))?;
            debug!(port_id = hub.port_id, "Defaulting origin to the Colombo hub");
            Some(hub.port_id)
        }
        None => None,
    };

    if let Some(line_id) = request.preferred_line_id {
        ensure_shipping_line(persistence, line_id)?;
    }
    if let Some(equipment_type_id) = request.equipment_type_id {
        let equipment: EquipmentTypeData = load_equipment_type(persistence, equipment_type_id)?;
        validate_pallet_dimensions(
            equipment.is_flat_rack_open_top,
            request.pallet_dims.as_deref(),
        )?;
    }

    let cargo_ready_date: Option<String> =
        optional_date("cargoReadyDate", request.cargo_ready_date.as_deref())?;
    let ref_no: String = next_reference_number(persistence)?;

    let rate_request_id: i64 = persistence.create_rate_request(&NewRateRequest {
        ref_no,
        mode: request.mode,
        shipment_type: request.shipment_type,
        pol_id,
        pod_id: request.pod_id,
        door_or_cy: request.door_or_cy.clone(),
        us_zip: request.us_zip.clone(),
        preferred_line_id: request.preferred_line_id,
        equipment_type_id: request.equipment_type_id,
        reefer_temp: request.reefer_temp,
        pallet_count: request.pallet_count,
        pallet_dims: request.pallet_dims.clone(),
        hs_code: request.hs_code.clone(),
        weight_tons: request.weight_tons,
        incoterm: request.incoterm.trim().to_string(),
        market_rate: request.market_rate,
        special_instructions: request.special_instructions.clone(),
        cargo_ready_date,
        vessel_required: request.vessel_required,
        detention_free_time: request.detention_free_time.clone(),
        salesperson_id: actor.user_id,
        customer_id: request.customer_id,
    })?;

    let created: RateRequestData = load_rate_request(persistence, rate_request_id)?;
    info!(
        rate_request_id,
        ref_no = %created.ref_no,
        salesperson_id = actor.user_id,
        "Rate request created"
    );

    let notice: Notice = Notice::new(
        "New Rate Request Created",
        format!("Rate request {} is waiting for pricing", created.ref_no),
        Some(json!({ "rateRequestId": rate_request_id, "refNo": created.ref_no })),
    );
    log_dispatch_outcome(
        &notice.subject,
        &notify_role(persistence, queue, Role::Pricing, &notice),
    );

    Ok(created)
}

/// Lists rate requests, newest first.
///
/// SALES actors, and anyone passing `mine=true`, see only their own.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_rate_requests(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    query: RateRequestQuery,
) -> Result<Vec<RateRequestData>, ApiError> {
    Ok(persistence.list_rate_requests(RateRequestFilter {
        salesperson_id: own_records_filter(actor, query.mine, &[Role::Sales]),
        status: query.status,
    })?)
}

/// Retrieves a rate request with its ports, customer, salesperson,
/// responses and line quotes.
///
/// # Errors
///
/// Returns `ResourceNotFound` ("Rate request not found") for an unknown ID.
pub fn get_rate_request(
    persistence: &mut Persistence,
    rate_request_id: i64,
) -> Result<RateRequestDetail, ApiError> {
    let request: RateRequestData = load_rate_request(persistence, rate_request_id)?;

    let pol: Option<PortData> = match request.pol_id {
        Some(pol_id) => persistence.get_port(pol_id)?,
        None => None,
    };
    let pod: Option<PortData> = persistence.get_port(request.pod_id)?;
    let customer = persistence.get_customer(request.customer_id)?;
    let salesperson = persistence.get_user_by_id(request.salesperson_id)?;
    let responses: Vec<RateResponseData> = persistence.responses_for_request(rate_request_id)?;
    let line_quotes: Vec<LineQuoteData> = persistence.line_quotes_for_request(rate_request_id)?;

    Ok(RateRequestDetail {
        request,
        pol,
        pod,
        customer,
        salesperson,
        responses,
        line_quotes,
    })
}

/// Records a pricing response and moves the request to PROCESSING.
///
/// The response insert and the status change commit together; the
/// salesperson is notified afterwards.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not PRICING or ADMIN
/// - The request does not exist
/// - The request is not PENDING (including when another response won the race)
/// - Vessel details are required and any of vessel name, ETA or ETD is missing
/// - A date is malformed or the requested line does not exist
pub fn respond_to_rate_request(
    persistence: &mut Persistence,
    queue: &dyn DeliveryQueue,
    actor: &AuthenticatedActor,
    rate_request_id: i64,
    request: &RespondToRateRequestRequest,
    cause: Cause,
) -> Result<RateResponseData, ApiError> {
    assert_role(actor, PRICING_TEAM, "respond_to_rate_request")?;

    let current: RateRequestData = load_rate_request(persistence, rate_request_id)?;
    let result: TransitionResult = apply(
        WorkflowSubject::RateRequest {
            id: rate_request_id,
            status: current.status,
        },
        Command::RespondToRateRequest,
        actor.to_audit_actor(),
        cause,
    )?;

    validate_vessel_details(
        current.vessel_required,
        &VesselDetails {
            vessel_name: request.vessel_name.as_deref(),
            eta: request.eta.as_deref(),
            etd: request.etd.as_deref(),
        },
    )?;

    if request.line_no < 1 {
        return Err(ApiError::invalid_input("lineNo", "lineNo must be at least 1"));
    }
    if let Some(line_id) = request.requested_line_id {
        ensure_shipping_line(persistence, line_id)?;
    }
    if let Some(equipment_type_id) = request.requested_equipment_type_id {
        load_equipment_type(persistence, equipment_type_id)?;
    }

    let response: NewRateResponse = NewRateResponse {
        line_no: request.line_no,
        requested_line_id: request.requested_line_id,
        requested_equipment_type_id: request.requested_equipment_type_id,
        vessel_name: request.vessel_name.clone(),
        eta: optional_date("eta", request.eta.as_deref())?,
        etd: optional_date("etd", request.etd.as_deref())?,
        fcl_cutoff: optional_date("fclCutoff", request.fcl_cutoff.as_deref())?,
        doc_cutoff: optional_date("docCutoff", request.doc_cutoff.as_deref())?,
        valid_to: normalize_business_date("validTo", &request.valid_to)?,
        charges: request.charges.clone(),
        responded_by_id: actor.user_id,
    };

    let response_id: i64 = persistence
        .persist_rate_response(&result, &response)
        .map_err(|e| translate_transition_error(e, result.rejection))?;

    let stored: RateResponseData = persistence
        .responses_for_request(rate_request_id)?
        .into_iter()
        .find(|r| r.response_id == response_id)
        .ok_or_else(|| ApiError::Internal {
            message: format!("Response {response_id} vanished after insert"),
        })?;

    info!(
        rate_request_id,
        response_id,
        responded_by = actor.user_id,
        "Rate request answered"
    );

    let notice: Notice = Notice::new(
        "Rate Request Response Received",
        format!("Pricing has responded to rate request {}", current.ref_no),
        Some(json!({ "rateRequestId": rate_request_id, "responseId": response_id })),
    )
    .with_sms();
    log_dispatch_outcome(
        &notice.subject,
        &notify_user(persistence, queue, current.salesperson_id, &notice),
    );

    Ok(stored)
}

/// Adds a shipping line quote to a rate request.
///
/// A selected quote clears the selection on every earlier quote for the
/// same request.
///
/// # Errors
///
/// Returns an error if the actor is not PRICING or ADMIN, the request,
/// line or equipment type does not exist, or `validTo` is malformed.
pub fn add_line_quote(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    rate_request_id: i64,
    request: &AddLineQuoteRequest,
) -> Result<LineQuoteData, ApiError> {
    assert_role(actor, PRICING_TEAM, "add_line_quote")?;
    load_rate_request(persistence, rate_request_id)?;
    ensure_shipping_line(persistence, request.shipping_line_id)?;
    if let Some(equipment_type_id) = request.equipment_type_id {
        load_equipment_type(persistence, equipment_type_id)?;
    }

    let line_quote_id: i64 = persistence.add_line_quote(
        rate_request_id,
        &NewLineQuote {
            shipping_line_id: request.shipping_line_id,
            equipment_type_id: request.equipment_type_id,
            terms: request.terms.clone(),
            valid_to: normalize_business_date("validTo", &request.valid_to)?,
            selected: request.selected,
        },
    )?;

    persistence
        .line_quotes_for_request(rate_request_id)?
        .into_iter()
        .find(|q| q.line_quote_id == line_quote_id)
        .ok_or_else(|| ApiError::Internal {
            message: format!("Line quote {line_quote_id} vanished after insert"),
        })
}

fn transition_rate_request(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    rate_request_id: i64,
    command: Command,
    cause: Cause,
) -> Result<RateRequestData, ApiError> {
    let current: RateRequestData = load_rate_request(persistence, rate_request_id)?;
    let result: TransitionResult = apply(
        WorkflowSubject::RateRequest {
            id: rate_request_id,
            status: current.status,
        },
        command,
        actor.to_audit_actor(),
        cause,
    )?;
    persistence
        .persist_transition(&result)
        .map_err(|e| translate_transition_error(e, result.rejection))?;

    info!(
        rate_request_id,
        from = result.from,
        to = result.to,
        "Rate request status changed"
    );
    load_rate_request(persistence, rate_request_id)
}

/// Marks a rate request COMPLETED.
///
/// # Errors
///
/// Returns `Forbidden` ("Rate request is already completed") when already
/// COMPLETED and ("Rate request cannot be completed") from PENDING or
/// REJECTED, plus role and not-found errors.
pub fn complete_rate_request(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    rate_request_id: i64,
    cause: Cause,
) -> Result<RateRequestData, ApiError> {
    assert_role(actor, PRICING_TEAM, "complete_rate_request")?;
    transition_rate_request(
        persistence,
        actor,
        rate_request_id,
        Command::CompleteRateRequest,
        cause,
    )
}

/// Rejects a PENDING or PROCESSING rate request with a remark.
///
/// # Errors
///
/// Returns `InvalidInput` for a blank remark and `Forbidden` ("Rate request
/// cannot be rejected") from a terminal state, plus role and not-found errors.
pub fn reject_rate_request(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    rate_request_id: i64,
    request: &RejectRateRequestRequest,
    cause: Cause,
) -> Result<RateRequestData, ApiError> {
    assert_role(actor, PRICING_TEAM, "reject_rate_request")?;
    validate_required("remark", &request.remark)?;
    transition_rate_request(
        persistence,
        actor,
        rate_request_id,
        Command::RejectRateRequest {
            remark: request.remark.trim().to_string(),
        },
        cause,
    )
}

/// Computes the readiness heuristic of a rate request.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown ID.
pub fn get_processed_percentage(
    persistence: &mut Persistence,
    rate_request_id: i64,
) -> Result<ProcessedPercentageResponse, ApiError> {
    let request: RateRequestData = load_rate_request(persistence, rate_request_id)?;
    let response_lines: Vec<Option<i64>> = persistence
        .responses_for_request(rate_request_id)?
        .into_iter()
        .map(|response| response.requested_line_id)
        .collect();

    Ok(ProcessedPercentageResponse {
        rate_request_id,
        percentage: processed_percentage(request.preferred_line_id, &response_lines),
    })
}

/// Completed and rejected requests created since `since`, for the
/// turnaround report.
pub(crate) fn settled_since(
    persistence: &mut Persistence,
    since: &str,
) -> Result<Vec<SettledRateRequest>, ApiError> {
    Ok(persistence.settled_rate_requests_since(since)?)
}

/// Statuses shown on the rate request report card.
pub(crate) const RATE_REQUEST_STATUSES: [RateRequestStatus; 4] = [
    RateRequestStatus::Pending,
    RateRequestStatus::Processing,
    RateRequestStatus::Completed,
    RateRequestStatus::Rejected,
];
