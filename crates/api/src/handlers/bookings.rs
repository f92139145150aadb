// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking requests, release order documents and ERP jobs.

use freight_desk::guard::{BOOKING_ADD_RO_DOCUMENT, BOOKING_OPEN_JOB};
use freight_desk::{Command, TransitionResult, WorkflowSubject, apply};
use freight_desk_audit::Cause;
use freight_desk_domain::{
    DomainError, RateLink, RateSource, parse_business_date, validate_required,
};
use freight_desk_persistence::{
    BookingFilter, BookingRequestData, JobCompletionData, JobData, NewBookingRequest,
    Persistence, RoDocumentData,
};
use serde_json::json;
use time::OffsetDateTime;
use tracing::{debug, info};

use super::own_records_filter;
use super::predefined_rates::load_predefined_rate;
use super::rate_requests::load_rate_request;
use crate::auth::{AuthenticatedActor, Role, assert_role};
use crate::capabilities::{BOOKING_MANAGERS, JOB_OPERATORS, RO_DOCUMENT_UPLOADERS};
use crate::error::{ApiError, translate_transition_error};
use crate::notifications::{DeliveryQueue, Notice, log_dispatch_outcome, notify_role, notify_user};
use crate::request_response::{
    AddRoDocumentRequest, BookingQuery, BookingRequestDetail, CancelBookingRequest,
    CompleteJobRequest, ConfirmBookingRequest, CreateBookingRequestRequest, JobDetail,
    OpenJobRequest,
};

fn load_booking(
    persistence: &mut Persistence,
    booking_request_id: i64,
) -> Result<BookingRequestData, ApiError> {
    persistence
        .get_booking_request(booking_request_id)?
        .ok_or_else(|| ApiError::not_found("Booking request", "Booking request not found"))
}

fn load_job(persistence: &mut Persistence, job_id: i64) -> Result<JobData, ApiError> {
    persistence
        .get_job(job_id)?
        .ok_or_else(|| ApiError::not_found("Job", "Job not found"))
}

fn job_detail(persistence: &mut Persistence, job: JobData) -> Result<JobDetail, ApiError> {
    let completions: Vec<JobCompletionData> = persistence.completions_for_job(job.job_id)?;
    Ok(JobDetail { job, completions })
}

/// Finds when the quote behind a booking stops being valid.
///
/// Predefined rates use their own end date. Rate requests use the
/// selected line quote, falling back to the latest pricing response.
fn quoted_valid_to(
    persistence: &mut Persistence,
    link: RateLink,
) -> Result<Option<String>, ApiError> {
    match link {
        RateLink::Predefined(predefined_rate_id) => Ok(Some(
            load_predefined_rate(persistence, predefined_rate_id)?.valid_to,
        )),
        RateLink::Request(rate_request_id) => {
            if let Some(quote) = persistence.selected_line_quote(rate_request_id)? {
                return Ok(Some(quote.valid_to));
            }
            Ok(persistence
                .latest_response(rate_request_id)?
                .map(|response| response.valid_to))
        }
    }
}

fn ensure_quote_still_valid(
    persistence: &mut Persistence,
    link: RateLink,
) -> Result<(), ApiError> {
    let Some(valid_to) = quoted_valid_to(persistence, link)? else {
        debug!(link_id = link.link_id(), "No quoted validity to check");
        return Ok(());
    };
    if parse_business_date(&valid_to)? < OffsetDateTime::now_utc() {
        return Err(DomainError::RateValidityExpired { valid_to }.into());
    }
    Ok(())
}

/// Raises a booking request against a predefined rate or a rate request.
///
/// # Errors
///
/// Returns an error if the actor is not SALES or ADMIN, or the customer or
/// the linked rate does not exist.
pub fn create_booking_request(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: CreateBookingRequestRequest,
) -> Result<BookingRequestData, ApiError> {
    assert_role(actor, BOOKING_MANAGERS, "create_booking_request")?;

    if persistence.get_customer(request.customer_id)?.is_none() {
        return Err(ApiError::not_found("Customer", "Customer not found"));
    }
    let link: RateLink = RateLink::new(request.rate_source, request.link_id);
    match request.rate_source {
        RateSource::Predefined => {
            load_predefined_rate(persistence, request.link_id)?;
        }
        RateSource::Request => {
            load_rate_request(persistence, request.link_id)?;
        }
    }

    let booking_request_id: i64 = persistence.create_booking_request(&NewBookingRequest {
        customer_id: request.customer_id,
        link,
        raised_by_id: actor.user_id,
    })?;

    info!(
        booking_request_id,
        rate_source = request.rate_source.as_str(),
        link_id = request.link_id,
        raised_by = actor.user_id,
        "Booking request created"
    );
    load_booking(persistence, booking_request_id)
}

/// Lists booking requests, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_booking_requests(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    query: BookingQuery,
) -> Result<Vec<BookingRequestData>, ApiError> {
    Ok(persistence.list_booking_requests(BookingFilter {
        raised_by_id: own_records_filter(actor, query.mine, &[Role::Sales]),
        status: query.status,
    })?)
}

/// Retrieves a booking request with its customer, raiser, RO documents
/// and jobs.
///
/// # Errors
///
/// Returns `ResourceNotFound` ("Booking request not found") for an unknown ID.
pub fn get_booking_request(
    persistence: &mut Persistence,
    booking_request_id: i64,
) -> Result<BookingRequestDetail, ApiError> {
    let booking: BookingRequestData = load_booking(persistence, booking_request_id)?;
    let customer = persistence.get_customer(booking.customer_id)?;
    let raised_by = persistence.get_user_by_id(booking.raised_by_id)?;
    let ro_documents: Vec<RoDocumentData> =
        persistence.ro_documents_for_booking(booking_request_id)?;
    let jobs: Vec<JobDetail> = persistence
        .jobs_for_booking(booking_request_id)?
        .into_iter()
        .map(|job| job_detail(persistence, job))
        .collect::<Result<_, _>>()?;

    Ok(BookingRequestDetail {
        booking,
        customer,
        raised_by,
        ro_documents,
        jobs,
    })
}

/// Confirms a PENDING booking request.
///
/// Unless `overrideValidity` is set, the quote behind the booking must not
/// have expired. The raising salesperson is notified after commit.
///
/// # Errors
///
/// Returns `Forbidden` ("Booking request is not pending") unless PENDING,
/// `InvalidInput` when the quoted rate has expired, plus role and
/// not-found errors.
pub fn confirm_booking_request(
    persistence: &mut Persistence,
    queue: &dyn DeliveryQueue,
    actor: &AuthenticatedActor,
    booking_request_id: i64,
    request: ConfirmBookingRequest,
    cause: Cause,
) -> Result<BookingRequestData, ApiError> {
    assert_role(actor, BOOKING_MANAGERS, "confirm_booking_request")?;
    let current: BookingRequestData = load_booking(persistence, booking_request_id)?;

    let result: TransitionResult = apply(
        WorkflowSubject::BookingRequest {
            id: booking_request_id,
            status: current.status,
        },
        Command::ConfirmBookingRequest,
        actor.to_audit_actor(),
        cause,
    )?;

    if request.override_validity {
        info!(
            booking_request_id,
            user_id = actor.user_id,
            "Confirming with quote validity overridden"
        );
    } else {
        ensure_quote_still_valid(persistence, current.link)?;
    }

    persistence
        .persist_transition(&result)
        .map_err(|e| translate_transition_error(e, result.rejection))?;
    info!(booking_request_id, confirmed_by = actor.user_id, "Booking request confirmed");

    let notice: Notice = Notice::new(
        "Booking Request Confirmed",
        format!("Booking request #{booking_request_id} has been confirmed"),
        Some(json!({ "bookingRequestId": booking_request_id })),
    )
    .with_sms();
    log_dispatch_outcome(
        &notice.subject,
        &notify_user(persistence, queue, current.raised_by_id, &notice),
    );

    load_booking(persistence, booking_request_id)
}

/// Cancels a booking request with a reason.
///
/// # Errors
///
/// Returns `InvalidInput` for a blank reason and `Forbidden` ("Booking
/// request is already cancelled") when already CANCELLED.
pub fn cancel_booking_request(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    booking_request_id: i64,
    request: &CancelBookingRequest,
    cause: Cause,
) -> Result<BookingRequestData, ApiError> {
    assert_role(actor, BOOKING_MANAGERS, "cancel_booking_request")?;
    validate_required("reason", &request.reason)?;
    let current: BookingRequestData = load_booking(persistence, booking_request_id)?;

    let result: TransitionResult = apply(
        WorkflowSubject::BookingRequest {
            id: booking_request_id,
            status: current.status,
        },
        Command::CancelBookingRequest {
            reason: request.reason.trim().to_string(),
        },
        actor.to_audit_actor(),
        cause,
    )?;
    persistence
        .persist_transition(&result)
        .map_err(|e| translate_transition_error(e, result.rejection))?;

    info!(
        booking_request_id,
        from = result.from,
        cancelled_by = actor.user_id,
        "Booking request cancelled"
    );
    load_booking(persistence, booking_request_id)
}

/// Attaches a release order document to a CONFIRMED booking.
///
/// Every CSE user is notified after commit.
///
/// # Errors
///
/// Returns `Forbidden` ("Booking request must be confirmed to add RO
/// document") unless CONFIRMED, `InvalidInput` for a blank number, plus
/// role and not-found errors.
pub fn add_ro_document(
    persistence: &mut Persistence,
    queue: &dyn DeliveryQueue,
    actor: &AuthenticatedActor,
    booking_request_id: i64,
    request: &AddRoDocumentRequest,
) -> Result<RoDocumentData, ApiError> {
    assert_role(actor, RO_DOCUMENT_UPLOADERS, "add_ro_document")?;
    let current: BookingRequestData = load_booking(persistence, booking_request_id)?;
    BOOKING_ADD_RO_DOCUMENT.check(current.status)?;
    validate_required("number", &request.number)?;

    let ro_document_id: i64 = persistence.add_ro_document(
        booking_request_id,
        request.number.trim(),
        request.file_url.as_deref(),
        &BOOKING_ADD_RO_DOCUMENT,
    )?;
    info!(booking_request_id, ro_document_id, "RO document added");

    let notice: Notice = Notice::new(
        "RO Document Received",
        format!(
            "RO document {} was added to booking request #{booking_request_id}",
            request.number.trim()
        ),
        Some(json!({
            "bookingRequestId": booking_request_id,
            "roDocumentId": ro_document_id,
        })),
    );
    log_dispatch_outcome(
        &notice.subject,
        &notify_role(persistence, queue, Role::Cse, &notice),
    );

    persistence
        .get_ro_document(ro_document_id)?
        .ok_or_else(|| ApiError::Internal {
            message: format!("RO document {ro_document_id} vanished after insert"),
        })
}

/// Opens an ERP job for a CONFIRMED booking.
///
/// # Errors
///
/// Returns `Forbidden` ("Booking request must be confirmed to open ERP
/// job") unless CONFIRMED, `InvalidInput` for a blank job number, plus role
/// and not-found errors.
pub fn open_erp_job(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    booking_request_id: i64,
    request: &OpenJobRequest,
) -> Result<JobData, ApiError> {
    assert_role(actor, JOB_OPERATORS, "open_erp_job")?;
    let current: BookingRequestData = load_booking(persistence, booking_request_id)?;
    BOOKING_OPEN_JOB.check(current.status)?;
    validate_required("erpJobNo", &request.erp_job_no)?;

    let job_id: i64 = persistence.open_job(
        booking_request_id,
        request.erp_job_no.trim(),
        actor.user_id,
        &BOOKING_OPEN_JOB,
    )?;
    info!(booking_request_id, job_id, opened_by = actor.user_id, "ERP job opened");
    load_job(persistence, job_id)
}

/// Lists ERP jobs; CSE actors only see jobs they opened.
///
/// # Errors
///
/// Returns an error if the actor is not CSE or ADMIN.
pub fn list_jobs(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<Vec<JobDetail>, ApiError> {
    assert_role(actor, JOB_OPERATORS, "list_jobs")?;
    let opened_by: Option<i64> = (actor.role == Role::Cse).then_some(actor.user_id);
    persistence
        .list_jobs(opened_by)?
        .into_iter()
        .map(|job| job_detail(persistence, job))
        .collect()
}

/// Appends a completion record to a job.
///
/// # Errors
///
/// Returns `ResourceNotFound` ("Job not found") for an unknown job, plus
/// role errors.
pub fn complete_job(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    job_id: i64,
    request: &CompleteJobRequest,
) -> Result<JobCompletionData, ApiError> {
    assert_role(actor, JOB_OPERATORS, "complete_job")?;
    load_job(persistence, job_id)?;

    let completion_id: i64 = persistence.complete_job(job_id, &request.details, actor.user_id)?;
    info!(job_id, completion_id, completed_by = actor.user_id, "Job completion recorded");

    persistence
        .get_job_completion(completion_id)?
        .ok_or_else(|| ApiError::Internal {
            message: format!("Job completion {completion_id} vanished after insert"),
        })
}
