// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Customer registration, approval and search.

use freight_desk::guard::CUSTOMER_UPDATE;
use freight_desk::{Command, TransitionResult, WorkflowSubject, apply};
use freight_desk_audit::Cause;
use freight_desk_domain::{Decision, validate_email, validate_required};
use freight_desk_persistence::{CustomerData, CustomerPatch, NewCustomer, Persistence};
use tracing::info;

use super::require_query;
use crate::auth::{AuthenticatedActor, assert_role};
use crate::capabilities::{CUSTOMER_APPROVERS, CUSTOMER_EDITORS};
use crate::error::{ApiError, translate_transition_error};
use crate::request_response::{
    CreateCustomerRequest, CustomerQuery, DecisionRequest, UpdateCustomerRequest,
};

fn load_customer(persistence: &mut Persistence, customer_id: i64) -> Result<CustomerData, ApiError> {
    persistence
        .get_customer(customer_id)?
        .ok_or_else(|| ApiError::not_found("Customer", "Customer not found"))
}

fn trimmed(value: Option<&String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

/// Registers a customer pending approval.
///
/// # Errors
///
/// Returns an error if the actor may not edit customers, or the company
/// name, contact person or email is missing or malformed.
pub fn create_customer(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateCustomerRequest,
) -> Result<CustomerData, ApiError> {
    assert_role(actor, CUSTOMER_EDITORS, "create_customer")?;
    validate_required("companyName", &request.company_name)?;
    validate_required("contactPerson", &request.contact_person)?;
    validate_email("email", &request.email)?;

    let customer_id: i64 = persistence.create_customer(
        &NewCustomer {
            company_name: request.company_name.trim().to_string(),
            contact_person: request.contact_person.trim().to_string(),
            email: request.email.trim().to_string(),
            phone: request.phone.clone(),
            address: request.address.clone(),
            city: request.city.clone(),
            country: request.country.clone(),
        },
        actor.user_id,
    )?;

    info!(customer_id, created_by = actor.user_id, "Customer registered");
    load_customer(persistence, customer_id)
}

/// Lists customers; pending and rejected ones only when asked for.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_customers(
    persistence: &mut Persistence,
    query: CustomerQuery,
) -> Result<Vec<CustomerData>, ApiError> {
    Ok(persistence.list_customers(query.include_pending.unwrap_or(false))?)
}

/// Searches approved customers by company name, contact person or email.
///
/// # Errors
///
/// Returns `InvalidInput` ("Search query is required") for a blank query.
pub fn search_customers(persistence: &mut Persistence, q: &str) -> Result<Vec<CustomerData>, ApiError> {
    let q: &str = require_query(q)?;
    Ok(persistence.search_customers(q)?)
}

/// Retrieves one customer.
///
/// # Errors
///
/// Returns `ResourceNotFound` ("Customer not found") for an unknown ID.
pub fn get_customer(persistence: &mut Persistence, customer_id: i64) -> Result<CustomerData, ApiError> {
    load_customer(persistence, customer_id)
}

/// Edits a customer that has not been approved.
///
/// # Errors
///
/// Returns `Forbidden` ("Cannot update approved customer") once APPROVED,
/// `InvalidInput` for a blank name or malformed email, plus role and
/// not-found errors.
pub fn update_customer(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    customer_id: i64,
    request: &UpdateCustomerRequest,
) -> Result<CustomerData, ApiError> {
    assert_role(actor, CUSTOMER_EDITORS, "update_customer")?;
    let current: CustomerData = load_customer(persistence, customer_id)?;
    CUSTOMER_UPDATE.check(current.approval_status)?;

    if let Some(company_name) = &request.company_name {
        validate_required("companyName", company_name)?;
    }
    if let Some(contact_person) = &request.contact_person {
        validate_required("contactPerson", contact_person)?;
    }
    if let Some(email) = &request.email {
        validate_email("email", email)?;
    }

    let patch: CustomerPatch = CustomerPatch {
        company_name: trimmed(request.company_name.as_ref()),
        contact_person: trimmed(request.contact_person.as_ref()),
        email: trimmed(request.email.as_ref()),
        phone: request.phone.clone(),
        address: request.address.clone(),
        city: request.city.clone(),
        country: request.country.clone(),
    };
    persistence.update_customer(customer_id, &patch, &CUSTOMER_UPDATE)?;

    info!(customer_id, updated_by = actor.user_id, "Customer updated");
    load_customer(persistence, customer_id)
}

/// Approves or rejects a PENDING customer.
///
/// # Errors
///
/// Returns `Forbidden` ("Customer is not pending approval") unless PENDING,
/// plus role and not-found errors.
pub fn approve_customer(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    customer_id: i64,
    request: &DecisionRequest,
    cause: Cause,
) -> Result<CustomerData, ApiError> {
    assert_role(actor, CUSTOMER_APPROVERS, "approve_customer")?;
    let current: CustomerData = load_customer(persistence, customer_id)?;
    let decision: Decision = Decision::from_approved(request.approved);

    let result: TransitionResult = apply(
        WorkflowSubject::Customer {
            id: customer_id,
            status: current.approval_status,
        },
        Command::DecideCustomer {
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
        customer_id,
        approver_id = actor.user_id,
        approved = decision.is_approval(),
        "Customer decided"
    );
    load_customer(persistence, customer_id)
}

/// Deletes a customer nothing refers to.
///
/// # Errors
///
/// Returns `ResourceNotFound` ("Customer not found") when absent and
/// `Forbidden` ("Customer is referenced by existing records") when rate
/// requests, bookings, itinerary items or activities point at it.
pub fn delete_customer(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    customer_id: i64,
) -> Result<(), ApiError> {
    assert_role(actor, CUSTOMER_APPROVERS, "delete_customer")?;
    load_customer(persistence, customer_id)?;
    persistence.delete_customer(customer_id)?;
    info!(customer_id, deleted_by = actor.user_id, "Customer deleted");
    Ok(())
}
