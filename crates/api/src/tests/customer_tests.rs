// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use freight_desk_domain::{ActivityType, CustomerApprovalStatus};
use freight_desk_persistence::CustomerData;

use super::helpers::{
    ADMIN_EMAIL, CSE_EMAIL, SALES_EMAIL, actor, approved_customer, create_test_cause,
    customer_request, seeded_persistence,
};
use crate::handlers::activities::{
    create_activity, delete_activity, list_activities, update_activity,
};
use crate::handlers::customers::{
    approve_customer, create_customer, delete_customer, list_customers, search_customers,
    update_customer,
};
use crate::{
    ApiError, CreateActivityRequest, CustomerQuery, DecisionRequest, UpdateActivityRequest,
    UpdateCustomerRequest,
};

fn rename(company_name: &str) -> UpdateCustomerRequest {
    UpdateCustomerRequest {
        company_name: Some(company_name.to_string()),
        ..UpdateCustomerRequest::default()
    }
}

fn call(customer_id: Option<i64>) -> CreateActivityRequest {
    CreateActivityRequest {
        customer_id,
        lead_id: None,
        activity_type: ActivityType::Call,
        date: String::from("2026-10-12"),
        notes: Some(String::from("Discussed Q4 volumes")),
        outcome: None,
        next_action_date: Some(String::from("2026-10-19")),
    }
}

#[test]
fn test_new_customer_is_pending_and_editable() {
    let mut persistence = seeded_persistence();
    let sales = actor(&mut persistence, SALES_EMAIL);

    let customer: CustomerData =
        create_customer(&mut persistence, &sales, &customer_request()).unwrap();
    assert_eq!(customer.approval_status, CustomerApprovalStatus::Pending);

    let renamed = update_customer(
        &mut persistence,
        &sales,
        customer.customer_id,
        &rename("Ceylon Tea Exports (Pvt) Ltd"),
    )
    .unwrap();
    assert_eq!(renamed.company_name, "Ceylon Tea Exports (Pvt) Ltd");
    assert_eq!(renamed.contact_person, "Nimal Perera");
}

#[test]
fn test_customer_rejects_malformed_email() {
    let mut persistence = seeded_persistence();
    let sales = actor(&mut persistence, SALES_EMAIL);
    let mut request = customer_request();
    request.email = String::from("not-an-email");

    let err = create_customer(&mut persistence, &sales, &request).unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "email"));
}

#[test]
fn test_approved_customer_cannot_be_updated() {
    let mut persistence = seeded_persistence();
    let customer = approved_customer(&mut persistence);
    let sales = actor(&mut persistence, SALES_EMAIL);

    let err = update_customer(
        &mut persistence,
        &sales,
        customer.customer_id,
        &rename("Renamed"),
    )
    .unwrap_err();

    assert_eq!(
        err,
        ApiError::Forbidden {
            message: String::from("Cannot update approved customer")
        }
    );
}

#[test]
fn test_approval_requires_pending() {
    let mut persistence = seeded_persistence();
    let customer = approved_customer(&mut persistence);
    assert_eq!(customer.approval_status, CustomerApprovalStatus::Approved);
    assert!(customer.approved_by_id.is_some());
    let admin = actor(&mut persistence, ADMIN_EMAIL);

    let err = approve_customer(
        &mut persistence,
        &admin,
        customer.customer_id,
        &DecisionRequest {
            approved: false,
            note: None,
        },
        create_test_cause(),
    )
    .unwrap_err();

    assert_eq!(err.to_string(), "Customer is not pending approval");
}

#[test]
fn test_sales_cannot_approve_customers() {
    let mut persistence = seeded_persistence();
    let sales = actor(&mut persistence, SALES_EMAIL);
    let customer = create_customer(&mut persistence, &sales, &customer_request()).unwrap();

    let err = approve_customer(
        &mut persistence,
        &sales,
        customer.customer_id,
        &DecisionRequest {
            approved: true,
            note: None,
        },
        create_test_cause(),
    )
    .unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { .. }));
}

#[test]
fn test_rejected_customer_records_note() {
    let mut persistence = seeded_persistence();
    let sales = actor(&mut persistence, SALES_EMAIL);
    let admin = actor(&mut persistence, ADMIN_EMAIL);
    let customer = create_customer(&mut persistence, &sales, &customer_request()).unwrap();

    let rejected = approve_customer(
        &mut persistence,
        &admin,
        customer.customer_id,
        &DecisionRequest {
            approved: false,
            note: Some(String::from("Duplicate registration")),
        },
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(rejected.approval_status, CustomerApprovalStatus::Rejected);
    assert_eq!(
        rejected.approval_note.as_deref(),
        Some("Duplicate registration")
    );
}

#[test]
fn test_listing_hides_pending_unless_asked() {
    let mut persistence = seeded_persistence();
    let sales = actor(&mut persistence, SALES_EMAIL);
    approved_customer(&mut persistence);
    create_customer(&mut persistence, &sales, &customer_request()).unwrap();

    let approved_only = list_customers(&mut persistence, CustomerQuery::default()).unwrap();
    assert_eq!(approved_only.len(), 1);

    let everything = list_customers(
        &mut persistence,
        CustomerQuery {
            include_pending: Some(true),
        },
    )
    .unwrap();
    assert_eq!(everything.len(), 2);
}

#[test]
fn test_search_requires_query() {
    let mut persistence = seeded_persistence();
    approved_customer(&mut persistence);

    let err = search_customers(&mut persistence, "  ").unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { .. }));

    let found = search_customers(&mut persistence, "ceylon").unwrap();
    assert_eq!(found.len(), 1);
}

#[test]
fn test_unreferenced_customer_can_be_deleted() {
    let mut persistence = seeded_persistence();
    let customer = approved_customer(&mut persistence);
    let admin = actor(&mut persistence, ADMIN_EMAIL);

    delete_customer(&mut persistence, &admin, customer.customer_id).unwrap();

    let err = delete_customer(&mut persistence, &admin, customer.customer_id).unwrap_err();
    assert_eq!(err.to_string(), "Customer not found");
}

#[test]
fn test_customer_with_activity_cannot_be_deleted() {
    let mut persistence = seeded_persistence();
    let customer = approved_customer(&mut persistence);
    let sales = actor(&mut persistence, SALES_EMAIL);
    let admin = actor(&mut persistence, ADMIN_EMAIL);
    create_activity(&mut persistence, &sales, &call(Some(customer.customer_id))).unwrap();

    let err = delete_customer(&mut persistence, &admin, customer.customer_id).unwrap_err();

    assert_eq!(
        err,
        ApiError::Forbidden {
            message: String::from("Customer is referenced by existing records")
        }
    );
}

#[test]
fn test_activities_belong_to_their_author() {
    let mut persistence = seeded_persistence();
    let sales = actor(&mut persistence, SALES_EMAIL);
    let cse = actor(&mut persistence, CSE_EMAIL);
    let admin = actor(&mut persistence, ADMIN_EMAIL);
    let activity = create_activity(&mut persistence, &sales, &call(None)).unwrap();
    create_activity(&mut persistence, &cse, &call(None)).unwrap();

    assert_eq!(list_activities(&mut persistence, &sales).unwrap().len(), 1);
    assert_eq!(list_activities(&mut persistence, &admin).unwrap().len(), 2);

    let err = update_activity(
        &mut persistence,
        &cse,
        activity.activity_id,
        &UpdateActivityRequest {
            outcome: Some(String::from("Hijacked")),
            ..UpdateActivityRequest::default()
        },
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "You can only modify your own activities");

    let updated = update_activity(
        &mut persistence,
        &sales,
        activity.activity_id,
        &UpdateActivityRequest {
            outcome: Some(String::from("Quote requested")),
            ..UpdateActivityRequest::default()
        },
    )
    .unwrap();
    assert_eq!(updated.outcome.as_deref(), Some("Quote requested"));

    delete_activity(&mut persistence, &admin, activity.activity_id).unwrap();
    assert_eq!(list_activities(&mut persistence, &admin).unwrap().len(), 1);
}
