// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Customer queries.

use diesel::SqliteConnection;
use diesel::dsl::count_star;
use diesel::prelude::*;
use freight_desk_domain::CustomerApprovalStatus;
use tracing::debug;

use crate::data_models::CustomerData;
use crate::diesel_schema::{
    booking_requests, customers, itinerary_items, rate_requests, sales_activities,
};
use crate::error::PersistenceError;

/// Maximum rows returned by a customer search.
pub const SEARCH_LIMIT: i64 = 10;

#[derive(Queryable, Selectable)]
#[diesel(table_name = customers)]
pub(crate) struct CustomerRow {
    customer_id: i64,
    company_name: String,
    contact_person: String,
    email: String,
    phone: Option<String>,
    address: Option<String>,
    city: Option<String>,
    country: Option<String>,
    approval_status: String,
    created_by_id: i64,
    approved_by_id: Option<i64>,
    approval_note: Option<String>,
    approved_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl CustomerRow {
    pub(crate) fn into_data(self) -> Result<CustomerData, PersistenceError> {
        Ok(CustomerData {
            customer_id: self.customer_id,
            company_name: self.company_name,
            contact_person: self.contact_person,
            email: self.email,
            phone: self.phone,
            address: self.address,
            city: self.city,
            country: self.country,
            approval_status: self.approval_status.parse::<CustomerApprovalStatus>()?,
            created_by_id: self.created_by_id,
            approved_by_id: self.approved_by_id,
            approval_note: self.approval_note,
            approved_at: self.approved_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn collect(rows: Vec<CustomerRow>) -> Result<Vec<CustomerData>, PersistenceError> {
    rows.into_iter().map(CustomerRow::into_data).collect()
}

/// Retrieves a customer by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the customer is not found.
pub fn get_customer(
    conn: &mut SqliteConnection,
    customer_id: i64,
) -> Result<Option<CustomerData>, PersistenceError> {
    debug!("Looking up customer by ID: {}", customer_id);

    let result: Result<CustomerRow, diesel::result::Error> = customers::table
        .filter(customers::customer_id.eq(customer_id))
        .select(CustomerRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_data()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists customers ordered by company name.
///
/// Only approved customers are returned unless `include_pending` is set,
/// in which case every customer is returned.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_customers(
    conn: &mut SqliteConnection,
    include_pending: bool,
) -> Result<Vec<CustomerData>, PersistenceError> {
    let mut query = customers::table
        .select(CustomerRow::as_select())
        .into_boxed();
    if !include_pending {
        query = query
            .filter(customers::approval_status.eq(CustomerApprovalStatus::Approved.as_str()));
    }

    let rows: Vec<CustomerRow> = query.order(customers::company_name.asc()).load(conn)?;

    collect(rows)
}

/// Searches approved customers by company name, contact person or email.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn search_customers(
    conn: &mut SqliteConnection,
    query: &str,
) -> Result<Vec<CustomerData>, PersistenceError> {
    let pattern: String = format!("%{}%", query.trim());

    let rows: Vec<CustomerRow> = customers::table
        .filter(customers::approval_status.eq(CustomerApprovalStatus::Approved.as_str()))
        .filter(
            customers::company_name
                .like(&pattern)
                .or(customers::contact_person.like(&pattern))
                .or(customers::email.like(&pattern)),
        )
        .order(customers::company_name.asc())
        .limit(SEARCH_LIMIT)
        .select(CustomerRow::as_select())
        .load(conn)?;

    collect(rows)
}

/// Searches customers of any approval status by company name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn search_all_customers(
    conn: &mut SqliteConnection,
    query: &str,
) -> Result<Vec<CustomerData>, PersistenceError> {
    let pattern: String = format!("%{}%", query.trim());

    let rows: Vec<CustomerRow> = customers::table
        .filter(customers::company_name.like(&pattern))
        .order(customers::company_name.asc())
        .limit(SEARCH_LIMIT)
        .select(CustomerRow::as_select())
        .load(conn)?;

    collect(rows)
}

/// Returns true if any rate request, booking, itinerary item or activity
/// references the customer.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn is_customer_referenced(
    conn: &mut SqliteConnection,
    customer_id: i64,
) -> Result<bool, PersistenceError> {
    let rate_request_refs: i64 = rate_requests::table
        .filter(rate_requests::customer_id.eq(customer_id))
        .select(count_star())
        .first(conn)?;
    let booking_refs: i64 = booking_requests::table
        .filter(booking_requests::customer_id.eq(customer_id))
        .select(count_star())
        .first(conn)?;
    let item_refs: i64 = itinerary_items::table
        .filter(itinerary_items::customer_id.eq(customer_id))
        .select(count_star())
        .first(conn)?;
    let activity_refs: i64 = sales_activities::table
        .filter(sales_activities::customer_id.eq(customer_id))
        .select(count_star())
        .first(conn)?;

    Ok(rate_request_refs + booking_refs + item_refs + activity_refs > 0)
}
