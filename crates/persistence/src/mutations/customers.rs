// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Customer mutations.

use diesel::SqliteConnection;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Text;
use freight_desk::StateRequirement;
use freight_desk_domain::{CustomerApprovalStatus, LifecycleStatus};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::{CustomerPatch, NewCustomer};
use crate::diesel_schema::customers;
use crate::error::PersistenceError;
use crate::mutations::transitions::check_stored_status;
use crate::queries::customers::is_customer_referenced;

#[derive(AsChangeset)]
#[diesel(table_name = customers)]
struct CustomerChangeset<'a> {
    company_name: Option<&'a str>,
    contact_person: Option<&'a str>,
    email: Option<&'a str>,
    phone: Option<&'a str>,
    address: Option<&'a str>,
    city: Option<&'a str>,
    country: Option<&'a str>,
}

impl<'a> From<&'a CustomerPatch> for CustomerChangeset<'a> {
    fn from(patch: &'a CustomerPatch) -> Self {
        Self {
            company_name: patch.company_name.as_deref(),
            contact_person: patch.contact_person.as_deref(),
            email: patch.email.as_deref(),
            phone: patch.phone.as_deref(),
            address: patch.address.as_deref(),
            city: patch.city.as_deref(),
            country: patch.country.as_deref(),
        }
    }
}

fn stored_approval_status(
    conn: &mut SqliteConnection,
    customer_id: i64,
) -> Result<String, PersistenceError> {
    customers::table
        .filter(customers::customer_id.eq(customer_id))
        .select(customers::approval_status)
        .first::<String>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Customer {customer_id}")))
}

/// Creates a customer in `PENDING` approval status.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_customer(
    conn: &mut SqliteConnection,
    customer: &NewCustomer,
    created_by_id: i64,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(customers::table)
        .values((
            customers::company_name.eq(&customer.company_name),
            customers::contact_person.eq(&customer.contact_person),
            customers::email.eq(&customer.email),
            customers::phone.eq(customer.phone.as_deref()),
            customers::address.eq(customer.address.as_deref()),
            customers::city.eq(customer.city.as_deref()),
            customers::country.eq(customer.country.as_deref()),
            customers::approval_status.eq(CustomerApprovalStatus::Pending.as_str()),
            customers::created_by_id.eq(created_by_id),
        ))
        .execute(conn)?;

    let customer_id: i64 = conn.get_last_insert_rowid()?;
    info!(customer_id, created_by_id, "Created customer");
    Ok(customer_id)
}

/// Applies field edits to a customer while its approval status allows it.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the customer does not exist,
/// `PersistenceError::StaleState` if its status no longer satisfies
/// `requirement`, or a database error.
pub fn update_customer(
    conn: &mut SqliteConnection,
    customer_id: i64,
    patch: &CustomerPatch,
    requirement: &StateRequirement<CustomerApprovalStatus>,
) -> Result<(), PersistenceError> {
    let changes: CustomerChangeset<'_> = CustomerChangeset::from(patch);

    conn.immediate_transaction(|conn| {
        let stored: String = stored_approval_status(conn, customer_id)?;
        check_stored_status(requirement, &stored, customer_id)?;

        diesel::update(customers::table)
            .filter(customers::customer_id.eq(customer_id))
            .set((
                changes,
                customers::updated_at.eq(sql::<Text>("CURRENT_TIMESTAMP")),
            ))
            .execute(conn)?;

        info!(customer_id, "Updated customer");
        Ok(())
    })
}

/// Deletes a customer that nothing references.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the customer does not exist,
/// `PersistenceError::Referenced` if rate requests, bookings, itinerary
/// items or activities reference it, or a database error.
pub fn delete_customer(
    conn: &mut SqliteConnection,
    customer_id: i64,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        stored_approval_status(conn, customer_id)?;

        if is_customer_referenced(conn, customer_id)? {
            return Err(PersistenceError::Referenced(String::from(
                "Customer is referenced by existing records",
            )));
        }

        diesel::delete(customers::table)
            .filter(customers::customer_id.eq(customer_id))
            .execute(conn)?;

        info!(customer_id, "Deleted customer");
        Ok(())
    })
}
