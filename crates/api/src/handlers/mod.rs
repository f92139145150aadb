// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operation handlers.
//!
//! Every handler follows the same order: role check, load, state or
//! ownership check, validation, persistence, then post-commit
//! notification. Handlers are synchronous and borrow the persistence
//! adapter for the duration of one operation.

pub mod activities;
pub mod admin;
pub mod auth;
pub mod bookings;
pub mod customers;
pub mod dashboard;
pub mod itineraries;
pub mod masters;
pub mod notifications;
pub mod predefined_rates;
pub mod rate_requests;
pub mod reports;
pub mod users;

use freight_desk_domain::normalize_business_date;

use crate::auth::{AuthenticatedActor, Role};
use crate::error::ApiError;

/// Normalizes an optional business date field.
fn optional_date(field: &str, value: Option<&str>) -> Result<Option<String>, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| normalize_business_date(field, v))
        .transpose()
        .map_err(ApiError::from)
}

/// Returns the owner filter for listings narrowed to the actor's own records.
///
/// Actors holding one of `scoped_roles` always see only their own records.
fn own_records_filter(
    actor: &AuthenticatedActor,
    mine: Option<bool>,
    scoped_roles: &[Role],
) -> Option<i64> {
    if mine == Some(true) || actor.has_any_role(scoped_roles) {
        Some(actor.user_id)
    } else {
        None
    }
}

/// Rejects a blank search term.
fn require_query(q: &str) -> Result<&str, ApiError> {
    let trimmed: &str = q.trim();
    if trimmed.is_empty() {
        return Err(ApiError::invalid_input("q", "Search query is required"));
    }
    Ok(trimmed)
}
