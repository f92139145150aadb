// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Administrator tools: system counts, the audit log and global search.

use freight_desk_domain::parse_business_date;
use freight_desk_persistence::{
    AuditLogEntry, AuditLogFilter, Persistence, SEARCH_LIMIT, SystemCounts, format_sql_timestamp,
};
use tracing::debug;

use super::require_query;
use crate::auth::{AuthenticatedActor, assert_role};
use crate::capabilities::ADMINISTRATORS;
use crate::error::ApiError;
use crate::request_response::{AuditLogQuery, GlobalSearchResponse};

/// Converts a business date bound into the audit table's timestamp form.
fn audit_bound(value: Option<&str>) -> Result<Option<String>, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => Ok(Some(format_sql_timestamp(parse_business_date(v)?)?)),
        None => Ok(None),
    }
}

/// Counts the main record types.
///
/// # Errors
///
/// Returns an error if the actor is not ADMIN or a count fails.
pub fn system_stats(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<SystemCounts, ApiError> {
    assert_role(actor, ADMINISTRATORS, "view_system_stats")?;
    Ok(persistence.system_counts()?)
}

/// Queries the audit log, newest first, at most 100 entries.
///
/// # Errors
///
/// Returns an error if the actor is not ADMIN or a date bound is malformed.
pub fn audit_logs(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    query: &AuditLogQuery,
) -> Result<Vec<AuditLogEntry>, ApiError> {
    assert_role(actor, ADMINISTRATORS, "view_audit_logs")?;
    let filter: AuditLogFilter = AuditLogFilter {
        actor_user_id: query.actor_user_id,
        entity_type: query.entity_type.clone(),
        action: query.action.clone(),
        from: audit_bound(query.from.as_deref())?,
        to: audit_bound(query.to.as_deref())?,
    };
    debug!(entity_type = ?filter.entity_type, action = ?filter.action, "Querying audit log");
    Ok(persistence.query_audit_log(&filter)?)
}

/// Searches users, customers of any approval status and rate request
/// reference numbers.
///
/// # Errors
///
/// Returns an error if the actor is not ADMIN or the query is blank.
pub fn global_search(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    q: &str,
) -> Result<GlobalSearchResponse, ApiError> {
    assert_role(actor, ADMINISTRATORS, "global_search")?;
    let q: &str = require_query(q)?;
    Ok(GlobalSearchResponse {
        users: persistence.search_users(q, SEARCH_LIMIT)?,
        customers: persistence.search_all_customers(q)?,
        rate_requests: persistence.search_rate_requests_by_ref_no(q, SEARCH_LIMIT)?,
    })
}
