// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role permissions for every gated operation.
//!
//! The role lists here are the single source for both the `assert_role`
//! checks in the handlers and the advisory capabilities returned by
//! `/auth/me`. Capabilities do not replace backend authorization checks.

use crate::auth::Role;
use crate::request_response::{Capability, RoleCapabilities};

/// Roles that may raise rate requests.
pub const RATE_REQUEST_CREATORS: &[Role] = &[Role::Sales, Role::Admin];
/// Roles that may answer, quote, complete and reject rate requests, and
/// publish predefined rates.
pub const PRICING_TEAM: &[Role] = &[Role::Pricing, Role::Admin];
/// Roles that may ask pricing to refresh a predefined rate.
pub const PREDEFINED_UPDATE_REQUESTERS: &[Role] = &[Role::Sales];
/// Roles that may raise, confirm and cancel booking requests.
pub const BOOKING_MANAGERS: &[Role] = &[Role::Sales, Role::Admin];
/// Roles that may attach release order documents.
pub const RO_DOCUMENT_UPLOADERS: &[Role] = &[Role::Sales, Role::Cse, Role::Admin];
/// Roles that may open, list and complete ERP jobs.
pub const JOB_OPERATORS: &[Role] = &[Role::Cse, Role::Admin];
/// Roles that may author itineraries and their items.
pub const ITINERARY_AUTHORS: &[Role] = &[Role::Sales, Role::Cse, Role::Admin];
/// Roles that may decide submitted itineraries.
pub const ITINERARY_APPROVERS: &[Role] = &[Role::SbuHead, Role::Admin];
/// Roles that may create and edit customers.
pub const CUSTOMER_EDITORS: &[Role] = &[Role::Sales, Role::Cse, Role::Admin];
/// Roles that may approve and delete customers.
pub const CUSTOMER_APPROVERS: &[Role] = &[Role::Admin];
/// Roles that may log sales activities.
pub const ACTIVITY_AUTHORS: &[Role] = &[Role::Sales, Role::Cse, Role::Admin];
/// Roles that may view the management reports.
pub const REPORT_VIEWERS: &[Role] = &[Role::Admin, Role::SbuHead, Role::Mgmt];
/// Roles that may manage users and read the audit log.
pub const ADMINISTRATORS: &[Role] = &[Role::Admin];

/// Roles whose listings are narrowed to records they own.
pub const SELF_SCOPED_ROLES: &[Role] = &[Role::Sales, Role::Cse];

fn allowed(role: Role, roles: &[Role]) -> Capability {
    Capability::from_bool(roles.contains(&role))
}

/// Computes the advisory capabilities of a role.
#[must_use]
pub fn compute_capabilities(role: Role) -> RoleCapabilities {
    RoleCapabilities {
        can_create_rate_request: allowed(role, RATE_REQUEST_CREATORS),
        can_respond_to_rate_request: allowed(role, PRICING_TEAM),
        can_manage_predefined_rates: allowed(role, PRICING_TEAM),
        can_request_rate_update: allowed(role, PREDEFINED_UPDATE_REQUESTERS),
        can_manage_bookings: allowed(role, BOOKING_MANAGERS),
        can_add_ro_document: allowed(role, RO_DOCUMENT_UPLOADERS),
        can_operate_jobs: allowed(role, JOB_OPERATORS),
        can_author_itineraries: allowed(role, ITINERARY_AUTHORS),
        can_approve_itineraries: allowed(role, ITINERARY_APPROVERS),
        can_edit_customers: allowed(role, CUSTOMER_EDITORS),
        can_approve_customers: allowed(role, CUSTOMER_APPROVERS),
        can_log_activities: allowed(role, ACTIVITY_AUTHORS),
        can_view_reports: allowed(role, REPORT_VIEWERS),
        can_administer: allowed(role, ADMINISTRATORS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_has_every_capability_but_rate_update_requests() {
        let caps: RoleCapabilities = compute_capabilities(Role::Admin);
        assert!(caps.can_create_rate_request.is_allowed());
        assert!(caps.can_approve_customers.is_allowed());
        assert!(caps.can_administer.is_allowed());
        assert!(!caps.can_request_rate_update.is_allowed());
    }

    #[test]
    fn test_pricing_capabilities() {
        let caps: RoleCapabilities = compute_capabilities(Role::Pricing);
        assert!(caps.can_respond_to_rate_request.is_allowed());
        assert!(caps.can_manage_predefined_rates.is_allowed());
        assert!(!caps.can_create_rate_request.is_allowed());
        assert!(!caps.can_manage_bookings.is_allowed());
        assert!(!caps.can_view_reports.is_allowed());
    }

    #[test]
    fn test_management_is_read_only() {
        let caps: RoleCapabilities = compute_capabilities(Role::Mgmt);
        assert!(caps.can_view_reports.is_allowed());
        assert!(!caps.can_edit_customers.is_allowed());
        assert!(!caps.can_author_itineraries.is_allowed());
        assert!(!caps.can_administer.is_allowed());
    }
}
