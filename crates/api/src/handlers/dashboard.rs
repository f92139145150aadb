// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-role landing page summary.

use freight_desk_persistence::{ActivityData, NotificationData, Persistence};

use super::own_records_filter;
use crate::auth::{AuthenticatedActor, Role};
use crate::capabilities::SELF_SCOPED_ROLES;
use crate::error::ApiError;
use crate::request_response::DashboardResponse;

const RECENT_ACTIVITIES: i64 = 10;
const RECENT_NOTIFICATIONS: i64 = 5;

/// Counts the actor's workload and lists recent activity.
///
/// SALES counts only their own rate requests and bookings; SALES and CSE
/// count only their own itineraries and activities.
///
/// # Errors
///
/// Returns an error if any of the queries fail.
pub fn dashboard(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<DashboardResponse, ApiError> {
    let sales_scope: Option<i64> = own_records_filter(actor, None, &[Role::Sales]);
    let self_scope: Option<i64> = own_records_filter(actor, None, SELF_SCOPED_ROLES);

    let rate_requests: i64 = persistence.count_rate_requests(sales_scope)?;
    let booking_requests: i64 = persistence.count_booking_requests(sales_scope)?;
    let itineraries: i64 = persistence.count_itineraries(self_scope)?;
    let recent_activities: Vec<ActivityData> =
        persistence.list_activities(self_scope, Some(RECENT_ACTIVITIES))?;
    let recent_notifications: Vec<NotificationData> =
        persistence.list_system_notifications(actor.user_id, Some(RECENT_NOTIFICATIONS))?;

    Ok(DashboardResponse {
        rate_requests,
        booking_requests,
        itineraries,
        recent_activities,
        recent_notifications,
    })
}
