// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP routes.
//!
//! Every handler follows the same shape: extract the session, lock the
//! store, run the synchronous API operation, drop the lock, and return
//! JSON. Role checks happen inside the API operations.

mod admin;
mod auth;
mod bookings;
mod customers;
mod itineraries;
mod masters;
mod rates;
mod workspace;

use axum::{
    Json, Router,
    extract::State as AxumState,
    routing::{get, patch, post},
};
use freight_desk_audit::Cause;
use serde::Serialize;
use tracing::debug;

use crate::AppState;
use crate::error::HttpError;
use crate::live::live_events_handler;

/// Response for `GET /health`.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Builds the cause recorded in audit events for HTTP-initiated actions.
fn http_cause(action: &str) -> Cause {
    Cause::new(String::from("http"), format!("{action} via HTTP"))
}

/// Handler for GET /health endpoint.
///
/// Confirms the database connection is usable.
async fn handle_health(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<HealthResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    persistence.verify_foreign_key_enforcement()?;
    drop(persistence);
    debug!("Health check passed");
    Ok(Json(HealthResponse { status: "ok" }))
}

/// Builds the application router.
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/live", get(live_events_handler))
        // Auth
        .route("/auth/login", post(auth::handle_login))
        .route("/auth/refresh", post(auth::handle_refresh))
        .route("/auth/logout", post(auth::handle_logout))
        .route("/auth/me", get(auth::handle_me))
        .route("/auth/reset/request-otp", post(auth::handle_request_otp))
        .route("/auth/reset/confirm", post(auth::handle_confirm_otp))
        .route(
            "/users",
            get(auth::handle_list_users).post(auth::handle_create_user),
        )
        // Rates
        .route(
            "/rates/requests",
            get(rates::handle_list_rate_requests).post(rates::handle_create_rate_request),
        )
        .route("/rates/requests/{id}", get(rates::handle_get_rate_request))
        .route(
            "/rates/requests/{id}/respond",
            post(rates::handle_respond_to_rate_request),
        )
        .route(
            "/rates/requests/{id}/line-quotes",
            post(rates::handle_add_line_quote),
        )
        .route(
            "/rates/requests/{id}/complete",
            post(rates::handle_complete_rate_request),
        )
        .route(
            "/rates/requests/{id}/reject",
            post(rates::handle_reject_rate_request),
        )
        .route(
            "/rates/requests/{id}/processed-percentage",
            get(rates::handle_processed_percentage),
        )
        .route(
            "/rates/predefined",
            get(rates::handle_list_predefined_rates).post(rates::handle_create_predefined_rate),
        )
        .route(
            "/rates/predefined/{id}",
            get(rates::handle_get_predefined_rate),
        )
        .route(
            "/rates/predefined/{id}/request-update",
            post(rates::handle_request_rate_update),
        )
        // Bookings
        .route(
            "/booking-requests",
            get(bookings::handle_list_booking_requests).post(bookings::handle_create_booking_request),
        )
        .route("/booking-requests/jobs", get(bookings::handle_list_jobs))
        .route(
            "/booking-requests/jobs/{id}/complete",
            post(bookings::handle_complete_job),
        )
        .route(
            "/booking-requests/{id}",
            get(bookings::handle_get_booking_request),
        )
        .route(
            "/booking-requests/{id}/confirm",
            post(bookings::handle_confirm_booking_request),
        )
        .route(
            "/booking-requests/{id}/cancel",
            post(bookings::handle_cancel_booking_request),
        )
        .route(
            "/booking-requests/{id}/ro",
            post(bookings::handle_add_ro_document),
        )
        .route(
            "/booking-requests/{id}/open-erp-job",
            post(bookings::handle_open_erp_job),
        )
        // Itineraries
        .route(
            "/itineraries",
            get(itineraries::handle_list_itineraries).post(itineraries::handle_create_itinerary),
        )
        .route(
            "/itineraries/items/{item_id}",
            patch(itineraries::handle_update_item).delete(itineraries::handle_remove_item),
        )
        .route(
            "/itineraries/{id}",
            get(itineraries::handle_get_itinerary)
                .patch(itineraries::handle_update_itinerary)
                .delete(itineraries::handle_delete_itinerary),
        )
        .route(
            "/itineraries/{id}/submit",
            post(itineraries::handle_submit_itinerary),
        )
        .route(
            "/itineraries/{id}/approve",
            post(itineraries::handle_approve_itinerary),
        )
        .route("/itineraries/{id}/items", post(itineraries::handle_add_item))
        // Customers
        .route(
            "/customers",
            get(customers::handle_list_customers).post(customers::handle_create_customer),
        )
        .route("/customers/search", get(customers::handle_search_customers))
        .route(
            "/customers/{id}",
            get(customers::handle_get_customer)
                .patch(customers::handle_update_customer)
                .delete(customers::handle_delete_customer),
        )
        .route(
            "/customers/{id}/approve",
            patch(customers::handle_approve_customer),
        )
        // Masters
        .route("/masters/ports", get(masters::handle_list_ports))
        .route("/masters/ports/search", get(masters::handle_search_ports))
        .route("/masters/ports/{id}", get(masters::handle_get_port))
        .route("/masters/trade-lanes", get(masters::handle_list_trade_lanes))
        .route(
            "/masters/trade-lanes/search",
            get(masters::handle_search_trade_lanes),
        )
        .route(
            "/masters/trade-lanes/{id}",
            get(masters::handle_get_trade_lane),
        )
        .route(
            "/masters/equipment-types",
            get(masters::handle_list_equipment_types),
        )
        .route(
            "/masters/equipment-types/{id}",
            get(masters::handle_get_equipment_type),
        )
        .route(
            "/masters/shipping-lines",
            get(masters::handle_list_shipping_lines),
        )
        .route(
            "/masters/shipping-lines/search",
            get(masters::handle_search_shipping_lines),
        )
        .route(
            "/masters/shipping-lines/{id}",
            get(masters::handle_get_shipping_line),
        )
        .route("/masters/sbus", get(masters::handle_list_sbus))
        .route("/masters/sbus/{id}", get(masters::handle_get_sbu))
        // Activities, notifications, dashboard
        .route(
            "/activities",
            get(workspace::handle_list_activities).post(workspace::handle_create_activity),
        )
        .route(
            "/activities/{id}",
            get(workspace::handle_get_activity)
                .patch(workspace::handle_update_activity)
                .delete(workspace::handle_delete_activity),
        )
        .route("/notifications", get(workspace::handle_list_notifications))
        .route(
            "/notifications/read-all",
            post(workspace::handle_mark_all_read),
        )
        .route(
            "/notifications/{id}/read",
            patch(workspace::handle_mark_read),
        )
        .route("/dashboard", get(workspace::handle_dashboard))
        // Reports & admin
        .route("/reports/response-time", get(admin::handle_response_time))
        .route("/reports/top-sps", get(admin::handle_top_salespeople))
        .route("/reports/status-cards", get(admin::handle_status_cards))
        .route(
            "/reports/booking-status-cards",
            get(admin::handle_booking_status_cards),
        )
        .route(
            "/reports/itinerary-status-cards",
            get(admin::handle_itinerary_status_cards),
        )
        .route("/admin/stats", get(admin::handle_system_stats))
        .route("/admin/audit-logs", get(admin::handle_audit_logs))
        .route("/admin/search", get(admin::handle_global_search))
        .with_state(app_state)
}
