// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Records returned by the persistence layer and the inputs it accepts.
//!
//! Loaded records carry parsed domain enums rather than raw status
//! strings; a row holding an unknown status surfaces as
//! `PersistenceError::CorruptRecord`. Timestamps written by the database
//! (`createdAt`, `updatedAt`, decision times) are `YYYY-MM-DD HH:MM:SS`
//! UTC strings. Business dates supplied by clients are RFC 3339 strings.

use freight_desk_domain::{
    ActivityType, BookingStatus, CustomerApprovalStatus, ItineraryStatus, ItineraryType,
    NotificationChannel, NotificationStatus, RateLink, RateRequestStatus, RateSource,
    ShipmentType, TransportMode, UserStatus,
};
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// Users and sessions
// ============================================================================

/// A back-office user.
///
/// The password hash is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub user_id: i64,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: String,
    pub status: UserStatus,
    pub sbu_id: Option<i64>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
    pub updated_at: String,
    pub last_login_at: Option<String>,
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: String,
    pub status: UserStatus,
    pub sbu_id: Option<i64>,
    /// Plain-text password; hashed before it is stored.
    pub password: String,
}

/// A bearer session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: i64,
    /// `ACCESS` or `REFRESH`.
    pub token_kind: String,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

/// An unconsumed, unexpired password reset code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpData {
    pub otp_id: i64,
    pub user_id: i64,
    pub otp_hash: String,
    pub expires_at: String,
}

// ============================================================================
// Masters
// ============================================================================

/// A strategic business unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SbuData {
    pub sbu_id: i64,
    pub name: String,
    pub head_user_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortData {
    pub port_id: i64,
    pub unlocode: String,
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeLaneData {
    pub trade_lane_id: i64,
    pub name: String,
    pub code: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentTypeData {
    pub equipment_type_id: i64,
    pub name: String,
    /// Flat rack and open top units need pallet dimensions on requests.
    pub is_flat_rack_open_top: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingLineData {
    pub shipping_line_id: i64,
    pub name: String,
    pub code: String,
}

// ============================================================================
// Customers
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerData {
    pub customer_id: i64,
    pub company_name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub approval_status: CustomerApprovalStatus,
    pub created_by_id: i64,
    pub approved_by_id: Option<i64>,
    pub approval_note: Option<String>,
    pub approved_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating a customer. New customers always start `PENDING`.
#[derive(Debug, Clone, Default)]
pub struct NewCustomer {
    pub company_name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Field edits for a customer; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerPatch {
    pub company_name: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

// ============================================================================
// Rate requests
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRequestData {
    pub rate_request_id: i64,
    pub ref_no: String,
    pub mode: TransportMode,
    #[serde(rename = "type")]
    pub shipment_type: ShipmentType,
    pub pol_id: Option<i64>,
    pub pod_id: i64,
    pub door_or_cy: Option<String>,
    pub us_zip: Option<String>,
    pub preferred_line_id: Option<i64>,
    pub equipment_type_id: Option<i64>,
    pub reefer_temp: Option<f64>,
    pub pallet_count: Option<i32>,
    pub pallet_dims: Option<String>,
    pub hs_code: Option<String>,
    pub weight_tons: f64,
    pub incoterm: String,
    pub market_rate: Option<f64>,
    pub special_instructions: Option<String>,
    pub cargo_ready_date: Option<String>,
    pub vessel_required: bool,
    pub detention_free_time: Option<String>,
    pub salesperson_id: i64,
    pub customer_id: i64,
    pub status: RateRequestStatus,
    pub rejection_remark: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating a rate request. New requests always start `PENDING`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRateRequest {
    pub ref_no: String,
    pub mode: TransportMode,
    pub shipment_type: ShipmentType,
    pub pol_id: Option<i64>,
    pub pod_id: i64,
    pub door_or_cy: Option<String>,
    pub us_zip: Option<String>,
    pub preferred_line_id: Option<i64>,
    pub equipment_type_id: Option<i64>,
    pub reefer_temp: Option<f64>,
    pub pallet_count: Option<i32>,
    pub pallet_dims: Option<String>,
    pub hs_code: Option<String>,
    pub weight_tons: f64,
    pub incoterm: String,
    pub market_rate: Option<f64>,
    pub special_instructions: Option<String>,
    pub cargo_ready_date: Option<String>,
    pub vessel_required: bool,
    pub detention_free_time: Option<String>,
    pub salesperson_id: i64,
    pub customer_id: i64,
}

/// Filter for listing rate requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateRequestFilter {
    pub salesperson_id: Option<i64>,
    pub status: Option<RateRequestStatus>,
}

/// One pricing-team response to a rate request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateResponseData {
    pub response_id: i64,
    pub rate_request_id: i64,
    pub line_no: i32,
    pub requested_line_id: Option<i64>,
    pub requested_equipment_type_id: Option<i64>,
    pub vessel_name: Option<String>,
    pub eta: Option<String>,
    pub etd: Option<String>,
    pub fcl_cutoff: Option<String>,
    pub doc_cutoff: Option<String>,
    pub valid_to: String,
    pub charges: Value,
    pub responded_by_id: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRateResponse {
    pub line_no: i32,
    pub requested_line_id: Option<i64>,
    pub requested_equipment_type_id: Option<i64>,
    pub vessel_name: Option<String>,
    pub eta: Option<String>,
    pub etd: Option<String>,
    pub fcl_cutoff: Option<String>,
    pub doc_cutoff: Option<String>,
    pub valid_to: String,
    pub charges: Value,
    pub responded_by_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineQuoteData {
    pub line_quote_id: i64,
    pub rate_request_id: i64,
    pub shipping_line_id: i64,
    pub equipment_type_id: Option<i64>,
    pub terms: Value,
    pub valid_to: String,
    pub selected: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewLineQuote {
    pub shipping_line_id: i64,
    pub equipment_type_id: Option<i64>,
    pub terms: Value,
    pub valid_to: String,
    pub selected: bool,
}

// ============================================================================
// Predefined rates
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredefinedRateData {
    pub predefined_rate_id: i64,
    pub trade_lane_id: i64,
    pub pol_id: i64,
    pub pod_id: i64,
    pub service: String,
    pub equipment_type_id: i64,
    pub is_lcl: bool,
    pub valid_from: String,
    pub valid_to: String,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPredefinedRate {
    pub trade_lane_id: i64,
    pub pol_id: i64,
    pub pod_id: i64,
    pub service: String,
    pub equipment_type_id: i64,
    pub is_lcl: bool,
    pub valid_from: String,
    pub valid_to: String,
    pub notes: Option<String>,
    pub status: String,
}

/// Filter for listing predefined rates.
#[derive(Debug, Clone, Default)]
pub struct PredefinedRateFilter {
    /// Matches the region of the rate's trade lane.
    pub region: Option<String>,
    pub pol_id: Option<i64>,
    pub pod_id: Option<i64>,
    /// Case-insensitive substring of the service.
    pub service: Option<String>,
    pub equipment_type_id: Option<i64>,
    pub status: Option<String>,
}

// ============================================================================
// Bookings and jobs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequestData {
    pub booking_request_id: i64,
    pub customer_id: i64,
    pub rate_source: RateSource,
    #[serde(skip)]
    pub link: RateLink,
    pub predefined_rate_id: Option<i64>,
    pub rate_request_id: Option<i64>,
    pub raised_by_id: i64,
    pub status: BookingStatus,
    pub cancel_reason: Option<String>,
    pub confirmed_by_id: Option<i64>,
    pub confirmed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for raising a booking request. New bookings always start `PENDING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewBookingRequest {
    pub customer_id: i64,
    pub link: RateLink,
    pub raised_by_id: i64,
}

/// Filter for listing booking requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookingFilter {
    pub raised_by_id: Option<i64>,
    pub status: Option<BookingStatus>,
}

/// A release order document attached to a confirmed booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoDocumentData {
    pub ro_document_id: i64,
    pub booking_request_id: i64,
    pub number: String,
    pub file_url: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobData {
    pub job_id: i64,
    pub booking_request_id: i64,
    pub erp_job_no: String,
    pub opened_by_id: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCompletionData {
    pub completion_id: i64,
    pub job_id: i64,
    pub details: Value,
    pub completed_by_id: i64,
    pub created_at: String,
}

// ============================================================================
// Itineraries
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryData {
    pub itinerary_id: i64,
    pub owner_id: i64,
    #[serde(rename = "type")]
    pub itinerary_type: ItineraryType,
    pub week_start: String,
    pub status: ItineraryStatus,
    pub submitted_at: Option<String>,
    pub approver_id: Option<i64>,
    pub approve_note: Option<String>,
    pub decided_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Edits to a draft itinerary; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItineraryPatch {
    pub itinerary_type: Option<ItineraryType>,
    pub week_start: Option<String>,
}

/// Filter for listing itineraries.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItineraryFilter {
    /// Only itineraries owned by this user.
    pub owner_id: Option<i64>,
    /// Only itineraries owned by members of this SBU.
    pub sbu_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryItemData {
    pub item_id: i64,
    pub itinerary_id: i64,
    pub date: String,
    pub customer_id: Option<i64>,
    pub lead_id: Option<String>,
    pub purpose: String,
    pub planned_time: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewItineraryItem {
    pub date: String,
    pub customer_id: Option<i64>,
    pub lead_id: Option<String>,
    pub purpose: String,
    pub planned_time: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// Edits to an itinerary item; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItineraryItemPatch {
    pub date: Option<String>,
    pub customer_id: Option<i64>,
    pub lead_id: Option<String>,
    pub purpose: Option<String>,
    pub planned_time: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

// ============================================================================
// Activities
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityData {
    pub activity_id: i64,
    pub user_id: i64,
    pub customer_id: Option<i64>,
    pub lead_id: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub date: String,
    pub notes: Option<String>,
    pub outcome: Option<String>,
    pub next_action_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub user_id: i64,
    pub customer_id: Option<i64>,
    pub lead_id: Option<String>,
    pub activity_type: ActivityType,
    pub date: String,
    pub notes: Option<String>,
    pub outcome: Option<String>,
    pub next_action_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityPatch {
    pub customer_id: Option<i64>,
    pub lead_id: Option<String>,
    pub activity_type: Option<ActivityType>,
    pub date: Option<String>,
    pub notes: Option<String>,
    pub outcome: Option<String>,
    pub next_action_date: Option<String>,
}

// ============================================================================
// Notifications
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    pub notification_id: i64,
    pub user_id: i64,
    pub channel: NotificationChannel,
    pub subject: String,
    pub body: String,
    pub meta: Option<Value>,
    pub status: NotificationStatus,
    pub sent_at: Option<String>,
    pub read_at: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: i64,
    pub channel: NotificationChannel,
    pub subject: String,
    pub body: String,
    pub meta: Option<Value>,
}

// ============================================================================
// Audit, reports and admin
// ============================================================================

/// A persisted audit event, flattened for the audit log view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub event_id: i64,
    pub actor_user_id: Option<i64>,
    pub actor_type: String,
    pub cause_id: String,
    pub cause_description: String,
    pub action: String,
    pub action_details: Option<String>,
    pub before: String,
    pub after: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    pub created_at: String,
}

/// Filter for querying the audit log.
#[derive(Debug, Clone, Default)]
pub struct AuditLogFilter {
    pub actor_user_id: Option<i64>,
    pub entity_type: Option<String>,
    pub action: Option<String>,
    /// Inclusive lower bound in `YYYY-MM-DD HH:MM:SS` form.
    pub from: Option<String>,
    /// Inclusive upper bound in `YYYY-MM-DD HH:MM:SS` form.
    pub to: Option<String>,
}

/// A settled rate request used by the response-time report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledRateRequest {
    pub rate_request_id: i64,
    pub ref_no: String,
    pub status: RateRequestStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Row counts for the admin overview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemCounts {
    pub users: i64,
    pub customers: i64,
    pub rate_requests: i64,
    pub booking_requests: i64,
    pub itineraries: i64,
    pub activities: i64,
}
