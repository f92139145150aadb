// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Field names are camelCase on the wire.

use std::collections::BTreeMap;

use freight_desk_domain::{
    ActivityType, BookingStatus, ItineraryType, RateRequestStatus, RateSource, ShipmentType,
    TransportMode, ValidityStatus,
};
use freight_desk_persistence::{
    ActivityData, BookingRequestData, CustomerData, ItineraryData, ItineraryItemData,
    JobCompletionData, JobData, LineQuoteData, NotificationData, PortData, PredefinedRateData,
    RateRequestData, RateResponseData, RoDocumentData, UserData,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ========================================================================
// Authentication & Users
// ========================================================================

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_at: String,
    pub refresh_token: String,
    pub refresh_expires_at: String,
    pub user: UserData,
}

/// API request to mint a new access token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// API response carrying a fresh access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    pub expires_at: String,
}

/// API request to start a password reset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOtpRequest {
    pub email: String,
}

/// API request to finish a password reset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmOtpRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

/// A plain acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// API response for `/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user: UserData,
    pub capabilities: RoleCapabilities,
}

/// API request to create a user (admin only).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: String,
    pub password: String,
    pub sbu_id: Option<i64>,
}

// ========================================================================
// Capability Model
// ========================================================================

/// Represents whether a specific action is permitted.
///
/// Serializes to JSON as true/false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The action is permitted.
    Allowed,
    /// The action is not permitted.
    Denied,
}

impl Capability {
    /// Returns true if the capability is allowed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Creates a capability from a boolean value.
    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        if value { Self::Allowed } else { Self::Denied }
    }
}

impl Serialize for Capability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bool(self.is_allowed())
    }
}

impl<'de> Deserialize<'de> for Capability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let b = bool::deserialize(deserializer)?;
        Ok(Self::from_bool(b))
    }
}

/// What a role may do, for UI gating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleCapabilities {
    pub can_create_rate_request: Capability,
    pub can_respond_to_rate_request: Capability,
    pub can_manage_predefined_rates: Capability,
    pub can_request_rate_update: Capability,
    pub can_manage_bookings: Capability,
    pub can_add_ro_document: Capability,
    pub can_operate_jobs: Capability,
    pub can_author_itineraries: Capability,
    pub can_approve_itineraries: Capability,
    pub can_edit_customers: Capability,
    pub can_approve_customers: Capability,
    pub can_log_activities: Capability,
    pub can_view_reports: Capability,
    pub can_administer: Capability,
}

// ========================================================================
// Rate Requests
// ========================================================================

/// API request to raise a rate request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRateRequestRequest {
    pub customer_id: i64,
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
    #[serde(default)]
    pub vessel_required: bool,
    pub detention_free_time: Option<String>,
}

/// Query parameters for listing rate requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRequestQuery {
    pub mine: Option<bool>,
    pub status: Option<RateRequestStatus>,
}

/// A rate request with its related records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRequestDetail {
    #[serde(flatten)]
    pub request: RateRequestData,
    pub pol: Option<PortData>,
    pub pod: Option<PortData>,
    pub customer: Option<CustomerData>,
    pub salesperson: Option<UserData>,
    pub responses: Vec<RateResponseData>,
    pub line_quotes: Vec<LineQuoteData>,
}

/// API request to record a pricing response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondToRateRequestRequest {
    #[serde(default = "default_line_no")]
    pub line_no: i32,
    pub requested_line_id: Option<i64>,
    pub requested_equipment_type_id: Option<i64>,
    pub vessel_name: Option<String>,
    pub eta: Option<String>,
    pub etd: Option<String>,
    pub fcl_cutoff: Option<String>,
    pub doc_cutoff: Option<String>,
    pub valid_to: String,
    #[serde(default)]
    pub charges: Value,
}

const fn default_line_no() -> i32 {
    1
}

/// API request to add a shipping line quote.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLineQuoteRequest {
    pub shipping_line_id: i64,
    pub equipment_type_id: Option<i64>,
    #[serde(default)]
    pub terms: Value,
    pub valid_to: String,
    #[serde(default)]
    pub selected: bool,
}

/// API request to reject a rate request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectRateRequestRequest {
    pub remark: String,
}

/// API response for the readiness heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedPercentageResponse {
    pub rate_request_id: i64,
    pub percentage: u32,
}

// ========================================================================
// Predefined Rates
// ========================================================================

/// API request to publish a predefined rate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePredefinedRateRequest {
    pub trade_lane_id: i64,
    pub pol_id: i64,
    pub pod_id: i64,
    pub service: String,
    pub equipment_type_id: i64,
    #[serde(default)]
    pub is_lcl: bool,
    pub valid_from: String,
    pub valid_to: String,
    pub notes: Option<String>,
    pub status: Option<String>,
}

/// Query parameters for listing predefined rates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PredefinedRateQuery {
    pub region: Option<String>,
    pub pol: Option<i64>,
    pub pod: Option<i64>,
    pub service: Option<String>,
    pub equip: Option<i64>,
    pub status: Option<String>,
}

/// A predefined rate with its computed validity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredefinedRateInfo {
    #[serde(flatten)]
    pub rate: PredefinedRateData,
    pub validity_status: ValidityStatus,
}

/// API response for an update request fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateUpdateRequestedResponse {
    pub predefined_rate_id: i64,
    pub notified: usize,
}

// ========================================================================
// Booking Requests & Jobs
// ========================================================================

/// API request to raise a booking request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequestRequest {
    pub customer_id: i64,
    pub rate_source: RateSource,
    pub link_id: i64,
}

/// Query parameters for listing booking requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuery {
    pub status: Option<BookingStatus>,
    pub mine: Option<bool>,
}

/// API request to confirm a booking request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmBookingRequest {
    #[serde(default)]
    pub override_validity: bool,
}

/// API request to cancel a booking request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingRequest {
    pub reason: String,
}

/// API request to attach a release order document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRoDocumentRequest {
    pub number: String,
    pub file_url: Option<String>,
}

/// API request to open an ERP job.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenJobRequest {
    pub erp_job_no: String,
}

/// API request to record a job completion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteJobRequest {
    #[serde(default)]
    pub details: Value,
}

/// An ERP job with its completion records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: JobData,
    pub completions: Vec<JobCompletionData>,
}

/// A booking request with its related records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequestDetail {
    #[serde(flatten)]
    pub booking: BookingRequestData,
    pub customer: Option<CustomerData>,
    pub raised_by: Option<UserData>,
    pub ro_documents: Vec<RoDocumentData>,
    pub jobs: Vec<JobDetail>,
}

// ========================================================================
// Itineraries
// ========================================================================

/// API request to start an itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItineraryRequest {
    #[serde(rename = "type")]
    pub itinerary_type: ItineraryType,
    pub week_start: String,
}

/// API request to edit a draft itinerary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItineraryRequest {
    #[serde(rename = "type")]
    pub itinerary_type: Option<ItineraryType>,
    pub week_start: Option<String>,
}

/// API request carrying an approval decision.
///
/// Used for both itineraries and customers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    pub approved: bool,
    pub note: Option<String>,
}

/// API request to add a planned visit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItineraryItemRequest {
    pub date: String,
    pub customer_id: Option<i64>,
    pub lead_id: Option<String>,
    pub purpose: String,
    pub planned_time: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// API request to edit a planned visit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItineraryItemRequest {
    pub date: Option<String>,
    pub customer_id: Option<i64>,
    pub lead_id: Option<String>,
    pub purpose: Option<String>,
    pub planned_time: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// An itinerary with its owner, approver and items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDetail {
    #[serde(flatten)]
    pub itinerary: ItineraryData,
    pub owner: Option<UserData>,
    pub approver: Option<UserData>,
    pub items: Vec<ItineraryItemData>,
}

// ========================================================================
// Customers
// ========================================================================

/// API request to register a customer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    pub company_name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// API request to edit a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    pub company_name: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Query parameters for listing customers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerQuery {
    pub include_pending: Option<bool>,
}

/// Query parameters for text searches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

// ========================================================================
// Activities
// ========================================================================

/// API request to log a sales activity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    pub customer_id: Option<i64>,
    pub lead_id: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub date: String,
    pub notes: Option<String>,
    pub outcome: Option<String>,
    pub next_action_date: Option<String>,
}

/// API request to edit a sales activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivityRequest {
    pub customer_id: Option<i64>,
    pub lead_id: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: Option<ActivityType>,
    pub date: Option<String>,
    pub notes: Option<String>,
    pub outcome: Option<String>,
    pub next_action_date: Option<String>,
}

// ========================================================================
// Notifications, Dashboard & Reports
// ========================================================================

/// API response for marking every notification read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkAllReadResponse {
    pub marked: usize,
}

/// Per-role landing page summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub rate_requests: i64,
    pub booking_requests: i64,
    pub itineraries: i64,
    pub recent_activities: Vec<ActivityData>,
    pub recent_notifications: Vec<NotificationData>,
}

/// Turnaround of one settled rate request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseTimeEntry {
    pub rate_request_id: i64,
    pub ref_no: String,
    pub status: RateRequestStatus,
    pub hours: f64,
}

/// Pricing turnaround over the report window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseTimeReport {
    pub items: Vec<ResponseTimeEntry>,
    pub average_hours: f64,
}

/// One row of the top salespeople ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSalespersonEntry {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub rate_requests: i64,
}

/// Per-status counts for a report card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCardsResponse {
    pub counts: BTreeMap<String, i64>,
    pub total: i64,
}

// ========================================================================
// Admin
// ========================================================================

/// Query parameters for the audit log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogQuery {
    pub actor_user_id: Option<i64>,
    pub entity_type: Option<String>,
    pub action: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Results of the admin global search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSearchResponse {
    pub users: Vec<UserData>,
    pub customers: Vec<CustomerData>,
    pub rate_requests: Vec<RateRequestData>,
}
