// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the Freight Desk back-office.
//!
//! Authentication, role checks, request validation, workflow orchestration
//! and notification dispatch live here. Every operation is a synchronous
//! function over a borrowed [`Persistence`](freight_desk_persistence::Persistence);
//! the HTTP server wraps them.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod auth;
mod capabilities;
mod error;
pub mod handlers;
mod notifications;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{
    ACCESS_TOKEN_KIND, AuthenticatedActor, AuthenticationService, IssuedTokens,
    REFRESH_TOKEN_KIND, Role, assert_role,
};
pub use capabilities::{
    ACTIVITY_AUTHORS, ADMINISTRATORS, BOOKING_MANAGERS, CUSTOMER_APPROVERS, CUSTOMER_EDITORS,
    ITINERARY_APPROVERS, ITINERARY_AUTHORS, JOB_OPERATORS, PREDEFINED_UPDATE_REQUESTERS,
    PRICING_TEAM, RATE_REQUEST_CREATORS, REPORT_VIEWERS, RO_DOCUMENT_UPLOADERS, SELF_SCOPED_ROLES,
    compute_capabilities,
};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error, translate_transition_error,
};
pub use notifications::{
    DeliveryJob, DeliveryQueue, LogTransport, Notice, NotificationTransport, OutboundMessage,
    PendingDelivery, TransportError, deliver, dispatch, log_dispatch_outcome, notify_role,
    notify_user, notify_users, prepare_delivery, recipients_for_role, record_delivery_outcome,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AddItineraryItemRequest, AddLineQuoteRequest, AddRoDocumentRequest, AuditLogQuery,
    BookingQuery, BookingRequestDetail, CancelBookingRequest, Capability, CompleteJobRequest,
    ConfirmBookingRequest, ConfirmOtpRequest, CreateActivityRequest, CreateBookingRequestRequest,
    CreateCustomerRequest, CreateItineraryRequest, CreatePredefinedRateRequest,
    CreateRateRequestRequest, CreateUserRequest, CustomerQuery, DashboardResponse,
    DecisionRequest, GlobalSearchResponse, ItineraryDetail, JobDetail, LoginRequest,
    LoginResponse, MarkAllReadResponse, MeResponse, MessageResponse, OpenJobRequest,
    PredefinedRateInfo, PredefinedRateQuery, ProcessedPercentageResponse, RateRequestDetail,
    RateRequestQuery, RateUpdateRequestedResponse, RefreshRequest, RefreshResponse,
    RejectRateRequestRequest, RequestOtpRequest, RespondToRateRequestRequest,
    ResponseTimeEntry, ResponseTimeReport, RoleCapabilities, SearchQuery, StatusCardsResponse,
    TopSalespersonEntry, UpdateActivityRequest, UpdateCustomerRequest, UpdateItineraryItemRequest,
    UpdateItineraryRequest,
};
