// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use freight_desk_domain::Decision;

/// A command represents user or system intent as data only.
///
/// Commands are the only way to request a workflow status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Record a pricing response, moving the request into processing.
    RespondToRateRequest,
    /// Mark a rate request as completed.
    CompleteRateRequest,
    /// Decline a rate request.
    RejectRateRequest {
        /// Why pricing declined the request.
        remark: String,
    },
    /// Confirm a pending booking request.
    ConfirmBookingRequest,
    /// Cancel a booking request.
    CancelBookingRequest {
        /// Why the booking was cancelled.
        reason: String,
    },
    /// Submit a draft itinerary for approval.
    SubmitItinerary,
    /// Approve or reject a submitted itinerary.
    DecideItinerary {
        /// The approver's decision.
        decision: Decision,
        /// Optional note recorded with the decision.
        note: Option<String>,
    },
    /// Approve or reject a pending customer.
    DecideCustomer {
        /// The approver's decision.
        decision: Decision,
        /// Optional note recorded with the decision.
        note: Option<String>,
    },
}

impl Command {
    /// Returns the audit action name of the command.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::RespondToRateRequest => "RespondToRateRequest",
            Self::CompleteRateRequest => "CompleteRateRequest",
            Self::RejectRateRequest { .. } => "RejectRateRequest",
            Self::ConfirmBookingRequest => "ConfirmBookingRequest",
            Self::CancelBookingRequest { .. } => "CancelBookingRequest",
            Self::SubmitItinerary => "SubmitItinerary",
            Self::DecideItinerary {
                decision: Decision::Approve,
                ..
            } => "ApproveItinerary",
            Self::DecideItinerary {
                decision: Decision::Reject,
                ..
            } => "RejectItinerary",
            Self::DecideCustomer {
                decision: Decision::Approve,
                ..
            } => "ApproveCustomer",
            Self::DecideCustomer {
                decision: Decision::Reject,
                ..
            } => "RejectCustomer",
        }
    }
}
