// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod booking;
mod customer;
mod error;
mod itinerary;
mod lifecycle;
mod notification;
mod predefined_rate;
mod rate_request;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use booking::{BookingStatus, RateLink, RateSource};
pub use customer::CustomerApprovalStatus;
pub use itinerary::{ItineraryStatus, ItineraryType};
pub use lifecycle::{Decision, LifecycleStatus};
pub use notification::{NotificationChannel, NotificationStatus};
pub use predefined_rate::{
    DEFAULT_PREDEFINED_RATE_STATUS, EXPIRING_WINDOW, ValidityStatus, validity_status,
};
pub use rate_request::{
    COLOMBO_HUB_UNLOCODE, CargoFigures, RateRequestStatus, ShipmentType, TransportMode,
    VesselDetails, generate_reference_number, processed_percentage, validate_cargo_figures,
    validate_pallet_dimensions, validate_vessel_details,
};

// Re-export public types
pub use error::DomainError;
pub use types::{ActivityType, UserStatus};
pub use validation::{
    OTP_LENGTH, format_business_date, normalize_business_date, parse_business_date,
    validate_date_range, validate_email, validate_otp_format, validate_required,
};
