// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::DomainError;

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::TransitionRejected {
        entity: "booking_request",
        action: "confirm",
        from: String::from("CANCELLED"),
        message: String::from("Booking request is not pending"),
    };
    assert_eq!(format!("{err}"), "Booking request is not pending");

    let err: DomainError = DomainError::NotOwner {
        message: String::from("You can only submit your own itineraries"),
    };
    assert_eq!(format!("{err}"), "You can only submit your own itineraries");

    let err: DomainError = DomainError::MissingVesselDetails {
        missing: vec![String::from("eta")],
    };
    assert_eq!(
        format!("{err}"),
        "Vessel details are required for this rate request"
    );

    let err: DomainError = DomainError::PalletDimensionsRequired;
    assert_eq!(
        format!("{err}"),
        "Pallet dimensions are required for Flat Rack/Open Top equipment"
    );

    let err: DomainError = DomainError::InvalidOtpFormat;
    assert_eq!(format!("{err}"), "Invalid OTP format");

    let err: DomainError = DomainError::InvalidStatus {
        entity: "itinerary",
        status: String::from("ARCHIVED"),
    };
    assert_eq!(format!("{err}"), "Invalid itinerary status: ARCHIVED");

    let err: DomainError = DomainError::InvalidDateRange {
        start_field: String::from("validFrom"),
        end_field: String::from("validTo"),
    };
    assert_eq!(format!("{err}"), "validFrom must not be after validTo");
}

#[test]
fn test_invalid_field_displays_message_verbatim() {
    let err: DomainError = DomainError::InvalidField {
        field: String::from("incoterm"),
        message: String::from("incoterm should not be empty"),
    };
    assert_eq!(err.to_string(), "incoterm should not be empty");
}
