// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rate request lifecycle and the rules applied to its cargo attributes.
//!
//! A rate request moves `PENDING -> PROCESSING -> COMPLETED`, and may be
//! rejected from either `PENDING` or `PROCESSING`. `COMPLETED` and
//! `REJECTED` are terminal.

use crate::error::DomainError;
use crate::lifecycle::LifecycleStatus;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Port used as the origin of sea requests that do not name one.
pub const COLOMBO_HUB_UNLOCODE: &str = "LKCMB";

/// Percentage credited for each response quoted on the preferred line.
const PERCENT_PER_MATCHING_RESPONSE: u32 = 20;

/// Rate request status states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateRequestStatus {
    /// Awaiting a response from the pricing team.
    Pending,
    /// At least one response has been recorded.
    Processing,
    /// Pricing has finished working the request.
    Completed,
    /// Pricing declined the request.
    Rejected,
}

impl RateRequestStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Completed => "COMPLETED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Returns true if this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "PROCESSING" => Ok(Self::Processing),
            "COMPLETED" => Ok(Self::Completed),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidStatus {
                entity: Self::ENTITY,
                status: s.to_string(),
            }),
        }
    }
}

impl LifecycleStatus for RateRequestStatus {
    const ENTITY: &'static str = "rate_request";

    fn as_str(&self) -> &'static str {
        Self::as_str(self)
    }

    fn is_terminal(&self) -> bool {
        Self::is_terminal(self)
    }

    fn can_transition_to(&self, next: Self) -> bool {
        match self {
            Self::Pending => matches!(next, Self::Processing | Self::Rejected),
            Self::Processing => matches!(next, Self::Completed | Self::Rejected),
            Self::Completed | Self::Rejected => false,
        }
    }
}

impl FromStr for RateRequestStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// Transport mode of a rate request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportMode {
    /// Ocean freight.
    Sea,
    /// Air freight.
    Air,
}

impl TransportMode {
    /// Returns the string representation of the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sea => "SEA",
            Self::Air => "AIR",
        }
    }
}

impl FromStr for TransportMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SEA" => Ok(Self::Sea),
            "AIR" => Ok(Self::Air),
            _ => Err(DomainError::InvalidValue {
                kind: "mode",
                value: s.to_string(),
            }),
        }
    }
}

/// Container load type of a rate request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentType {
    /// Full container load.
    Fcl,
    /// Less than container load.
    Lcl,
}

impl ShipmentType {
    /// Returns the string representation of the shipment type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fcl => "FCL",
            Self::Lcl => "LCL",
        }
    }
}

impl FromStr for ShipmentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FCL" => Ok(Self::Fcl),
            "LCL" => Ok(Self::Lcl),
            _ => Err(DomainError::InvalidValue {
                kind: "type",
                value: s.to_string(),
            }),
        }
    }
}

/// Cargo figures supplied with a new rate request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CargoFigures {
    /// Gross weight in metric tons.
    pub weight_tons: f64,
    /// Reefer set point in degrees Celsius.
    pub reefer_temp: Option<f64>,
    /// Number of pallets.
    pub pallet_count: Option<i32>,
    /// The customer's indicated market rate.
    pub market_rate: Option<f64>,
}

/// Validates the numeric cargo attributes of a rate request.
///
/// # Errors
///
/// Returns `DomainError::InvalidField` if:
/// - the weight is below 0.1 tons
/// - the reefer temperature is outside -30..=30
/// - the pallet count is below 1
/// - the market rate is negative
pub fn validate_cargo_figures(cargo: &CargoFigures) -> Result<(), DomainError> {
    if !cargo.weight_tons.is_finite() || cargo.weight_tons < 0.1 {
        return Err(DomainError::InvalidField {
            field: String::from("weightTons"),
            message: String::from("weightTons must not be less than 0.1"),
        });
    }

    if let Some(temp) = cargo.reefer_temp
        && !(-30.0..=30.0).contains(&temp)
    {
        return Err(DomainError::InvalidField {
            field: String::from("reeferTemp"),
            message: String::from("reeferTemp must be between -30 and 30"),
        });
    }

    if let Some(count) = cargo.pallet_count
        && count < 1
    {
        return Err(DomainError::InvalidField {
            field: String::from("palletCount"),
            message: String::from("palletCount must not be less than 1"),
        });
    }

    if let Some(rate) = cargo.market_rate
        && (!rate.is_finite() || rate < 0.0)
    {
        return Err(DomainError::InvalidField {
            field: String::from("marketRate"),
            message: String::from("marketRate must not be less than 0"),
        });
    }

    Ok(())
}

/// Rejects a request for equipment that needs pallet dimensions when none were given.
///
/// # Errors
///
/// Returns `DomainError::PalletDimensionsRequired` when `requires_dimensions`
/// is set and `pallet_dims` is absent or blank.
pub fn validate_pallet_dimensions(
    requires_dimensions: bool,
    pallet_dims: Option<&str>,
) -> Result<(), DomainError> {
    let has_dims: bool = pallet_dims.is_some_and(|d| !d.trim().is_empty());
    if requires_dimensions && !has_dims {
        return Err(DomainError::PalletDimensionsRequired);
    }
    Ok(())
}

/// Vessel schedule fields supplied with a pricing response.
#[derive(Debug, Clone, Copy, Default)]
pub struct VesselDetails<'a> {
    pub vessel_name: Option<&'a str>,
    pub eta: Option<&'a str>,
    pub etd: Option<&'a str>,
}

/// Checks that a response carries vessel details when the request demands them.
///
/// # Errors
///
/// Returns `DomainError::MissingVesselDetails` listing every absent field.
pub fn validate_vessel_details(
    vessel_required: bool,
    details: &VesselDetails<'_>,
) -> Result<(), DomainError> {
    if !vessel_required {
        return Ok(());
    }

    let missing: Vec<String> = [
        ("vesselName", details.vessel_name),
        ("eta", details.eta),
        ("etd", details.etd),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_none_or(|v| v.trim().is_empty()))
    .map(|(field, _)| field.to_string())
    .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DomainError::MissingVesselDetails { missing })
    }
}

/// Generates the human-readable reference number for a new rate request.
///
/// The reference is `RR` followed by the last eight digits of the creation
/// time in Unix milliseconds.
#[must_use]
pub fn generate_reference_number(created_at: OffsetDateTime) -> String {
    let millis: i128 = created_at.unix_timestamp_nanos() / 1_000_000;
    format!("RR{:08}", millis.rem_euclid(100_000_000))
}

/// Computes the readiness heuristic for a rate request.
///
/// Each response quoted against the preferred line adds 20%, capped at 100.
/// Requests without a preferred line always report 0.
///
/// # Arguments
///
/// * `preferred_line_id` - The request's preferred shipping line
/// * `response_line_ids` - The requested line of every recorded response
#[must_use]
pub fn processed_percentage(
    preferred_line_id: Option<i64>,
    response_line_ids: &[Option<i64>],
) -> u32 {
    let Some(preferred) = preferred_line_id else {
        return 0;
    };

    let matching: u32 = response_line_ids
        .iter()
        .filter(|line| **line == Some(preferred))
        .fold(0_u32, |acc, _| acc.saturating_add(1));

    matching
        .saturating_mul(PERCENT_PER_MATCHING_RESPONSE)
        .min(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_status_string_round_trip() {
        for status in [
            RateRequestStatus::Pending,
            RateRequestStatus::Processing,
            RateRequestStatus::Completed,
            RateRequestStatus::Rejected,
        ] {
            let s: &str = status.as_str();
            match RateRequestStatus::parse_str(s) {
                Ok(parsed) => assert_eq!(status, parsed),
                Err(e) => panic!("Failed to parse status string: {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_lifecycle_edges() {
        use RateRequestStatus::{Completed, Pending, Processing, Rejected};

        assert!(Pending.validate_transition(Processing).is_ok());
        assert!(Pending.validate_transition(Rejected).is_ok());
        assert!(Processing.validate_transition(Completed).is_ok());
        assert!(Processing.validate_transition(Rejected).is_ok());

        assert!(Pending.validate_transition(Completed).is_err());
        assert!(Completed.validate_transition(Rejected).is_err());
        assert!(Rejected.validate_transition(Processing).is_err());
    }

    #[test]
    fn test_processed_percentage_counts_matching_responses() {
        let responses: Vec<Option<i64>> = vec![Some(7), Some(7), Some(3), Some(7), None];
        assert_eq!(processed_percentage(Some(7), &responses), 60);
    }

    #[test]
    fn test_processed_percentage_without_preferred_line() {
        let responses: Vec<Option<i64>> = vec![Some(7), Some(7)];
        assert_eq!(processed_percentage(None, &responses), 0);
    }

    #[test]
    fn test_processed_percentage_is_capped() {
        let responses: Vec<Option<i64>> = vec![Some(1); 9];
        assert_eq!(processed_percentage(Some(1), &responses), 100);
    }

    #[test]
    fn test_reference_number_uses_last_eight_digits() {
        let at: OffsetDateTime = datetime!(2024-02-01 10:00:00.123 UTC);
        let reference: String = generate_reference_number(at);

        assert_eq!(reference.len(), 10);
        assert!(reference.starts_with("RR"));
        let millis: i128 = at.unix_timestamp_nanos() / 1_000_000;
        assert!(millis.to_string().ends_with(&reference[2..]));
    }

    #[test]
    fn test_vessel_details_reports_each_missing_field() {
        let details: VesselDetails<'_> = VesselDetails {
            vessel_name: Some("MSC LORETO"),
            eta: None,
            etd: Some(" "),
        };

        match validate_vessel_details(true, &details) {
            Err(DomainError::MissingVesselDetails { missing }) => {
                assert_eq!(missing, vec![String::from("eta"), String::from("etd")]);
            }
            other => panic!("Expected MissingVesselDetails, got {other:?}"),
        }
        assert!(validate_vessel_details(false, &details).is_ok());
    }

    #[test]
    fn test_pallet_dimensions_required_for_special_equipment() {
        assert_eq!(
            validate_pallet_dimensions(true, None),
            Err(DomainError::PalletDimensionsRequired)
        );
        assert!(validate_pallet_dimensions(true, Some("120x80x144 cm")).is_ok());
        assert!(validate_pallet_dimensions(false, None).is_ok());
    }

    #[test]
    fn test_cargo_figures_bounds() {
        let mut cargo: CargoFigures = CargoFigures {
            weight_tons: 15.5,
            reefer_temp: Some(-18.0),
            pallet_count: Some(20),
            market_rate: Some(2500.0),
        };
        assert!(validate_cargo_figures(&cargo).is_ok());

        cargo.reefer_temp = Some(-31.0);
        assert!(validate_cargo_figures(&cargo).is_err());

        cargo.reefer_temp = None;
        cargo.weight_tons = 0.05;
        assert!(validate_cargo_figures(&cargo).is_err());
    }
}
