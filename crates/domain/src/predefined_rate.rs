// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Validity classification for predefined lane rates.

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

/// How far ahead of expiry a rate is flagged as expiring.
pub const EXPIRING_WINDOW: Duration = Duration::days(7);

/// Status a predefined rate gets when none is supplied.
pub const DEFAULT_PREDEFINED_RATE_STATUS: &str = "ACTIVE";

/// Validity of a predefined rate relative to now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidityStatus {
    /// More than a week of validity left.
    Active,
    /// Expires within the next week.
    Expiring,
    /// Already expired.
    Expired,
}

impl ValidityStatus {
    /// Returns the string representation of the validity status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expiring => "expiring",
            Self::Expired => "expired",
        }
    }
}

/// Classifies a rate's validity.
///
/// # Arguments
///
/// * `valid_to` - The end of the rate's validity
/// * `now` - The reference time
#[must_use]
pub fn validity_status(valid_to: OffsetDateTime, now: OffsetDateTime) -> ValidityStatus {
    if valid_to < now {
        ValidityStatus::Expired
    } else if valid_to < now + EXPIRING_WINDOW {
        ValidityStatus::Expiring
    } else {
        ValidityStatus::Active
    }
}
