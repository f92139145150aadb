// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Small value types shared by the back-office records.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of a logged sales activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Visit,
    Call,
    Email,
    Meeting,
}

impl ActivityType {
    /// Returns the string representation of the activity type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Visit => "VISIT",
            Self::Call => "CALL",
            Self::Email => "EMAIL",
            Self::Meeting => "MEETING",
        }
    }
}

impl FromStr for ActivityType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VISIT" => Ok(Self::Visit),
            "CALL" => Ok(Self::Call),
            "EMAIL" => Ok(Self::Email),
            "MEETING" => Ok(Self::Meeting),
            _ => Err(DomainError::InvalidValue {
                kind: "activity type",
                value: s.to_string(),
            }),
        }
    }
}

/// Account state of a back-office user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    /// May sign in.
    Active,
    /// Sign-in refused.
    Inactive,
}

impl UserStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }
}

impl FromStr for UserStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            _ => Err(DomainError::InvalidStatus {
                entity: "user",
                status: s.to_string(),
            }),
        }
    }
}
