// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Customer onboarding approval.

use crate::error::DomainError;
use crate::lifecycle::LifecycleStatus;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Customer approval states.
///
/// There is no re-approval path: once decided, the status is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerApprovalStatus {
    /// Awaiting an administrator's decision.
    Pending,
    /// Approved for trading; fields are frozen.
    Approved,
    /// Onboarding refused.
    Rejected,
}

impl CustomerApprovalStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Returns true if this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl LifecycleStatus for CustomerApprovalStatus {
    const ENTITY: &'static str = "customer";

    fn as_str(&self) -> &'static str {
        Self::as_str(self)
    }

    fn is_terminal(&self) -> bool {
        Self::is_terminal(self)
    }

    fn can_transition_to(&self, next: Self) -> bool {
        matches!(self, Self::Pending) && matches!(next, Self::Approved | Self::Rejected)
    }
}

impl FromStr for CustomerApprovalStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidStatus {
                entity: Self::ENTITY,
                status: s.to_string(),
            }),
        }
    }
}
