// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use freight_desk::CoreError;
use freight_desk_domain::DomainError;
use freight_desk_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The roles allowed to perform the action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => write!(f, "{reason}"),
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Insufficient permissions: '{action}' requires {required_role}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
/// `Display` renders the message shown to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed (401).
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The actor's role does not permit the action (403).
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The roles allowed to perform the action.
        required_role: String,
    },
    /// The record's state or ownership forbids the action (403).
    Forbidden {
        /// A human-readable description of the refusal.
        message: String,
    },
    /// Invalid input was provided (400).
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found (404).
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// Password policy violation (400).
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
    /// An internal error occurred (500).
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Builds a `ResourceNotFound` error.
    #[must_use]
    pub fn not_found(resource_type: &str, message: &str) -> Self {
        Self::ResourceNotFound {
            resource_type: resource_type.to_string(),
            message: message.to_string(),
        }
    }

    /// Builds an `InvalidInput` error.
    #[must_use]
    pub fn invalid_input(field: &str, message: &str) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => write!(f, "{reason}"),
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Insufficient permissions: '{action}' requires {required_role}")
            }
            Self::Forbidden { message }
            | Self::InvalidInput { message, .. }
            | Self::ResourceNotFound { message, .. }
            | Self::PasswordPolicyViolation { message } => write!(f, "{message}"),
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        translate_domain_error(err)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        translate_core_error(err)
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidField { field, message } => ApiError::InvalidInput { field, message },
        DomainError::InvalidStatus { entity, .. } => ApiError::InvalidInput {
            field: format!("{entity}.status"),
            message,
        },
        DomainError::InvalidValue { kind, .. } => ApiError::InvalidInput {
            field: kind.to_string(),
            message,
        },
        DomainError::InvalidStatusTransition { .. } => ApiError::Forbidden { message },
        DomainError::TransitionRejected { message, .. } | DomainError::NotOwner { message } => {
            ApiError::Forbidden { message }
        }
        DomainError::MissingVesselDetails { .. } => ApiError::InvalidInput {
            field: String::from("vesselName"),
            message,
        },
        DomainError::PalletDimensionsRequired => ApiError::InvalidInput {
            field: String::from("palletDims"),
            message,
        },
        DomainError::RateValidityExpired { .. } => ApiError::InvalidInput {
            field: String::from("overrideValidity"),
            message,
        },
        DomainError::InvalidOtpFormat => ApiError::InvalidInput {
            field: String::from("otp"),
            message,
        },
        DomainError::DateParseError { .. } | DomainError::DateArithmeticOverflow { .. } => {
            ApiError::InvalidInput {
                field: String::from("date"),
                message,
            }
        }
        DomainError::InvalidDateRange { start_field, .. } => ApiError::InvalidInput {
            field: start_field,
            message,
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::CommandNotApplicable { .. } => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// `StaleTransition` carries no caller-facing message of its own; handlers
/// that persist a transition use [`translate_transition_error`] instead.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::StaleState { message, .. } | PersistenceError::Referenced(message) => {
            ApiError::Forbidden { message }
        }
        PersistenceError::StaleTransition { entity, entity_id } => ApiError::Forbidden {
            message: format!("The {entity} {entity_id} was changed by another request"),
        },
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message,
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}

/// Translates the failure of a persisted transition.
///
/// A stale conditional update means another request moved the record first;
/// the caller sees the same message as if it had loaded the newer state.
#[must_use]
pub fn translate_transition_error(err: PersistenceError, rejection: &str) -> ApiError {
    match err {
        PersistenceError::StaleTransition { .. } => ApiError::Forbidden {
            message: rejection.to_string(),
        },
        other => translate_persistence_error(other),
    }
}
