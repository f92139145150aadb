// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use std::str::FromStr;

use freight_desk_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use freight_desk_domain::{DomainError, UserStatus};
use freight_desk_persistence::{
    Persistence, PersistenceError, SessionData, UserData, format_sql_timestamp,
    parse_sql_timestamp, verify_password,
};
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::error::AuthError;

/// Session kind for bearer tokens presented on every request.
pub const ACCESS_TOKEN_KIND: &str = "ACCESS";
/// Session kind for tokens that may only mint new access tokens.
pub const REFRESH_TOKEN_KIND: &str = "REFRESH";

/// User roles for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// System administrators; allowed everywhere.
    Admin,
    /// Head of a strategic business unit; approves itineraries.
    SbuHead,
    /// Salespeople raising rate and booking requests.
    Sales,
    /// Customer service executives handling release orders and jobs.
    Cse,
    /// Pricing team answering rate requests.
    Pricing,
    /// Management with read access to reports.
    Mgmt,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Self; 6] = [
        Self::Admin,
        Self::SbuHead,
        Self::Sales,
        Self::Cse,
        Self::Pricing,
        Self::Mgmt,
    ];

    /// Returns the stored form of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::SbuHead => "SBU_HEAD",
            Self::Sales => "SALES",
            Self::Cse => "CSE",
            Self::Pricing => "PRICING",
            Self::Mgmt => "MGMT",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| DomainError::InvalidValue {
                kind: "role",
                value: s.to_string(),
            })
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An authenticated user with a parsed role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The user's database ID.
    pub user_id: i64,
    /// The user's email.
    pub email: String,
    /// The role assigned to the user.
    pub role: Role,
    /// The user's strategic business unit, if any.
    pub sbu_id: Option<i64>,
}

impl AuthenticatedActor {
    /// Builds an actor from a stored user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` if the stored role is not recognized.
    pub fn from_user(user: &UserData) -> Result<Self, AuthError> {
        let role: Role = user
            .role
            .parse()
            .map_err(|_| AuthError::AuthenticationFailed {
                reason: format!("Invalid role: {}", user.role),
            })?;
        Ok(Self {
            user_id: user.user_id,
            email: user.email.clone(),
            role,
            sbu_id: user.sbu_id,
        })
    }

    /// Returns true if the actor holds one of `roles`.
    #[must_use]
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }

    /// Converts this actor into an audit actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.user_id, self.role.as_str().to_string())
    }
}

/// Rejects an actor whose role is not in `allowed`.
///
/// # Errors
///
/// Returns `AuthError::Unauthorized` naming the action and the allowed roles.
pub fn assert_role(
    actor: &AuthenticatedActor,
    allowed: &[Role],
    action: &str,
) -> Result<(), AuthError> {
    if actor.has_any_role(allowed) {
        return Ok(());
    }

    let required_role: String = allowed
        .iter()
        .map(Role::as_str)
        .collect::<Vec<&str>>()
        .join(" or ");
    warn!(
        user_id = actor.user_id,
        role = actor.role.as_str(),
        action,
        "Role check failed"
    );
    Err(AuthError::Unauthorized {
        action: action.to_string(),
        required_role,
    })
}

/// Tokens issued by a successful login.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    /// The access token presented as a bearer token.
    pub access_token: String,
    /// When the access token expires.
    pub access_expires_at: String,
    /// The refresh token.
    pub refresh_token: String,
    /// When the refresh token expires.
    pub refresh_expires_at: String,
    /// The user who logged in.
    pub user: UserData,
}

/// Authentication service for session management.
pub struct AuthenticationService;

impl AuthenticationService {
    const ACCESS_TOKEN_LIFETIME: Duration = Duration::hours(12);
    const REFRESH_TOKEN_LIFETIME: Duration = Duration::days(7);

    /// Authenticates a user by email and password and issues both tokens.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `email` - The login email (case-insensitive)
    /// * `password` - The plaintext password
    /// * `cause` - The cause recorded on the LOGIN audit event
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` with "Invalid credentials"
    /// for an unknown email or wrong password, or "Account is not active"
    /// for a deactivated account.
    pub fn login(
        persistence: &mut Persistence,
        email: &str,
        password: &str,
        cause: Cause,
    ) -> Result<IssuedTokens, AuthError> {
        let user: UserData = persistence
            .get_user_by_email(email)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(Self::invalid_credentials)?;

        let password_matches: bool =
            verify_password(password, &user.password_hash).map_err(Self::map_persistence_error)?;
        if !password_matches {
            warn!(user_id = user.user_id, "Login rejected: wrong password");
            return Err(Self::invalid_credentials());
        }

        if user.status != UserStatus::Active {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Account is not active"),
            });
        }

        let actor: AuthenticatedActor = AuthenticatedActor::from_user(&user)?;
        let now: OffsetDateTime = OffsetDateTime::now_utc();

        let access_token: String = Self::generate_session_token();
        let access_expires_at: String = Self::expiry(now, Self::ACCESS_TOKEN_LIFETIME)?;
        persistence
            .create_session(
                &access_token,
                user.user_id,
                ACCESS_TOKEN_KIND,
                &access_expires_at,
            )
            .map_err(Self::map_persistence_error)?;

        let refresh_token: String = Self::generate_session_token();
        let refresh_expires_at: String = Self::expiry(now, Self::REFRESH_TOKEN_LIFETIME)?;
        persistence
            .create_session(
                &refresh_token,
                user.user_id,
                REFRESH_TOKEN_KIND,
                &refresh_expires_at,
            )
            .map_err(Self::map_persistence_error)?;

        let event: AuditEvent = Self::session_event(&actor, cause, "LOGIN", "none", "active");
        persistence
            .record_login(user.user_id, &event)
            .map_err(Self::map_persistence_error)?;

        info!(user_id = user.user_id, role = actor.role.as_str(), "User logged in");

        Ok(IssuedTokens {
            access_token,
            access_expires_at,
            refresh_token,
            refresh_expires_at,
            user,
        })
    }

    /// Issues a new access token from a refresh token.
    ///
    /// # Returns
    ///
    /// The new access token and its expiry.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` with "Invalid refresh token"
    /// unless the token names a live refresh session of an active user.
    pub fn refresh(
        persistence: &mut Persistence,
        refresh_token: &str,
    ) -> Result<(String, String), AuthError> {
        let invalid = || AuthError::AuthenticationFailed {
            reason: String::from("Invalid refresh token"),
        };

        let session: SessionData = persistence
            .get_session_by_token(refresh_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(invalid)?;
        if session.token_kind != REFRESH_TOKEN_KIND {
            return Err(invalid());
        }

        let now: OffsetDateTime = OffsetDateTime::now_utc();
        if Self::is_expired(&session, now)? {
            persistence
                .delete_session(refresh_token)
                .map_err(Self::map_persistence_error)?;
            return Err(invalid());
        }

        let user: UserData = persistence
            .get_user_by_id(session.user_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(invalid)?;
        if user.status != UserStatus::Active {
            return Err(invalid());
        }

        let access_token: String = Self::generate_session_token();
        let access_expires_at: String = Self::expiry(now, Self::ACCESS_TOKEN_LIFETIME)?;
        persistence
            .create_session(
                &access_token,
                user.user_id,
                ACCESS_TOKEN_KIND,
                &access_expires_at,
            )
            .map_err(Self::map_persistence_error)?;

        debug!(user_id = user.user_id, "Issued access token from refresh token");
        Ok((access_token, access_expires_at))
    }

    /// Validates a bearer access token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` if the token is unknown,
    /// is not an access token, has expired, or belongs to a missing or
    /// inactive user.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<(AuthenticatedActor, UserData), AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .filter(|session| session.token_kind == ACCESS_TOKEN_KIND)
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        if Self::is_expired(&session, OffsetDateTime::now_utc())? {
            persistence
                .delete_session(session_token)
                .map_err(Self::map_persistence_error)?;
            warn!(user_id = session.user_id, "Rejected expired session");
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let user: UserData = persistence
            .get_user_by_id(session.user_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("User not found"),
            })?;

        if user.status != UserStatus::Active {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Account is not active"),
            });
        }

        let actor: AuthenticatedActor = AuthenticatedActor::from_user(&user)?;

        persistence
            .touch_session(session.session_id)
            .map_err(Self::map_persistence_error)?;

        Ok((actor, user))
    }

    /// Revokes every session of the actor and records a LOGOUT audit event.
    ///
    /// # Returns
    ///
    /// The number of sessions revoked.
    ///
    /// # Errors
    ///
    /// Returns an error if the sessions cannot be deleted.
    pub fn logout(
        persistence: &mut Persistence,
        actor: &AuthenticatedActor,
        cause: Cause,
    ) -> Result<usize, AuthError> {
        let event: AuditEvent = Self::session_event(actor, cause, "LOGOUT", "active", "none");
        persistence
            .record_logout(actor.user_id, &event)
            .map_err(Self::map_persistence_error)
    }

    fn session_event(
        actor: &AuthenticatedActor,
        cause: Cause,
        action: &str,
        before: &str,
        after: &str,
    ) -> AuditEvent {
        AuditEvent::new_global(
            actor.to_audit_actor(),
            cause,
            Action::new(action.to_string(), Some(actor.email.clone())),
            StateSnapshot::new(format!("session={before}")),
            StateSnapshot::new(format!("session={after}")),
        )
    }

    fn is_expired(session: &SessionData, now: OffsetDateTime) -> Result<bool, AuthError> {
        let expires_at: OffsetDateTime =
            parse_sql_timestamp(&session.expires_at).map_err(Self::map_persistence_error)?;
        Ok(now > expires_at)
    }

    fn expiry(now: OffsetDateTime, lifetime: Duration) -> Result<String, AuthError> {
        format_sql_timestamp(now + lifetime).map_err(Self::map_persistence_error)
    }

    fn invalid_credentials() -> AuthError {
        AuthError::AuthenticationFailed {
            reason: String::from("Invalid credentials"),
        }
    }

    /// Generates a random 256-bit session token rendered as hex.
    fn generate_session_token() -> String {
        let parts: [u64; 4] = [
            rand::random::<u64>(),
            rand::random::<u64>(),
            rand::random::<u64>(),
            rand::random::<u64>(),
        ];
        parts.iter().map(|part| format!("{part:016x}")).collect()
    }

    fn map_persistence_error(err: PersistenceError) -> AuthError {
        AuthError::AuthenticationFailed {
            reason: format!("Database error: {err}"),
        }
    }
}
