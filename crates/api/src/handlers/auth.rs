// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Login, token refresh, logout, profile and password reset by one-time code.

use freight_desk_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot, Subject};
use freight_desk_domain::{NotificationChannel, validate_otp_format};
use freight_desk_persistence::{
    OtpData, Persistence, PersistenceError, UserData, format_sql_timestamp, verify_password,
};
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};

use crate::auth::{AuthenticatedActor, AuthenticationService, IssuedTokens};
use crate::capabilities::compute_capabilities;
use crate::error::ApiError;
use crate::notifications::{DeliveryJob, DeliveryQueue, OutboundMessage};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    ConfirmOtpRequest, LoginRequest, LoginResponse, MeResponse, MessageResponse, RefreshRequest,
    RefreshResponse, RequestOtpRequest,
};

const OTP_LIFETIME: Duration = Duration::minutes(10);
const OTP_SUBJECT: &str = "Password Reset Code";

fn invalid_otp() -> ApiError {
    ApiError::invalid_input("otp", "Invalid or expired OTP")
}

/// Logs a user in and issues an access and a refresh token.
///
/// # Errors
///
/// Returns `AuthenticationFailed` ("Invalid credentials" or "Account is
/// not active").
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
    cause: Cause,
) -> Result<LoginResponse, ApiError> {
    let issued: IssuedTokens =
        AuthenticationService::login(persistence, &request.email, &request.password, cause)?;
    Ok(LoginResponse {
        access_token: issued.access_token,
        expires_at: issued.access_expires_at,
        refresh_token: issued.refresh_token,
        refresh_expires_at: issued.refresh_expires_at,
        user: issued.user,
    })
}

/// Mints a new access token from a refresh token.
///
/// # Errors
///
/// Returns `AuthenticationFailed` ("Invalid refresh token").
pub fn refresh(
    persistence: &mut Persistence,
    request: &RefreshRequest,
) -> Result<RefreshResponse, ApiError> {
    let (access_token, expires_at) =
        AuthenticationService::refresh(persistence, &request.refresh_token)?;
    Ok(RefreshResponse {
        access_token,
        expires_at,
    })
}

/// Revokes every session of the actor.
///
/// # Errors
///
/// Returns an error if the sessions cannot be deleted.
pub fn logout(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<MessageResponse, ApiError> {
    let revoked: usize = AuthenticationService::logout(persistence, actor, cause)?;
    info!(user_id = actor.user_id, revoked, "User logged out");
    Ok(MessageResponse::new("Logged out"))
}

/// Returns the actor's profile and role capabilities.
#[must_use]
pub fn me(actor: &AuthenticatedActor, user: UserData) -> MeResponse {
    MeResponse {
        user,
        capabilities: compute_capabilities(actor.role),
    }
}

/// Issues a six-digit reset code by email, and by SMS when the user has a
/// phone number.
///
/// Earlier codes for the user stop working. The code itself is only ever
/// stored as a bcrypt hash.
///
/// # Errors
///
/// Returns `AuthenticationFailed` ("User not found") for an unknown email.
pub fn request_otp(
    persistence: &mut Persistence,
    queue: &dyn DeliveryQueue,
    request: &RequestOtpRequest,
) -> Result<MessageResponse, ApiError> {
    let user: UserData = persistence
        .get_user_by_email(&request.email)?
        .ok_or_else(|| ApiError::AuthenticationFailed {
            reason: String::from("User not found"),
        })?;

    let code: String = format!("{:06}", rand::random_range(100_000..1_000_000_u32));
    let expires_at: String = format_sql_timestamp(OffsetDateTime::now_utc() + OTP_LIFETIME)?;
    persistence.replace_otp(user.user_id, &persistence.hash_secret(&code)?, &expires_at)?;

    let body: String = format!("Your password reset code is {code}. It expires in 10 minutes.");
    queue.enqueue(DeliveryJob::Direct(OutboundMessage {
        channel: NotificationChannel::Email,
        address: user.email.clone(),
        subject: OTP_SUBJECT.to_string(),
        body: body.clone(),
    }));
    if let Some(phone) = user.phone.as_deref().filter(|p| !p.trim().is_empty()) {
        queue.enqueue(DeliveryJob::Direct(OutboundMessage {
            channel: NotificationChannel::Sms,
            address: phone.to_string(),
            subject: OTP_SUBJECT.to_string(),
            body,
        }));
    }

    info!(user_id = user.user_id, "Password reset code issued");
    Ok(MessageResponse::new("OTP sent"))
}

/// Finds the live code matching `otp`, if any.
fn matching_otp(
    persistence: &mut Persistence,
    user_id: i64,
    otp: &str,
) -> Result<Option<OtpData>, ApiError> {
    for candidate in persistence.live_otps_for_user(user_id)? {
        if verify_password(otp, &candidate.otp_hash)? {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

/// Sets a new password using a reset code.
///
/// On success the code is consumed, every session of the user is revoked
/// and a `PASSWORD_RESET` audit event is written, all in one transaction.
///
/// # Errors
///
/// Returns `InvalidInput` for a malformed code ("Invalid OTP format"), a
/// code that was not issued, was used, or has expired ("Invalid or expired
/// OTP"), or a new password equal to the current one; returns
/// `PasswordPolicyViolation` when the new password is too weak.
pub fn confirm_otp(
    persistence: &mut Persistence,
    request: &ConfirmOtpRequest,
    cause: Cause,
) -> Result<MessageResponse, ApiError> {
    validate_otp_format(&request.otp)?;

    let Some(user) = persistence.get_user_by_email(&request.email)? else {
        warn!("Password reset attempted for unknown email");
        return Err(invalid_otp());
    };
    let Some(otp) = matching_otp(persistence, user.user_id, &request.otp)? else {
        warn!(user_id = user.user_id, "Password reset rejected: no matching code");
        return Err(invalid_otp());
    };

    PasswordPolicy::default().validate(&request.new_password, &user.email)?;
    if verify_password(&request.new_password, &user.password_hash)? {
        return Err(ApiError::invalid_input(
            "newPassword",
            "New password cannot be the same as current password",
        ));
    }

    let event: AuditEvent = AuditEvent::new(
        Actor::new(user.user_id, user.role.clone()),
        cause,
        Action::new(String::from("PASSWORD_RESET"), Some(user.email.clone())),
        StateSnapshot::new(String::from("credentials=current")),
        StateSnapshot::new(String::from("credentials=reset")),
        Subject::new(String::from("user"), user.user_id),
    );

    match persistence.complete_password_reset(
        user.user_id,
        otp.otp_id,
        &request.new_password,
        &event,
    ) {
        Ok(()) => {}
        Err(PersistenceError::NotFound(_)) => return Err(invalid_otp()),
        Err(other) => return Err(other.into()),
    }

    info!(user_id = user.user_id, "Password reset completed");
    Ok(MessageResponse::new("Password has been reset"))
}
