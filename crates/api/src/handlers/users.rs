// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Administrator-managed user accounts.

use freight_desk_domain::{UserStatus, validate_email, validate_required};
use freight_desk_persistence::{NewUser, Persistence, UserData};
use tracing::info;

use crate::auth::{AuthenticatedActor, Role, assert_role};
use crate::capabilities::ADMINISTRATORS;
use crate::error::ApiError;
use crate::password_policy::PasswordPolicy;
use crate::request_response::CreateUserRequest;

/// Creates an ACTIVE user account.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not ADMIN
/// - The email is malformed or already registered
/// - The name is blank or the role is unknown
/// - The password fails the password policy
/// - The SBU does not exist
pub fn create_user(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateUserRequest,
) -> Result<UserData, ApiError> {
    assert_role(actor, ADMINISTRATORS, "create_user")?;

    validate_email("email", &request.email)?;
    validate_required("name", &request.name)?;
    let role: Role = request.role.parse()?;
    PasswordPolicy::default().validate(&request.password, &request.email)?;

    if let Some(sbu_id) = request.sbu_id
        && persistence.get_sbu(sbu_id)?.is_none()
    {
        return Err(ApiError::not_found("SBU", "SBU not found"));
    }
    if persistence.get_user_by_email(&request.email)?.is_some() {
        return Err(ApiError::invalid_input(
            "email",
            "A user with this email already exists",
        ));
    }

    let user_id: i64 = persistence.create_user(&NewUser {
        email: request.email.trim().to_string(),
        name: request.name.trim().to_string(),
        phone: request.phone.clone(),
        role: role.as_str().to_string(),
        status: UserStatus::Active,
        sbu_id: request.sbu_id,
        password: request.password.clone(),
    })?;

    info!(user_id, role = role.as_str(), created_by = actor.user_id, "User created");
    persistence
        .get_user_by_id(user_id)?
        .ok_or_else(|| ApiError::not_found("User", "User not found"))
}

/// Lists every user account.
///
/// # Errors
///
/// Returns an error if the actor is not ADMIN.
pub fn list_users(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<Vec<UserData>, ApiError> {
    assert_role(actor, ADMINISTRATORS, "list_users")?;
    Ok(persistence.list_users()?)
}
