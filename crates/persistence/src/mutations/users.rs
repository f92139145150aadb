// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User, session and password-reset mutations.

use diesel::SqliteConnection;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use freight_desk_audit::AuditEvent;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::data_models::NewUser;
use crate::diesel_schema::{password_reset_otps, sessions, users};
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;
use crate::queries::users::normalize_email;

/// Hashes a password or one-time code with bcrypt at the given cost.
///
/// # Errors
///
/// Returns an error if hashing fails or the cost is out of range.
pub fn hash_password(password: &str, cost: u32) -> Result<String, PersistenceError> {
    bcrypt::hash(password, cost)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))
}

/// Creates a new user.
///
/// The email is normalized to lowercase for case-insensitive uniqueness.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user` - The user to create; its password is hashed before storage
/// * `hash_cost` - bcrypt cost for the password hash
///
/// # Errors
///
/// Returns an error if the user cannot be created or if the email
/// already exists.
pub fn create_user(
    conn: &mut SqliteConnection,
    user: &NewUser,
    hash_cost: u32,
) -> Result<i64, PersistenceError> {
    let normalized_email: String = normalize_email(&user.email);

    info!(
        "Creating user with email: {}, name: {}, role: {}",
        normalized_email, user.name, user.role
    );

    let password_hash: String = hash_password(&user.password, hash_cost)?;

    diesel::insert_into(users::table)
        .values((
            users::email.eq(&normalized_email),
            users::name.eq(&user.name),
            users::phone.eq(user.phone.as_deref()),
            users::role.eq(&user.role),
            users::status.eq(user.status.as_str()),
            users::sbu_id.eq(user.sbu_id),
            users::password_hash.eq(&password_hash),
        ))
        .execute(conn)?;

    let user_id: i64 = conn.get_last_insert_rowid()?;

    info!(user_id, "User created");

    Ok(user_id)
}

/// Creates a bearer session.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The opaque token handed to the client
/// * `user_id` - The session owner
/// * `token_kind` - `ACCESS` or `REFRESH`
/// * `expires_at` - Expiry in `YYYY-MM-DD HH:MM:SS` UTC form
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    user_id: i64,
    token_kind: &str,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    debug!("Creating {} session for user ID: {}", token_kind, user_id);

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::user_id.eq(user_id),
            sessions::token_kind.eq(token_kind),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = conn.get_last_insert_rowid()?;
    Ok(session_id)
}

/// Updates the last activity timestamp of a session.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn touch_session(conn: &mut SqliteConnection, session_id: i64) -> Result<(), PersistenceError> {
    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(sessions::last_activity_at.eq(sql::<Text>("CURRENT_TIMESTAMP")))
        .execute(conn)?;

    Ok(())
}

/// Deletes a session by token.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<(), PersistenceError> {
    diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;

    Ok(())
}

/// Deletes every session that has expired.
///
/// # Returns
///
/// The number of sessions removed.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_expired_sessions(conn: &mut SqliteConnection) -> Result<usize, PersistenceError> {
    let deleted: usize = diesel::delete(sessions::table)
        .filter(sessions::expires_at.le(sql::<Text>("CURRENT_TIMESTAMP")))
        .execute(conn)?;

    if deleted > 0 {
        info!(deleted, "Removed expired sessions");
    }

    Ok(deleted)
}

/// Records a successful login: stamps `last_login_at` and writes the
/// `LOGIN` audit event.
///
/// # Errors
///
/// Returns an error if either write fails; neither is kept in that case.
pub fn record_login(
    conn: &mut SqliteConnection,
    user_id: i64,
    event: &AuditEvent,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        diesel::update(users::table)
            .filter(users::user_id.eq(user_id))
            .set(users::last_login_at.eq(sql::<Nullable<Text>>("CURRENT_TIMESTAMP")))
            .execute(conn)?;
        persist_audit_event(conn, event)?;
        Ok(())
    })
}

/// Revokes every session of a user and writes the `LOGOUT` audit event.
///
/// # Returns
///
/// The number of sessions revoked.
///
/// # Errors
///
/// Returns an error if either write fails.
pub fn record_logout(
    conn: &mut SqliteConnection,
    user_id: i64,
    event: &AuditEvent,
) -> Result<usize, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let revoked: usize = diesel::delete(sessions::table)
            .filter(sessions::user_id.eq(user_id))
            .execute(conn)?;
        persist_audit_event(conn, event)?;

        info!(user_id, revoked, "User logged out");
        Ok(revoked)
    })
}

/// Stores a new password reset code, discarding any earlier unconsumed codes.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - The user requesting the reset
/// * `otp_hash` - bcrypt hash of the code
/// * `expires_at` - Expiry in `YYYY-MM-DD HH:MM:SS` UTC form
///
/// # Errors
///
/// Returns an error if the database writes fail.
pub fn replace_otp(
    conn: &mut SqliteConnection,
    user_id: i64,
    otp_hash: &str,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction(|conn| {
        diesel::delete(password_reset_otps::table)
            .filter(password_reset_otps::user_id.eq(user_id))
            .filter(password_reset_otps::consumed_at.is_null())
            .execute(conn)?;

        diesel::insert_into(password_reset_otps::table)
            .values((
                password_reset_otps::user_id.eq(user_id),
                password_reset_otps::otp_hash.eq(otp_hash),
                password_reset_otps::expires_at.eq(expires_at),
            ))
            .execute(conn)?;

        let otp_id: i64 = conn.get_last_insert_rowid()?;
        debug!(user_id, otp_id, "Stored password reset code");
        Ok(otp_id)
    })
}

/// Completes a password reset.
///
/// In one transaction: consumes the code (failing if it was consumed in
/// the meantime), stores the new password hash, revokes every session of
/// the user and writes the audit event.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the code is no longer
/// unconsumed, or a database error.
pub fn complete_password_reset(
    conn: &mut SqliteConnection,
    user_id: i64,
    otp_id: i64,
    new_password: &str,
    hash_cost: u32,
    event: &AuditEvent,
) -> Result<(), PersistenceError> {
    let password_hash: String = hash_password(new_password, hash_cost)?;

    conn.immediate_transaction(|conn| {
        let consumed: usize = diesel::update(password_reset_otps::table)
            .filter(password_reset_otps::otp_id.eq(otp_id))
            .filter(password_reset_otps::user_id.eq(user_id))
            .filter(password_reset_otps::consumed_at.is_null())
            .set(password_reset_otps::consumed_at.eq(sql::<Nullable<Text>>("CURRENT_TIMESTAMP")))
            .execute(conn)?;
        if consumed == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Password reset code {otp_id} is no longer valid"
            )));
        }

        diesel::update(users::table)
            .filter(users::user_id.eq(user_id))
            .set((
                users::password_hash.eq(&password_hash),
                users::updated_at.eq(sql::<Text>("CURRENT_TIMESTAMP")),
            ))
            .execute(conn)?;

        diesel::delete(sessions::table)
            .filter(sessions::user_id.eq(user_id))
            .execute(conn)?;

        persist_audit_event(conn, event)?;

        info!(user_id, "Password reset completed");
        Ok(())
    })
}
