// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User, session and password-reset queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use freight_desk_domain::UserStatus;
use tracing::debug;

use crate::data_models::{OtpData, SessionData, UserData};
use crate::diesel_schema::{password_reset_otps, pricing_assignments, sessions, users};
use crate::error::PersistenceError;

/// Diesel Queryable struct for user rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
pub(crate) struct UserRow {
    user_id: i64,
    email: String,
    name: String,
    phone: Option<String>,
    role: String,
    status: String,
    sbu_id: Option<i64>,
    password_hash: String,
    created_at: String,
    updated_at: String,
    last_login_at: Option<String>,
}

impl UserRow {
    pub(crate) fn into_data(self) -> Result<UserData, PersistenceError> {
        Ok(UserData {
            user_id: self.user_id,
            email: self.email,
            name: self.name,
            phone: self.phone,
            role: self.role,
            status: self.status.parse::<UserStatus>()?,
            sbu_id: self.sbu_id,
            password_hash: self.password_hash,
            created_at: self.created_at,
            updated_at: self.updated_at,
            last_login_at: self.last_login_at,
        })
    }
}

/// Diesel Queryable struct for session rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = sessions)]
struct SessionRow {
    session_id: i64,
    session_token: String,
    user_id: i64,
    token_kind: String,
    created_at: String,
    last_activity_at: String,
    expires_at: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = password_reset_otps)]
struct OtpRow {
    otp_id: i64,
    user_id: i64,
    otp_hash: String,
    expires_at: String,
}

fn collect_users(rows: Vec<UserRow>) -> Result<Vec<UserData>, PersistenceError> {
    rows.into_iter().map(UserRow::into_data).collect()
}

/// Normalizes an email address for storage and lookup.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Retrieves a user by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<UserData>, PersistenceError> {
    debug!("Looking up user by ID: {}", user_id);

    let result: Result<UserRow, diesel::result::Error> = users::table
        .filter(users::user_id.eq(user_id))
        .select(UserRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_data()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves a user by email address.
///
/// The email is normalized to lowercase for case-insensitive lookup.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<UserData>, PersistenceError> {
    let normalized_email: String = normalize_email(email);

    debug!("Looking up user by email: {}", normalized_email);

    let result: Result<UserRow, diesel::result::Error> = users::table
        .filter(users::email.eq(&normalized_email))
        .select(UserRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_data()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists every user ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_users(conn: &mut SqliteConnection) -> Result<Vec<UserData>, PersistenceError> {
    let rows: Vec<UserRow> = users::table
        .order(users::name.asc())
        .select(UserRow::as_select())
        .load(conn)?;

    collect_users(rows)
}

/// Lists the active users holding a role.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn users_with_role(
    conn: &mut SqliteConnection,
    role: &str,
) -> Result<Vec<UserData>, PersistenceError> {
    debug!("Looking up active users with role {}", role);

    let rows: Vec<UserRow> = users::table
        .filter(users::role.eq(role))
        .filter(users::status.eq(UserStatus::Active.as_str()))
        .order(users::user_id.asc())
        .select(UserRow::as_select())
        .load(conn)?;

    collect_users(rows)
}

/// Lists the active pricing users assigned to a trade lane.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn pricing_users_for_lane(
    conn: &mut SqliteConnection,
    trade_lane_id: i64,
) -> Result<Vec<UserData>, PersistenceError> {
    let assigned = pricing_assignments::table
        .filter(pricing_assignments::trade_lane_id.eq(trade_lane_id))
        .select(pricing_assignments::user_id);

    let rows: Vec<UserRow> = users::table
        .filter(users::user_id.eq_any(assigned))
        .filter(users::status.eq(UserStatus::Active.as_str()))
        .order(users::user_id.asc())
        .select(UserRow::as_select())
        .load(conn)?;

    collect_users(rows)
}

/// Searches users by name or email, at most `limit` results.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn search_users(
    conn: &mut SqliteConnection,
    query: &str,
    limit: i64,
) -> Result<Vec<UserData>, PersistenceError> {
    let pattern: String = format!("%{}%", query.trim());

    let rows: Vec<UserRow> = users::table
        .filter(users::name.like(&pattern).or(users::email.like(&pattern)))
        .order(users::name.asc())
        .limit(limit)
        .select(UserRow::as_select())
        .load(conn)?;

    collect_users(rows)
}

/// Retrieves a session by token.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the session is not found.
pub fn get_session_by_token(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<Option<SessionData>, PersistenceError> {
    debug!("Looking up session by token");

    let result: Result<SessionRow, diesel::result::Error> = sessions::table
        .filter(sessions::session_token.eq(session_token))
        .select(SessionRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(SessionData {
            session_id: row.session_id,
            session_token: row.session_token,
            user_id: row.user_id,
            token_kind: row.token_kind,
            created_at: row.created_at,
            last_activity_at: row.last_activity_at,
            expires_at: row.expires_at,
        })),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists a user's reset codes that are neither consumed nor expired.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn live_otps_for_user(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Vec<OtpData>, PersistenceError> {
    let rows: Vec<OtpRow> = password_reset_otps::table
        .filter(password_reset_otps::user_id.eq(user_id))
        .filter(password_reset_otps::consumed_at.is_null())
        .filter(
            password_reset_otps::expires_at.gt(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        )
        .order(password_reset_otps::otp_id.desc())
        .select(OtpRow::as_select())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|row| OtpData {
            otp_id: row.otp_id,
            user_id: row.user_id,
            otp_hash: row.otp_hash,
            expires_at: row.expires_at,
        })
        .collect())
}

/// Verifies a password against a stored hash.
///
/// # Errors
///
/// Returns an error if the hash cannot be verified.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| PersistenceError::Other(format!("Failed to verify password: {e}")))
}
