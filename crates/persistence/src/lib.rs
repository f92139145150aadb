// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Freight Desk back-office.
//!
//! This crate stores users and sessions, master data, customers, rate
//! requests, bookings, itineraries, activities, notifications and the
//! audit log. It is built on Diesel with `SQLite`.
//!
//! ## Transitions
//!
//! Status changes arrive as a `TransitionResult` from the core crate and
//! are written with a conditional update (`WHERE status IN (expected)`)
//! together with their audit event, in one immediate transaction. A
//! conditional update that matches no row fails with
//! [`PersistenceError::StaleTransition`].
//!
//! Writes that depend on a parent's status without changing it (release
//! orders, jobs, itinerary items, customer edits) re-check the parent
//! status inside their transaction and fail with
//! [`PersistenceError::StaleState`].
//!
//! ## Testing
//!
//! - Every `new_in_memory()` call opens its own shared in-memory database
//! - Migrations are embedded and run on every open
//! - Foreign key enforcement is verified on every open

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use freight_desk::{StateRequirement, TransitionResult};
use freight_desk_audit::AuditEvent;
use freight_desk_domain::{
    BookingStatus, CustomerApprovalStatus, ItineraryStatus, ItineraryType, NotificationStatus,
};
use serde_json::Value;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod seed;
mod timestamp;

#[cfg(test)]
mod tests;

pub use data_models::{
    ActivityData, ActivityPatch, AuditLogEntry, AuditLogFilter, BookingFilter, BookingRequestData,
    CustomerData, CustomerPatch, EquipmentTypeData, ItineraryData, ItineraryFilter,
    ItineraryItemData, ItineraryItemPatch, ItineraryPatch, JobCompletionData, JobData,
    LineQuoteData, NewActivity, NewBookingRequest, NewCustomer, NewItineraryItem, NewLineQuote,
    NewNotification, NewPredefinedRate, NewRateRequest, NewRateResponse, NewUser,
    NotificationData, OtpData, PortData, PredefinedRateData, PredefinedRateFilter,
    RateRequestData, RateRequestFilter, RateResponseData, RoDocumentData, SbuData, SessionData,
    SettledRateRequest, ShippingLineData, SystemCounts, TradeLaneData, UserData,
};
pub use error::PersistenceError;
pub use queries::audit::AUDIT_LOG_LIMIT;
pub use queries::masters::SEARCH_LIMIT;
pub use queries::users::{normalize_email, verify_password};
pub use timestamp::{format_sql_timestamp, parse_sql_timestamp};

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Lowest bcrypt cost accepted by [`Persistence::with_hash_cost`].
///
/// Only suitable for tests; production adapters keep `bcrypt::DEFAULT_COST`.
pub const MIN_HASH_COST: u32 = 4;

/// Looks up users for notification fan-out.
///
/// Implemented by [`Persistence`]; the API resolves "every user holding
/// role X" through this trait.
pub trait UserDirectory {
    /// Lists the active users holding a role.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn users_with_role(&mut self, role: &str) -> Result<Vec<UserData>, PersistenceError>;

    /// Retrieves a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn find_user(&mut self, user_id: i64) -> Result<Option<UserData>, PersistenceError>;
}

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
    hash_cost: u32,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_test_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            hash_cost: bcrypt::DEFAULT_COST,
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;

        // WAL lets readers proceed while a writer holds the lock
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            hash_cost: bcrypt::DEFAULT_COST,
        })
    }

    /// Sets the bcrypt cost used for passwords and one-time codes.
    ///
    /// # Errors
    ///
    /// Returns an error if the cost is below [`MIN_HASH_COST`] or above 31.
    pub fn with_hash_cost(mut self, cost: u32) -> Result<Self, PersistenceError> {
        if !(MIN_HASH_COST..=31).contains(&cost) {
            return Err(PersistenceError::InitializationError(format!(
                "bcrypt cost {cost} is out of range"
            )));
        }
        self.hash_cost = cost;
        Ok(self)
    }

    /// Hashes a password or one-time code at this adapter's bcrypt cost.
    ///
    /// # Errors
    ///
    /// Returns an error if hashing fails.
    pub fn hash_secret(&self, secret: &str) -> Result<String, PersistenceError> {
        mutations::users::hash_password(secret, self.hash_cost)
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    /// Loads reference data and demo users into an empty database.
    ///
    /// # Returns
    ///
    /// `true` if data was loaded, `false` if users already existed.
    ///
    /// # Errors
    ///
    /// Returns an error if seeding fails.
    pub fn seed_demo_data(&mut self) -> Result<bool, PersistenceError> {
        seed::seed_demo_data(&mut self.conn, self.hash_cost)
    }

    // ========================================================================
    // Transitions & Audit
    // ========================================================================

    /// Persists a transition: the conditional status update and its audit
    /// event.
    ///
    /// # Returns
    ///
    /// The ID of the audit event.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::StaleTransition` if the record left the
    /// expected source statuses before the write.
    pub fn persist_transition(&mut self, result: &TransitionResult) -> Result<i64, PersistenceError> {
        mutations::transitions::persist_transition(&mut self.conn, result)
    }

    /// Persists a pricing response together with the `PENDING -> PROCESSING`
    /// transition it triggers.
    ///
    /// # Returns
    ///
    /// The ID of the new response.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::StaleTransition` if the request is no
    /// longer pending.
    pub fn persist_rate_response(
        &mut self,
        result: &TransitionResult,
        response: &NewRateResponse,
    ) -> Result<i64, PersistenceError> {
        mutations::transitions::persist_rate_response(&mut self.conn, result, response)
    }

    /// Persists a standalone audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn persist_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError> {
        mutations::audit::persist_audit_event(&mut self.conn, event)
    }

    /// Queries the audit log, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn query_audit_log(
        &mut self,
        filter: &AuditLogFilter,
    ) -> Result<Vec<AuditLogEntry>, PersistenceError> {
        queries::audit::query_audit_log(&mut self.conn, filter)
    }

    /// Retrieves every audit event recorded for one record, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn audit_events_for_entity(
        &mut self,
        entity_type: &str,
        entity_id: i64,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::audit_events_for_entity(&mut self.conn, entity_type, entity_id)
    }

    // ========================================================================
    // Users, Sessions & Password Reset
    // ========================================================================

    /// Creates a user. The password is hashed with bcrypt.
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists or the insert fails.
    pub fn create_user(&mut self, user: &NewUser) -> Result<i64, PersistenceError> {
        mutations::users::create_user(&mut self.conn, user, self.hash_cost)
    }

    /// Retrieves a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_id(&mut self, user_id: i64) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_id(&mut self.conn, user_id)
    }

    /// Retrieves a user by email (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_email(&mut self, email: &str) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_email(&mut self.conn, email)
    }

    /// Lists every user ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_users(&mut self) -> Result<Vec<UserData>, PersistenceError> {
        queries::users::list_users(&mut self.conn)
    }

    /// Lists the active pricing users assigned to a trade lane.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn pricing_users_for_lane(
        &mut self,
        trade_lane_id: i64,
    ) -> Result<Vec<UserData>, PersistenceError> {
        queries::users::pricing_users_for_lane(&mut self.conn, trade_lane_id)
    }

    /// Searches users by name or email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn search_users(&mut self, query: &str, limit: i64) -> Result<Vec<UserData>, PersistenceError> {
        queries::users::search_users(&mut self.conn, query, limit)
    }

    /// Creates a bearer session.
    ///
    /// # Arguments
    ///
    /// * `session_token` - The opaque token handed to the client
    /// * `user_id` - The session owner
    /// * `token_kind` - `ACCESS` or `REFRESH`
    /// * `expires_at` - Expiry in `YYYY-MM-DD HH:MM:SS` UTC form
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_session(
        &mut self,
        session_token: &str,
        user_id: i64,
        token_kind: &str,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::users::create_session(
            &mut self.conn,
            session_token,
            user_id,
            token_kind,
            expires_at,
        )
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::users::get_session_by_token(&mut self.conn, session_token)
    }

    /// Updates the last activity timestamp of a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn touch_session(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::users::touch_session(&mut self.conn, session_id)
    }

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::users::delete_session(&mut self.conn, session_token)
    }

    /// Deletes every expired session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_expired_sessions(&mut self) -> Result<usize, PersistenceError> {
        mutations::users::delete_expired_sessions(&mut self.conn)
    }

    /// Stamps the login time and writes the `LOGIN` audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if either write fails.
    pub fn record_login(&mut self, user_id: i64, event: &AuditEvent) -> Result<(), PersistenceError> {
        mutations::users::record_login(&mut self.conn, user_id, event)
    }

    /// Revokes every session of a user and writes the `LOGOUT` audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if either write fails.
    pub fn record_logout(
        &mut self,
        user_id: i64,
        event: &AuditEvent,
    ) -> Result<usize, PersistenceError> {
        mutations::users::record_logout(&mut self.conn, user_id, event)
    }

    /// Stores a hashed password reset code, replacing earlier unconsumed codes.
    ///
    /// # Errors
    ///
    /// Returns an error if the database writes fail.
    pub fn replace_otp(
        &mut self,
        user_id: i64,
        otp_hash: &str,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::users::replace_otp(&mut self.conn, user_id, otp_hash, expires_at)
    }

    /// Lists a user's unconsumed, unexpired reset codes, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn live_otps_for_user(&mut self, user_id: i64) -> Result<Vec<OtpData>, PersistenceError> {
        queries::users::live_otps_for_user(&mut self.conn, user_id)
    }

    /// Consumes a reset code, sets the new password, revokes every session
    /// and writes the audit event, atomically.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the code was consumed
    /// concurrently, or a database error.
    pub fn complete_password_reset(
        &mut self,
        user_id: i64,
        otp_id: i64,
        new_password: &str,
        event: &AuditEvent,
    ) -> Result<(), PersistenceError> {
        mutations::users::complete_password_reset(
            &mut self.conn,
            user_id,
            otp_id,
            new_password,
            self.hash_cost,
            event,
        )
    }

    // ========================================================================
    // Masters
    // ========================================================================

    /// Lists every port.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_ports(&mut self) -> Result<Vec<PortData>, PersistenceError> {
        queries::masters::list_ports(&mut self.conn)
    }

    /// Retrieves a port by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_port(&mut self, port_id: i64) -> Result<Option<PortData>, PersistenceError> {
        queries::masters::get_port(&mut self.conn, port_id)
    }

    /// Retrieves a port by UN/LOCODE.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_port_by_unlocode(&mut self, unlocode: &str) -> Result<Option<PortData>, PersistenceError> {
        queries::masters::get_port_by_unlocode(&mut self.conn, unlocode)
    }

    /// Searches ports by name, code or country.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn search_ports(&mut self, query: &str) -> Result<Vec<PortData>, PersistenceError> {
        queries::masters::search_ports(&mut self.conn, query)
    }

    /// Lists every trade lane.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_trade_lanes(&mut self) -> Result<Vec<TradeLaneData>, PersistenceError> {
        queries::masters::list_trade_lanes(&mut self.conn)
    }

    /// Retrieves a trade lane by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_trade_lane(
        &mut self,
        trade_lane_id: i64,
    ) -> Result<Option<TradeLaneData>, PersistenceError> {
        queries::masters::get_trade_lane(&mut self.conn, trade_lane_id)
    }

    /// Searches trade lanes.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn search_trade_lanes(&mut self, query: &str) -> Result<Vec<TradeLaneData>, PersistenceError> {
        queries::masters::search_trade_lanes(&mut self.conn, query)
    }

    /// Lists every equipment type.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_equipment_types(&mut self) -> Result<Vec<EquipmentTypeData>, PersistenceError> {
        queries::masters::list_equipment_types(&mut self.conn)
    }

    /// Retrieves an equipment type by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_equipment_type(
        &mut self,
        equipment_type_id: i64,
    ) -> Result<Option<EquipmentTypeData>, PersistenceError> {
        queries::masters::get_equipment_type(&mut self.conn, equipment_type_id)
    }

    /// Lists every shipping line.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_shipping_lines(&mut self) -> Result<Vec<ShippingLineData>, PersistenceError> {
        queries::masters::list_shipping_lines(&mut self.conn)
    }

    /// Retrieves a shipping line by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_shipping_line(
        &mut self,
        shipping_line_id: i64,
    ) -> Result<Option<ShippingLineData>, PersistenceError> {
        queries::masters::get_shipping_line(&mut self.conn, shipping_line_id)
    }

    /// Searches shipping lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn search_shipping_lines(
        &mut self,
        query: &str,
    ) -> Result<Vec<ShippingLineData>, PersistenceError> {
        queries::masters::search_shipping_lines(&mut self.conn, query)
    }

    /// Lists every SBU.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_sbus(&mut self) -> Result<Vec<SbuData>, PersistenceError> {
        queries::masters::list_sbus(&mut self.conn)
    }

    /// Retrieves an SBU by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_sbu(&mut self, sbu_id: i64) -> Result<Option<SbuData>, PersistenceError> {
        queries::masters::get_sbu(&mut self.conn, sbu_id)
    }

    /// Creates an SBU.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_sbu(&mut self, name: &str) -> Result<i64, PersistenceError> {
        mutations::masters::create_sbu(&mut self.conn, name)
    }

    /// Sets the head of an SBU.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the SBU does not exist.
    pub fn set_sbu_head(&mut self, sbu_id: i64, head_user_id: i64) -> Result<(), PersistenceError> {
        mutations::masters::set_sbu_head(&mut self.conn, sbu_id, head_user_id)
    }

    /// Creates a port.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_port(
        &mut self,
        unlocode: &str,
        name: &str,
        country: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::masters::create_port(&mut self.conn, unlocode, name, country)
    }

    /// Creates a trade lane.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_trade_lane(
        &mut self,
        name: &str,
        code: &str,
        region: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::masters::create_trade_lane(&mut self.conn, name, code, region)
    }

    /// Creates an equipment type.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_equipment_type(
        &mut self,
        name: &str,
        is_flat_rack_open_top: bool,
    ) -> Result<i64, PersistenceError> {
        mutations::masters::create_equipment_type(&mut self.conn, name, is_flat_rack_open_top)
    }

    /// Creates a shipping line.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_shipping_line(&mut self, name: &str, code: &str) -> Result<i64, PersistenceError> {
        mutations::masters::create_shipping_line(&mut self.conn, name, code)
    }

    /// Assigns a pricing user to a trade lane.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn assign_pricing_user(
        &mut self,
        trade_lane_id: i64,
        user_id: i64,
    ) -> Result<(), PersistenceError> {
        mutations::masters::assign_pricing_user(&mut self.conn, trade_lane_id, user_id)
    }

    // ========================================================================
    // Customers
    // ========================================================================

    /// Creates a customer pending approval.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_customer(
        &mut self,
        customer: &NewCustomer,
        created_by_id: i64,
    ) -> Result<i64, PersistenceError> {
        mutations::customers::create_customer(&mut self.conn, customer, created_by_id)
    }

    /// Retrieves a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_customer(&mut self, customer_id: i64) -> Result<Option<CustomerData>, PersistenceError> {
        queries::customers::get_customer(&mut self.conn, customer_id)
    }

    /// Lists customers; pending and rejected ones only when `include_pending`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_customers(
        &mut self,
        include_pending: bool,
    ) -> Result<Vec<CustomerData>, PersistenceError> {
        queries::customers::list_customers(&mut self.conn, include_pending)
    }

    /// Searches approved customers.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn search_customers(&mut self, query: &str) -> Result<Vec<CustomerData>, PersistenceError> {
        queries::customers::search_customers(&mut self.conn, query)
    }

    /// Searches customers in any approval status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn search_all_customers(&mut self, query: &str) -> Result<Vec<CustomerData>, PersistenceError> {
        queries::customers::search_all_customers(&mut self.conn, query)
    }

    /// Applies field edits to a customer while `requirement` holds.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::StaleState` if the customer's approval
    /// status no longer allows edits.
    pub fn update_customer(
        &mut self,
        customer_id: i64,
        patch: &CustomerPatch,
        requirement: &StateRequirement<CustomerApprovalStatus>,
    ) -> Result<(), PersistenceError> {
        mutations::customers::update_customer(&mut self.conn, customer_id, patch, requirement)
    }

    /// Deletes an unreferenced customer.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Referenced` if other records point at it.
    pub fn delete_customer(&mut self, customer_id: i64) -> Result<(), PersistenceError> {
        mutations::customers::delete_customer(&mut self.conn, customer_id)
    }

    // ========================================================================
    // Rate Requests & Predefined Rates
    // ========================================================================

    /// Creates a pending rate request.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_rate_request(&mut self, request: &NewRateRequest) -> Result<i64, PersistenceError> {
        mutations::rate_requests::create_rate_request(&mut self.conn, request)
    }

    /// Retrieves a rate request by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_rate_request(
        &mut self,
        rate_request_id: i64,
    ) -> Result<Option<RateRequestData>, PersistenceError> {
        queries::rate_requests::get_rate_request(&mut self.conn, rate_request_id)
    }

    /// Lists rate requests, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_rate_requests(
        &mut self,
        filter: RateRequestFilter,
    ) -> Result<Vec<RateRequestData>, PersistenceError> {
        queries::rate_requests::list_rate_requests(&mut self.conn, filter)
    }

    /// Returns true if a reference number is taken.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn ref_no_exists(&mut self, ref_no: &str) -> Result<bool, PersistenceError> {
        queries::rate_requests::ref_no_exists(&mut self.conn, ref_no)
    }

    /// Searches rate requests by reference number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn search_rate_requests_by_ref_no(
        &mut self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<RateRequestData>, PersistenceError> {
        queries::rate_requests::search_by_ref_no(&mut self.conn, query, limit)
    }

    /// Lists the pricing responses of a rate request, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn responses_for_request(
        &mut self,
        rate_request_id: i64,
    ) -> Result<Vec<RateResponseData>, PersistenceError> {
        queries::rate_requests::responses_for_request(&mut self.conn, rate_request_id)
    }

    /// Retrieves the most recent pricing response of a rate request.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn latest_response(
        &mut self,
        rate_request_id: i64,
    ) -> Result<Option<RateResponseData>, PersistenceError> {
        queries::rate_requests::latest_response(&mut self.conn, rate_request_id)
    }

    /// Lists the line quotes of a rate request.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn line_quotes_for_request(
        &mut self,
        rate_request_id: i64,
    ) -> Result<Vec<LineQuoteData>, PersistenceError> {
        queries::rate_requests::line_quotes_for_request(&mut self.conn, rate_request_id)
    }

    /// Retrieves the selected line quote of a rate request.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn selected_line_quote(
        &mut self,
        rate_request_id: i64,
    ) -> Result<Option<LineQuoteData>, PersistenceError> {
        queries::rate_requests::selected_line_quote(&mut self.conn, rate_request_id)
    }

    /// Adds a line quote; a selected quote deselects the others.
    ///
    /// # Errors
    ///
    /// Returns an error if a database write fails.
    pub fn add_line_quote(
        &mut self,
        rate_request_id: i64,
        quote: &NewLineQuote,
    ) -> Result<i64, PersistenceError> {
        mutations::rate_requests::add_line_quote(&mut self.conn, rate_request_id, quote)
    }

    /// Creates a predefined rate.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_predefined_rate(
        &mut self,
        rate: &NewPredefinedRate,
    ) -> Result<i64, PersistenceError> {
        mutations::rate_requests::create_predefined_rate(&mut self.conn, rate)
    }

    /// Retrieves a predefined rate by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_predefined_rate(
        &mut self,
        predefined_rate_id: i64,
    ) -> Result<Option<PredefinedRateData>, PersistenceError> {
        queries::predefined_rates::get_predefined_rate(&mut self.conn, predefined_rate_id)
    }

    /// Lists predefined rates matching a filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_predefined_rates(
        &mut self,
        filter: &PredefinedRateFilter,
    ) -> Result<Vec<PredefinedRateData>, PersistenceError> {
        queries::predefined_rates::list_predefined_rates(&mut self.conn, filter)
    }

    // ========================================================================
    // Bookings & Jobs
    // ========================================================================

    /// Raises a pending booking request.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_booking_request(
        &mut self,
        booking: &NewBookingRequest,
    ) -> Result<i64, PersistenceError> {
        mutations::bookings::create_booking_request(&mut self.conn, booking)
    }

    /// Retrieves a booking request by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_booking_request(
        &mut self,
        booking_request_id: i64,
    ) -> Result<Option<BookingRequestData>, PersistenceError> {
        queries::bookings::get_booking_request(&mut self.conn, booking_request_id)
    }

    /// Lists booking requests, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_booking_requests(
        &mut self,
        filter: BookingFilter,
    ) -> Result<Vec<BookingRequestData>, PersistenceError> {
        queries::bookings::list_booking_requests(&mut self.conn, filter)
    }

    /// Lists the release order documents of a booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn ro_documents_for_booking(
        &mut self,
        booking_request_id: i64,
    ) -> Result<Vec<RoDocumentData>, PersistenceError> {
        queries::bookings::ro_documents_for_booking(&mut self.conn, booking_request_id)
    }

    /// Retrieves a release order document by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_ro_document(
        &mut self,
        ro_document_id: i64,
    ) -> Result<Option<RoDocumentData>, PersistenceError> {
        queries::bookings::get_ro_document(&mut self.conn, ro_document_id)
    }

    /// Attaches a release order document while `requirement` holds.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::StaleState` if the booking's status no
    /// longer allows it.
    pub fn add_ro_document(
        &mut self,
        booking_request_id: i64,
        number: &str,
        file_url: Option<&str>,
        requirement: &StateRequirement<BookingStatus>,
    ) -> Result<i64, PersistenceError> {
        mutations::bookings::add_ro_document(
            &mut self.conn,
            booking_request_id,
            number,
            file_url,
            requirement,
        )
    }

    /// Records an ERP job while `requirement` holds.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::StaleState` if the booking's status no
    /// longer allows it.
    pub fn open_job(
        &mut self,
        booking_request_id: i64,
        erp_job_no: &str,
        opened_by_id: i64,
        requirement: &StateRequirement<BookingStatus>,
    ) -> Result<i64, PersistenceError> {
        mutations::bookings::open_job(
            &mut self.conn,
            booking_request_id,
            erp_job_no,
            opened_by_id,
            requirement,
        )
    }

    /// Lists the jobs of a booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn jobs_for_booking(&mut self, booking_request_id: i64) -> Result<Vec<JobData>, PersistenceError> {
        queries::bookings::jobs_for_booking(&mut self.conn, booking_request_id)
    }

    /// Retrieves a job by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_job(&mut self, job_id: i64) -> Result<Option<JobData>, PersistenceError> {
        queries::bookings::get_job(&mut self.conn, job_id)
    }

    /// Lists jobs, optionally only those opened by one user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_jobs(&mut self, opened_by_id: Option<i64>) -> Result<Vec<JobData>, PersistenceError> {
        queries::bookings::list_jobs(&mut self.conn, opened_by_id)
    }

    /// Appends a completion record to a job.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn complete_job(
        &mut self,
        job_id: i64,
        details: &Value,
        completed_by_id: i64,
    ) -> Result<i64, PersistenceError> {
        mutations::bookings::complete_job(&mut self.conn, job_id, details, completed_by_id)
    }

    /// Lists the completion records of a job.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn completions_for_job(
        &mut self,
        job_id: i64,
    ) -> Result<Vec<JobCompletionData>, PersistenceError> {
        queries::bookings::completions_for_job(&mut self.conn, job_id)
    }

    /// Retrieves a job completion record by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_job_completion(
        &mut self,
        completion_id: i64,
    ) -> Result<Option<JobCompletionData>, PersistenceError> {
        queries::bookings::get_job_completion(&mut self.conn, completion_id)
    }

    // ========================================================================
    // Itineraries
    // ========================================================================

    /// Creates a draft itinerary.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_itinerary(
        &mut self,
        owner_id: i64,
        itinerary_type: ItineraryType,
        week_start: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::itineraries::create_itinerary(&mut self.conn, owner_id, itinerary_type, week_start)
    }

    /// Retrieves an itinerary by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_itinerary(
        &mut self,
        itinerary_id: i64,
    ) -> Result<Option<ItineraryData>, PersistenceError> {
        queries::itineraries::get_itinerary(&mut self.conn, itinerary_id)
    }

    /// Lists itineraries by owner or by owner SBU.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_itineraries(
        &mut self,
        filter: ItineraryFilter,
    ) -> Result<Vec<ItineraryData>, PersistenceError> {
        queries::itineraries::list_itineraries(&mut self.conn, filter)
    }

    /// Lists the items of an itinerary.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn items_for_itinerary(
        &mut self,
        itinerary_id: i64,
    ) -> Result<Vec<ItineraryItemData>, PersistenceError> {
        queries::itineraries::items_for_itinerary(&mut self.conn, itinerary_id)
    }

    /// Retrieves an itinerary item by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_itinerary_item(
        &mut self,
        item_id: i64,
    ) -> Result<Option<ItineraryItemData>, PersistenceError> {
        queries::itineraries::get_itinerary_item(&mut self.conn, item_id)
    }

    /// Updates a draft itinerary.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::StaleState` if the itinerary left draft.
    pub fn update_itinerary(
        &mut self,
        itinerary_id: i64,
        patch: &ItineraryPatch,
        requirement: &StateRequirement<ItineraryStatus>,
    ) -> Result<(), PersistenceError> {
        mutations::itineraries::update_itinerary(&mut self.conn, itinerary_id, patch, requirement)
    }

    /// Deletes a draft itinerary with its items.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::StaleState` if the itinerary left draft.
    pub fn delete_itinerary(
        &mut self,
        itinerary_id: i64,
        requirement: &StateRequirement<ItineraryStatus>,
    ) -> Result<(), PersistenceError> {
        mutations::itineraries::delete_itinerary(&mut self.conn, itinerary_id, requirement)
    }

    /// Adds an item to a draft itinerary.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::StaleState` if the itinerary left draft.
    pub fn add_itinerary_item(
        &mut self,
        itinerary_id: i64,
        item: &NewItineraryItem,
        requirement: &StateRequirement<ItineraryStatus>,
    ) -> Result<i64, PersistenceError> {
        mutations::itineraries::add_itinerary_item(&mut self.conn, itinerary_id, item, requirement)
    }

    /// Edits an item of a draft itinerary.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::StaleState` if the itinerary left draft.
    pub fn update_itinerary_item(
        &mut self,
        item_id: i64,
        patch: &ItineraryItemPatch,
        requirement: &StateRequirement<ItineraryStatus>,
    ) -> Result<(), PersistenceError> {
        mutations::itineraries::update_itinerary_item(&mut self.conn, item_id, patch, requirement)
    }

    /// Removes an item from a draft itinerary.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::StaleState` if the itinerary left draft.
    pub fn remove_itinerary_item(
        &mut self,
        item_id: i64,
        requirement: &StateRequirement<ItineraryStatus>,
    ) -> Result<(), PersistenceError> {
        mutations::itineraries::remove_itinerary_item(&mut self.conn, item_id, requirement)
    }

    // ========================================================================
    // Activities
    // ========================================================================

    /// Records a sales activity.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_activity(&mut self, activity: &NewActivity) -> Result<i64, PersistenceError> {
        mutations::activities::create_activity(&mut self.conn, activity)
    }

    /// Retrieves a sales activity by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_activity(&mut self, activity_id: i64) -> Result<Option<ActivityData>, PersistenceError> {
        queries::activities::get_activity(&mut self.conn, activity_id)
    }

    /// Lists sales activities, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_activities(
        &mut self,
        user_id: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<ActivityData>, PersistenceError> {
        queries::activities::list_activities(&mut self.conn, user_id, limit)
    }

    /// Edits a sales activity.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the activity does not exist.
    pub fn update_activity(
        &mut self,
        activity_id: i64,
        patch: &ActivityPatch,
    ) -> Result<(), PersistenceError> {
        mutations::activities::update_activity(&mut self.conn, activity_id, patch)
    }

    /// Deletes a sales activity.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the activity does not exist.
    pub fn delete_activity(&mut self, activity_id: i64) -> Result<(), PersistenceError> {
        mutations::activities::delete_activity(&mut self.conn, activity_id)
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    /// Stores a pending notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_notification(
        &mut self,
        notification: &NewNotification,
    ) -> Result<i64, PersistenceError> {
        mutations::notifications::create_notification(&mut self.conn, notification)
    }

    /// Retrieves a notification by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_notification(
        &mut self,
        notification_id: i64,
    ) -> Result<Option<NotificationData>, PersistenceError> {
        queries::notifications::get_notification(&mut self.conn, notification_id)
    }

    /// Lists a user's in-app notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_system_notifications(
        &mut self,
        user_id: i64,
        limit: Option<i64>,
    ) -> Result<Vec<NotificationData>, PersistenceError> {
        queries::notifications::list_system_notifications(&mut self.conn, user_id, limit)
    }

    /// Lists every notification addressed to a user on any channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_notifications_for_user(
        &mut self,
        user_id: i64,
    ) -> Result<Vec<NotificationData>, PersistenceError> {
        queries::notifications::list_notifications_for_user(&mut self.conn, user_id)
    }

    /// Records the outcome of a delivery attempt.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the notification does not exist.
    pub fn set_notification_status(
        &mut self,
        notification_id: i64,
        status: NotificationStatus,
    ) -> Result<(), PersistenceError> {
        mutations::notifications::set_notification_status(&mut self.conn, notification_id, status)
    }

    /// Marks one of a user's notifications as read.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the notification is not the user's.
    pub fn mark_notification_read(
        &mut self,
        notification_id: i64,
        user_id: i64,
    ) -> Result<(), PersistenceError> {
        mutations::notifications::mark_notification_read(&mut self.conn, notification_id, user_id)
    }

    /// Marks every unread notification of a user as read.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn mark_all_notifications_read(&mut self, user_id: i64) -> Result<usize, PersistenceError> {
        mutations::notifications::mark_all_notifications_read(&mut self.conn, user_id)
    }

    // ========================================================================
    // Reports & Admin
    // ========================================================================

    /// Counts rate requests, optionally for one salesperson.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_rate_requests(&mut self, salesperson_id: Option<i64>) -> Result<i64, PersistenceError> {
        queries::reports::count_rate_requests(&mut self.conn, salesperson_id)
    }

    /// Counts booking requests, optionally for one raiser.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_booking_requests(&mut self, raised_by_id: Option<i64>) -> Result<i64, PersistenceError> {
        queries::reports::count_booking_requests(&mut self.conn, raised_by_id)
    }

    /// Counts itineraries, optionally for one owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_itineraries(&mut self, owner_id: Option<i64>) -> Result<i64, PersistenceError> {
        queries::reports::count_itineraries(&mut self.conn, owner_id)
    }

    /// Counts rate requests per status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn rate_request_status_counts(&mut self) -> Result<Vec<(String, i64)>, PersistenceError> {
        queries::reports::rate_request_status_counts(&mut self.conn)
    }

    /// Counts booking requests per status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn booking_status_counts(&mut self) -> Result<Vec<(String, i64)>, PersistenceError> {
        queries::reports::booking_status_counts(&mut self.conn)
    }

    /// Counts itineraries per status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn itinerary_status_counts(&mut self) -> Result<Vec<(String, i64)>, PersistenceError> {
        queries::reports::itinerary_status_counts(&mut self.conn)
    }

    /// Counts rate requests per salesperson.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn rate_request_counts_by_salesperson(&mut self) -> Result<Vec<(i64, i64)>, PersistenceError> {
        queries::reports::rate_request_counts_by_salesperson(&mut self.conn)
    }

    /// Lists completed or rejected rate requests created at or after `since`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn settled_rate_requests_since(
        &mut self,
        since: &str,
    ) -> Result<Vec<SettledRateRequest>, PersistenceError> {
        queries::reports::settled_rate_requests_since(&mut self.conn, since)
    }

    /// Counts the rows of every business table.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn system_counts(&mut self) -> Result<SystemCounts, PersistenceError> {
        queries::reports::system_counts(&mut self.conn)
    }
}

impl UserDirectory for Persistence {
    fn users_with_role(&mut self, role: &str) -> Result<Vec<UserData>, PersistenceError> {
        queries::users::users_with_role(&mut self.conn, role)
    }

    fn find_user(&mut self, user_id: i64) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_id(&mut self.conn, user_id)
    }
}
