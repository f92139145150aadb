// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations of the persistence layer.
//!
//! ## Module Organization
//!
//! - `audit`: Audit event persistence
//! - `transitions`: Conditional status updates and guarded-write checks
//! - `users`: Users, sessions, login/logout and password reset
//! - `masters`: Ports, lanes, equipment, lines, SBUs, pricing assignments
//! - `customers`, `rate_requests`, `bookings`, `itineraries`, `activities`,
//!   `notifications`: Record creation and edits per area
//!
//! Backend-specific helpers (`get_last_insert_rowid()`) come from the
//! `backend` module. Everything else is Diesel DSL.

pub mod activities;
pub mod audit;
pub mod bookings;
pub mod customers;
pub mod itineraries;
pub mod masters;
pub mod notifications;
pub mod rate_requests;
pub mod transitions;
pub mod users;
