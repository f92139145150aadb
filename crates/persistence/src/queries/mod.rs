// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! Each module loads one area of the schema into the records defined in
//! `data_models`. Nothing here writes.

pub mod activities;
pub mod audit;
pub mod bookings;
pub mod customers;
pub mod itineraries;
pub mod masters;
pub mod notifications;
pub mod predefined_rates;
pub mod rate_requests;
pub mod reports;
pub mod users;
