// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference data and demo accounts for a fresh database.
//!
//! Seeding is skipped when any user already exists.

use diesel::SqliteConnection;
use diesel::dsl::count_star;
use diesel::prelude::*;
use freight_desk_domain::UserStatus;
use tracing::info;

use crate::data_models::NewUser;
use crate::diesel_schema::users;
use crate::error::PersistenceError;
use crate::mutations::masters::{
    assign_pricing_user, create_equipment_type, create_port, create_sbu, create_shipping_line,
    create_trade_lane, set_sbu_head,
};
use crate::mutations::users::create_user;

/// Demo accounts: (email, name, phone, role, password).
const DEMO_USERS: &[(&str, &str, &str, &str, &str)] = &[
    ("admin@freight.com", "System Administrator", "+94112345678", "ADMIN", "admin123"),
    ("sbuhead@freight.com", "John Smith", "+94112345679", "SBU_HEAD", "sbuhead123"),
    ("sales@freight.com", "Sarah Johnson", "+94112345680", "SALES", "sales123"),
    ("cse@freight.com", "Mike Wilson", "+94112345681", "CSE", "cse12345"),
    ("pricing@freight.com", "Lisa Brown", "+94112345682", "PRICING", "pricing123"),
    ("mgmt@freight.com", "David Lee", "+94112345683", "MGMT", "mgmt1234"),
];

const PORTS: &[(&str, &str, &str)] = &[
    ("LKCMB", "Colombo", "Sri Lanka"),
    ("SGSIN", "Singapore", "Singapore"),
    ("AEDXB", "Dubai", "UAE"),
    ("DEHAM", "Hamburg", "Germany"),
    ("USLAX", "Los Angeles", "USA"),
];

/// Trade lanes: (name, code, region).
const TRADE_LANES: &[(&str, &str, &str)] = &[
    ("Colombo to Hamburg", "CMB-HAM", "Asia-Europe"),
    ("Colombo to Los Angeles", "CMB-LAX", "Asia-USA"),
    ("Colombo to Dubai", "CMB-DXB", "Asia-Middle East"),
];

const SHIPPING_LINES: &[(&str, &str)] = &[
    ("Mediterranean Shipping Company", "MSC"),
    ("Maersk Line", "MAEU"),
    ("CMA CGM", "CMAC"),
    ("COSCO Shipping", "COSCO"),
];

const EQUIPMENT_TYPES: &[(&str, bool)] = &[
    ("20ft Dry Container", false),
    ("40ft Dry Container", false),
    ("40ft Reefer Container", false),
    ("40ft Flat Rack", true),
    ("40ft Open Top", true),
];

/// Loads reference data and demo users into an empty database.
///
/// # Returns
///
/// `true` if data was loaded, `false` if the database already had users.
///
/// # Errors
///
/// Returns an error if any insert fails; nothing is kept in that case.
pub fn seed_demo_data(
    conn: &mut SqliteConnection,
    hash_cost: u32,
) -> Result<bool, PersistenceError> {
    let existing_users: i64 = users::table.select(count_star()).first(conn)?;
    if existing_users > 0 {
        info!(existing_users, "Database already has users, skipping seed");
        return Ok(false);
    }

    conn.immediate_transaction(|conn| {
        let operations_sbu: i64 = create_sbu(conn, "Colombo Operations")?;
        create_sbu(conn, "Regional Sales")?;

        let mut pricing_user_id: Option<i64> = None;
        for (email, name, phone, role, password) in DEMO_USERS {
            let user_id: i64 = create_user(
                conn,
                &NewUser {
                    email: (*email).to_string(),
                    name: (*name).to_string(),
                    phone: Some((*phone).to_string()),
                    role: (*role).to_string(),
                    status: UserStatus::Active,
                    sbu_id: Some(operations_sbu),
                    password: (*password).to_string(),
                },
                hash_cost,
            )?;
            match *role {
                "SBU_HEAD" => set_sbu_head(conn, operations_sbu, user_id)?,
                "PRICING" => pricing_user_id = Some(user_id),
                _ => {}
            }
        }

        for (unlocode, name, country) in PORTS {
            create_port(conn, unlocode, name, country)?;
        }
        for (name, code) in SHIPPING_LINES {
            create_shipping_line(conn, name, code)?;
        }
        for (name, is_flat_rack_open_top) in EQUIPMENT_TYPES {
            create_equipment_type(conn, name, *is_flat_rack_open_top)?;
        }
        for (name, code, region) in TRADE_LANES {
            let trade_lane_id: i64 = create_trade_lane(conn, name, code, region)?;
            if let Some(user_id) = pricing_user_id {
                assign_pricing_user(conn, trade_lane_id, user_id)?;
            }
        }

        info!(
            users = DEMO_USERS.len(),
            ports = PORTS.len(),
            trade_lanes = TRADE_LANES.len(),
            "Seeded reference data and demo users"
        );
        Ok(true)
    })
}
