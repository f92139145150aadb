// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod guarded_write_tests;
mod initialization_tests;
mod transition_tests;
mod user_tests;

use crate::{MIN_HASH_COST, NewCustomer, NewRateRequest, Persistence, UserData};
use freight_desk_audit::{Actor, Cause};
use freight_desk_domain::{ShipmentType, TransportMode};

/// Opens an in-memory database loaded with the demo data.
pub fn seeded_persistence() -> Persistence {
    let mut persistence = Persistence::new_in_memory()
        .and_then(|persistence| persistence.with_hash_cost(MIN_HASH_COST))
        .expect("in-memory database");
    assert!(persistence.seed_demo_data().expect("seed"));
    persistence
}

/// Loads one of the seeded demo users.
pub fn demo_user(persistence: &mut Persistence, email: &str) -> UserData {
    persistence
        .get_user_by_email(email)
        .expect("user lookup")
        .expect("seeded user")
}

pub fn actor_for(user: &UserData) -> Actor {
    Actor::new(user.user_id, user.role.clone())
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

pub fn create_test_customer(persistence: &mut Persistence, created_by_id: i64) -> i64 {
    persistence
        .create_customer(
            &NewCustomer {
                company_name: String::from("Ceylon Tea Exports"),
                contact_person: String::from("Nimal Perera"),
                email: String::from("nimal@ceylontea.example"),
                phone: Some(String::from("+94771234567")),
                ..NewCustomer::default()
            },
            created_by_id,
        )
        .expect("customer")
}

pub fn create_test_rate_request(
    persistence: &mut Persistence,
    ref_no: &str,
    salesperson_id: i64,
    customer_id: i64,
) -> i64 {
    let pol = persistence.get_port_by_unlocode("LKCMB").unwrap().unwrap();
    let pod = persistence.get_port_by_unlocode("DEHAM").unwrap().unwrap();
    persistence
        .create_rate_request(&NewRateRequest {
            ref_no: ref_no.to_string(),
            mode: TransportMode::Sea,
            shipment_type: ShipmentType::Fcl,
            pol_id: Some(pol.port_id),
            pod_id: pod.port_id,
            door_or_cy: None,
            us_zip: None,
            preferred_line_id: None,
            equipment_type_id: None,
            reefer_temp: None,
            pallet_count: None,
            pallet_dims: None,
            hs_code: None,
            weight_tons: 12.5,
            incoterm: String::from("FOB"),
            market_rate: None,
            special_instructions: None,
            cargo_ready_date: None,
            vessel_required: false,
            detention_free_time: None,
            salesperson_id,
            customer_id,
        })
        .expect("rate request")
}
