// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::sync::Mutex;

use freight_desk_audit::Cause;
use freight_desk_domain::{ShipmentType, TransportMode};
use freight_desk_persistence::{CustomerData, MIN_HASH_COST, Persistence, UserData};
use serde_json::json;

use crate::handlers::customers::{approve_customer, create_customer};
use crate::{
    AuthenticatedActor, CreateCustomerRequest, CreateRateRequestRequest, DecisionRequest,
    DeliveryJob, DeliveryQueue, RespondToRateRequestRequest,
};

pub const ADMIN_EMAIL: &str = "admin@freight.com";
pub const SBU_HEAD_EMAIL: &str = "sbuhead@freight.com";
pub const SALES_EMAIL: &str = "sales@freight.com";
pub const CSE_EMAIL: &str = "cse@freight.com";
pub const PRICING_EMAIL: &str = "pricing@freight.com";
pub const MGMT_EMAIL: &str = "mgmt@freight.com";

/// Seeded master data IDs.
pub const COLOMBO_PORT_ID: i64 = 1;
pub const HAMBURG_PORT_ID: i64 = 4;
pub const MSC_LINE_ID: i64 = 1;
pub const MAERSK_LINE_ID: i64 = 2;
pub const DRY_40FT_ID: i64 = 2;
pub const FLAT_RACK_ID: i64 = 4;
pub const CMB_HAM_LANE_ID: i64 = 1;

/// A queue that records every job instead of delivering it.
#[derive(Default)]
pub struct RecordingQueue {
    jobs: Mutex<Vec<DeliveryJob>>,
}

impl RecordingQueue {
    pub fn jobs(&self) -> Vec<DeliveryJob> {
        self.jobs.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.jobs.lock().unwrap().clear();
    }
}

impl DeliveryQueue for RecordingQueue {
    fn enqueue(&self, job: DeliveryJob) {
        self.jobs.lock().unwrap().push(job);
    }
}

pub fn seeded_persistence() -> Persistence {
    let mut persistence = Persistence::new_in_memory()
        .and_then(|persistence| persistence.with_hash_cost(MIN_HASH_COST))
        .expect("in-memory database");
    assert!(persistence.seed_demo_data().expect("seed"));
    persistence
}

pub fn demo_user(persistence: &mut Persistence, email: &str) -> UserData {
    persistence
        .get_user_by_email(email)
        .expect("user lookup")
        .expect("seeded user")
}

pub fn actor(persistence: &mut Persistence, email: &str) -> AuthenticatedActor {
    let user: UserData = demo_user(persistence, email);
    AuthenticatedActor::from_user(&user).expect("known role")
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-test"), String::from("API test"))
}

pub fn customer_request() -> CreateCustomerRequest {
    CreateCustomerRequest {
        company_name: String::from("Ceylon Tea Exports"),
        contact_person: String::from("Nimal Perera"),
        email: String::from("nimal@ceylontea.example"),
        phone: Some(String::from("+94771234567")),
        address: None,
        city: Some(String::from("Colombo")),
        country: Some(String::from("Sri Lanka")),
    }
}

/// Registers a customer as SALES and approves it as ADMIN.
pub fn approved_customer(persistence: &mut Persistence) -> CustomerData {
    let sales: AuthenticatedActor = actor(persistence, SALES_EMAIL);
    let admin: AuthenticatedActor = actor(persistence, ADMIN_EMAIL);
    let customer: CustomerData =
        create_customer(persistence, &sales, &customer_request()).expect("customer");
    approve_customer(
        persistence,
        &admin,
        customer.customer_id,
        &DecisionRequest {
            approved: true,
            note: None,
        },
        create_test_cause(),
    )
    .expect("approved")
}

pub fn sea_request(customer_id: i64) -> CreateRateRequestRequest {
    CreateRateRequestRequest {
        customer_id,
        mode: TransportMode::Sea,
        shipment_type: ShipmentType::Fcl,
        pol_id: None,
        pod_id: HAMBURG_PORT_ID,
        door_or_cy: Some(String::from("CY")),
        us_zip: None,
        preferred_line_id: Some(MSC_LINE_ID),
        equipment_type_id: Some(DRY_40FT_ID),
        reefer_temp: None,
        pallet_count: None,
        pallet_dims: None,
        hs_code: Some(String::from("0902.10")),
        weight_tons: 18.5,
        incoterm: String::from("FOB"),
        market_rate: Some(1450.0),
        special_instructions: None,
        cargo_ready_date: Some(String::from("2026-11-02")),
        vessel_required: false,
        detention_free_time: None,
    }
}

pub fn pricing_response(valid_to: &str) -> RespondToRateRequestRequest {
    RespondToRateRequestRequest {
        line_no: 1,
        requested_line_id: Some(MSC_LINE_ID),
        requested_equipment_type_id: Some(DRY_40FT_ID),
        vessel_name: None,
        eta: None,
        etd: None,
        fcl_cutoff: None,
        doc_cutoff: None,
        valid_to: valid_to.to_string(),
        charges: json!({ "oceanFreight": 1375, "currency": "USD" }),
    }
}

/// Extracts the six-digit code from a queued reset message.
pub fn otp_from_jobs(jobs: &[DeliveryJob]) -> String {
    jobs.iter()
        .find_map(|job| match job {
            DeliveryJob::Direct(message) => Some(message.body.clone()),
            DeliveryJob::Stored { .. } => None,
        })
        .and_then(|body| {
            body.split_whitespace()
                .map(|word| word.trim_end_matches('.'))
                .find(|word| word.len() == 6 && word.chars().all(|c| c.is_ascii_digit()))
                .map(str::to_string)
        })
        .expect("queued reset code")
}
