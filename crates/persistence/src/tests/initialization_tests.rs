// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{NewPredefinedRate, Persistence, PredefinedRateFilter};
use crate::tests::seeded_persistence;

#[test]
fn test_in_memory_databases_are_isolated() {
    let mut first = seeded_persistence();
    let mut second = Persistence::new_in_memory().unwrap();

    assert_eq!(first.list_users().unwrap().len(), 6);
    assert!(second.list_users().unwrap().is_empty());
}

#[test]
fn test_predefined_rates_table_stamps_timestamps() {
    let mut persistence = seeded_persistence();
    let lane = persistence.list_trade_lanes().unwrap().remove(0);
    let ports = persistence.list_ports().unwrap();
    let equipment = persistence.list_equipment_types().unwrap().remove(0);

    let id = persistence
        .create_predefined_rate(&NewPredefinedRate {
            trade_lane_id: lane.trade_lane_id,
            pol_id: ports[0].port_id,
            pod_id: ports[1].port_id,
            service: String::from("Weekly direct"),
            equipment_type_id: equipment.equipment_type_id,
            is_lcl: false,
            valid_from: String::from("2026-01-01"),
            valid_to: String::from("2026-12-31"),
            notes: None,
            status: String::from("ACTIVE"),
        })
        .unwrap();

    let rates = persistence
        .list_predefined_rates(&PredefinedRateFilter::default())
        .unwrap();
    assert_eq!(rates.len(), 1);
    assert_eq!(rates[0].predefined_rate_id, id);
    assert!(!rates[0].created_at.is_empty());
    assert!(!rates[0].updated_at.is_empty());
}

#[test]
fn test_foreign_keys_are_enforced() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    persistence.verify_foreign_key_enforcement().unwrap();

    // A customer created by a user that does not exist is refused
    let result = persistence.create_customer(&crate::NewCustomer::default(), 9_999);
    assert!(result.is_err());
}

#[test]
fn test_seed_loads_reference_data() {
    let mut persistence = seeded_persistence();

    assert_eq!(persistence.list_ports().unwrap().len(), 5);
    assert_eq!(persistence.list_trade_lanes().unwrap().len(), 3);
    assert_eq!(persistence.list_shipping_lines().unwrap().len(), 4);

    let flat_racks: usize = persistence
        .list_equipment_types()
        .unwrap()
        .iter()
        .filter(|equipment| equipment.is_flat_rack_open_top)
        .count();
    assert_eq!(flat_racks, 2);
}

#[test]
fn test_seed_assigns_sbu_head_and_pricing_lanes() {
    let mut persistence = seeded_persistence();

    let head = persistence
        .get_user_by_email("sbuhead@freight.com")
        .unwrap()
        .unwrap();
    let sbu = persistence.get_sbu(head.sbu_id.unwrap()).unwrap().unwrap();
    assert_eq!(sbu.head_user_id, Some(head.user_id));

    for lane in persistence.list_trade_lanes().unwrap() {
        let pricing = persistence.pricing_users_for_lane(lane.trade_lane_id).unwrap();
        assert_eq!(pricing.len(), 1);
        assert_eq!(pricing[0].email, "pricing@freight.com");
    }
}

#[test]
fn test_seed_is_skipped_when_users_exist() {
    let mut persistence = seeded_persistence();

    assert!(!persistence.seed_demo_data().unwrap());
    assert_eq!(persistence.list_users().unwrap().len(), 6);
}
