//! Property-based tests for Matchwise core domain models
//!
//! These validate the aggregate helpers on the mapping entities and the
//! serde contract relied on by the HTTP surface.

use proptest::prelude::*;
use std::collections::BTreeMap;
use validator::Validate;

use crate::{PartRoomMap, RoomPartMap, SalesRecord};

prop_compose! {
    fn arb_part_id()(digits in "[0-9]{12}") -> String {
        digits
    }
}

prop_compose! {
    fn arb_room_id()(room in "[A-Za-z0-9]{1,12}") -> String {
        room
    }
}

prop_compose! {
    fn arb_room_part_map()(
        room in arb_room_id(),
        parts in prop::collection::btree_map(arb_part_id(), 0..10_000i64, 1..20)
    ) -> RoomPartMap {
        RoomPartMap::new(room, parts)
    }
}

prop_compose! {
    fn arb_part_room_map()(
        part in arb_part_id(),
        rooms in prop::collection::btree_map(arb_room_id(), 0..10_000i64, 1..20)
    ) -> PartRoomMap {
        PartRoomMap::new(part, rooms)
    }
}

proptest! {
    #[test]
    fn prop_room_total_is_sum_of_quantities(map in arb_room_part_map()) {
        let expected: i64 = map.parts.values().sum();
        prop_assert_eq!(map.total_quantity(), expected);
        prop_assert_eq!(map.part_count(), map.parts.len());
        prop_assert!(map.validate().is_ok());
    }

    #[test]
    fn prop_part_total_is_sum_of_quantities(map in arb_part_room_map()) {
        let expected: i64 = map.rooms.values().sum();
        prop_assert_eq!(map.total_quantity(), expected);
        prop_assert!(map.validate().is_ok());
    }

    #[test]
    fn prop_lookup_matches_membership(map in arb_room_part_map(), part in arb_part_id()) {
        prop_assert_eq!(map.has_part(&part), map.quantity_of(&part).is_some());
    }

    #[test]
    fn prop_total_never_overflows(
        room in arb_room_id(),
        parts in prop::collection::btree_map(arb_part_id(), any::<i64>(), 1..8)
    ) {
        let wide: i128 = parts.values().map(|q| *q as i128).sum();
        let expected = wide.clamp(i64::MIN as i128, i64::MAX as i128) as i64;
        let map = RoomPartMap::new(room, parts);
        prop_assert_eq!(map.total_quantity(), expected);
    }

    #[test]
    fn prop_room_map_json_keeps_key_order(map in arb_room_part_map()) {
        let json = serde_json::to_string(&map).unwrap();
        let back: RoomPartMap = serde_json::from_str(&json).unwrap();
        let keys: Vec<&String> = back.parts.keys().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted);
        prop_assert_eq!(back, map);
    }

    #[test]
    fn prop_negative_sales_quantity_never_validates(quantity in i64::MIN..0i64) {
        let record = SalesRecord::new(
            "123456789012",
            "Room001",
            quantity,
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        prop_assert!(record.validate().is_err());
    }
}

#[test]
fn empty_inner_mapping_never_validates() {
    let map = PartRoomMap::new("123456789012", BTreeMap::new());
    assert!(map.validate().is_err());
}
