#![cfg(feature = "serde")]

use avl_forest::{AvlMap, AvlSet};

#[test]
fn map_serializes_in_key_order() {
    let map: AvlMap<String, i32> = [("b", 2), ("c", 3), ("a", 1)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, r#"{"a":1,"b":2,"c":3}"#);

    let back: AvlMap<String, i32> = serde_json::from_str(&json).unwrap();
    back.assert_valid().unwrap();
    assert_eq!(back.get(&"b".to_string()), Some(&2));
    assert_eq!(back.len(), 3);
}

#[test]
fn set_round_trips_as_sequence() {
    let set: AvlSet<u32> = serde_json::from_str("[5,3,9,3]").unwrap();
    set.assert_valid().unwrap();
    assert_eq!(serde_json::to_string(&set).unwrap(), "[3,5,9]");
}
