// SPDX-License-Identifier: Apache-2.0

use bijux_inspector_core::{canonical, sha256_hex};
use serde_json::json;

#[test]
fn stable_json_bytes_are_key_order_deterministic() {
    let a = json!({"z": 2, "a": 1});
    let b = json!({"a": 1, "z": 2});
    let ba = canonical::stable_json_bytes(&a).expect("stable json a");
    let bb = canonical::stable_json_bytes(&b).expect("stable json b");
    assert_eq!(ba, bb);
}

#[test]
fn sha256_is_repeatable_for_same_bytes() {
    let bytes = b"inspector-core-determinism";
    assert_eq!(sha256_hex(bytes), sha256_hex(bytes));
}

#[test]
fn stable_json_hash_differs_when_values_differ() {
    let a = canonical::stable_json_hash_hex(&json!({"query": "a", "mode": "fuzzy"})).expect("a");
    let b = canonical::stable_json_hash_hex(&json!({"query": "b", "mode": "fuzzy"})).expect("b");
    assert_ne!(a, b);
}
