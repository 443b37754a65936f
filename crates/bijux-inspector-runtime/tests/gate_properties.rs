// SPDX-License-Identifier: Apache-2.0

use bijux_inspector_runtime::{Gates, InvalidationGate, OpClass};
use proptest::prelude::*;
use proptest::test_runner::Config;

const CLASSES: [OpClass; 7] = [
    OpClass::Filter,
    OpClass::Slice,
    OpClass::Sort,
    OpClass::Category,
    OpClass::Schema,
    OpClass::CrossQuery,
    OpClass::Drawer,
];

proptest! {
    #![proptest_config(Config::with_cases(256))]
    #[test]
    fn only_the_latest_token_is_current(issues in 1usize..64) {
        let gate = InvalidationGate::new();
        let tokens: Vec<_> = (0..issues).map(|_| gate.issue()).collect();
        let (last, older) = tokens.split_last().expect("at least one token");
        prop_assert!(gate.is_current(*last));
        for t in older {
            prop_assert!(!gate.is_current(*t));
            prop_assert!(t.value() < last.value());
        }
    }

    #[test]
    fn classes_never_invalidate_each_other(ops in proptest::collection::vec(0usize..7, 1..80)) {
        let gates = Gates::default();
        let mut latest = [None; 7];
        for op in ops {
            latest[op] = Some(gates.issue(CLASSES[op]));
        }
        for (i, token) in latest.iter().enumerate() {
            if let Some(token) = token {
                prop_assert!(gates.is_current(CLASSES[i], *token));
            }
        }
    }
}
