//! Property tests for the serial runner.
//!
//! Invariants tested:
//! - Cases run in lexical order of name whatever the insertion order
//! - Every case runs exactly once
//! - Failures never hide other cases

use acctest_sync_runner::{Runner, SerialCases, run_serial_tests_1_level};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Runtime;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn cases_run_in_lexical_order(
        names in prop::collection::btree_set("[a-z][a-z0-9_]{0,8}", 1..12),
        failing in prop::collection::vec(any::<bool>(), 12),
    ) {
        let order = Arc::new(Mutex::new(Vec::new()));
        // Insert in reverse to make sure sorting does not rely on it.
        let mut cases = SerialCases::new();
        for (i, name) in names.iter().rev().enumerate() {
            let order = Arc::clone(&order);
            let name = name.clone();
            let fail = failing[i];
            cases = cases.case(name.clone(), move |t| async move {
                order.lock().unwrap().push(name);
                if fail {
                    return Err(t.fatal("injected failure"));
                }
                Ok(())
            });
        }

        let rt = Runtime::new().unwrap();
        let report = rt.block_on(Runner::default().run_test("TestAccProperty", move |t| async move {
            run_serial_tests_1_level(&t, cases, Duration::ZERO).await;
            Ok(())
        }));

        let expected: Vec<String> = names.iter().cloned().collect();
        prop_assert_eq!(&*order.lock().unwrap(), &expected);
        prop_assert_eq!(report.summary().total(), names.len());

        let ran: BTreeSet<&str> = report.children.iter().map(|c| c.short_name()).collect();
        prop_assert_eq!(ran.len(), names.len());
    }
}
