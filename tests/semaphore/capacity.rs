//! Environment overrides. These tests mutate the process environment and
//! therefore run one at a time.

use acctest_sync_semaphore::{Semaphore, SemaphoreRegistry, MAX_CAPACITY};
use serial_test::serial;

fn set_env(var: &str, value: &str) {
    // Only called from #[serial] tests.
    unsafe { std::env::set_var(var, value) }
}

fn remove_env(var: &str) {
    unsafe { std::env::remove_var(var) }
}

#[test]
#[serial]
fn positive_override_replaces_default() {
    set_env("ACCTEST_SYNC_IT_LIMIT_A", "3");
    let semaphore = SemaphoreRegistry::new()
        .get_or_create("ClientVPN", "ACCTEST_SYNC_IT_LIMIT_A", 5)
        .unwrap();
    remove_env("ACCTEST_SYNC_IT_LIMIT_A");

    assert_eq!(semaphore.capacity(), 3);
    assert_eq!(semaphore.available(), 3);
}

#[test]
#[serial]
fn invalid_overrides_fall_back_to_default() {
    for raw in ["0", "-1", "abc", "", "2.5"] {
        set_env("ACCTEST_SYNC_IT_LIMIT_B", raw);
        let semaphore = SemaphoreRegistry::new()
            .get_or_create("ClientVPN", "ACCTEST_SYNC_IT_LIMIT_B", 5)
            .unwrap();
        assert_eq!(semaphore.capacity(), 5, "override {raw:?}");
    }
    remove_env("ACCTEST_SYNC_IT_LIMIT_B");
}

#[test]
#[serial]
fn unset_variable_uses_default() {
    remove_env("ACCTEST_SYNC_IT_LIMIT_C");
    let semaphore = Semaphore::builder("WorkSpaces")
        .default_capacity(2)
        .capacity_env_var("ACCTEST_SYNC_IT_LIMIT_C")
        .build()
        .unwrap();

    assert_eq!(semaphore.capacity(), 2);
}

/// The variable is read once, when the name is first requested
#[test]
#[serial]
fn override_is_read_at_creation_only() {
    let registry = SemaphoreRegistry::new();
    set_env("ACCTEST_SYNC_IT_LIMIT_D", "4");
    let first = registry
        .get_or_create("Directory", "ACCTEST_SYNC_IT_LIMIT_D", 1)
        .unwrap();

    set_env("ACCTEST_SYNC_IT_LIMIT_D", "9");
    let again = registry
        .get_or_create("Directory", "ACCTEST_SYNC_IT_LIMIT_D", 1)
        .unwrap();
    remove_env("ACCTEST_SYNC_IT_LIMIT_D");

    assert!(first.ptr_eq(&again));
    assert_eq!(again.capacity(), 4);
}

#[test]
#[serial]
fn override_above_max_capacity_falls_back_to_default() {
    let too_big = (MAX_CAPACITY as u128 + 1).to_string();
    for raw in [too_big.as_str(), "4611686018427387904", "18446744073709551616"] {
        set_env("ACCTEST_SYNC_IT_LIMIT_E", raw);
        let semaphore = SemaphoreRegistry::new()
            .get_or_create("ClientVPN", "ACCTEST_SYNC_IT_LIMIT_E", 5)
            .unwrap();
        assert_eq!(semaphore.capacity(), 5, "override {raw:?}");
    }
    remove_env("ACCTEST_SYNC_IT_LIMIT_E");
}

#[test]
fn default_above_max_capacity_is_rejected() {
    let registry = SemaphoreRegistry::new();
    let err = registry
        .get_or_create("ClientVPN", "ACCTEST_SYNC_IT_UNSET_LIMIT", MAX_CAPACITY + 1)
        .unwrap_err();

    assert!(err.is_config());
    assert!(registry.get("ClientVPN").is_none());
}
