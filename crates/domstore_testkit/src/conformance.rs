//! Store conformance suite.
//!
//! Every backend must pass the same behavioural checks regardless of the
//! engine underneath. Run them from a backend's tests with
//! [`run_store_conformance`] and, for engines that can be wrapped,
//! [`run_fault_conformance`].

use crate::fault::FaultyEngine;
use crate::fixtures::{numbered_hosts, TestDir};
use domstore_core::{
    CoreError, EngineStore, LoadReport, Store, StoreConfig, DEFAULT_BATCH_SIZE,
};
use domstore_storage::{Engine, StorageError};

/// Runs every engine-independent check against stores built by `make`.
///
/// `make` must return a fresh, unloaded store each time it is called.
pub fn run_store_conformance<F>(mut make: F)
where
    F: FnMut() -> Box<dyn Store>,
{
    check_every_entry_found(make());
    check_misses_are_not_errors(make());
    check_root_fallback(make());
    check_idempotent_reopen(make());
    check_batch_boundaries(make());
    check_lifecycle(make());
}

/// Every non-blank trimmed line is found after `load`.
pub fn check_every_entry_found(mut store: Box<dyn Store>) {
    let dir = TestDir::new();
    let input = dir.write_input(&[
        "example.com",
        "",
        "   mail.example.org\t",
        " ",
        "rust-lang.org",
        "xn--bcher-kva.example",
    ]);

    store.load(&input, &dir.testdir()).unwrap();
    for name in [
        "example.com",
        "mail.example.org",
        "rust-lang.org",
        "xn--bcher-kva.example",
    ] {
        assert!(store.test(name).unwrap(), "{} missing {name}", store.id());
    }
    store.teardown().unwrap();
}

/// Empty and absent queries are negative results, not errors.
pub fn check_misses_are_not_errors(mut store: Box<dyn Store>) {
    let dir = TestDir::new();
    let input = dir.write_input(&["example.com"]);

    store.load(&input, &dir.testdir()).unwrap();
    assert!(!store.test("").unwrap());
    assert!(!store.test("absent.net").unwrap());
    assert!(!store.test("a.absent.net").unwrap());
    assert!(!store.test("com").unwrap());
    assert!(!store.test(".").unwrap());
    store.teardown().unwrap();
}

/// A subdomain of a stored root is found through the fallback.
pub fn check_root_fallback(mut store: Box<dyn Store>) {
    let dir = TestDir::new();
    let input = dir.write_input(&["example.com"]);

    store.load(&input, &dir.testdir()).unwrap();
    assert!(store.test("a.example.com").unwrap());
    assert!(store.test("www.example.com.").unwrap());
    assert!(!store.test("a.example.org").unwrap());
    store.teardown().unwrap();
}

/// A second load over the same test directory reuses the built store, even
/// once the input list is gone.
pub fn check_idempotent_reopen(mut store: Box<dyn Store>) {
    let dir = TestDir::new();
    let input = dir.write_input(&["example.com", "rust-lang.org"]);

    store.load(&input, &dir.testdir()).unwrap();
    store.teardown().unwrap();

    dir.remove_input();
    store.load(&input, &dir.testdir()).unwrap();
    assert!(store.test("example.com").unwrap());
    assert!(store.test("rust-lang.org").unwrap());
    store.teardown().unwrap();
}

/// `batch_size * 3 + 5` entries are all retrievable.
pub fn check_batch_boundaries(mut store: Box<dyn Store>) {
    let dir = TestDir::new();
    let hosts = numbered_hosts(DEFAULT_BATCH_SIZE * 3 + 5);
    let input = dir.write_input(&hosts);

    store.load(&input, &dir.testdir()).unwrap();
    for host in &hosts {
        assert!(store.test(host).unwrap(), "{} missing {host}", store.id());
    }
    assert!(!store.test(&format!("h{}.zone0.test", hosts.len())).unwrap());
    store.teardown().unwrap();
}

/// Lifecycle misuse is reported instead of panicking.
pub fn check_lifecycle(mut store: Box<dyn Store>) {
    let dir = TestDir::new();
    let input = dir.write_input(&["example.com"]);

    assert!(matches!(store.test("example.com"), Err(CoreError::NotLoaded)));
    store.load(&input, &dir.testdir()).unwrap();
    assert!(matches!(
        store.load(&input, &dir.testdir()),
        Err(CoreError::AlreadyLoaded)
    ));
    store.teardown().unwrap();
    assert!(matches!(store.test("example.com"), Err(CoreError::Closed)));
    assert!(matches!(store.teardown(), Err(CoreError::Closed)));
}

/// Runs the fault-injection checks against `engine`.
///
/// Clones of `engine` must see the same stores, which holds for on-disk
/// engines and for [`domstore_storage::InMemoryEngine`].
pub fn run_fault_conformance<E>(engine: E)
where
    E: Engine + Clone + 'static,
{
    check_failure_mid_load(engine.clone());
    check_failed_open(engine);
}

/// A failing batch aborts the load; earlier batches stay retrievable.
pub fn check_failure_mid_load<E>(engine: E)
where
    E: Engine + Clone + 'static,
{
    let dir = TestDir::new();
    let hosts = numbered_hosts(20);
    let input = dir.write_input(&hosts);
    let config = StoreConfig::new().batch_size(4);

    let mut faulty = EngineStore::with_config(
        FaultyEngine::new(engine.clone()).fail_commit(2),
        config.clone(),
    );
    let err = faulty.load(&input, &dir.testdir()).unwrap_err();
    assert!(matches!(
        err,
        CoreError::Batch {
            batch: 2,
            source: StorageError::InjectedFault { batch: 2 }
        }
    ));
    assert!(!faulty.is_loaded());

    // The partial store is reused as-is
    let mut store = EngineStore::with_config(engine, config);
    store.load(&input, &dir.testdir()).unwrap();
    assert_eq!(store.last_load(), Some(LoadReport::Reused));
    for host in &hosts[..8] {
        assert!(store.test(host).unwrap(), "committed {host} missing");
    }
    for host in &hosts[8..] {
        assert!(!store.test(host).unwrap(), "uncommitted {host} present");
    }
    store.teardown().unwrap();
}

/// An engine that cannot open leaves nothing behind to reuse.
pub fn check_failed_open<E>(engine: E)
where
    E: Engine + Clone + 'static,
{
    let dir = TestDir::new();
    let input = dir.write_input(&["example.com"]);

    let mut faulty = EngineStore::new(FaultyEngine::new(engine.clone()).fail_open());
    let err = faulty.load(&input, &dir.testdir()).unwrap_err();
    assert!(matches!(err, CoreError::Storage(StorageError::Engine { .. })));

    let location = dir.testdir().join(engine.name());
    assert!(!engine.exists(&location));
}
