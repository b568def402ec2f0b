//! Concurrent lookups, location ownership and log sink isolation.

use domstore_core::{CoreError, EngineStore, Store, StoreConfig, StoreKind};
use domstore_storage::{InMemoryEngine, StorageError};
use domstore_testkit::prelude::*;
use std::fs;
use std::thread;

#[test]
fn lookups_run_concurrently() {
    let dir = TestDir::new();
    let hosts = numbered_hosts(500);
    let mut lines = hosts.clone();
    lines.push("example.com".to_string());
    let input = dir.write_input(&lines);

    for kind in StoreKind::all() {
        let testdir = dir.path().join(kind.name());
        let mut store = kind.build(StoreConfig::default());
        store.load(&input, &testdir).unwrap();

        let store_ref = store.as_ref();
        thread::scope(|scope| {
            for chunk in hosts.chunks(100) {
                scope.spawn(move || {
                    for host in chunk {
                        assert!(store_ref.test(host).unwrap());
                        assert!(store_ref.test("www.example.com").unwrap());
                        assert!(!store_ref.test(&format!("{host}.invalid")).unwrap());
                    }
                });
            }
        });

        store.teardown().unwrap();
    }
}

#[test]
fn location_is_exclusive_while_loaded() {
    let dir = TestDir::new();
    let input = dir.write_input(&["example.com"]);

    let mut first = EngineStore::new(InMemoryEngine::new());
    first.load(&input, &dir.testdir()).unwrap();

    let mut second = EngineStore::new(InMemoryEngine::new());
    let err = second.load(&input, &dir.testdir()).unwrap_err();
    assert!(matches!(err, CoreError::Storage(StorageError::Locked { .. })));

    first.teardown().unwrap();
    second.load(&input, &dir.testdir()).unwrap();
    second.teardown().unwrap();
}

#[test]
fn concurrent_loads_keep_separate_logs() {
    let dir = TestDir::new();
    let input = dir.write_input(&numbered_hosts(50));
    let left = dir.path().join("left");
    let right = dir.path().join("right");

    thread::scope(|scope| {
        for (testdir, batch_size) in [(&left, 5), (&right, 25)] {
            let input = &input;
            scope.spawn(move || {
                let config = StoreConfig::new().batch_size(batch_size);
                let mut store = EngineStore::with_config(InMemoryEngine::new(), config);
                store.load(input, testdir).unwrap();
                store.teardown().unwrap();
            });
        }
    });

    let count = |dir: &std::path::Path| {
        fs::read_to_string(dir.join("memory-output.log"))
            .unwrap()
            .matches("committed batch")
            .count()
    };
    assert_eq!(count(&left), 10);
    assert_eq!(count(&right), 2);
}
