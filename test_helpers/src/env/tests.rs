//! Unit tests for the environment guards.

use std::sync::{Arc, Barrier};
use std::thread;

use super::{remove_var, scope, set_var};

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[test]
fn set_var_restores_original() {
    let key = "CFGTREE_HELPERS_SET";
    let _base = set_var(key, "orig");
    {
        let _guard = set_var(key, "temp");
        assert_eq!(env_value(key).as_deref(), Some("temp"));
    }
    assert_eq!(env_value(key).as_deref(), Some("orig"));
}

#[test]
fn remove_var_restores_value() {
    let key = "CFGTREE_HELPERS_REMOVE";
    let _base = set_var(key, "present");
    {
        let _guard = remove_var(key);
        assert_eq!(env_value(key), None);
    }
    assert_eq!(env_value(key).as_deref(), Some("present"));
}

#[test]
fn stacked_guards_restore_in_lifo_order() {
    let key = "CFGTREE_HELPERS_STACK";
    let clean = remove_var(key);
    let first = set_var(key, "v1");
    let second = set_var(key, "v2");
    assert_eq!(env_value(key).as_deref(), Some("v2"));
    drop(second);
    assert_eq!(env_value(key).as_deref(), Some("v1"));
    drop(first);
    assert_eq!(env_value(key), None);
    drop(clean);
}

#[test]
fn scope_sets_and_unsets_together() {
    let keep = set_var("CFGTREE_HELPERS_SCOPE_B", "before");
    {
        let _scope = scope([
            ("CFGTREE_HELPERS_SCOPE_A", Some("a")),
            ("CFGTREE_HELPERS_SCOPE_B", None),
        ]);
        assert_eq!(env_value("CFGTREE_HELPERS_SCOPE_A").as_deref(), Some("a"));
        assert_eq!(env_value("CFGTREE_HELPERS_SCOPE_B"), None);
    }
    assert_eq!(env_value("CFGTREE_HELPERS_SCOPE_A"), None);
    assert_eq!(env_value("CFGTREE_HELPERS_SCOPE_B").as_deref(), Some("before"));
    drop(keep);
}

#[test]
fn concurrent_keys_restore_independently() {
    const THREADS: usize = 4;
    const ITERATIONS: usize = 8;
    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let waiter = Arc::clone(&barrier);
            thread::spawn(move || {
                let key = format!("CFGTREE_HELPERS_THREAD_{i}");
                let _base = set_var(&key, "original");
                waiter.wait();
                for iter in 0..ITERATIONS {
                    let value = format!("value-{i}-{iter}");
                    let guard = set_var(&key, &value);
                    assert_eq!(env_value(&key), Some(value));
                    drop(guard);
                    assert_eq!(env_value(&key).as_deref(), Some("original"));
                }
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().is_ok(), "worker thread panicked");
    }
}
