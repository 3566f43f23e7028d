#![allow(clippy::unwrap_used)]

use std::time::Duration;

use super::TtlCache;

#[test]
fn test_get_or_load_caches_value() {
    let mut cache: TtlCache<&str, u32> = TtlCache::new(Duration::from_secs(60));
    let mut calls = 0;
    for _ in 0..3 {
        let v: Result<u32, ()> = cache.get_or_load("k", || {
            calls += 1;
            Ok(7)
        });
        assert_eq!(v, Ok(7));
    }
    assert_eq!(calls, 1);
}

#[test]
fn test_zero_ttl_always_reloads() {
    let mut cache: TtlCache<&str, u32> = TtlCache::new(Duration::ZERO);
    let mut calls = 0;
    for _ in 0..3 {
        let _: Result<u32, ()> = cache.get_or_load("k", || {
            calls += 1;
            Ok(calls)
        });
    }
    assert_eq!(calls, 3);
}

#[test]
fn test_expired_entry_is_evicted() {
    let mut cache = TtlCache::new(Duration::from_millis(10));
    cache.insert("k", 1);
    assert_eq!(cache.get(&"k"), Some(1));
    std::thread::sleep(Duration::from_millis(30));
    assert_eq!(cache.get(&"k"), None);
    assert_eq!(cache.len(), 0);
}

#[test]
fn test_errors_are_not_cached() {
    let mut cache: TtlCache<&str, u32> = TtlCache::new(Duration::from_secs(60));
    let first: Result<u32, &str> = cache.get_or_load("k", || Err("offline"));
    assert_eq!(first, Err("offline"));
    assert_eq!(cache.len(), 0);

    let second: Result<u32, &str> = cache.get_or_load("k", || Ok(3));
    assert_eq!(second, Ok(3));
}

#[test]
fn test_invalidate_forces_reload() {
    let mut cache: TtlCache<&str, u32> = TtlCache::new(Duration::from_secs(60));
    cache.insert("k", 1);
    assert!(cache.invalidate(&"k"));
    assert!(!cache.invalidate(&"k"));
    let v: Result<u32, ()> = cache.get_or_load("k", || Ok(2));
    assert_eq!(v, Ok(2));
}

#[test]
fn test_keys_are_independent() {
    let mut cache = TtlCache::new(Duration::from_secs(60));
    cache.insert("bali", 1);
    cache.insert("lombok", 2);
    cache.invalidate(&"bali");
    assert_eq!(cache.get(&"bali"), None);
    assert_eq!(cache.get(&"lombok"), Some(2));
    cache.clear();
    assert_eq!(cache.len(), 0);
}
