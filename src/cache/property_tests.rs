//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check cache invariants over generated operation sequences.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Duration;

use crate::cache::{Cache, CacheEntry, EvictionPolicy};
use crate::clock::{Clock, ManualClock};

// == Strategies ==
/// Generates valid cache keys (non-empty)
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_]{1,8}".prop_map(|s| s)
}

fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,64}".prop_map(|s| s)
}

fn policy_strategy() -> impl Strategy<Value = EvictionPolicy> {
    prop_oneof![Just(EvictionPolicy::Lfu), Just(EvictionPolicy::Lru)]
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Write { key: String, value: String },
    /// Write an entry that expires `offset` seconds from now (negative = past)
    WriteExpiring { key: String, value: String, offset: i64 },
    Read { key: String },
    Tick,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| CacheOp::Write { key, value }),
        (valid_key_strategy(), valid_value_strategy(), -5i64..5)
            .prop_map(|(key, value, offset)| CacheOp::WriteExpiring { key, value, offset }),
        valid_key_strategy().prop_map(|key| CacheOp::Read { key }),
        Just(CacheOp::Tick),
    ]
}

fn apply(cache: &Cache<String>, clock: &ManualClock, op: CacheOp) {
    match op {
        CacheOp::Write { key, value } => {
            cache.write(CacheEntry::new(key, value)).unwrap();
        }
        CacheOp::WriteExpiring { key, value, offset } => {
            let at = clock.now() + Duration::seconds(offset);
            cache
                .write(CacheEntry::new(key, value).with_expiration(at))
                .unwrap();
        }
        CacheOp::Read { key } => {
            cache.read(&key);
        }
        CacheOp::Tick => clock.advance(Duration::seconds(1)),
    }
}

fn test_cache(max_size: usize, policy: EvictionPolicy) -> (Cache<String>, ManualClock) {
    let clock = ManualClock::new();
    let cache = Cache::new(max_size, policy).with_clock(Arc::new(clock.clone()));
    (cache, clock)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // After purge the cache never holds more than max_size entries and none
    // of the remaining entries is expired.
    #[test]
    fn prop_purge_enforces_size_bound(
        policy in policy_strategy(),
        max_size in 1usize..10,
        ops in prop::collection::vec(cache_op_strategy(), 1..80)
    ) {
        let (cache, clock) = test_cache(max_size, policy);
        let mut written = HashSet::new();

        for op in ops {
            if let CacheOp::Write { key, .. } | CacheOp::WriteExpiring { key, .. } = &op {
                written.insert(key.clone());
            }
            apply(&cache, &clock, op);
        }
        cache.purge();

        prop_assert!(cache.size() <= max_size, "size {} exceeds {}", cache.size(), max_size);
        // Nothing is invalidated here, so a stored key reads None only if expired
        for key in written.iter().filter(|k| cache.contains_key(k)) {
            prop_assert!(cache.read(key).is_some(), "expired entry {} survived purge", key);
        }
    }

    // A second purge with no activity in between removes nothing.
    #[test]
    fn prop_purge_is_idempotent(
        policy in policy_strategy(),
        max_size in 1usize..10,
        ops in prop::collection::vec(cache_op_strategy(), 1..80)
    ) {
        let (cache, clock) = test_cache(max_size, policy);
        for op in ops {
            apply(&cache, &clock, op);
        }

        cache.purge();
        let size = cache.size();
        let second = cache.purge();

        prop_assert_eq!(second.total(), 0);
        prop_assert_eq!(cache.size(), size);
    }

    // Writing then reading a key returns the written payload.
    #[test]
    fn prop_roundtrip_storage(
        policy in policy_strategy(),
        key in valid_key_strategy(),
        value in valid_value_strategy()
    ) {
        let (cache, _clock) = test_cache(10, policy);

        cache.write(CacheEntry::new(key.clone(), value.clone())).unwrap();

        let view = cache.read(&key).unwrap();
        prop_assert_eq!(view.data(), &value);
        prop_assert_eq!(view.key(), key.as_str());
    }

    // Overwriting a key keeps its hit count.
    #[test]
    fn prop_overwrite_preserves_frequency(
        key in valid_key_strategy(),
        reads in 0u64..20,
        value in valid_value_strategy()
    ) {
        let (cache, _clock) = test_cache(10, EvictionPolicy::Lfu);
        cache.write(CacheEntry::new(key.clone(), "first".to_string())).unwrap();
        for _ in 0..reads {
            cache.read(&key);
        }

        cache.write(CacheEntry::new(key.clone(), value.clone())).unwrap();

        let view = cache.read(&key).unwrap();
        prop_assert_eq!(view.data(), &value);
        prop_assert_eq!(view.frequency(), reads + 1);
    }

    // Rejected writes never change the cache.
    #[test]
    fn prop_rejected_writes_leave_size_unchanged(
        keys in prop::collection::vec(valid_key_strategy(), 0..10),
        bad_key in valid_key_strategy()
    ) {
        let (cache, _clock) = test_cache(100, EvictionPolicy::Lru);
        for key in &keys {
            cache.write(CacheEntry::new(key.clone(), "v".to_string())).unwrap();
        }
        let size = cache.size();

        let mut invalid = CacheEntry::new(bad_key, "v".to_string());
        invalid.set_valid(false);
        prop_assert!(cache.write(invalid).is_err());
        prop_assert!(cache.write(CacheEntry::new("", "v".to_string())).is_err());

        prop_assert_eq!(cache.size(), size);
    }

    // LFU purge keeps the most read entries.
    #[test]
    fn prop_lfu_keeps_most_frequent(
        reads in prop::collection::hash_map(valid_key_strategy(), 0u64..10, 2..12),
        max_size in 1usize..6
    ) {
        let (cache, _clock) = test_cache(max_size, EvictionPolicy::Lfu);
        for (key, count) in &reads {
            cache.write(CacheEntry::new(key.clone(), key.clone())).unwrap();
            for _ in 0..*count {
                cache.read(key);
            }
        }

        cache.purge();

        let kept: HashSet<&String> = reads.keys().filter(|k| cache.contains_key(k)).collect();
        let min_kept = kept.iter().map(|k| reads[*k]).min().unwrap_or(u64::MAX);
        for (key, count) in &reads {
            if !kept.contains(key) {
                prop_assert!(*count <= min_kept, "evicted {} ({}) over a kept entry ({})", key, count, min_kept);
            }
        }
    }

    // LRU purge keeps the most recently touched entries.
    #[test]
    fn prop_lru_keeps_most_recent(
        keys in prop::collection::hash_set(valid_key_strategy(), 2..12),
        touches in prop::collection::vec(any::<prop::sample::Index>(), 0..20),
        max_size in 1usize..6
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let (cache, clock) = test_cache(max_size, EvictionPolicy::Lru);
        let mut last_touch: HashMap<String, i64> = HashMap::new();
        let mut tick = 0i64;

        for key in &keys {
            cache.write(CacheEntry::new(key.clone(), key.clone())).unwrap();
            last_touch.insert(key.clone(), tick);
            clock.advance(Duration::seconds(1));
            tick += 1;
        }
        for index in touches {
            let key = index.get(&keys);
            cache.read(key);
            last_touch.insert(key.clone(), tick);
            clock.advance(Duration::seconds(1));
            tick += 1;
        }

        cache.purge();

        let mut by_recency: Vec<&String> = keys.iter().collect();
        by_recency.sort_by_key(|k| std::cmp::Reverse(last_touch[*k]));
        let expected: HashSet<&String> = by_recency.into_iter().take(max_size).collect();
        for key in &keys {
            prop_assert_eq!(cache.contains_key(key), expected.contains(key), "key {}", key);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // After invalidate_all every live key triggers exactly one notice on its
    // next read.
    #[test]
    fn prop_invalidate_all_notifies_once_per_key(
        keys in prop::collection::hash_set(valid_key_strategy(), 1..10)
    ) {
        let notices = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&notices);
        let cache = Cache::new(100, EvictionPolicy::Lru).with_listener(
            move |cache: &Cache<String>, key: &str| {
                seen.fetch_add(1, Ordering::SeqCst);
                cache.write(CacheEntry::new(key, "fresh".to_string())).unwrap();
            },
        );
        for key in &keys {
            cache.write(CacheEntry::new(key.clone(), "stale".to_string())).unwrap();
        }

        cache.invalidate_all();
        for key in &keys {
            let view = cache.read(key).unwrap();
            prop_assert_eq!(view.data(), "fresh");
            // Refreshed, so a second read does not notify again
            cache.read(key);
        }

        prop_assert_eq!(notices.load(Ordering::SeqCst), keys.len());
    }
}
