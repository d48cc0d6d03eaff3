//! Set-Associative Cache Unit Tests.
//!
//! Exercises lookup, install, eviction exposure, and the per-set
//! bookkeeping (ownership counters and the utility monitor) directly
//! against `Cache`. All addresses here are line addresses.

use memsys_core::cache::policies::WayPartition;
use memsys_core::cache::{Cache, CacheResult};
use memsys_core::config::{CacheLevelConfig, ReplacementPolicy};

// ──────────────────────────────────────────────────────────
// Helper: build a test cache
// ──────────────────────────────────────────────────────────

const LINE_SIZE: u64 = 64;

/// Builds a cache of `sets` x `ways` with 64-byte lines.
fn test_cache(sets: u64, ways: u64, policy: ReplacementPolicy) -> Cache {
    let config = CacheLevelConfig {
        size: sets * ways * LINE_SIZE,
        ways,
        policy,
        latency: 1,
    };
    Cache::new(&config, LINE_SIZE, &WayPartition::default())
}

/// Asserts the per-core ownership counters match the valid lines of every
/// set.
fn assert_ownership(cache: &Cache) {
    for set_index in 0..cache.num_sets() {
        let set = cache.set(set_index);
        for core in 0..2 {
            let owned = set
                .lines
                .iter()
                .filter(|line| line.valid && line.core_id == core)
                .count() as u64;
            assert_eq!(
                owned, set.ways_per_core[core],
                "ownership counter for core {} diverged in set {}",
                core, set_index
            );
        }
    }
}

// ══════════════════════════════════════════════════════════
// 1. Lookup
// ══════════════════════════════════════════════════════════

/// First access to any address is a compulsory miss; no install happens
/// until the caller asks for one.
#[test]
fn cold_miss_does_not_install() {
    let mut cache = test_cache(2, 2, ReplacementPolicy::Lru);

    assert_eq!(cache.access(0x10, false, 0, 1), CacheResult::Miss);
    assert_eq!(cache.access(0x10, false, 0, 2), CacheResult::Miss);
    assert_eq!(cache.stats.read_access, 2);
    assert_eq!(cache.stats.read_miss, 2);
}

/// Once installed, repeated accesses to the same line keep hitting.
#[test]
fn install_then_hit_is_idempotent() {
    let mut cache = test_cache(2, 2, ReplacementPolicy::Lru);

    cache.access(0x10, false, 0, 1);
    cache.install(0x10, false, 0, 1);

    assert_eq!(cache.access(0x10, false, 0, 2), CacheResult::Hit);
    assert_eq!(cache.access(0x10, false, 0, 3), CacheResult::Hit);
}

/// A line owned by one core is invisible to the other, even at the same
/// address.
#[test]
fn cores_never_hit_each_others_lines() {
    let mut cache = test_cache(2, 2, ReplacementPolicy::Lru);

    cache.install(0x10, false, 0, 1);

    assert_eq!(cache.access(0x10, false, 0, 2), CacheResult::Hit);
    assert_eq!(cache.access(0x10, false, 1, 3), CacheResult::Miss);
}

/// A write hit marks the line dirty; a later read hit leaves it dirty.
#[test]
fn write_hit_sets_dirty_and_it_sticks() {
    let mut cache = test_cache(1, 2, ReplacementPolicy::Lru);

    cache.install(0x4, false, 0, 1);
    assert!(!cache.set(0).lines[0].dirty);

    cache.access(0x4, true, 0, 2);
    assert!(cache.set(0).lines[0].dirty);

    cache.access(0x4, false, 0, 3);
    assert!(cache.set(0).lines[0].dirty, "read hit must not clear dirty");
}

// ══════════════════════════════════════════════════════════
// 2. Install and eviction exposure
// ══════════════════════════════════════════════════════════

/// After an install, exactly one way holds the new tag with the requesting
/// core and the install timestamp.
#[test]
fn install_postcondition() {
    let mut cache = test_cache(4, 2, ReplacementPolicy::Lru);
    let line_addr = 0x2b;

    cache.install(line_addr, true, 1, 77);

    let set_index = (line_addr & cache.index_mask()) as usize;
    let tag = line_addr >> cache.index_bits();
    let set = cache.set(set_index);
    let matching: Vec<_> = set
        .lines
        .iter()
        .filter(|line| line.valid && line.tag == tag && line.core_id == 1)
        .collect();

    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].last_access_time, 77);
    assert!(matching[0].dirty, "a store install starts dirty");
}

/// The displaced line comes back from `install`; a clean victim is not
/// counted as a dirty eviction.
#[test]
fn install_returns_displaced_line() {
    let mut cache = test_cache(1, 1, ReplacementPolicy::Lru);

    let first = cache.install(0x1, false, 0, 1);
    assert!(!first.valid, "cold install displaces an invalid line");

    let second = cache.install(0x2, false, 0, 2);
    assert!(second.valid);
    assert_eq!(second.tag, 0x1);
    assert_eq!(cache.stats.dirty_evicts, 0);
}

/// Displacing a dirty line bumps the dirty eviction counter and the
/// returned snapshot carries the dirty bit.
#[test]
fn dirty_eviction_is_counted_and_exposed() {
    let mut cache = test_cache(1, 1, ReplacementPolicy::Lru);

    cache.install(0x1, true, 0, 1);
    let evicted = cache.install(0x2, false, 0, 2);

    assert!(evicted.valid && evicted.dirty);
    assert_eq!(evicted.tag, 0x1);
    assert_eq!(cache.stats.dirty_evicts, 1);
}

/// Address decomposition is invertible: splicing the tag back over the set
/// index reproduces the line address.
#[test]
fn decomposition_round_trip() {
    let cache = test_cache(8, 2, ReplacementPolicy::Lru);

    for line_addr in [0u64, 1, 7, 8, 0x123, 0xdead_beef, u64::MAX >> 8] {
        let tag = line_addr >> cache.index_bits();
        let index = line_addr & cache.index_mask();
        assert_eq!((tag << cache.index_bits()) | index, line_addr);
    }
}

// ══════════════════════════════════════════════════════════
// 3. Per-core ownership counters
// ══════════════════════════════════════════════════════════

/// The ownership counters track valid lines per core through fills and
/// evictions from both cores.
#[test]
fn ownership_counters_stay_consistent() {
    let mut cache = test_cache(2, 4, ReplacementPolicy::Lru);

    // Interleave fills from both cores across both sets, overflowing the
    // sets so evictions transfer ownership.
    for i in 0..24u64 {
        let core = (i % 2) as usize;
        let line_addr = i * 3 + core as u64;
        if cache.access(line_addr, i % 5 == 0, core, i) == CacheResult::Miss {
            cache.install(line_addr, i % 5 == 0, core, i);
        }
        assert_ownership(&cache);
    }
}

// ══════════════════════════════════════════════════════════
// 4. Utility monitor
// ══════════════════════════════════════════════════════════

/// Hits advance the per-way counter of the way that hit; misses advance
/// the set-wide miss counter.
#[test]
fn umon_tracks_hits_per_way_and_misses_per_set() {
    let mut cache = test_cache(1, 2, ReplacementPolicy::Lru);

    cache.access(0x1, false, 0, 1); // miss
    cache.install(0x1, false, 0, 1); // way 0
    cache.access(0x2, false, 0, 2); // miss
    cache.install(0x2, false, 0, 2); // way 1

    cache.access(0x1, false, 0, 3); // hit way 0
    cache.access(0x1, false, 0, 4); // hit way 0
    cache.access(0x2, false, 0, 5); // hit way 1

    let umon = &cache.set(0).umon;
    assert_eq!(umon.total_hits[0], 2);
    assert_eq!(umon.total_hits[1], 1);
    assert_eq!(umon.total_misses, 2);
}

// ══════════════════════════════════════════════════════════
// 5. Victim selection through the cache
// ══════════════════════════════════════════════════════════

/// Invalid ways are always filled first, lowest index first, regardless of
/// policy.
#[test]
fn invalid_ways_fill_in_order() {
    let mut cache = test_cache(1, 4, ReplacementPolicy::Random);

    for (i, line_addr) in [0x10u64, 0x20, 0x30, 0x40].iter().enumerate() {
        assert_eq!(cache.find_victim(0, 0), i);
        cache.install(*line_addr, false, 0, i as u64);
    }
}

/// Classic LRU eviction: fill eight ways, refresh the first line, then
/// install a ninth. The victim must be the second-oldest line.
#[test]
fn lru_evicts_oldest_after_refresh() {
    let mut cache = test_cache(1, 8, ReplacementPolicy::Lru);

    for t in 0..8u64 {
        cache.access(t, false, 0, t + 1);
        cache.install(t, false, 0, t + 1);
    }

    // Refresh line 0; line 1 becomes the oldest.
    assert_eq!(cache.access(0, false, 0, 9), CacheResult::Hit);

    let evicted = cache.install(8, false, 0, 10);
    assert_eq!(evicted.tag, 1);
}

/// Read and write misses are accounted separately, and accesses always
/// dominate misses.
#[test]
fn read_write_counters_split() {
    let mut cache = test_cache(1, 1, ReplacementPolicy::Lru);

    cache.access(0x1, false, 0, 1); // read miss
    cache.install(0x1, false, 0, 1);
    cache.access(0x1, false, 0, 2); // read hit
    cache.access(0x1, true, 0, 3); // write hit
    cache.access(0x2, true, 0, 4); // write miss

    assert_eq!(cache.stats.read_access, 2);
    assert_eq!(cache.stats.read_miss, 1);
    assert_eq!(cache.stats.write_access, 2);
    assert_eq!(cache.stats.write_miss, 1);
    assert!(cache.stats.read_access >= cache.stats.read_miss);
    assert!(cache.stats.write_access >= cache.stats.write_miss);
}
