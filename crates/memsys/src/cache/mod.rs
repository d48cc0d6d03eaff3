//! Set-associative cache model.
//!
//! One `Cache` instance models a single level: a grid of sets by ways, a
//! boxed replacement policy, and hit/miss counters. It provides:
//! 1. **Lookup:** `access` searches the indexed set and stamps recency on a hit.
//! 2. **Fill:** `install` selects a victim, records dirty evictions, and returns the displaced line.
//! 3. **Bookkeeping:** per-core ownership counts and a per-set utility monitor, consumed by the partitioning policies.
//!
//! A line matches only when its owning core matches the requester; two cores
//! never hit each other's lines, even in a shared cache.

/// Cache replacement policy implementations (LRU, random, SWP, DWP).
pub mod policies;

use self::policies::{ReplacementPolicy, WayPartition};
use crate::common::MAX_WAYS_PER_CACHE_SET;
use crate::config::CacheLevelConfig;
use crate::stats::CacheStats;

/// A single cache line.
///
/// Lines are created invalid and become valid on install; a later install
/// into the same way overwrites them.
#[derive(Clone, Copy, Debug, Default)]
pub struct CacheLine {
    /// Whether this way holds a line.
    pub valid: bool,
    /// Whether the line has been written since install.
    pub dirty: bool,
    /// Address bits above the set index.
    pub tag: u64,
    /// Core that owns the line.
    pub core_id: usize,
    /// Cycle stamp of the most recent hit or install.
    pub last_access_time: u64,
}

/// Per-set utility monitor.
///
/// Tracks hits per way and total misses for the set; the dynamic
/// way-partitioning policy reduces these to a per-core utility estimate.
#[derive(Clone, Copy, Debug, Default)]
pub struct Umon {
    /// Hit count per way, attributed to whichever core owns the way when
    /// the counter is read.
    pub total_hits: [u64; MAX_WAYS_PER_CACHE_SET],
    /// Miss count for the whole set.
    pub total_misses: u64,
}

/// One cache set: the ways plus per-core ownership counters and the UMON.
#[derive(Clone, Debug)]
pub struct CacheSet {
    /// The ways of the set.
    pub lines: Vec<CacheLine>,
    /// Number of valid lines owned by each core. Always sums to the number
    /// of valid lines in the set.
    pub ways_per_core: [u64; 2],
    /// Utility monitor for this set.
    pub umon: Umon,
}

impl CacheSet {
    fn new(ways: usize) -> Self {
        Self {
            lines: vec![CacheLine::default(); ways],
            ways_per_core: [0; 2],
            umon: Umon::default(),
        }
    }
}

/// Whether a cache access hit or missed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheResult {
    /// The access hit the cache.
    Hit,
    /// The access missed the cache.
    Miss,
}

/// A single cache module.
pub struct Cache {
    sets: Vec<CacheSet>,
    ways: usize,
    index_bits: u32,
    index_mask: u64,
    latency: u64,
    policy: Box<dyn ReplacementPolicy>,
    /// Cumulative access counters for this cache.
    pub stats: CacheStats,
}

impl Cache {
    /// Creates a cache from its level configuration and the shared line size.
    ///
    /// `partition` supplies the quota state consumed by the SWP and DWP
    /// policies; levels running LRU or random ignore it.
    ///
    /// # Panics
    ///
    /// Panics when the geometry is structurally invalid (associativity
    /// outside 1..=16 or a non-power-of-two set count). Driver-supplied
    /// configurations are expected to be validated beforehand.
    pub fn new(config: &CacheLevelConfig, line_size: u64, partition: &WayPartition) -> Self {
        let ways = config.ways as usize;
        assert!(
            ways >= 1 && ways <= MAX_WAYS_PER_CACHE_SET,
            "cache associativity {} outside 1..={}",
            ways,
            MAX_WAYS_PER_CACHE_SET
        );
        let num_sets = (config.size / line_size / config.ways) as usize;
        assert!(
            num_sets >= 1 && num_sets.is_power_of_two(),
            "cache set count {} is not a power of two",
            num_sets
        );

        Self {
            sets: vec![CacheSet::new(ways); num_sets],
            ways,
            index_bits: num_sets.trailing_zeros(),
            index_mask: num_sets as u64 - 1,
            latency: config.latency,
            policy: policies::build(config.policy, partition),
            stats: CacheStats::default(),
        }
    }

    /// Looks up a line address for `core_id` and returns hit or miss.
    ///
    /// On a hit the line's dirty bit absorbs `is_write`, its recency stamp
    /// becomes `now`, and the set's per-way hit counter advances. On a miss
    /// only counters change; installing the line is the caller's decision.
    pub fn access(&mut self, line_addr: u64, is_write: bool, core_id: usize, now: u64) -> CacheResult {
        let set_index = (line_addr & self.index_mask) as usize;
        let tag = line_addr >> self.index_bits;

        if is_write {
            self.stats.write_access += 1;
        } else {
            self.stats.read_access += 1;
        }

        let set = &mut self.sets[set_index];
        for (way, line) in set.lines.iter_mut().enumerate() {
            if line.valid && line.core_id == core_id && line.tag == tag {
                if is_write {
                    line.dirty = true;
                }
                line.last_access_time = now;
                set.umon.total_hits[way] += 1;
                return CacheResult::Hit;
            }
        }

        if is_write {
            self.stats.write_miss += 1;
        } else {
            self.stats.read_miss += 1;
        }
        set.umon.total_misses += 1;
        CacheResult::Miss
    }

    /// Installs a line for `core_id`, returning the displaced line.
    ///
    /// The returned snapshot is the way's content before the overwrite; when
    /// it is valid and dirty the caller owes a write-back to the next level.
    pub fn install(&mut self, line_addr: u64, is_write: bool, core_id: usize, now: u64) -> CacheLine {
        let set_index = (line_addr & self.index_mask) as usize;
        let victim_way = self.find_victim(set_index, core_id);
        let tag = line_addr >> self.index_bits;

        let set = &mut self.sets[set_index];
        let evicted = set.lines[victim_way];
        if evicted.valid && evicted.dirty {
            self.stats.dirty_evicts += 1;
        }
        if evicted.valid {
            set.ways_per_core[evicted.core_id] -= 1;
        }

        set.lines[victim_way] = CacheLine {
            valid: true,
            dirty: is_write,
            tag,
            core_id,
            last_access_time: now,
        };
        set.ways_per_core[core_id] += 1;

        evicted
    }

    /// Chooses the way to overwrite in `set_index` for a fill by `core_id`.
    ///
    /// An invalid way is always preferred, regardless of policy; the policy
    /// object only ever decides among fully valid sets.
    pub fn find_victim(&mut self, set_index: usize, core_id: usize) -> usize {
        let set = &self.sets[set_index];
        if let Some(way) = set.lines.iter().position(|line| !line.valid) {
            return way;
        }
        self.policy.find_victim(set, core_id)
    }

    /// The number of sets.
    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }

    /// The associativity.
    pub fn ways(&self) -> usize {
        self.ways
    }

    /// Bits of the line address used as the set index.
    pub fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Mask selecting the set index bits of a line address.
    pub fn index_mask(&self) -> u64 {
        self.index_mask
    }

    /// Hit latency of this level in cycles.
    pub fn latency(&self) -> u64 {
        self.latency
    }

    /// Read access to one set, for inspection and tests.
    pub fn set(&self, index: usize) -> &CacheSet {
        &self.sets[index]
    }
}
