//! Static way partitioning (SWP) replacement policy.
//!
//! Splits each set between two cores: core 0 is entitled to a fixed quota
//! of ways and core 1 to the remainder. While core 0 holds fewer ways than
//! its quota the victim is stolen from core 1; otherwise each core evicts
//! its own oldest line, so a core that is at or over quota recycles itself.

use super::ReplacementPolicy;
use crate::cache::{CacheLine, CacheSet};

/// Static way-partitioning policy with a fixed quota for core 0.
pub struct SwpPolicy {
    core0_quota: u64,
}

impl SwpPolicy {
    /// Creates the policy with the given quota of ways for core 0.
    pub fn new(core0_quota: u64) -> Self {
        Self { core0_quota }
    }
}

impl ReplacementPolicy for SwpPolicy {
    fn find_victim(&mut self, set: &CacheSet, core_id: usize) -> usize {
        partitioned_victim(set, core_id, self.core0_quota)
    }
}

/// Selects the oldest line owned by the eviction target core.
///
/// The target is core 1 while core 0 is under its quota, and the requesting
/// core otherwise. When the target core owns nothing in the set (a core
/// faulting into a set filled entirely by the other core), selection falls
/// back to plain LRU over the whole set.
pub(super) fn partitioned_victim(set: &CacheSet, core_id: usize, core0_quota: u64) -> usize {
    let target_core = if set.ways_per_core[0] < core0_quota {
        1
    } else {
        core_id
    };
    match oldest_way(&set.lines, Some(target_core)) {
        Some(way) => way,
        None => oldest_way(&set.lines, None).unwrap_or(0),
    }
}

/// Returns the way holding the oldest line, restricted to lines owned by
/// `owner` when given. Ties resolve to the lowest way index.
pub(super) fn oldest_way(lines: &[CacheLine], owner: Option<usize>) -> Option<usize> {
    let mut victim = None;
    let mut oldest = 0;
    for (way, line) in lines.iter().enumerate() {
        if let Some(core) = owner {
            if line.core_id != core {
                continue;
            }
        }
        if victim.is_none() || line.last_access_time < oldest {
            victim = Some(way);
            oldest = line.last_access_time;
        }
    }
    victim
}
