//! Cache replacement policies.
//!
//! Implements victim selection for set-associative caches.
//!
//! # Policies
//!
//! - `Lru`: evict the least recently used line.
//! - `Random`: evict a pseudo-random line.
//! - `Swp`: static way partitioning between two cores.
//! - `Dwp`: dynamic way partitioning driven by the per-set utility monitor.
//!
//! Policies only ever choose among fully valid sets; the cache fills
//! invalid ways first.

/// Dynamic way partitioning.
pub mod dwp;
/// Least recently used replacement.
pub mod lru;
/// Random replacement.
pub mod random;
/// Static way partitioning.
pub mod swp;

pub use dwp::DwpPolicy;
pub use lru::LruPolicy;
pub use random::RandomPolicy;
pub use swp::SwpPolicy;

use std::cell::Cell;
use std::rc::Rc;

use crate::cache::CacheSet;
use crate::config::ReplacementPolicy as PolicyKind;

/// Fixed LFSR seed so every run replays the same victim sequence.
const RNG_SEED: u64 = 123_456_789;

/// Trait for cache replacement policies.
///
/// The replacement metadata (recency stamps, ownership) lives on the cache
/// lines themselves, so policies inspect the set rather than carrying
/// shadow state per way.
pub trait ReplacementPolicy {
    /// Selects the victim way in a fully valid set.
    ///
    /// # Arguments
    ///
    /// * `set` - The set to evict from; every way is valid.
    /// * `core_id` - The core requesting the fill.
    ///
    /// # Returns
    ///
    /// The index of the way to evict.
    fn find_victim(&mut self, set: &CacheSet, core_id: usize) -> usize;
}

/// Way-partitioning state shared by every cache in the memory system.
///
/// `swp_core0_ways` is the configured static quota for core 0; core 1 is
/// entitled to the remaining ways. The dynamic quota is a single shared
/// counter: any DWP victim search in any set of any cache overwrites it, so
/// the partition always reflects the most recently observed set.
#[derive(Clone, Debug, Default)]
pub struct WayPartition {
    /// Static quota of ways reserved for core 0.
    pub swp_core0_ways: u64,
    /// Dynamic quota for core 0, recomputed on every DWP victim search.
    pub dwp_core0_ways: Rc<Cell<u64>>,
}

/// Builds the boxed policy object for a cache level.
pub fn build(kind: PolicyKind, partition: &WayPartition) -> Box<dyn ReplacementPolicy> {
    match kind {
        PolicyKind::Lru => Box::new(LruPolicy),
        PolicyKind::Random => Box::new(RandomPolicy::new(RNG_SEED)),
        PolicyKind::Swp => Box::new(SwpPolicy::new(partition.swp_core0_ways)),
        PolicyKind::Dwp => Box::new(DwpPolicy::new(Rc::clone(&partition.dwp_core0_ways))),
    }
}
