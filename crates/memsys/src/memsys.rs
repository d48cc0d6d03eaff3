//! Memory-system orchestrator.
//!
//! Wires the configured topology together and resolves one reference at a
//! time:
//! 1. **Mode A:** a single L1 data cache; hit/miss bookkeeping only, no latency model.
//! 2. **Modes B/C:** split L1 over a unified L2 and DRAM (B uses the fixed DRAM latency).
//! 3. **Mode DEF:** per-core split L1s over a shared L2 and DRAM, with per-core address translation.
//!
//! Dirty evictions propagate downwards: an L1 eviction becomes an L2
//! write-back and an L2 eviction becomes a DRAM write. Write-back delays
//! are never charged to the reference that triggered them.

use std::cell::Cell;
use std::rc::Rc;

use crate::cache::policies::WayPartition;
use crate::cache::{Cache, CacheResult};
use crate::common::AccessType;
use crate::config::{Config, SimMode};
use crate::dram::Dram;
use crate::stats::MemsysStats;
use crate::translate;

/// The memory hierarchy under simulation.
///
/// Owns every cache and the DRAM module required by the active topology,
/// plus the per-reference-type accounting.
pub struct MemorySystem {
    mode: SimMode,
    line_size: u64,
    offset_bits: u32,
    icaches: Vec<Cache>,
    dcaches: Vec<Cache>,
    l2cache: Option<Cache>,
    dram: Option<Dram>,
    dwp_core0_ways: Rc<Cell<u64>>,
    /// Per-reference-type access counts and cumulative delays.
    pub stats: MemsysStats,
}

impl MemorySystem {
    /// Builds the topology selected by `config.mode`.
    ///
    /// # Panics
    ///
    /// Panics when the configuration is structurally invalid; run
    /// `Config::validate` first for a recoverable error instead.
    pub fn new(config: &Config) -> Self {
        let partition = WayPartition {
            swp_core0_ways: config.swp_core0_ways,
            dwp_core0_ways: Rc::new(Cell::new(0)),
        };

        let mut icaches = Vec::new();
        let mut dcaches = Vec::new();
        let mut l2cache = None;
        let mut dram = None;

        match config.mode {
            SimMode::A => {
                dcaches.push(Cache::new(&config.dcache, config.line_size, &partition));
            }
            SimMode::B | SimMode::C => {
                icaches.push(Cache::new(&config.icache, config.line_size, &partition));
                dcaches.push(Cache::new(&config.dcache, config.line_size, &partition));
                l2cache = Some(Cache::new(&config.l2cache, config.line_size, &partition));
                dram = Some(Dram::new(&config.dram, config.mode == SimMode::B));
            }
            SimMode::Def => {
                assert!(
                    config.num_cores == 2,
                    "multicore topology requires exactly two cores, got {}",
                    config.num_cores
                );
                for _ in 0..config.num_cores {
                    icaches.push(Cache::new(&config.icache, config.line_size, &partition));
                    dcaches.push(Cache::new(&config.dcache, config.line_size, &partition));
                }
                l2cache = Some(Cache::new(&config.l2cache, config.line_size, &partition));
                dram = Some(Dram::new(&config.dram, false));
            }
        }

        Self {
            mode: config.mode,
            line_size: config.line_size,
            offset_bits: translate::page_offset_bits(config.line_size),
            icaches,
            dcaches,
            l2cache,
            dram,
            dwp_core0_ways: partition.dwp_core0_ways,
            stats: MemsysStats::default(),
        }
    }

    /// Resolves one reference and returns its delay in cycles.
    ///
    /// `addr` is a byte address; all cache transactions happen at line
    /// granularity. `now` is the driver's cycle stamp for this reference
    /// and only needs to be monotonically nondecreasing.
    pub fn access(&mut self, addr: u64, kind: AccessType, core_id: usize, now: u64) -> u64 {
        let line_addr = addr / self.line_size;

        let delay = match self.mode {
            SimMode::A => self.access_mode_a(line_addr, kind, core_id, now),
            SimMode::B | SimMode::C => self.access_through_l1(line_addr, kind, core_id, now),
            SimMode::Def => {
                let p_line_addr = translate::to_physical(line_addr, core_id, self.offset_bits);
                self.access_through_l1(p_line_addr, kind, core_id, now)
            }
        };

        match kind {
            AccessType::Ifetch => {
                self.stats.ifetch_access += 1;
                self.stats.ifetch_delay += delay;
            }
            AccessType::Load => {
                self.stats.load_access += 1;
                self.stats.load_delay += delay;
            }
            AccessType::Store => {
                self.stats.store_access += 1;
                self.stats.store_delay += delay;
            }
        }

        delay
    }

    /// Single-level topology: hit/miss bookkeeping on the data cache only.
    fn access_mode_a(&mut self, line_addr: u64, kind: AccessType, core_id: usize, now: u64) -> u64 {
        // No instruction cache in this topology; fetches are counted at the
        // system level but touch nothing.
        let is_write = match kind {
            AccessType::Ifetch => return 0,
            AccessType::Load => false,
            AccessType::Store => true,
        };

        let dcache = &mut self.dcaches[0];
        if dcache.access(line_addr, is_write, core_id, now) == CacheResult::Miss {
            dcache.install(line_addr, is_write, core_id, now);
        }
        0
    }

    /// Full-hierarchy access: L1 by reference type, then L2, then DRAM.
    fn access_through_l1(
        &mut self,
        line_addr: u64,
        kind: AccessType,
        core_id: usize,
        now: u64,
    ) -> u64 {
        let is_write = kind == AccessType::Store;

        let mut delay = self.l1_slot(kind, core_id).latency();
        let outcome = self
            .l1_slot(kind, core_id)
            .access(line_addr, is_write, core_id, now);

        if outcome == CacheResult::Miss {
            delay += self.l2_access(line_addr, false, core_id, now);
            let evicted = self
                .l1_slot(kind, core_id)
                .install(line_addr, is_write, core_id, now);
            if kind != AccessType::Ifetch && evicted.valid && evicted.dirty {
                let l1 = self.l1_slot(kind, core_id);
                let evicted_addr = (evicted.tag << l1.index_bits()) | (line_addr & l1.index_mask());
                // The write-back is not charged to this reference.
                self.l2_access(evicted_addr, true, core_id, now);
            }
        }

        delay
    }

    /// Accesses the shared L2; on a miss, fills from DRAM and writes back a
    /// displaced dirty line. Write-backs from L1 enter as writes.
    fn l2_access(&mut self, line_addr: u64, is_writeback: bool, core_id: usize, now: u64) -> u64 {
        let l2 = self.l2cache.as_mut().expect("topology has an L2 cache");
        let mut delay = l2.latency();

        if l2.access(line_addr, is_writeback, core_id, now) == CacheResult::Miss {
            delay += self
                .dram
                .as_mut()
                .expect("topology has a DRAM module")
                .access(line_addr, false);

            let l2 = self.l2cache.as_mut().expect("topology has an L2 cache");
            let evicted = l2.install(line_addr, is_writeback, core_id, now);
            if evicted.valid && evicted.dirty {
                let evicted_addr = (evicted.tag << l2.index_bits()) | (line_addr & l2.index_mask());
                self.dram
                    .as_mut()
                    .expect("topology has a DRAM module")
                    .access(evicted_addr, true);
            }
        }

        delay
    }

    /// The L1 cache a reference of `kind` from `core_id` targets.
    fn l1_slot(&mut self, kind: AccessType, core_id: usize) -> &mut Cache {
        let slot = match self.mode {
            SimMode::Def => core_id,
            _ => 0,
        };
        match kind {
            AccessType::Ifetch => &mut self.icaches[slot],
            AccessType::Load | AccessType::Store => &mut self.dcaches[slot],
        }
    }

    /// Prints the end-of-run report: system totals, then each cache in
    /// topology order, then DRAM.
    pub fn print_stats(&self) {
        self.stats.print();

        match self.mode {
            SimMode::A => {
                self.dcaches[0].stats.print("DCACHE");
            }
            SimMode::B | SimMode::C => {
                self.icaches[0].stats.print("ICACHE");
                self.dcaches[0].stats.print("DCACHE");
                if let Some(l2) = &self.l2cache {
                    l2.stats.print("L2CACHE");
                }
                if let Some(dram) = &self.dram {
                    dram.stats.print();
                }
            }
            SimMode::Def => {
                for core in 0..self.icaches.len() {
                    self.icaches[core].stats.print(&format!("ICACHE_{}", core));
                    self.dcaches[core].stats.print(&format!("DCACHE_{}", core));
                }
                if let Some(l2) = &self.l2cache {
                    l2.stats.print("L2CACHE");
                }
                if let Some(dram) = &self.dram {
                    dram.stats.print();
                }
            }
        }
    }

    /// The simulated topology.
    pub fn mode(&self) -> SimMode {
        self.mode
    }

    /// The instruction cache serving `core`, if the topology has one.
    pub fn icache(&self, core: usize) -> Option<&Cache> {
        self.icaches.get(core)
    }

    /// The data cache serving `core`.
    pub fn dcache(&self, core: usize) -> Option<&Cache> {
        self.dcaches.get(core)
    }

    /// The shared L2 cache, if the topology has one.
    pub fn l2cache(&self) -> Option<&Cache> {
        self.l2cache.as_ref()
    }

    /// The DRAM module, if the topology has one.
    pub fn dram(&self) -> Option<&Dram> {
        self.dram.as_ref()
    }

    /// The current dynamic way quota for core 0.
    pub fn dwp_core0_ways(&self) -> u64 {
        self.dwp_core0_ways.get()
    }
}
