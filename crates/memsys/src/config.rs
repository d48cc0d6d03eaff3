//! Configuration system for the memory hierarchy simulator.
//!
//! This module defines all configuration structures and enums used to
//! parameterize a run. It provides:
//! 1. **Defaults:** Baseline hardware constants (line size, cache geometry, DRAM timing).
//! 2. **Structures:** Hierarchical config for the topology, each cache level, and DRAM.
//! 3. **Enums:** Simulation mode, replacement policy, and DRAM page policy.
//!
//! Configuration is supplied as JSON (`--config`) or assembled from CLI
//! flags; use `Config::default()` for the baseline machine.

use std::str::FromStr;

use serde::Deserialize;

use crate::common::{MemsimError, MAX_WAYS_PER_CACHE_SET, PAGE_SIZE};

/// Default configuration constants for the simulator.
///
/// These values define the baseline machine when not explicitly overridden.
mod defaults {
    /// Cache line size in bytes, shared by every level.
    pub const LINE_SIZE: u64 = 64;

    /// L1 cache size in bytes (32 KiB, instruction and data alike).
    pub const L1_SIZE: u64 = 32 * 1024;

    /// L1 associativity.
    pub const L1_WAYS: u64 = 8;

    /// L1 hit latency in cycles.
    pub const L1_LATENCY: u64 = 1;

    /// Shared L2 cache size in bytes (512 KiB).
    pub const L2_SIZE: u64 = 512 * 1024;

    /// L2 associativity.
    pub const L2_WAYS: u64 = 16;

    /// L2 hit latency in cycles.
    pub const L2_LATENCY: u64 = 10;

    /// Number of independent DRAM banks.
    pub const NUM_BANKS: u64 = 16;

    /// DRAM bus transfer latency in cycles.
    pub const T_BUS: u64 = 10;

    /// DRAM row activation latency in cycles. (Also known as RAS.)
    pub const T_ACT: u64 = 45;

    /// DRAM column selection latency in cycles.
    pub const T_CAS: u64 = 45;

    /// DRAM precharge latency in cycles.
    pub const T_PRE: u64 = 45;

    /// Flat per-access latency of the fixed DRAM model.
    pub const FIXED_LATENCY: u64 = 100;
}

/// Memory topology simulated for a run.
///
/// The letter names follow the conventional staging of the machine from a
/// bare L1 up to a two-core system with virtual addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SimMode {
    /// Single L1 data cache; hit/miss bookkeeping only, no latency model.
    #[default]
    A,
    /// Split L1 over a unified L2 and fixed-latency DRAM.
    B,
    /// Split L1 over a unified L2 and row-buffer DRAM.
    C,
    /// Per-core split L1s over a shared L2 and row-buffer DRAM, with
    /// per-core virtual-to-physical translation.
    #[serde(alias = "Def", alias = "def")]
    Def,
}

impl FromStr for SimMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a" => Ok(SimMode::A),
            "b" => Ok(SimMode::B),
            "c" => Ok(SimMode::C),
            "def" | "d" | "e" | "f" => Ok(SimMode::Def),
            other => Err(format!("unknown mode '{}' (expected a, b, c, or def)", other)),
        }
    }
}

/// Cache replacement policy algorithms.
///
/// Selects which line to evict when a new line must be installed in a full
/// cache set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Evict the least recently used line.
    #[default]
    #[serde(alias = "Lru")]
    Lru,
    /// Evict a pseudo-random line.
    #[serde(alias = "Random")]
    Random,
    /// Static way partitioning between two cores.
    #[serde(alias = "Swp")]
    Swp,
    /// Dynamic way partitioning driven by the per-set utility monitor.
    #[serde(alias = "Dwp")]
    Dwp,
}

impl FromStr for ReplacementPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lru" => Ok(ReplacementPolicy::Lru),
            "random" | "rand" => Ok(ReplacementPolicy::Random),
            "swp" => Ok(ReplacementPolicy::Swp),
            "dwp" => Ok(ReplacementPolicy::Dwp),
            other => Err(format!(
                "unknown replacement policy '{}' (expected lru, random, swp, or dwp)",
                other
            )),
        }
    }
}

/// DRAM row buffer page policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DramPagePolicy {
    /// Rows stay active in the row buffer after an access.
    #[default]
    #[serde(alias = "Open", alias = "OPEN")]
    Open,
    /// The bank is precharged after every access.
    #[serde(alias = "Close", alias = "CLOSE")]
    Close,
}

impl FromStr for DramPagePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(DramPagePolicy::Open),
            "close" | "closed" => Ok(DramPagePolicy::Close),
            other => Err(format!("unknown page policy '{}' (expected open or close)", other)),
        }
    }
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// Deserializing from JSON (typical `--config` usage):
///
/// ```
/// use memsys_core::config::{Config, ReplacementPolicy, SimMode};
///
/// let json = r#"{
///     "mode": "DEF",
///     "line_size": 64,
///     "num_cores": 2,
///     "l2cache": {
///         "size": 524288,
///         "ways": 16,
///         "policy": "SWP",
///         "latency": 10
///     },
///     "swp_core0_ways": 4
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.mode, SimMode::Def);
/// assert_eq!(config.l2cache.policy, ReplacementPolicy::Swp);
/// assert_eq!(config.dcache.size, 32 * 1024);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Memory topology to simulate.
    #[serde(default)]
    pub mode: SimMode,

    /// Cache line size in bytes, shared by every cache level.
    #[serde(default = "Config::default_line_size")]
    pub line_size: u64,

    /// Number of cores issuing references (2 for the multicore topology).
    #[serde(default = "Config::default_num_cores")]
    pub num_cores: usize,

    /// L1 instruction cache geometry and policy.
    #[serde(default = "CacheLevelConfig::default_l1")]
    pub icache: CacheLevelConfig,

    /// L1 data cache geometry and policy.
    #[serde(default = "CacheLevelConfig::default_l1")]
    pub dcache: CacheLevelConfig,

    /// Shared L2 cache geometry and policy.
    #[serde(default = "CacheLevelConfig::default_l2")]
    pub l2cache: CacheLevelConfig,

    /// DRAM timing and page policy.
    #[serde(default)]
    pub dram: DramConfig,

    /// Static quota of L2 ways reserved for core 0 under SWP.
    #[serde(default)]
    pub swp_core0_ways: u64,
}

impl Config {
    /// Returns the default cache line size in bytes.
    fn default_line_size() -> u64 {
        defaults::LINE_SIZE
    }

    /// Returns the default core count.
    fn default_num_cores() -> usize {
        1
    }

    /// Checks driver-supplied parameters before a run.
    ///
    /// Structural mistakes (non-power-of-two geometry, oversized
    /// associativity, a core count that does not fit the topology) are
    /// reported here so the simulation core can assume them away.
    pub fn validate(&self) -> Result<(), MemsimError> {
        if self.line_size == 0 || !self.line_size.is_power_of_two() {
            return Err(MemsimError::NotPowerOfTwo {
                what: "line size",
                value: self.line_size,
            });
        }
        if self.line_size > PAGE_SIZE {
            return Err(MemsimError::LineTooLarge {
                line_size: self.line_size,
            });
        }

        self.icache.validate("icache", self.line_size)?;
        self.dcache.validate("dcache", self.line_size)?;
        self.l2cache.validate("l2cache", self.line_size)?;

        if self.dram.banks == 0 || !self.dram.banks.is_power_of_two() {
            return Err(MemsimError::NotPowerOfTwo {
                what: "DRAM bank count",
                value: self.dram.banks,
            });
        }

        let required = match self.mode {
            SimMode::Def => 2,
            _ => 1,
        };
        if self.num_cores != required {
            return Err(MemsimError::BadCoreCount {
                required,
                cores: self.num_cores,
            });
        }

        if self.swp_core0_ways > self.l2cache.ways {
            return Err(MemsimError::QuotaTooLarge {
                quota: self.swp_core0_ways,
                ways: self.l2cache.ways,
            });
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: SimMode::default(),
            line_size: defaults::LINE_SIZE,
            num_cores: 1,
            icache: CacheLevelConfig::default_l1(),
            dcache: CacheLevelConfig::default_l1(),
            l2cache: CacheLevelConfig::default_l2(),
            dram: DramConfig::default(),
            swp_core0_ways: 0,
        }
    }
}

/// Configuration for one cache level.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheLevelConfig {
    /// Total size in bytes.
    #[serde(default = "CacheLevelConfig::default_size")]
    pub size: u64,

    /// Associativity (number of ways).
    #[serde(default = "CacheLevelConfig::default_ways")]
    pub ways: u64,

    /// Replacement policy.
    #[serde(default)]
    pub policy: ReplacementPolicy,

    /// Hit latency in cycles.
    #[serde(default = "CacheLevelConfig::default_latency")]
    pub latency: u64,
}

impl CacheLevelConfig {
    /// Returns the default L1 cache size in bytes.
    fn default_size() -> u64 {
        defaults::L1_SIZE
    }

    /// Returns the default L1 associativity.
    fn default_ways() -> u64 {
        defaults::L1_WAYS
    }

    /// Returns the default L1 hit latency in cycles.
    fn default_latency() -> u64 {
        defaults::L1_LATENCY
    }

    /// Baseline L1 geometry (32 KiB, 8-way, 1-cycle hit).
    fn default_l1() -> Self {
        Self {
            size: defaults::L1_SIZE,
            ways: defaults::L1_WAYS,
            policy: ReplacementPolicy::default(),
            latency: defaults::L1_LATENCY,
        }
    }

    /// Baseline L2 geometry (512 KiB, 16-way, 10-cycle hit).
    fn default_l2() -> Self {
        Self {
            size: defaults::L2_SIZE,
            ways: defaults::L2_WAYS,
            policy: ReplacementPolicy::default(),
            latency: defaults::L2_LATENCY,
        }
    }

    /// Validates this level's geometry against the shared line size.
    fn validate(&self, what: &'static str, line_size: u64) -> Result<(), MemsimError> {
        if self.ways == 0 || self.ways as usize > MAX_WAYS_PER_CACHE_SET {
            return Err(MemsimError::BadAssociativity {
                what,
                ways: self.ways,
            });
        }
        let set_bytes = line_size * self.ways;
        let sets = self.size / set_bytes;
        if sets == 0 || !sets.is_power_of_two() || sets * set_bytes != self.size {
            return Err(MemsimError::BadSetCount { what, sets });
        }
        Ok(())
    }
}

impl Default for CacheLevelConfig {
    fn default() -> Self {
        Self::default_l1()
    }
}

/// DRAM configuration: bank layout, page policy, and timing.
#[derive(Debug, Clone, Deserialize)]
pub struct DramConfig {
    /// Number of independent banks (power of two).
    #[serde(default = "DramConfig::default_banks")]
    pub banks: u64,

    /// Row buffer page policy.
    #[serde(default)]
    pub page_policy: DramPagePolicy,

    /// Bus transfer latency in cycles.
    #[serde(default = "DramConfig::default_t_bus")]
    pub t_bus: u64,

    /// Row activation latency in cycles.
    #[serde(default = "DramConfig::default_t_act")]
    pub t_act: u64,

    /// Column selection latency in cycles.
    #[serde(default = "DramConfig::default_t_cas")]
    pub t_cas: u64,

    /// Precharge latency in cycles.
    #[serde(default = "DramConfig::default_t_pre")]
    pub t_pre: u64,

    /// Flat per-access latency of the fixed DRAM model.
    #[serde(default = "DramConfig::default_fixed_latency")]
    pub fixed_latency: u64,
}

impl DramConfig {
    /// Returns the default number of DRAM banks.
    fn default_banks() -> u64 {
        defaults::NUM_BANKS
    }

    /// Returns the default bus transfer latency in cycles.
    fn default_t_bus() -> u64 {
        defaults::T_BUS
    }

    /// Returns the default row activation latency in cycles.
    fn default_t_act() -> u64 {
        defaults::T_ACT
    }

    /// Returns the default column selection latency in cycles.
    fn default_t_cas() -> u64 {
        defaults::T_CAS
    }

    /// Returns the default precharge latency in cycles.
    fn default_t_pre() -> u64 {
        defaults::T_PRE
    }

    /// Returns the default flat latency of the fixed DRAM model.
    fn default_fixed_latency() -> u64 {
        defaults::FIXED_LATENCY
    }
}

impl Default for DramConfig {
    fn default() -> Self {
        Self {
            banks: defaults::NUM_BANKS,
            page_policy: DramPagePolicy::default(),
            t_bus: defaults::T_BUS,
            t_act: defaults::T_ACT,
            t_cas: defaults::T_CAS,
            t_pre: defaults::T_PRE,
            fixed_latency: defaults::FIXED_LATENCY,
        }
    }
}
