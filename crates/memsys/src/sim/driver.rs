//! Run driver.
//!
//! Owns the memory system and the reference-ordered clock. Each trace
//! reference advances the cycle counter once and is then fully resolved
//! before the next is issued.

use std::path::Path;

use crate::common::MemsimError;
use crate::config::Config;
use crate::memsys::MemorySystem;
use crate::sim::trace::{TraceRecord, TraceReader};

/// Top-level simulator: the memory hierarchy plus the clock.
pub struct Simulator {
    /// The memory hierarchy under test.
    pub memsys: MemorySystem,
    cycle: u64,
}

impl Simulator {
    /// Validates `config` and builds a simulator for it.
    pub fn new(config: &Config) -> Result<Self, MemsimError> {
        config.validate()?;
        Ok(Self {
            memsys: MemorySystem::new(config),
            cycle: 0,
        })
    }

    /// Resolves one reference, advancing the clock first.
    ///
    /// Returns the delay in cycles the reference incurred.
    pub fn step(&mut self, record: &TraceRecord) -> u64 {
        self.cycle += 1;
        self.memsys
            .access(record.addr, record.kind, record.core_id, self.cycle)
    }

    /// Streams an entire trace file through the memory system.
    pub fn run_trace(&mut self, path: impl AsRef<Path>) -> Result<(), MemsimError> {
        for record in TraceReader::open(path)? {
            self.step(&record?);
        }
        Ok(())
    }

    /// Cycles consumed so far (one per reference).
    pub fn cycle(&self) -> u64 {
        self.cycle
    }
}
