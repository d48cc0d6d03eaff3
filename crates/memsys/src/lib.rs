//! Chip-multiprocessor memory hierarchy simulator library.
//!
//! This crate implements a trace-driven simulator for a configurable cache
//! hierarchy backed by banked DRAM. It provides:
//! 1. **Cache:** Set-associative caches with LRU, random, and static/dynamic way-partitioning replacement.
//! 2. **DRAM:** A banked row-buffer timing model with open-page and close-page policies.
//! 3. **Translation:** Per-core virtual-to-physical line address mapping for multicore topologies.
//! 4. **Memory system:** L1/L2/DRAM orchestration with write-back propagation and delay accounting.
//! 5. **Simulation:** Trace reader, run driver, configuration, and statistics reporting.

/// Set-associative cache model and replacement policies.
pub mod cache;
/// Common types, constants, and the crate error type.
pub mod common;
/// Simulator configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// Banked DRAM timing model.
pub mod dram;
/// Memory-system orchestrator wiring caches and DRAM together.
pub mod memsys;
/// Trace input and the run driver.
pub mod sim;
/// Statistics collection and reporting.
pub mod stats;
/// Per-core virtual-to-physical address translation.
pub mod translate;

/// Classification of trace references (fetch, load, store).
pub use crate::common::AccessType;
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// The memory hierarchy under simulation; construct with `MemorySystem::new`.
pub use crate::memsys::MemorySystem;
/// Top-level driver owning the memory system and the reference-ordered clock.
pub use crate::sim::Simulator;
