//! Common types and constants used throughout the simulator.
//!
//! This module provides the building blocks shared across all components:
//! 1. **Constants:** Structural limits and the page size.
//! 2. **Memory Access:** Classification of trace references (fetch/load/store).
//! 3. **Error Handling:** The crate-wide error type for driver-facing paths.

/// Error types for configuration validation and trace parsing.
pub mod error;

pub use error::MemsimError;

/// The maximum allowed number of ways in a cache set.
///
/// At runtime, the actual number of ways in each cache set is guaranteed to
/// be less than or equal to this value.
pub const MAX_WAYS_PER_CACHE_SET: usize = 16;

/// The number of bytes in a page.
pub const PAGE_SIZE: u64 = 4096;

/// The number of cores the memory system supports in multicore topologies.
pub const MAX_CORES: usize = 2;

/// Type of memory access operation.
///
/// Used to select the L1 target for a reference and to categorize the
/// per-reference statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Instruction fetch access.
    Ifetch,
    /// Data load access.
    Load,
    /// Data store access.
    Store,
}
