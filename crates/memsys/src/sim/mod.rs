//! Simulation front half: trace input and the run driver.
//!
//! The core resolves one reference at a time; these modules feed it:
//! 1. **Trace:** a streaming reader over the text trace format.
//! 2. **Driver:** the `Simulator` owning the memory system and the clock.

/// The run driver.
pub mod driver;
/// Text trace reader.
pub mod trace;

pub use driver::Simulator;
pub use trace::{TraceReader, TraceRecord};
