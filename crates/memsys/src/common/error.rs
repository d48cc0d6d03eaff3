//! Error definitions for driver-facing paths.
//!
//! The simulation core itself cannot fail: cache and DRAM accesses always
//! succeed, and internal invariant violations abort with a diagnostic. This
//! error type covers the paths that consume external input, namely
//! configuration validation and trace parsing.

use std::fmt;
use std::io;

/// Errors reported while validating a configuration or reading a trace.
#[derive(Debug)]
pub enum MemsimError {
    /// A structural parameter that must be a power of two is not.
    NotPowerOfTwo {
        /// Which parameter failed the check.
        what: &'static str,
        /// The offending value.
        value: u64,
    },

    /// A cache size does not decompose into a power-of-two number of sets.
    BadSetCount {
        /// Which cache failed the check.
        what: &'static str,
        /// The computed set count.
        sets: u64,
    },

    /// A cache was configured with an unsupported way count.
    BadAssociativity {
        /// Which cache failed the check.
        what: &'static str,
        /// The configured way count.
        ways: u64,
    },

    /// The configured core count does not match the selected topology.
    BadCoreCount {
        /// Cores the topology requires.
        required: usize,
        /// Cores actually configured.
        cores: usize,
    },

    /// The static partition quota exceeds the L2 associativity.
    QuotaTooLarge {
        /// The configured quota for core 0.
        quota: u64,
        /// The L2 way count.
        ways: u64,
    },

    /// The cache line size exceeds the page size.
    LineTooLarge {
        /// The configured line size in bytes.
        line_size: u64,
    },

    /// A trace line could not be parsed.
    Trace {
        /// One-based line number in the trace file.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// An I/O error while reading an input file.
    Io(io::Error),
}

impl fmt::Display for MemsimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemsimError::NotPowerOfTwo { what, value } => {
                write!(f, "{} must be a power of two, got {}", what, value)
            }
            MemsimError::BadSetCount { what, sets } => {
                write!(f, "{} set count must be a power of two, got {}", what, sets)
            }
            MemsimError::BadAssociativity { what, ways } => {
                write!(f, "{} associativity must be between 1 and 16, got {}", what, ways)
            }
            MemsimError::BadCoreCount { required, cores } => {
                write!(f, "topology requires {} core(s), configured {}", required, cores)
            }
            MemsimError::QuotaTooLarge { quota, ways } => {
                write!(f, "core 0 quota {} exceeds L2 associativity {}", quota, ways)
            }
            MemsimError::LineTooLarge { line_size } => {
                write!(f, "line size {} exceeds the page size", line_size)
            }
            MemsimError::Trace { line, reason } => {
                write!(f, "trace line {}: {}", line, reason)
            }
            MemsimError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for MemsimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MemsimError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MemsimError {
    fn from(e: io::Error) -> Self {
        MemsimError::Io(e)
    }
}
