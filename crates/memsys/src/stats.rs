//! Statistics collection and reporting.
//!
//! Counter bundles for each component plus the end-of-run report. Each
//! metric prints as one `LABEL : value` line; percentages and averages
//! fall back to 0.0 when the denominator is zero.

/// Hit/miss counters for one cache instance.
#[derive(Clone, Copy, Debug, Default)]
pub struct CacheStats {
    /// Read lookups (hits and misses).
    pub read_access: u64,
    /// Read lookups that missed.
    pub read_miss: u64,
    /// Write lookups (hits and misses).
    pub write_access: u64,
    /// Write lookups that missed.
    pub write_miss: u64,
    /// Valid dirty lines displaced by installs.
    pub dirty_evicts: u64,
}

impl CacheStats {
    /// Prints this cache's metrics, each prefixed with `label`.
    pub fn print(&self, label: &str) {
        let read_miss_perc = percent(self.read_miss, self.read_access);
        let write_miss_perc = percent(self.write_miss, self.write_access);

        println!();
        println!("{}_READ_ACCESS     \t\t : {:10}", label, self.read_access);
        println!("{}_WRITE_ACCESS    \t\t : {:10}", label, self.write_access);
        println!("{}_READ_MISS       \t\t : {:10}", label, self.read_miss);
        println!("{}_WRITE_MISS      \t\t : {:10}", label, self.write_miss);
        println!("{}_READ_MISS_PERC  \t\t : {:10.3}", label, read_miss_perc);
        println!("{}_WRITE_MISS_PERC \t\t : {:10.3}", label, write_miss_perc);
        println!("{}_DIRTY_EVICTS    \t\t : {:10}", label, self.dirty_evicts);
    }
}

/// DRAM access counters and cumulative delays.
#[derive(Clone, Copy, Debug, Default)]
pub struct DramStats {
    /// Read accesses.
    pub read_access: u64,
    /// Total cycles spent on reads.
    pub read_delay: u64,
    /// Write accesses.
    pub write_access: u64,
    /// Total cycles spent on writes.
    pub write_delay: u64,
}

impl DramStats {
    /// Prints the DRAM metrics.
    pub fn print(&self) {
        let avg_read_delay = average(self.read_delay, self.read_access);
        let avg_write_delay = average(self.write_delay, self.write_access);

        println!();
        println!("DRAM_READ_ACCESS     \t\t : {:10}", self.read_access);
        println!("DRAM_WRITE_ACCESS    \t\t : {:10}", self.write_access);
        println!("DRAM_READ_DELAY_AVG  \t\t : {:10.3}", avg_read_delay);
        println!("DRAM_WRITE_DELAY_AVG \t\t : {:10.3}", avg_write_delay);
    }
}

/// Per-reference-type counters for the whole memory system.
#[derive(Clone, Copy, Debug, Default)]
pub struct MemsysStats {
    /// Instruction fetch references.
    pub ifetch_access: u64,
    /// Data load references.
    pub load_access: u64,
    /// Data store references.
    pub store_access: u64,
    /// Total cycles spent on instruction fetches.
    pub ifetch_delay: u64,
    /// Total cycles spent on loads.
    pub load_delay: u64,
    /// Total cycles spent on stores.
    pub store_delay: u64,
}

impl MemsysStats {
    /// Prints the system-level metrics.
    pub fn print(&self) {
        let ifetch_delay_avg = average(self.ifetch_delay, self.ifetch_access);
        let load_delay_avg = average(self.load_delay, self.load_access);
        let store_delay_avg = average(self.store_delay, self.store_access);

        println!();
        println!("MEMSYS_IFETCH_ACCESS   \t\t : {:10}", self.ifetch_access);
        println!("MEMSYS_LOAD_ACCESS     \t\t : {:10}", self.load_access);
        println!("MEMSYS_STORE_ACCESS    \t\t : {:10}", self.store_access);
        println!("MEMSYS_IFETCH_AVGDELAY \t\t : {:10.3}", ifetch_delay_avg);
        println!("MEMSYS_LOAD_AVGDELAY   \t\t : {:10.3}", load_delay_avg);
        println!("MEMSYS_STORE_AVGDELAY  \t\t : {:10.3}", store_delay_avg);
    }
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

fn average(total: u64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}
