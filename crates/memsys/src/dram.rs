//! Banked DRAM timing model.
//!
//! A DRAM module is an array of independent banks, each with a row buffer
//! holding the most recently activated row. Access latency depends on the
//! page policy:
//! 1. **Open page:** rows stay active; a row hit pays only CAS, a conflict pays precharge + activate + CAS.
//! 2. **Close page:** every access pays activate + CAS and leaves the bank idle.
//! 3. **Fixed:** a flat per-access latency used by the simplest two-level topology, bypassing the banks.
//!
//! Banks are striped at row granularity: the row number is the line address
//! with the bank bits shifted out, and consecutive rows land on consecutive
//! banks.

use crate::config::{DramConfig, DramPagePolicy};
use crate::stats::DramStats;

/// Per-bank register holding the most recently activated row.
#[derive(Clone, Copy, Debug, Default)]
pub struct RowBuffer {
    /// Whether the bank has an active row.
    pub valid: bool,
    /// The active row, meaningful only while `valid`.
    pub row_id: u64,
}

/// A DRAM module: one row buffer per bank plus timing parameters.
pub struct Dram {
    rowbuf: Vec<RowBuffer>,
    bank_bits: u32,
    banks: u64,
    page_policy: DramPagePolicy,
    t_bus: u64,
    t_act: u64,
    t_cas: u64,
    t_pre: u64,
    fixed_latency: u64,
    fixed: bool,
    /// Access counts and cumulative delays.
    pub stats: DramStats,
}

impl Dram {
    /// Creates a DRAM module.
    ///
    /// `fixed` selects the flat-latency model; the row buffers are left
    /// untouched in that mode.
    ///
    /// # Panics
    ///
    /// Panics when the bank count is not a power of two.
    pub fn new(config: &DramConfig, fixed: bool) -> Self {
        let banks = config.banks;
        assert!(
            banks >= 1 && banks.is_power_of_two(),
            "DRAM bank count {} is not a power of two",
            banks
        );
        Self {
            rowbuf: vec![RowBuffer::default(); banks as usize],
            bank_bits: banks.trailing_zeros(),
            banks,
            page_policy: config.page_policy,
            t_bus: config.t_bus,
            t_act: config.t_act,
            t_cas: config.t_cas,
            t_pre: config.t_pre,
            fixed_latency: config.fixed_latency,
            fixed,
            stats: DramStats::default(),
        }
    }

    /// Performs one access and returns its delay in cycles.
    pub fn access(&mut self, line_addr: u64, is_write: bool) -> u64 {
        let delay = if self.fixed {
            self.fixed_latency
        } else {
            self.banked_access(line_addr)
        };

        if is_write {
            self.stats.write_access += 1;
            self.stats.write_delay += delay;
        } else {
            self.stats.read_access += 1;
            self.stats.read_delay += delay;
        }
        delay
    }

    /// Row-buffer-aware access for the banked model.
    fn banked_access(&mut self, line_addr: u64) -> u64 {
        let row = line_addr >> self.bank_bits;
        let bank = (row % self.banks) as usize;

        let mut delay = self.t_bus;
        match self.page_policy {
            DramPagePolicy::Open => {
                let buf = &mut self.rowbuf[bank];
                if buf.valid {
                    if buf.row_id == row {
                        // Row hit: the column access alone.
                        delay += self.t_cas;
                    } else {
                        delay += self.t_pre + self.t_act + self.t_cas;
                        buf.row_id = row;
                    }
                } else {
                    delay += self.t_act + self.t_cas;
                    buf.row_id = row;
                    buf.valid = true;
                }
            }
            DramPagePolicy::Close => {
                // The bank is precharged right after the access, so the next
                // one pays activation again.
                delay += self.t_act + self.t_cas;
                self.rowbuf[bank] = RowBuffer {
                    valid: false,
                    row_id: row,
                };
            }
        }
        delay
    }

    /// The number of banks.
    pub fn banks(&self) -> u64 {
        self.banks
    }

    /// Read access to one bank's row buffer, for inspection and tests.
    pub fn row_buffer(&self, bank: usize) -> RowBuffer {
        self.rowbuf[bank]
    }
}
