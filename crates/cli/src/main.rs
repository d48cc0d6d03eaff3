//! Memory hierarchy simulator CLI.
//!
//! This binary is the single entry point for a simulation run. It performs:
//! 1. **Configuration:** builds a `Config` from individual flags, or loads a full JSON file via `--config`.
//! 2. **Execution:** streams the trace through the memory system, one reference per cycle.
//! 3. **Reporting:** prints the end-of-run statistics block.

use std::fs::File;
use std::process;

use clap::Parser;

use memsys_core::config::{Config, DramPagePolicy, ReplacementPolicy, SimMode};
use memsys_core::Simulator;

#[derive(Parser, Debug)]
#[command(
    name = "memsim",
    author,
    version,
    about = "Trace-driven CMP memory hierarchy simulator",
    long_about = "Replay a memory reference trace against a configurable cache \
hierarchy backed by banked DRAM.\n\nTrace format: one reference per line, \
`<core> <I|L|S> <hex-addr>`; blank lines and `#` comments are skipped.\n\n\
Examples:\n  memsim -t traces/gcc.txt --mode b\n  memsim -t traces/mix.txt \
--mode def --l2repl swp --swp-core0-ways 4\n  memsim -t traces/gcc.txt \
--config machine.json"
)]
struct Cli {
    /// Trace file to replay.
    #[arg(short, long)]
    trace: String,

    /// Full JSON configuration file; replaces every other flag.
    #[arg(long)]
    config: Option<String>,

    /// Memory topology: a, b, c, or def.
    #[arg(long, default_value = "a", value_parser = parse_mode)]
    mode: SimMode,

    /// Cache line size in bytes.
    #[arg(long, default_value_t = 64)]
    linesize: u64,

    /// L1 data cache size in KiB.
    #[arg(long, default_value_t = 32)]
    dsize_kb: u64,

    /// L1 data cache associativity.
    #[arg(long, default_value_t = 8)]
    dassoc: u64,

    /// L1 instruction cache size in KiB.
    #[arg(long, default_value_t = 32)]
    isize_kb: u64,

    /// L1 instruction cache associativity.
    #[arg(long, default_value_t = 8)]
    iassoc: u64,

    /// Shared L2 cache size in KiB.
    #[arg(long, default_value_t = 512)]
    l2size_kb: u64,

    /// Shared L2 cache associativity.
    #[arg(long, default_value_t = 16)]
    l2assoc: u64,

    /// Replacement policy for both L1 caches: lru, random, swp, or dwp.
    #[arg(long, default_value = "lru", value_parser = parse_repl)]
    repl: ReplacementPolicy,

    /// Replacement policy for the L2 cache.
    #[arg(long, default_value = "lru", value_parser = parse_repl)]
    l2repl: ReplacementPolicy,

    /// L2 ways reserved for core 0 under static way partitioning.
    #[arg(long, default_value_t = 0)]
    swp_core0_ways: u64,

    /// DRAM page policy: open or close.
    #[arg(long, default_value = "open", value_parser = parse_dram_policy)]
    dram_policy: DramPagePolicy,
}

fn parse_mode(s: &str) -> Result<SimMode, String> {
    s.parse()
}

fn parse_repl(s: &str) -> Result<ReplacementPolicy, String> {
    s.parse()
}

fn parse_dram_policy(s: &str) -> Result<DramPagePolicy, String> {
    s.parse()
}

fn main() {
    let cli = Cli::parse();

    let config = build_config(&cli);

    let mut sim = Simulator::new(&config).unwrap_or_else(|e| {
        eprintln!("memsim: invalid configuration: {}", e);
        process::exit(1);
    });

    if let Err(e) = sim.run_trace(&cli.trace) {
        eprintln!("memsim: {}", e);
        process::exit(1);
    }

    sim.memsys.print_stats();
}

/// Assembles the run configuration from the command line.
///
/// `--config` wins outright; otherwise the individual flags are laid over
/// the baseline machine. The core count follows the topology.
fn build_config(cli: &Cli) -> Config {
    if let Some(path) = &cli.config {
        let file = File::open(path).unwrap_or_else(|e| {
            eprintln!("memsim: cannot open config '{}': {}", path, e);
            process::exit(1);
        });
        return serde_json::from_reader(file).unwrap_or_else(|e| {
            eprintln!("memsim: cannot parse config '{}': {}", path, e);
            process::exit(1);
        });
    }

    let mut config = Config::default();
    config.mode = cli.mode;
    config.line_size = cli.linesize;
    config.num_cores = match cli.mode {
        SimMode::Def => 2,
        _ => 1,
    };

    config.dcache.size = cli.dsize_kb * 1024;
    config.dcache.ways = cli.dassoc;
    config.dcache.policy = cli.repl;

    config.icache.size = cli.isize_kb * 1024;
    config.icache.ways = cli.iassoc;
    config.icache.policy = cli.repl;

    config.l2cache.size = cli.l2size_kb * 1024;
    config.l2cache.ways = cli.l2assoc;
    config.l2cache.policy = cli.l2repl;

    config.swp_core0_ways = cli.swp_core0_ways;
    config.dram.page_policy = cli.dram_policy;

    config
}
