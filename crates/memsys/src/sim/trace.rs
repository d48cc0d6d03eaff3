//! Text trace reader.
//!
//! One reference per line: `<core> <kind> <address>`, where `kind` is `I`
//! (instruction fetch), `L` (load) or `S` (store) and the address is
//! hexadecimal with or without a `0x` prefix. Blank lines and lines
//! starting with `#` are skipped. Lines that do not parse are reported
//! with their one-based line number.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::common::{AccessType, MemsimError, MAX_CORES};

/// One parsed trace reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Core issuing the reference.
    pub core_id: usize,
    /// Kind of reference.
    pub kind: AccessType,
    /// Byte address.
    pub addr: u64,
}

/// Streaming reader over a trace file.
pub struct TraceReader {
    lines: Lines<BufReader<File>>,
    line_no: usize,
}

impl TraceReader {
    /// Opens a trace file for streaming.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MemsimError> {
        let file = File::open(path)?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
            line_no: 0,
        })
    }
}

impl Iterator for TraceReader {
    type Item = Result<TraceRecord, MemsimError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(MemsimError::Io(e))),
            };
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return Some(parse_record(trimmed, self.line_no));
        }
    }
}

/// Parses one non-empty, non-comment trace line.
pub fn parse_record(line: &str, line_no: usize) -> Result<TraceRecord, MemsimError> {
    let bad = |reason: String| MemsimError::Trace {
        line: line_no,
        reason,
    };

    let mut fields = line.split_whitespace();
    let core = fields.next().ok_or_else(|| bad("missing core id".into()))?;
    let kind = fields
        .next()
        .ok_or_else(|| bad("missing access type".into()))?;
    let addr = fields.next().ok_or_else(|| bad("missing address".into()))?;
    if fields.next().is_some() {
        return Err(bad("trailing fields".into()));
    }

    let core_id: usize = core
        .parse()
        .map_err(|_| bad(format!("bad core id '{}'", core)))?;
    if core_id >= MAX_CORES {
        return Err(bad(format!("core id {} out of range", core_id)));
    }

    let kind = match kind {
        "I" | "i" => AccessType::Ifetch,
        "L" | "l" => AccessType::Load,
        "S" | "s" => AccessType::Store,
        other => return Err(bad(format!("bad access type '{}'", other))),
    };

    let digits = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .unwrap_or(addr);
    let addr = u64::from_str_radix(digits, 16).map_err(|_| bad(format!("bad address '{}'", addr)))?;

    Ok(TraceRecord {
        core_id,
        kind,
        addr,
    })
}
