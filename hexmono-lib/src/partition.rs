//! Splitting codepoints across font files.

use std::fmt;
use std::str::FromStr;

use crate::consts::{ASCII_END, MAX_GLYPHS_PER_FILE};
use crate::Error;

/// The largest number of codepoints a single file may hold, leaving a slot
/// for `.notdef`.
pub const MAX_BUDGET: usize = MAX_GLYPHS_PER_FILE - 1;

/// How codepoints are grouped into files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionStrategy {
    /// U+0000..=U+00FF get their own file, and everything after is split
    /// into files of the glyph budget.
    AsciiFirst,
    /// Every file but the last holds exactly the glyph budget.
    Uniform,
}

impl Default for PartitionStrategy {
    fn default() -> Self {
        PartitionStrategy::AsciiFirst
    }
}

impl fmt::Display for PartitionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PartitionStrategy::AsciiFirst => write!(f, "ascii-first"),
            PartitionStrategy::Uniform => write!(f, "uniform"),
        }
    }
}

impl FromStr for PartitionStrategy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascii-first" => Ok(PartitionStrategy::AsciiFirst),
            "uniform" => Ok(PartitionStrategy::Uniform),
            other => Err(format!("unknown partition strategy '{}'", other)),
        }
    }
}

/// A contiguous run of codepoints destined for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    codepoints: &'a [u32],
}

impl<'a> Chunk<'a> {
    pub fn codepoints(&self) -> &'a [u32] {
        self.codepoints
    }

    pub fn len(&self) -> usize {
        self.codepoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codepoints.is_empty()
    }

    pub fn start(&self) -> u32 {
        self.codepoints[0]
    }

    pub fn end(&self) -> u32 {
        self.codepoints[self.codepoints.len() - 1]
    }
}

impl fmt::Display for Chunk<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "U+{:05X} - U+{:05X}", self.start(), self.end())
    }
}

/// Ensure a glyph budget leaves room for `.notdef` in a single file.
pub fn check_budget(budget: usize) -> Result<(), Error> {
    if budget == 0 || budget > MAX_BUDGET {
        Err(Error::InvalidBudget {
            budget,
            max: MAX_BUDGET,
        })
    } else {
        Ok(())
    }
}

/// Split an ascending list of codepoints into chunks of at most
/// `max_per_chunk`.
pub fn partition(
    valid: &[u32],
    max_per_chunk: usize,
    strategy: PartitionStrategy,
) -> Result<Vec<Chunk>, Error> {
    check_budget(max_per_chunk)?;
    debug_assert!(valid.windows(2).all(|w| w[0] < w[1]));

    let (head, tail) = match strategy {
        PartitionStrategy::AsciiFirst => {
            let split = valid.partition_point(|cp| *cp <= ASCII_END);
            valid.split_at(split)
        }
        PartitionStrategy::Uniform => valid.split_at(0),
    };

    let chunks = head
        .chunks(max_per_chunk)
        .chain(tail.chunks(max_per_chunk))
        .map(|codepoints| Chunk { codepoints })
        .collect::<Vec<_>>();
    log::debug!(
        "partitioned {} codepoints into {} chunks ({})",
        valid.len(),
        chunks.len(),
        strategy
    );
    Ok(chunks)
}
