//! Parser for `CPX_INTERVALS` strings.
//!
//! The string is a comma-separated list of `LABEL_CHROM:START-END` tokens,
//! e.g. `DUP_1:1000-1200,INV_1:1000-1500,DUP_1:1500-1600`. The same
//! label/chromosome pair may appear several times; occurrences keep their
//! order of appearance.

use std::collections::HashMap;
use std::fmt;

use crate::errors::{malformed, CpxError};
use crate::genome::bare_chrom;

/// Sub-event labels looked up by the sequence builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubEvent {
    Inv,
    Dup,
}

impl SubEvent {
    pub fn label(&self) -> &'static str {
        match self {
            SubEvent::Inv => "INV",
            SubEvent::Dup => "DUP",
        }
    }
}

impl fmt::Display for SubEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Half-open genomic interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: i64,
    pub end: i64,
}

impl Interval {
    pub fn len(&self) -> i64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Decoded `CPX_INTERVALS`, keyed by `(label, bare chromosome)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpxIntervals {
    intervals: HashMap<(String, String), Vec<Interval>>,
}

impl CpxIntervals {
    pub fn parse(encoded: &str) -> Result<Self, CpxError> {
        let mut intervals: HashMap<(String, String), Vec<Interval>> = HashMap::new();

        for token in encoded.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let (tag, coords) = token
                .split_once(':')
                .ok_or_else(|| malformed(token, "missing ':' between label and coordinates"))?;
            let (label, chrom) = tag
                .split_once('_')
                .ok_or_else(|| malformed(token, "label is not of the form TYPE_CHROM"))?;
            if label.is_empty() || chrom.is_empty() {
                return Err(malformed(token, "empty sub-event type or chromosome"));
            }
            let (start, end) = coords
                .split_once('-')
                .ok_or_else(|| malformed(token, "coordinates are not of the form START-END"))?;
            let start: i64 = start
                .trim()
                .parse()
                .map_err(|_| malformed(token, "non-numeric start coordinate"))?;
            let end: i64 = end
                .trim()
                .parse()
                .map_err(|_| malformed(token, "non-numeric end coordinate"))?;
            if start < 0 || start > end {
                return Err(malformed(token, "start must lie between 0 and end"));
            }

            intervals
                .entry((label.to_ascii_uppercase(), bare_chrom(chrom).to_string()))
                .or_default()
                .push(Interval { start, end });
        }

        Ok(CpxIntervals { intervals })
    }

    /// All intervals recorded for `label` on `chrom`, in order of appearance.
    pub fn all(&self, label: SubEvent, chrom: &str) -> &[Interval] {
        self.intervals
            .get(&(label.label().to_string(), bare_chrom(chrom).to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The `occurrence`-th (0-based) interval for `label` on `chrom`.
    pub fn get(
        &self,
        label: SubEvent,
        chrom: &str,
        occurrence: usize,
    ) -> Result<Interval, CpxError> {
        self.all(label, chrom)
            .get(occurrence)
            .copied()
            .ok_or_else(|| CpxError::MissingInterval {
                label: label.label().to_string(),
                chrom: bare_chrom(chrom).to_string(),
                occurrence,
            })
    }
}

/// Parse `encoded` and pick one interval from it.
pub fn decode(
    encoded: &str,
    chrom2: &str,
    label: SubEvent,
    occurrence: usize,
) -> Result<Interval, CpxError> {
    CpxIntervals::parse(encoded)?.get(label, chrom2, occurrence)
}
