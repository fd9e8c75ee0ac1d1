//! REF/ALT window synthesis for complex SVs.
//!
//! The REF window is `window_len` reference bases anchored around the
//! variant. The ALT window replaces `[pos, end)` by the rearranged core
//! `left dup + revcomp(inversion) + right dup` and pads it with reference
//! flanks to the same length.

use log::debug;
use std::ops::Range;

use crate::errors::CpxError;
use crate::genome::{ChromInfo, ChromosomeTable};
use crate::intervals::{CpxIntervals, Interval, SubEvent};
use crate::position::{classify, split_window, Position};
use crate::sequence::{reverse_complement, SequenceProvider};
use crate::variant::CpxVariant;

pub const DEFAULT_WINDOW_LEN: usize = 1_000_000;
pub const DEFAULT_MAX_N_FRACTION: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowConfig {
    /// Length of both REF and ALT sequences.
    pub window_len: usize,
    /// Largest accepted fraction of `N` bases in the REF window.
    pub max_n_fraction: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            window_len: DEFAULT_WINDOW_LEN,
            max_n_fraction: DEFAULT_MAX_N_FRACTION,
        }
    }
}

/// REF and ALT windows of one variant, both exactly `window_len` long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencePair {
    pub position: Position,
    pub ref_seq: Vec<u8>,
    pub alt_seq: Vec<u8>,
}

/// Fraction of `N` bases in `seq`.
pub fn n_fraction(seq: &[u8]) -> f64 {
    if seq.is_empty() {
        return 0.0;
    }
    let n_count = seq.iter().filter(|&&b| b == b'N').count();
    n_count as f64 / seq.len() as f64
}

pub struct SequenceBuilder<'a, P: SequenceProvider> {
    provider: &'a P,
    chroms: &'a ChromosomeTable,
    config: WindowConfig,
}

impl<'a, P: SequenceProvider> SequenceBuilder<'a, P> {
    pub fn new(provider: &'a P, chroms: &'a ChromosomeTable, config: WindowConfig) -> Self {
        SequenceBuilder {
            provider,
            chroms,
            config,
        }
    }

    pub fn build(&self, variant: &CpxVariant) -> Result<SequencePair, CpxError> {
        let window_len = self.config.window_len;

        let ref_len = variant.end - variant.pos;
        if ref_len < 0 || ref_len >= window_len as i64 {
            return Err(CpxError::SpanTooLong {
                span: ref_len,
                window: window_len,
            });
        }
        let chrom = self.chroms.get(&variant.chrom)?;

        let (half_left, half_right) = split_window(window_len, ref_len as usize);
        let position = classify(&chrom, variant.pos, ref_len, half_left, half_right);
        debug!("{}: anchored as {}", variant.id(), position);

        let ref_seq = self.fetch_checked(
            &variant.chrom,
            &chrom,
            position.ref_window(window_len),
            "REF window",
        )?;
        check_length("REF window", window_len, ref_seq.len())?;

        let fraction = n_fraction(&ref_seq);
        if fraction > self.config.max_n_fraction {
            return Err(CpxError::AmbiguousBases {
                fraction,
                max: self.config.max_n_fraction,
            });
        }

        let core = self.variant_core(variant)?;
        if core.len() >= window_len {
            return Err(CpxError::CoreTooLong {
                core_len: core.len(),
                window: window_len,
            });
        }

        let (left, right) = position.alt_flanks(variant.pos, variant.end, core.len(), window_len);
        debug!(
            "{}: core {} bp, flanks {:?} and {:?}",
            variant.id(),
            core.len(),
            left,
            right
        );
        let left_flank = self.fetch_checked(&variant.chrom, &chrom, left, "left ALT flank")?;
        let right_flank = self.fetch_checked(&variant.chrom, &chrom, right, "right ALT flank")?;

        let mut alt_seq = Vec::with_capacity(window_len);
        alt_seq.extend_from_slice(&left_flank);
        alt_seq.extend_from_slice(&core);
        alt_seq.extend_from_slice(&right_flank);
        check_length("ALT window", window_len, alt_seq.len())?;

        Ok(SequencePair {
            position,
            ref_seq,
            alt_seq,
        })
    }

    /// `[left dup] + revcomp(inversion) + [right dup]`, all on `chrom2`.
    pub fn variant_core(&self, variant: &CpxVariant) -> Result<Vec<u8>, CpxError> {
        let intervals = CpxIntervals::parse(&variant.intervals)?;
        let chrom2 = variant.chrom2.as_str();
        let layout = variant.cpx_type.dup_layout();

        let inversion = intervals.get(SubEvent::Inv, chrom2, 0)?;
        let left_dup = layout
            .left
            .map(|occurrence| intervals.get(SubEvent::Dup, chrom2, occurrence))
            .transpose()?;
        let right_dup = layout
            .right
            .map(|occurrence| intervals.get(SubEvent::Dup, chrom2, occurrence))
            .transpose()?;

        let mut core = Vec::new();
        if let Some(dup) = left_dup {
            core.extend(self.fetch_interval(chrom2, dup)?);
        }
        core.extend(reverse_complement(&self.fetch_interval(chrom2, inversion)?));
        if let Some(dup) = right_dup {
            core.extend(self.fetch_interval(chrom2, dup)?);
        }
        Ok(core)
    }

    fn fetch_interval(&self, chrom: &str, interval: Interval) -> Result<Vec<u8>, CpxError> {
        let expected = interval.len() as usize;
        let seq = self.fetch(chrom, interval.start as usize, interval.end as usize)?;
        check_length("sub-event interval", expected, seq.len())?;
        Ok(seq)
    }

    /// Fetch `range` after checking that it is a forward range within the chromosome.
    fn fetch_checked(
        &self,
        name: &str,
        chrom: &ChromInfo,
        range: Range<i64>,
        what: &'static str,
    ) -> Result<Vec<u8>, CpxError> {
        if range.start < 0 || range.end < range.start || range.end > chrom.length {
            return Err(CpxError::OutOfBounds {
                what,
                chrom: name.to_string(),
                start: range.start,
                end: range.end,
                chrom_len: chrom.length,
            });
        }
        self.fetch(name, range.start as usize, range.end as usize)
    }

    fn fetch(&self, chrom: &str, start: usize, end: usize) -> Result<Vec<u8>, CpxError> {
        let mut seq = self
            .provider
            .fetch_sequence(chrom, start, end)
            .map_err(CpxError::Provider)?;
        seq.make_ascii_uppercase();
        Ok(seq)
    }
}

fn check_length(what: &'static str, expected: usize, actual: usize) -> Result<(), CpxError> {
    if expected != actual {
        return Err(CpxError::LengthMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}
