//! Anchoring of a fixed-size window on a chromosome.
//!
//! A window of `window_len` bases is normally centred on the variant. Near the
//! chromosome ends or the centromere it cannot be, and is instead pinned flush
//! against the boundary. [`Position`] records which regime applies together
//! with the boundary coordinate each regime needs.

use std::fmt;
use std::ops::Range;

use crate::genome::ChromInfo;

/// Split the space left in a window around `occupied` bases into left and
/// right halves. An odd remainder goes to the left half.
///
/// `occupied` must not exceed `window_len`.
pub fn split_window(window_len: usize, occupied: usize) -> (i64, i64) {
    debug_assert!(occupied <= window_len);
    let free = (window_len - occupied) as i64;
    let right = free / 2;
    (free - right, right)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Window centred on the variant, starting at `window_start`.
    Mid { window_start: i64 },
    /// Window pinned to the chromosome start.
    Start,
    /// Variant left of the centromere, window ends at it.
    CentroLeft { centromere: i64 },
    /// Variant right of the centromere, window starts at it.
    CentroRight { centromere: i64 },
    /// Window pinned to the chromosome end.
    End { chrom_len: i64 },
}

/// Decide how the window around `[pos, pos + ref_len)` is anchored.
///
/// The candidate window is `[pos - half_left, pos + ref_len + half_right)`.
/// Checks run in order and the first match wins: touching or passing the
/// chromosome start, touching or passing the chromosome end, then straddling
/// the centromere (side decided by `pos`).
pub fn classify(
    chrom: &ChromInfo,
    pos: i64,
    ref_len: i64,
    half_left: i64,
    half_right: i64,
) -> Position {
    let window_start = pos - half_left;
    let window_end = pos + ref_len + half_right;

    if window_start <= 0 {
        Position::Start
    } else if window_end >= chrom.length {
        Position::End {
            chrom_len: chrom.length,
        }
    } else if window_start < chrom.centromere && chrom.centromere < window_end {
        if pos < chrom.centromere {
            Position::CentroLeft {
                centromere: chrom.centromere,
            }
        } else {
            Position::CentroRight {
                centromere: chrom.centromere,
            }
        }
    } else {
        Position::Mid { window_start }
    }
}

impl Position {
    pub fn name(&self) -> &'static str {
        match self {
            Position::Mid { .. } => "chrom_mid",
            Position::Start => "chrom_start",
            Position::CentroLeft { .. } => "chrom_centro_left",
            Position::CentroRight { .. } => "chrom_centro_right",
            Position::End { .. } => "chrom_end",
        }
    }

    /// Bounds of the REF window of `window_len` bases.
    pub fn ref_window(&self, window_len: usize) -> Range<i64> {
        let window_len = window_len as i64;
        match *self {
            Position::Mid { window_start } => window_start..window_start + window_len,
            Position::Start => 0..window_len,
            Position::CentroLeft { centromere } => centromere - window_len..centromere,
            Position::CentroRight { centromere } => centromere..centromere + window_len,
            Position::End { chrom_len } => chrom_len - window_len..chrom_len,
        }
    }

    /// Reference flanks placed left of `pos` and right of `end` around a
    /// variant core of `core_len` bases so that the whole ALT window spans
    /// `window_len` bases.
    ///
    /// Away from boundaries both flanks take the halves of the free space.
    /// Otherwise the flank facing the pinned boundary reaches exactly to it
    /// and the opposite flank takes whatever remains. The returned ranges may
    /// be inverted or negative when the variant does not fit; callers check.
    pub fn alt_flanks(
        &self,
        pos: i64,
        end: i64,
        core_len: usize,
        window_len: usize,
    ) -> (Range<i64>, Range<i64>) {
        let core = core_len as i64;
        let window = window_len as i64;
        match *self {
            Position::Mid { .. } => {
                let (half_left, half_right) = split_window(window_len, core_len);
                (pos - half_left..pos, end..end + half_right)
            }
            Position::Start => {
                let right = window - pos - core;
                (0..pos, end..end + right)
            }
            Position::CentroLeft { centromere } => {
                let left = window - (centromere - end) - core;
                (pos - left..pos, end..centromere)
            }
            Position::CentroRight { centromere } => {
                let right = window - (pos - centromere) - core;
                (centromere..pos, end..end + right)
            }
            Position::End { chrom_len } => {
                let left = window - (chrom_len - end) - core;
                (pos - left..pos, end..chrom_len)
            }
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
