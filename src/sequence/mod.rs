mod faidx;
mod provider;

// Re-export public API
pub use faidx::FastaIndex;
pub use provider::{collect_sequence_paths, SequenceProvider};

#[cfg(test)]
pub(crate) use provider::TestGenome;

/// Returns the reverse complement of a DNA sequence.
///
/// `A`, `C`, `G` and `T` are complemented with their case preserved; `N` and
/// IUPAC ambiguity codes are passed through unchanged, so applying this twice
/// yields the input.
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .rev()
        .map(|&c| match c {
            b'A' => b'T',
            b'T' => b'A',
            b'G' => b'C',
            b'C' => b'G',
            b'a' => b't',
            b't' => b'a',
            b'g' => b'c',
            b'c' => b'g',
            other => other,
        })
        .collect()
}
