use std::collections::HashSet;
use std::fs;

/// Source of reference bases over 0-based half-open coordinates.
///
/// An empty range (`start >= end`) yields an empty sequence. Implementations
/// are shared read-only across worker threads.
pub trait SequenceProvider: Sync {
    fn fetch_sequence(&self, seq_name: &str, start: usize, end: usize) -> Result<Vec<u8>, String>;
}

pub fn collect_sequence_paths(
    mut files: Vec<String>,
    sequence_list: Option<String>,
) -> Result<Vec<String>, String> {
    if let Some(list_path) = sequence_list {
        let contents = fs::read_to_string(&list_path)
            .map_err(|e| format!("Failed to read --fasta-list '{list_path}': {e}"))?;
        for line in contents.lines() {
            let entry = line.trim();
            if entry.is_empty() || entry.starts_with('#') {
                continue;
            }
            files.push(entry.to_string());
        }
    }

    let mut seen = HashSet::new();
    files.retain(|path| seen.insert(path.clone()));
    Ok(files)
}

/// In-memory genome for unit tests. Unknown bases past the end of a
/// chromosome are served as `N`.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct TestGenome {
    chroms: std::collections::HashMap<String, Vec<u8>>,
}

#[cfg(test)]
impl TestGenome {
    pub(crate) fn with_chrom(mut self, name: &str, seq: Vec<u8>) -> Self {
        self.chroms.insert(name.to_string(), seq);
        self
    }

    /// Deterministic non-repetitive-enough sequence of the given length.
    pub(crate) fn pattern(len: usize) -> Vec<u8> {
        const BASES: &[u8; 4] = b"ACGT";
        (0..len)
            .map(|i| BASES[(i * 7 + i / 5 + i / 31) % 4])
            .collect()
    }
}

#[cfg(test)]
impl SequenceProvider for TestGenome {
    fn fetch_sequence(&self, seq_name: &str, start: usize, end: usize) -> Result<Vec<u8>, String> {
        if start >= end {
            return Ok(Vec::new());
        }
        let chrom = self
            .chroms
            .get(seq_name)
            .ok_or_else(|| format!("Sequence '{seq_name}' not found"))?;
        Ok((start..end)
            .map(|i| chrom.get(i).copied().unwrap_or(b'N'))
            .collect())
    }
}
