use log::{debug, info};
use rayon::prelude::*;
use rust_htslib::faidx::Reader as FastaReader;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use super::SequenceProvider;

/// Wrapper to mark FastaReader as Send.
/// Safety: each thread only accesses its own slot via per-thread sharding,
/// so the htslib faidx handle is never shared across threads.
struct SendFastaReader(FastaReader);
unsafe impl Send for SendFastaReader {}

/// Reference sequences backed by one or more indexed FASTA files.
pub struct FastaIndex {
    fasta_paths: Vec<PathBuf>,
    sequence_to_file: HashMap<String, usize>,
    sequence_lengths: HashMap<String, usize>,
    /// Per-thread cached FASTA readers. Indexed by rayon::current_thread_index().
    thread_readers: Vec<Mutex<Option<HashMap<usize, SendFastaReader>>>>,
}

impl fmt::Debug for FastaIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FastaIndex")
            .field("fasta_paths", &self.fasta_paths)
            .field("num_sequences", &self.sequence_to_file.len())
            .field("num_thread_slots", &self.thread_readers.len())
            .finish_non_exhaustive()
    }
}

impl FastaIndex {
    pub fn build(fasta_files: &[String]) -> Result<Self, String> {
        if fasta_files.is_empty() {
            return Err("No FASTA files provided".to_string());
        }

        // Phase 1: Parallel - check/create .fai files and read their contents
        let fai_results: Vec<_> = fasta_files
            .par_iter()
            .enumerate()
            .map(|(idx, entry)| -> Result<(usize, PathBuf, String), String> {
                let path = PathBuf::from(entry);
                if !path.exists() {
                    return Err(format!("FASTA file '{entry}' not found"));
                }

                let path_str = path
                    .to_str()
                    .ok_or_else(|| format!("FASTA path contains invalid UTF-8: {entry}"))?;
                let fai_path = PathBuf::from(format!("{path_str}.fai"));

                // htslib writes the .fai when opening an unindexed FASTA
                if !fai_path.exists() {
                    info!("Creating FASTA index for '{}'...", entry);
                    if let Err(e) = FastaReader::from_path(&path) {
                        return Err(format!("Failed to create FASTA index for '{entry}': {e}"));
                    }
                }

                let fai_content = fs::read_to_string(&fai_path).map_err(|e| {
                    format!("Failed to read FASTA index '{}': {}", fai_path.display(), e)
                })?;

                Ok((idx, path, fai_content))
            })
            .collect::<Result<Vec<_>, String>>()?;

        // Phase 2: Sequential - route each sequence name to the first file declaring it
        let mut fasta_paths = vec![PathBuf::new(); fasta_files.len()];
        let mut sequence_to_file = HashMap::new();
        let mut sequence_lengths = HashMap::new();

        for (idx, path, fai_content) in fai_results {
            for line in fai_content.lines() {
                let mut fields = line.split('\t');
                let Some(seq_name) = fields.next().map(str::trim).filter(|s| !s.is_empty()) else {
                    continue;
                };
                if sequence_to_file.contains_key(seq_name) {
                    continue;
                }
                let seq_len = fields
                    .next()
                    .and_then(|len| len.trim().parse::<usize>().ok())
                    .ok_or_else(|| {
                        format!("Invalid length for '{seq_name}' in index of '{}'", path.display())
                    })?;
                sequence_to_file.insert(seq_name.to_string(), idx);
                sequence_lengths.insert(seq_name.to_string(), seq_len);
            }
            fasta_paths[idx] = path;
        }
        debug!(
            "Indexed {} sequences across {} FASTA files",
            sequence_to_file.len(),
            fasta_paths.len()
        );

        let num_slots = rayon::current_num_threads() + 1;

        Ok(Self {
            fasta_paths,
            sequence_to_file,
            sequence_lengths,
            thread_readers: (0..num_slots).map(|_| Mutex::new(None)).collect(),
        })
    }

    /// Length of a sequence as declared in its `.fai`.
    pub fn sequence_length(&self, seq_name: &str) -> Option<usize> {
        self.sequence_lengths.get(seq_name).copied()
    }

    pub fn fetch_sequence(
        &self,
        seq_name: &str,
        start: usize,
        end: usize,
    ) -> Result<Vec<u8>, String> {
        if start >= end {
            return Ok(Vec::new());
        }

        let fasta_idx = *self
            .sequence_to_file
            .get(seq_name)
            .ok_or_else(|| format!("Sequence '{seq_name}' not found in supplied FASTA files"))?;

        let fasta_path = &self.fasta_paths[fasta_idx];

        let thread_idx = rayon::current_thread_index()
            .map(|idx| idx.min(self.thread_readers.len() - 1))
            .unwrap_or(self.thread_readers.len() - 1);
        let mut slot = self.thread_readers[thread_idx]
            .lock()
            .map_err(|_| format!("FASTA reader slot {thread_idx} is poisoned"))?;
        let readers = slot.get_or_insert_with(HashMap::new);
        if !readers.contains_key(&fasta_idx) {
            let reader = FastaReader::from_path(fasta_path).map_err(|e| {
                format!("Failed to open FASTA '{}': {}", fasta_path.display(), e)
            })?;
            readers.insert(fasta_idx, SendFastaReader(reader));
        }
        let wrapper = &readers[&fasta_idx];

        // htslib takes an inclusive end coordinate
        let raw_seq = wrapper.0.fetch_seq(seq_name, start, end - 1).map_err(|e| {
            format!(
                "Failed to fetch {seq_name}:{start}-{end} from '{}': {e}",
                fasta_path.display()
            )
        })?;
        let mut seq_vec = raw_seq.to_vec();
        unsafe { libc::free(raw_seq.as_ptr() as *mut std::ffi::c_void) };
        seq_vec.iter_mut().for_each(|b| *b = b.to_ascii_uppercase());
        Ok(seq_vec)
    }
}

impl SequenceProvider for FastaIndex {
    fn fetch_sequence(&self, seq_name: &str, start: usize, end: usize) -> Result<Vec<u8>, String> {
        FastaIndex::fetch_sequence(self, seq_name, start, end)
    }
}
