use log::debug;
use std::collections::HashMap;
use std::io::BufRead;

use crate::errors::CpxError;
use crate::io::open_reader;

/// Chromosome name without a leading `chr`.
pub fn bare_chrom(name: &str) -> &str {
    name.strip_prefix("chr").unwrap_or(name)
}

/// Length and centromere coordinate of one chromosome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromInfo {
    pub length: i64,
    pub centromere: i64,
}

/// Chromosome metadata keyed by bare chromosome name.
#[derive(Debug, Clone, Default)]
pub struct ChromosomeTable {
    chroms: HashMap<String, ChromInfo>,
}

impl ChromosomeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a chromosome, replacing any previous entry.
    pub fn insert(&mut self, chrom: &str, length: i64, centromere: i64) {
        self.chroms
            .insert(bare_chrom(chrom).to_string(), ChromInfo { length, centromere });
    }

    pub fn get(&self, chrom: &str) -> Result<ChromInfo, CpxError> {
        self.chroms
            .get(bare_chrom(chrom))
            .copied()
            .ok_or_else(|| CpxError::UnknownChromosome {
                chrom: chrom.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.chroms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chroms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChromInfo)> {
        self.chroms.iter().map(|(name, info)| (name.as_str(), info))
    }

    /// Load chromosome lengths (`CHROM`, `chrom_max`) and centromere
    /// coordinates (`CHROM`, `centromere`) from two tab-separated tables.
    /// Every chromosome must appear exactly once in both.
    pub fn from_files(lengths_path: &str, centromeres_path: &str) -> Result<Self, String> {
        let lengths = read_column(lengths_path, "chrom_max")?;
        let mut centromeres = read_column(centromeres_path, "centromere")?;

        let mut table = ChromosomeTable::new();
        for (chrom, length) in lengths {
            let centromere = centromeres.remove(&chrom).ok_or_else(|| {
                format!("Chromosome '{chrom}' has a length but no centromere in '{centromeres_path}'")
            })?;
            table.chroms.insert(chrom, ChromInfo { length, centromere });
        }
        if let Some(chrom) = centromeres.keys().next() {
            return Err(format!(
                "Chromosome '{chrom}' has a centromere but no length in '{lengths_path}'"
            ));
        }

        debug!("Loaded metadata for {} chromosomes", table.len());
        Ok(table)
    }
}

fn read_column(path: &str, column: &str) -> Result<HashMap<String, i64>, String> {
    let reader = open_reader(path).map_err(|e| format!("Failed to open '{path}': {e}"))?;
    parse_column(reader, path, column)
}

fn parse_column<R: BufRead>(
    reader: R,
    path: &str,
    column: &str,
) -> Result<HashMap<String, i64>, String> {
    let mut columns: Option<(usize, usize)> = None;
    let mut values = HashMap::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| format!("Failed to read '{path}': {e}"))?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();

        let Some((chrom_col, value_col)) = columns else {
            let header: Vec<&str> = fields.iter().map(|f| f.trim_start_matches('#')).collect();
            let chrom_col = header.iter().position(|&f| f == "CHROM");
            let value_col = header.iter().position(|&f| f == column);
            match (chrom_col, value_col) {
                (Some(c), Some(v)) => columns = Some((c, v)),
                _ => {
                    return Err(format!(
                        "Header of '{path}' must contain CHROM and {column} columns"
                    ))
                }
            }
            continue;
        };
        if line.starts_with('#') {
            continue;
        }

        let (Some(chrom), Some(value)) = (fields.get(chrom_col), fields.get(value_col)) else {
            return Err(format!("Line {} of '{path}' has too few columns", line_no + 1));
        };
        let value: i64 = value.parse().map_err(|_| {
            format!("Line {} of '{path}': invalid {column} '{value}'", line_no + 1)
        })?;
        if value < 0 {
            return Err(format!("Line {} of '{path}': negative {column}", line_no + 1));
        }
        if values.insert(bare_chrom(chrom).to_string(), value).is_some() {
            return Err(format!("Chromosome '{chrom}' listed twice in '{path}'"));
        }
    }

    if columns.is_none() {
        return Err(format!("'{path}' is empty"));
    }
    Ok(values)
}
