use clap::Parser;
use cpxseq::assemble::{DEFAULT_MAX_N_FRACTION, DEFAULT_WINDOW_LEN};
use cpxseq::io::open_reader;
use cpxseq::sequence::{collect_sequence_paths, FastaIndex, SequenceProvider};
use cpxseq::{
    ChromosomeTable, CpxError, CpxVariant, ErrorKind, SequenceBuilder, SequencePair, WindowConfig,
};
use log::{debug, error, info, warn};
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};

/// Build fixed-length REF/ALT sequence windows for complex SVs
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Reference FASTA file (can be repeated)
    #[arg(short = 'f', long = "fasta")]
    fasta: Vec<String>,

    /// File listing reference FASTA paths, one per line
    #[arg(long = "fasta-list")]
    fasta_list: Option<String>,

    /// Chromosome lengths table (CHROM, chrom_max)
    #[arg(long = "chrom-lengths")]
    chrom_lengths: String,

    /// Centromere coordinates table (CHROM, centromere)
    #[arg(long = "centromeres")]
    centromeres: String,

    /// Variants as CHR, POS, END, CHR2, CPX_TYPE, CPX_INTERVALS (use "-" to read from standard input)
    #[arg(short = 'i', long = "variants")]
    variants: String,

    /// Output FASTA (default: standard output)
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Length of the REF and ALT windows
    #[arg(short = 'w', long = "window", default_value_t = DEFAULT_WINDOW_LEN)]
    window: usize,

    /// Largest accepted fraction of N bases in the REF window
    #[arg(long = "max-n-fraction", default_value_t = DEFAULT_MAX_N_FRACTION)]
    max_n_fraction: f64,

    /// Number of threads to use (default: 2)
    #[arg(short = 't', long = "threads", default_value_t = 2)]
    threads: usize,

    /// Verbosity level (0 = error, 1 = info, 2 = debug)
    #[arg(short, long, default_value = "0")]
    verbose: u8,
}

#[derive(Debug, Default)]
struct Summary {
    written: usize,
    skipped: usize,
    failed: usize,
}

type VariantResult = Result<(CpxVariant, SequencePair), (String, CpxError)>;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_logger(args.verbose);

    if args.window == 0 {
        return Err("--window must be positive".into());
    }
    if !(0.0..=1.0).contains(&args.max_n_fraction) {
        return Err("--max-n-fraction must lie between 0 and 1".into());
    }

    // Set the thread pool size
    rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build_global()?;

    let fasta_files = collect_sequence_paths(args.fasta.clone(), args.fasta_list.clone())?;
    let reference = FastaIndex::build(&fasta_files)?;
    let chroms = ChromosomeTable::from_files(&args.chrom_lengths, &args.centromeres)?;
    check_chromosome_lengths(&chroms, &reference);
    info!(
        "Loaded {} FASTA files and metadata for {} chromosomes",
        fasta_files.len(),
        chroms.len()
    );

    let config = WindowConfig {
        window_len: args.window,
        max_n_fraction: args.max_n_fraction,
    };
    let builder = SequenceBuilder::new(&reference, &chroms, config);

    let reader = open_reader(&args.variants)?;
    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    // Process in chunks
    const CHUNK_SIZE: usize = 1000;
    let mut lines = Vec::with_capacity(CHUNK_SIZE);
    let mut summary = Summary::default();

    for line_result in reader.lines() {
        let line = line_result?;
        if is_header_or_blank(&line) {
            continue;
        }
        lines.push(line);

        if lines.len() >= CHUNK_SIZE {
            let results = process_chunk(&lines, &builder);
            write_results(&mut writer, results, &mut summary)?;
            lines.clear();
        }
    }

    // Process remaining lines
    if !lines.is_empty() {
        let results = process_chunk(&lines, &builder);
        write_results(&mut writer, results, &mut summary)?;
    }
    writer.flush()?;

    info!(
        "Wrote {} variants, skipped {} for sequence quality, {} failed",
        summary.written, summary.skipped, summary.failed
    );
    if summary.failed > 0 {
        return Err(format!("{} variants could not be processed", summary.failed).into());
    }
    Ok(())
}

/// Initialize logger based on verbosity
fn setup_logger(verbosity: u8) {
    env_logger::Builder::new()
        .filter_level(match verbosity {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();
}

fn is_header_or_blank(line: &str) -> bool {
    line.trim().is_empty() || line.starts_with('#') || line.starts_with("CHR\t")
}

/// Warn when the metadata table disagrees with the FASTA index.
fn check_chromosome_lengths(chroms: &ChromosomeTable, reference: &FastaIndex) {
    for (name, info) in chroms.iter() {
        let fasta_len = reference
            .sequence_length(&format!("chr{name}"))
            .or_else(|| reference.sequence_length(name));
        match fasta_len {
            Some(len) if len as i64 != info.length => warn!(
                "Chromosome {} has length {} in the FASTA but {} in the length table",
                name, len, info.length
            ),
            Some(_) => {}
            None => debug!("Chromosome {} is not present in the FASTA files", name),
        }
    }
}

/// Build the windows of a chunk of variant lines in parallel, keeping input order
fn process_chunk<P: SequenceProvider>(
    lines: &[String],
    builder: &SequenceBuilder<'_, P>,
) -> Vec<VariantResult> {
    lines
        .par_iter()
        .map(|line| {
            let variant = CpxVariant::from_tsv_line(line).map_err(|e| (line.clone(), e))?;
            let pair = builder.build(&variant).map_err(|e| (variant.id(), e))?;
            Ok((variant, pair))
        })
        .collect()
}

fn write_results(
    writer: &mut dyn Write,
    results: Vec<VariantResult>,
    summary: &mut Summary,
) -> io::Result<()> {
    for result in results {
        match result {
            Ok((variant, pair)) => {
                let id = variant.id();
                writeln!(writer, ">{id}:REF")?;
                writer.write_all(&pair.ref_seq)?;
                writeln!(writer)?;
                writeln!(writer, ">{id}:ALT")?;
                writer.write_all(&pair.alt_seq)?;
                writeln!(writer)?;
                summary.written += 1;
            }
            Err((id, e)) if e.kind() == ErrorKind::DataQuality => {
                warn!("Skipping {}: {}", id, e);
                summary.skipped += 1;
            }
            Err((id, e)) => {
                error!("Failed on {}: {}", id, e);
                summary.failed += 1;
            }
        }
    }
    Ok(())
}
