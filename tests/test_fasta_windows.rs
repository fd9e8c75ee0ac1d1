// tests/test_fasta_windows.rs

use cpxseq::position::Position;
use cpxseq::sequence::{reverse_complement, FastaIndex};
use cpxseq::{
    ChromosomeTable, CpxError, CpxType, CpxVariant, ErrorKind, SequenceBuilder, WindowConfig,
};

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::{tempdir, TempDir};

const CHR1_LEN: usize = 8_000;
const CHR2_LEN: usize = 3_000;
const WINDOW: usize = 1_000;

/// Pseudo-random bases from a fixed linear congruential generator.
fn random_bases(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            b"ACGT"[(state >> 62) as usize]
        })
        .collect()
}

fn write_fasta(path: &Path, records: &[(&str, &[u8])]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    for (name, seq) in records {
        writeln!(file, ">{name}")?;
        for line in seq.chunks(60) {
            // soft-masked lowercase must come back uppercased
            file.write_all(&line.to_ascii_lowercase())?;
            writeln!(file)?;
        }
    }
    Ok(())
}

struct Fixture {
    _dir: TempDir,
    chr1: Vec<u8>,
    chr2: Vec<u8>,
    reference: FastaIndex,
    chroms: ChromosomeTable,
}

fn fixture() -> io::Result<Fixture> {
    let dir = tempdir()?;
    let chr1 = random_bases(CHR1_LEN, 17);
    let chr2 = random_bases(CHR2_LEN, 23);

    let fasta = dir.path().join("ref.fa");
    write_fasta(&fasta, &[("chr1", &chr1[..]), ("chr2", &chr2[..])])?;

    let lengths = dir.path().join("lengths.tsv");
    fs::write(&lengths, format!("CHROM\tchrom_max\n1\t{CHR1_LEN}\n2\t{CHR2_LEN}\n"))?;
    let centromeres = dir.path().join("centromeres.tsv");
    fs::write(&centromeres, "CHROM\tcentromere\nchr1\t4000\nchr2\t1500\n")?;

    let reference = FastaIndex::build(&[fasta.to_string_lossy().into_owned()])
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    let chroms = ChromosomeTable::from_files(
        lengths.to_str().unwrap(),
        centromeres.to_str().unwrap(),
    )
    .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    Ok(Fixture {
        _dir: dir,
        chr1,
        chr2,
        reference,
        chroms,
    })
}

fn config() -> WindowConfig {
    WindowConfig {
        window_len: WINDOW,
        max_n_fraction: 0.05,
    }
}

#[test]
fn test_fasta_index_fetch() {
    let fx = fixture().unwrap();
    assert_eq!(fx.reference.sequence_length("chr1"), Some(CHR1_LEN));
    assert_eq!(fx.reference.sequence_length("chr3"), None);

    let seq = fx.reference.fetch_sequence("chr1", 100, 250).unwrap();
    assert_eq!(seq, fx.chr1[100..250].to_vec());
    assert!(fx.reference.fetch_sequence("chr2", 10, 10).unwrap().is_empty());
    assert!(fx.reference.fetch_sequence("chr3", 0, 10).is_err());
}

#[test]
fn test_chromosome_table_from_files() {
    let fx = fixture().unwrap();
    assert_eq!(fx.chroms.len(), 2);
    let chr1 = fx.chroms.get("chr1").unwrap();
    assert_eq!(chr1.length, CHR1_LEN as i64);
    assert_eq!(chr1.centromere, 4_000);
}

#[test]
fn test_chromosome_table_requires_both_entries() {
    let dir = tempdir().unwrap();
    let lengths = dir.path().join("lengths.tsv.gz");
    {
        let file = fs::File::create(&lengths).unwrap();
        let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        encoder.write_all(b"CHROM\tchrom_max\n1\t100\n2\t200\n").unwrap();
        encoder.finish().unwrap();
    }
    let centromeres = dir.path().join("centromeres.tsv");
    fs::write(&centromeres, "CHROM\tcentromere\nchr1\t50\n").unwrap();

    let err = ChromosomeTable::from_files(
        lengths.to_str().unwrap(),
        centromeres.to_str().unwrap(),
    )
    .unwrap_err();
    assert!(err.contains("'2'"), "{err}");
}

#[test]
fn test_mid_chromosome_window() {
    let fx = fixture().unwrap();
    let builder = SequenceBuilder::new(&fx.reference, &fx.chroms, config());
    let variant = CpxVariant {
        chrom: "chr1".to_string(),
        pos: 2_000,
        end: 2_200,
        chrom2: "chr1".to_string(),
        cpx_type: CpxType::DupInvDup,
        intervals: "DUP_1:1950-2000,INV_1:2000-2200,DUP_1:2200-2231".to_string(),
    };

    let pair = builder.build(&variant).unwrap();
    assert_eq!(pair.position, Position::Mid { window_start: 1_600 });
    assert_eq!(pair.ref_seq, fx.chr1[1_600..2_600].to_vec());

    // core 281 bp leaves 719: 360 left, 359 right
    let mut expected = fx.chr1[1_640..2_000].to_vec();
    expected.extend_from_slice(&fx.chr1[1_950..2_000]);
    expected.extend(reverse_complement(&fx.chr1[2_000..2_200]));
    expected.extend_from_slice(&fx.chr1[2_200..2_231]);
    expected.extend_from_slice(&fx.chr1[2_200..2_559]);
    assert_eq!(pair.alt_seq, expected);
    assert_eq!(pair.alt_seq.len(), WINDOW);
}

#[test]
fn test_start_window_never_negative() {
    let fx = fixture().unwrap();
    let builder = SequenceBuilder::new(&fx.reference, &fx.chroms, config());
    let variant = CpxVariant {
        chrom: "chr2".to_string(),
        pos: 50,
        end: 120,
        chrom2: "chr2".to_string(),
        cpx_type: CpxType::DelInvDel,
        intervals: "INV_2:60-110,".to_string(),
    };

    let pair = builder.build(&variant).unwrap();
    assert_eq!(pair.position, Position::Start);
    assert_eq!(pair.ref_seq, fx.chr2[..WINDOW].to_vec());

    let mut expected = fx.chr2[..50].to_vec();
    expected.extend(reverse_complement(&fx.chr2[60..110]));
    expected.extend_from_slice(&fx.chr2[120..120 + WINDOW - 50 - 50]);
    assert_eq!(pair.alt_seq, expected);
}

#[test]
fn test_end_and_centromere_windows_fill_exactly() {
    let fx = fixture().unwrap();
    let builder = SequenceBuilder::new(&fx.reference, &fx.chroms, config());

    for (pos, end, expected) in [
        (7_800, 7_900, Position::End { chrom_len: CHR1_LEN as i64 }),
        (3_800, 3_900, Position::CentroLeft { centromere: 4_000 }),
        (4_100, 4_150, Position::CentroRight { centromere: 4_000 }),
    ] {
        let variant = CpxVariant {
            chrom: "chr1".to_string(),
            pos,
            end,
            chrom2: "chr1".to_string(),
            cpx_type: CpxType::DupInvDel,
            intervals: format!("DUP_1:{}-{},INV_1:{}-{}", pos - 20, pos, pos, end),
        };
        let pair = builder.build(&variant).unwrap();
        assert_eq!(pair.position, expected);
        assert_eq!(pair.ref_seq.len(), WINDOW);
        assert_eq!(pair.alt_seq.len(), WINDOW);
        assert_ne!(pair.ref_seq, pair.alt_seq);
    }
}

#[test]
fn test_span_precondition() {
    let fx = fixture().unwrap();
    let builder = SequenceBuilder::new(&fx.reference, &fx.chroms, config());
    let variant = CpxVariant {
        chrom: "chr1".to_string(),
        pos: 2_000,
        end: 3_000,
        chrom2: "chr1".to_string(),
        cpx_type: CpxType::DelInvDel,
        intervals: "INV_1:2000-2100".to_string(),
    };
    let err = builder.build(&variant).unwrap_err();
    assert!(matches!(err, CpxError::SpanTooLong { .. }));
    assert_eq!(err.kind(), ErrorKind::Precondition);
}
