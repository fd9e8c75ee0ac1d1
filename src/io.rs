use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader};

/// Open a text input for reading: `-` is standard input, `.gz`/`.bgz` files
/// are decompressed transparently.
pub fn open_reader(path: &str) -> io::Result<Box<dyn BufRead>> {
    if path == "-" {
        Ok(Box::new(BufReader::new(io::stdin())))
    } else if path.ends_with(".gz") || path.ends_with(".bgz") {
        let file = File::open(path)?;
        let decoder = MultiGzDecoder::new(file);
        Ok(Box::new(BufReader::new(decoder)))
    } else {
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn reads_plain_and_gzip() {
        let dir = tempfile::tempdir().unwrap();

        let plain = dir.path().join("table.tsv");
        std::fs::write(&plain, "a\nb\n").unwrap();
        let lines: Vec<String> = open_reader(plain.to_str().unwrap())
            .unwrap()
            .lines()
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(lines, vec!["a", "b"]);

        let gz = dir.path().join("table.tsv.gz");
        let mut encoder = GzEncoder::new(File::create(&gz).unwrap(), Compression::default());
        encoder.write_all(b"c\nd\n").unwrap();
        encoder.finish().unwrap();
        let lines: Vec<String> = open_reader(gz.to_str().unwrap())
            .unwrap()
            .lines()
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(lines, vec!["c", "d"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(open_reader("/nonexistent/table.tsv").is_err());
    }
}
