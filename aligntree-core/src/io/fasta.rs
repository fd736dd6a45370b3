//! FASTA/FASTQ sequence loading
//!
//! Parsing is delegated to needletail; gzipped input is decoded with flate2
//! when the path ends in `.gz`. Records become [`Sequence`]s keyed by the
//! first word of their header.

use flate2::read::GzDecoder;
use needletail::parse_fastx_reader;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{AlignError, Result};
use crate::types::Sequence;

/// FASTA/FASTQ parser producing alignment-ready sequences
pub struct FastaParser;

impl FastaParser {
    /// Parse every record of a FASTA/FASTQ file
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<Sequence>> {
        let path = path.as_ref();
        log::info!("Reading sequences from {}", path.display());
        let file = File::open(path)?;

        if path.to_string_lossy().ends_with(".gz") {
            Self::parse_reader(BufReader::new(GzDecoder::new(file)))
        } else {
            Self::parse_reader(BufReader::new(file))
        }
    }

    /// Parse FASTA/FASTQ data from any readable source
    pub fn parse_reader<R: std::io::Read + Send>(reader: R) -> Result<Vec<Sequence>> {
        let mut fastx_reader = parse_fastx_reader(reader)
            .map_err(|e| AlignError::InvalidFasta(e.to_string()))?;

        let mut sequences = Vec::new();
        while let Some(record) = fastx_reader.next() {
            let record = record.map_err(|e| AlignError::InvalidFasta(e.to_string()))?;
            let header = String::from_utf8_lossy(record.id()).to_string();
            let id = header.split_whitespace().next().unwrap_or_default().to_string();
            log::info!("Sequence found: {}", header);

            let residues = record.seq();
            sequences.push(Sequence::new(id, &residues)?);
        }

        if sequences.is_empty() {
            return Err(AlignError::EmptyInput("no sequences found".to_string()));
        }
        Ok(sequences)
    }

    /// The first two records of a file, as sequence A and sequence B.
    pub fn read_pair<P: AsRef<Path>>(path: P) -> Result<(Sequence, Sequence)> {
        Self::take_pair(Self::parse_file(path)?)
    }

    /// Split off the first two sequences; both must be non-empty.
    pub fn take_pair(sequences: Vec<Sequence>) -> Result<(Sequence, Sequence)> {
        let found = sequences.len();
        if found > 2 {
            log::warn!("{} sequences found, aligning the first two", found);
        }

        let mut iter = sequences.into_iter();
        match (iter.next(), iter.next()) {
            (Some(a), Some(b)) => {
                for seq in [&a, &b] {
                    if seq.is_empty() {
                        return Err(AlignError::EmptyInput(format!("sequence '{}' is empty", seq.id)));
                    }
                }
                Ok((a, b))
            }
            _ => Err(AlignError::EmptyInput(format!(
                "need at least two sequences, found {}",
                found
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_fasta_reader() {
        let fasta_data = ">seq1 description of sequence 1\n\
                          HEAGAWGHEE\n\
                          >seq2\n\
                          PAWHEAE\n";

        let sequences = FastaParser::parse_reader(Cursor::new(fasta_data)).unwrap();

        assert_eq!(sequences.len(), 2);
        assert_eq!(sequences[0].id, "seq1");
        assert_eq!(sequences[0].residues(), b"HEAGAWGHEE");
        assert_eq!(sequences[1].id, "seq2");
        assert_eq!(sequences[1].len(), 7);
    }

    #[test]
    fn test_multiline_fasta() {
        let fasta_data = ">seq1\n\
                          ATCG\n\
                          GCTA\n";

        let sequences = FastaParser::parse_reader(Cursor::new(fasta_data)).unwrap();
        assert_eq!(sequences.len(), 1);
        assert_eq!(sequences[0].residues(), b"ATCGGCTA");
    }

    #[test]
    fn test_empty_input() {
        assert!(FastaParser::parse_reader(Cursor::new("")).is_err());
    }

    #[test]
    fn test_pair_requires_two_sequences() {
        let one = vec![Sequence::new("a", b"AC").unwrap()];
        assert!(matches!(FastaParser::take_pair(one), Err(AlignError::EmptyInput(_))));

        let with_empty = vec![Sequence::new("a", b"AC").unwrap(), Sequence::new("b", b"").unwrap()];
        assert!(matches!(FastaParser::take_pair(with_empty), Err(AlignError::EmptyInput(_))));
    }

    #[test]
    fn test_read_pair_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, ">first\nACGT\n>second\nAGT\n>third\nTT").unwrap();

        let (a, b) = FastaParser::read_pair(file.path()).unwrap();
        assert_eq!(a.id, "first");
        assert_eq!(b.residues(), b"AGT");
    }
}
