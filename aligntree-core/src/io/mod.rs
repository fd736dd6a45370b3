//! Input parsers for alignment runs

pub mod fasta;

pub use fasta::FastaParser;
