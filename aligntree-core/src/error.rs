//! Error type shared by every stage of an alignment run.

use thiserror::Error;

/// Errors that abort an alignment run
#[derive(Debug, Error)]
pub enum AlignError {
    #[error("No substitution score for pair ({}, {})", *a as char, *b as char)]
    MissingScore { a: u8, b: u8 },

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Malformed score table at line {line}: {message}")]
    MalformedScoreTable { line: usize, message: String },

    #[error("Sequence '{id}' contains reserved symbol '{}' at position {position}", *symbol as char)]
    ReservedSymbol { id: String, symbol: u8, position: usize },

    #[error("Invalid FASTA input: {0}")]
    InvalidFasta(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Path tree exceeds the limit of {limit} nodes")]
    TreeLimitExceeded { limit: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AlignError {
    pub fn malformed<S: Into<String>>(line: usize, message: S) -> Self {
        Self::MalformedScoreTable {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AlignError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_score_names_pair() {
        let err = AlignError::MissingScore { a: b'W', b: b'Z' };
        assert_eq!(err.to_string(), "No substitution score for pair (W, Z)");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AlignError = io_err.into();
        assert!(matches!(err, AlignError::Io(_)));
    }
}
