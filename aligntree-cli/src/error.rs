//! Error handling for the aligntree CLI

use std::path::PathBuf;
use thiserror::Error;

use aligntree_core::AlignError;

/// Main error type for aligntree CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Input/Output error: {message}")]
    Io { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Scoring error: {message}")]
    Scoring { message: String },

    #[error("Alignment error: {message}")]
    Alignment { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource error: {message}")]
    Resource { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn invalid_format<S: Into<String>>(message: S) -> Self {
        Self::InvalidFormat { message: message.into() }
    }

    pub fn scoring<S: Into<String>>(message: S) -> Self {
        Self::Scoring { message: message.into() }
    }

    pub fn alignment<S: Into<String>>(message: S) -> Self {
        Self::Alignment { message: message.into() }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn resource<S: Into<String>>(message: S) -> Self {
        Self::Resource { message: message.into() }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<AlignError> for CliError {
    fn from(err: AlignError) -> Self {
        let message = err.to_string();
        match err {
            AlignError::MissingScore { .. } => Self::scoring(message),
            AlignError::MalformedScoreTable { .. }
            | AlignError::InvalidFasta(_)
            | AlignError::ReservedSymbol { .. } => Self::invalid_format(message),
            AlignError::EmptyInput(_) => Self::alignment(message),
            AlignError::InvalidParams(_) => Self::validation(message),
            AlignError::TreeLimitExceeded { .. } => Self::resource(message),
            AlignError::Io(_) => Self::io(message),
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the file path is correct: {}\n\
                 • Ensure you have read permissions for the file\n\
                 • Compressed FASTA input must use the .gz extension",
                path.display()
            ));
        }

        CliError::InvalidFormat { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Score tables are either a dictionary literal {('A', 'A'): 1, ...} or an NCBI matrix\n\
                 • Sequence files must be FASTA or FASTQ\n\
                 • Residues may not use the reserved symbols '-' and '0'"
            );
        }

        CliError::Scoring { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Add the missing pair to the score table (either ordering is enough)\n\
                 • Omit --matrix to score with the identity table over the input symbols"
            );
        }

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your aligntree.toml configuration file\n\
                 • Use 'aligntree config --example' to generate a sample configuration\n\
                 • Verify that all configuration values are valid"
            );
        }

        CliError::Validation { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Gap penalties are costs and must be zero or negative\n\
                 • Pass negative values as --gap-open=-3"
            );
        }

        CliError::Resource { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Raise the limit with --max-nodes\n\
                 • Use --boundary single-step to stop branches at the grid edge\n\
                 • Align shorter sequences or sequences with fewer tied gaps"
            );
        }

        _ => {}
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CliError::config("test message");
        assert!(matches!(err, CliError::Config { .. }));
        assert_eq!(err.to_string(), "Configuration error: test message");
    }

    #[test]
    fn test_error_suggestions() {
        let err = CliError::file_not_found(PathBuf::from("pair.fa"));
        let formatted = format_error_with_suggestions(&err);
        assert!(formatted.contains("Suggestions:"));
        assert!(formatted.contains("Check that the file path is correct"));
    }

    #[test]
    fn test_align_error_mapping() {
        let err: CliError = AlignError::MissingScore { a: b'A', b: b'W' }.into();
        assert!(matches!(err, CliError::Scoring { .. }));
        assert!(err.to_string().contains("(A, W)"));

        let err: CliError = AlignError::TreeLimitExceeded { limit: 10 }.into();
        assert!(matches!(err, CliError::Resource { .. }));
        assert!(format_error_with_suggestions(&err).contains("--max-nodes"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err: CliError = io_err.into();
        assert!(matches!(cli_err, CliError::Io { .. }));
    }
}
