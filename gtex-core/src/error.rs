//! Error types shared by every gtex crate.

use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification used by the entry point to choose an exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing column or invocation parameter.
    Configuration,
    /// Empty statistic input or incomparable keys.
    DegenerateInput,
    /// Malformed input files or diverging strategy results.
    Data,
    /// Underlying I/O failure.
    Io,
}

/// Main error type for gtex operations
#[derive(Error, Debug)]
pub enum GtexError {
    /// I/O errors (file missing, permission denied, truncated gzip stream)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An input file could not be opened
    #[error("Cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required column is absent from a table header
    #[error("Configuration error: column '{column}' not found in {table} header")]
    MissingColumn { column: String, table: String },

    /// Invalid or missing invocation parameters
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A statistic was asked to summarise no values
    #[error("Degenerate input: {what} of an empty list")]
    EmptyInput { what: &'static str },

    /// Two keys of incompatible types met in an ordered comparison
    #[error("Degenerate input: cannot order key {left} against key {right}")]
    IncomparableKeys { left: String, right: String },

    /// Line-numbered parse errors in the metadata table or count matrix
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The count matrix preamble is missing or unreadable
    #[error("Malformed count matrix: {message}")]
    MalformedMatrix { message: String },

    /// Two lookup strategies disagreed on the extracted counts
    #[error("Strategies {left} and {right} produced different group counts")]
    StrategyMismatch { left: String, right: String },
}

/// Type alias for Results using GtexError
pub type Result<T> = std::result::Result<T, GtexError>;

impl GtexError {
    /// Create a missing-column error
    pub fn missing_column(column: impl Into<String>, table: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
            table: table.into(),
        }
    }

    /// Create an open error for `path`
    pub fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an incomparable-keys error from the two offending keys
    pub fn incomparable(left: &impl std::fmt::Debug, right: &impl std::fmt::Debug) -> Self {
        Self::IncomparableKeys {
            left: format!("{left:?}"),
            right: format!("{right:?}"),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Create a malformed-matrix error
    pub fn malformed_matrix(message: impl Into<String>) -> Self {
        Self::MalformedMatrix {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingColumn { .. } | Self::Config { .. } => ErrorKind::Configuration,
            Self::EmptyInput { .. } | Self::IncomparableKeys { .. } => ErrorKind::DegenerateInput,
            Self::Parse { .. } | Self::MalformedMatrix { .. } | Self::StrategyMismatch { .. } => {
                ErrorKind::Data
            }
            Self::Io(_) | Self::Open { .. } => ErrorKind::Io,
        }
    }
}
