//! Error types for idseek

use thiserror::Error;

/// Result type alias for idseek operations
pub type Result<T> = std::result::Result<T, IdseekError>;

/// Error types that can occur in idseek
#[derive(Debug, Error)]
pub enum IdseekError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Compression/decompression error
    #[error("Compression error: {0}")]
    Compression(String),

    /// A line exceeded the maximum buffer size
    #[error("Line {line} exceeds maximum length of {limit} bytes")]
    LineTooLong {
        /// 1-based line number in the decompressed stream
        line: usize,
        /// Configured maximum line length in bytes
        limit: usize,
    },

    /// Requested ID-type is not valid for the chosen mapping format
    #[error("Invalid ID-type '{id_type}'. Choose from one of the following: {valid}")]
    InvalidIdType {
        /// The rejected label
        id_type: String,
        /// Space-joined list of accepted labels
        valid: String,
    },

    /// Mapping file basename matches neither known format
    #[error(
        "Unrecognized mapping file '{0}': expected a basename of 'idmapping' or 'idmapping_selected'"
    )]
    UnknownMapFile(String),

    /// Accession CSV contained no usable accessions
    #[error("No accessions found in '{0}'")]
    EmptyAccessions(String),
}
