use std::io;
use thiserror::Error;

/// Error type for vcons-io operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// IO error occurred while reading.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Input file could not be opened.
    #[error("Failed to open {path}: {reason}")]
    Open { path: String, reason: String },

    /// The VCF ended, or data started, before a `#CHROM` header line.
    #[error("VCF is missing the #CHROM header line")]
    MissingHeader,

    /// A VCF data line could not be parsed.
    #[error("Malformed VCF record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// FASTA file held no sequences.
    #[error("No sequences found in FASTA file: {0}")]
    EmptyFasta(String),

    /// Requested contig is not in the FASTA file.
    #[error("Contig '{0}' not found in reference")]
    UnknownContig(String),
}

/// Result type alias for vcons-io operations.
pub type Result<T> = std::result::Result<T, IoError>;
