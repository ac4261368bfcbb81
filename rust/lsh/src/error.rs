//! Error type shared by every stage of the pipeline.

use std::path::PathBuf;

/// Errors raised by the LSH engine and its ingestion helpers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A hyperparameter is out of range or inconsistent with another one.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading a document or ground-truth file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// No provenance could be derived from a document name.
    #[error("unrecognised document name: {0}")]
    InvalidFileName(String),

    /// A ground-truth line did not contain exactly two names.
    #[error("malformed ground truth on line {line}: {content:?}")]
    MalformedGroundTruth {
        /// 1-based line number.
        line: usize,
        /// Raw line content.
        content: String,
    },

    /// Names, contents and provenance records are not parallel sequences.
    #[error("{documents} documents, {names} names and {provenance} provenance records")]
    LengthMismatch {
        /// Number of documents supplied.
        documents: usize,
        /// Number of names supplied.
        names: usize,
        /// Number of provenance records supplied.
        provenance: usize,
    },

    #[error("band {band} out of range for {n_bands} bands")]
    BandOutOfRange { band: usize, n_bands: usize },

    #[error("band slice has {actual} rows, expected {expected}")]
    BandSliceLength { expected: usize, actual: usize },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
