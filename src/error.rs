//! Error types for protloc.

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for dataset loading, chart building and rendering.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// File could not be opened or read
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TSV parsing failure (ragged rows, bad encoding)
    #[error("TSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// JSON parsing failure
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A column the configuration requires is absent from the table header
    #[error("table {path} is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    /// Structurally valid TSV that still can't be used as a protein table
    #[error("malformed table {path}: {message}")]
    MalformedTable { path: PathBuf, message: String },

    /// Cleaning stats that aren't an object of non-negative integers
    #[error("malformed cleaning stats {path}: {message}")]
    MalformedStats { path: PathBuf, message: String },

    /// Invalid configuration (empty lists, bad values)
    #[error("configuration error: {0}")]
    Config(String),

    /// A chart asked for a column the table doesn't have
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// Request for a dashboard section that doesn't exist
    #[error("unknown section '{0}'")]
    UnknownSection(String),

    /// A chart could not be drawn
    #[error("chart rendering failed: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
