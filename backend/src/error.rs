//! Error types for the harmonization pipeline.
//!
//! - [`CsvError`] - CSV decoding and parsing errors
//! - [`FetchError`] - HTTP client setup errors
//! - [`GazetteerError`] - External enrichment table errors
//! - [`EmitError`] - JSON output errors
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Conversion is automatic via `From` implementations, so `?` works
//! across error boundaries.

use thiserror::Error;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors during CSV parsing.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed record.
    #[error("Line {line}: {message}")]
    ParseError { line: u64, message: String },

    /// Empty input.
    #[error("CSV file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in CSV")]
    NoHeaders,
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        CsvError::ParseError {
            line,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Fetch Errors
// =============================================================================

/// Errors setting up source retrieval.
///
/// Failed retrievals themselves are reported as a
/// [`FetchOutcome`](crate::fetch::FetchOutcome), not as errors.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(String),
}

// =============================================================================
// Gazetteer Errors
// =============================================================================

/// Errors loading an external region/ISO3 table.
#[derive(Debug, Error)]
pub enum GazetteerError {
    /// Failed to read the table file.
    #[error("Failed to read gazetteer: {0}")]
    IoError(#[from] std::io::Error),

    /// The table is not valid CSV.
    #[error("Invalid gazetteer table: {0}")]
    Csv(#[from] CsvError),

    /// Required `Name` column is missing.
    #[error("Gazetteer table has no 'Name' column")]
    MissingNameColumn,
}

// =============================================================================
// Emit Errors
// =============================================================================

/// Errors writing JSON output.
#[derive(Debug, Error)]
pub enum EmitError {
    /// Failed to serialize.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Failed to write the file.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// Most failures inside a run are logged and absorbed. Only the ones a caller
/// explicitly asked for (an unreadable gazetteer file, an unusable HTTP
/// client) surface here.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Fetch error.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Gazetteer error.
    #[error("Gazetteer error: {0}")]
    Gazetteer(#[from] GazetteerError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Result type for emit operations.
pub type EmitResult<T> = Result<T, EmitError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
