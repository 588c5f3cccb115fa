use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Convenience result type for rule parsing and loading.
pub type RuleResult<T> = Result<T, RuleError>;

/// Convenience result type for cleansing runs.
pub type CleansingResult<T> = Result<T, CleansingError>;

/// Error type returned by ingestion functions.
///
/// This is a single error enum shared across CSV/JSON/Parquet ingestion.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Parquet ingestion error.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// The input does not conform to the provided schema (missing required fields/columns, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be parsed into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}

/// A cleansing rule definition is malformed or could not be loaded.
///
/// Raised at the rule boundary (deserialization, file loading), before any dataset is touched.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rule file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("unsupported rule file format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("invalid glob pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    /// `rule_id`, `name`, `dataset_type` or `version` is empty after trimming.
    #[error("rule field '{field}' cannot be empty")]
    EmptyIdentifier { field: &'static str },

    #[error("transformation type cannot be empty")]
    EmptyTransformationType,

    #[error("unsupported transformation type: {kind}")]
    UnsupportedTransformation { kind: String },

    #[error("severity must be either 'soft' or 'hard' (got '{value}')")]
    InvalidSeverity { value: String },

    #[error("invalid parameter '{parameter}' for {kind}: {message}")]
    InvalidParameter {
        kind: &'static str,
        parameter: &'static str,
        message: String,
    },
}

/// Fatal failure of a cleansing job. No partial result is produced.
#[derive(Debug, Error)]
pub enum CleansingError {
    #[error("deduplicate step requires keys or target_fields")]
    MissingDeduplicateKeys,

    #[error("cleansing rule {rule_id} not found{}", version_suffix(.version))]
    RuleNotFound {
        rule_id: String,
        version: Option<String>,
    },

    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// Report rendering failed.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("report output is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("csv writer could not be flushed: {0}")]
    Flush(String),
}

fn version_suffix(version: &Option<String>) -> String {
    version
        .as_deref()
        .map(|v| format!(" (version {v})"))
        .unwrap_or_default()
}
