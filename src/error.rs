// error.rs - Error taxonomy for metadata operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by table loading, merging, distance, randomization and rendering.
///
/// Every variant carries a human readable message that names the offending
/// IDs, columns or values. No operation returns partial output on error.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Both the ID sets and the column sets of two tables overlap.
    #[error(
        "Merging can currently handle overlapping ids or overlapping columns, but not both. \
         {n_ids} overlapping ids were identified ({ids}) and {n_columns} overlapping columns \
         were identified ({columns})."
    )]
    Conflict {
        n_ids: usize,
        ids: String,
        n_columns: usize,
        columns: String,
    },

    /// The identifier columns of two tables carry different labels.
    #[error("Identifier column labels differ: '{left}' vs '{right}'")]
    SchemaMismatch { left: String, right: String },

    /// An overlapping column has a different declared kind in each table.
    #[error("Column '{column}' is {left} in the first table but {right} in the second")]
    TypeMismatch {
        column: String,
        left: String,
        right: String,
    },

    /// Missing values were found where every value is required.
    #[error("Column '{column}' has missing values for ids: {ids}")]
    MissingValue { column: String, ids: String },

    /// Values could not be coerced to numbers.
    #[error(
        "Only numeric data can be used here. Non-numeric values found in column '{column}': {values}"
    )]
    NonNumeric { column: String, values: String },

    /// An invalid parameter was supplied.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A requested column is not present in the table.
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    /// Table structure violates an invariant (duplicate ids, bad header, ...).
    #[error("Invalid metadata table: {0}")]
    InvalidTable(String),

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Delimited file error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse config file '{path}': {source}")]
    Config {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid regex: {0}")]
    Regex(#[from] regex::Error),
}

impl MetadataError {
    /// Attach a path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Join a list of names the way error messages present them: sorted, comma separated.
pub(crate) fn join_sorted<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut names: Vec<String> = items.into_iter().map(|s| s.as_ref().to_string()).collect();
    names.sort();
    names.join(", ")
}

pub type Result<T> = std::result::Result<T, MetadataError>;
