// mod.rs - Table source loaders

pub mod csv;
pub mod tsv;

use crate::data::table::MetadataTable;
use crate::error::Result;
use std::path::Path;

/// Identifier column labels accepted regardless of case
const CASE_INSENSITIVE_ID_HEADERS: &[&str] = &[
    "id",
    "sampleid",
    "sample id",
    "sample-id",
    "featureid",
    "feature id",
    "feature-id",
];

/// Identifier column labels accepted only with this exact spelling
const EXACT_ID_HEADERS: &[&str] = &["#SampleID", "#Sample ID", "#OTUID", "#OTU ID", "sample_name"];

/// Whether `name` is a recognised identifier column label
pub fn is_id_header(name: &str) -> bool {
    EXACT_ID_HEADERS.contains(&name)
        || CASE_INSENSITIVE_ID_HEADERS.contains(&name.to_lowercase().as_str())
}

impl MetadataTable {
    /// Load a table, choosing the delimiter from the file extension
    pub fn from_file(file_path: &Path) -> Result<Self> {
        let extension = file_path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("tsv")
            .to_lowercase();

        match extension.as_str() {
            "csv" => Self::from_csv(file_path),
            _ => Self::from_tsv(file_path),
        }
    }
}
