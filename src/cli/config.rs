// config.rs - Configuration file support

use crate::error::{MetadataError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    // Performance
    pub threads: Option<usize>,

    // Distance
    pub format: Option<String>,

    // Random groups
    pub n_columns: Option<usize>,
    pub column_name_prefix: Option<String>,
    pub column_value_prefix: Option<String>,
    pub encode_sample_size: Option<bool>,
    pub preserve_labels: Option<bool>,
    pub seed: Option<u64>,

    // Tabulate
    pub page_size: Option<i64>,

    // ID filtering
    pub include_ids: Option<String>,
    pub exclude_ids: Option<String>,
    pub include_ids_list: Option<String>,
    pub exclude_ids_list: Option<String>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text; `origin` names the source in errors
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self> {
        toml::from_str(content).map_err(|source| MetadataError::Config {
            path: origin.to_string(),
            source,
        })
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| MetadataError::io(path, e))?;
        let config = Self::from_toml_str(&content, &path.display().to_string())?;
        log::info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Write the commented sample configuration to a file
    pub fn write_sample<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, Self::generate_sample()).map_err(|e| MetadataError::io(path, e))?;
        log::info!("Saved sample configuration to: {}", path.display());
        Ok(())
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# metatab.toml - Configuration file for metatab
# Command line arguments will override these settings

# =============================================================================
# PERFORMANCE
# =============================================================================

# Number of threads for distance computation (omit for auto-detection)
# threads = 8

# =============================================================================
# DISTANCE
# =============================================================================

# Output format: tsv, csv, phylip, nexus
format = "tsv"

# =============================================================================
# RANDOM GROUPS
# =============================================================================

# Number of random groupings to create
n_columns = 3

# Prefix for output column names (followed by 0, 1, 2, ...)
column_name_prefix = "random-grouping-"

# Prefix for synthetic group labels (followed by 0, 1, 2, ...)
column_value_prefix = "fake-group-"

# Append ".n=<group size>" to each synthetic label
encode_sample_size = false

# Keep original category values instead of synthetic labels
preserve_labels = false

# Random seed for reproducible groupings (omit for a fresh seed each run)
# seed = 42

# =============================================================================
# TABULATE
# =============================================================================

# Records per page in the rendered table
page_size = 100

# =============================================================================
# ID FILTERING (applied to every loaded table)
# =============================================================================

# Include only ids matching regex pattern
# include_ids = "sample.*"

# Exclude ids matching regex pattern
# exclude_ids = "control.*"

# Include only ids listed in a file (one id per line)
# include_ids_list = "keep.txt"

# Exclude ids listed in a file (one id per line)
# exclude_ids_list = "exclude.txt"
"#
        .to_string()
    }
}
